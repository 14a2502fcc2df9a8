//! Shared gesture constants for scroll, fling and overscroll handling.
//!
//! Values are in logical pixels (or logical pixels per second) at a density
//! of 1.0 unless stated otherwise.

/// Maximum fling velocity in logical pixels per second.
///
/// Matches Android's default maximum fling velocity (ViewConfiguration) on a
/// baseline density. Flings are clamped to this before reaching the
/// overscroll effect.
pub const MAX_FLING_VELOCITY: f32 = 8_000.0;

/// Maximum visual stretch of an overscrolled container, in dp.
pub const MAX_STRETCH_DP: f32 = 64.0;

/// Rubber-band coefficient: how quickly stretch saturates towards the max.
pub const RUBBER_BAND_RESISTANCE: f32 = 0.55;

/// Pull magnitude below which a stretch is treated as fully relaxed.
pub const SETTLE_THRESHOLD: f32 = 0.5;

/// A fling that stops at a content bound leaves at least this much
/// unconsumed scroll in a frame.
pub const BOUND_HIT_THRESHOLD: f32 = 0.5;

/// Largest accumulated overscroll pull, in pixels. The rendered stretch has
/// long saturated at this point; the cap keeps the relax spring finite.
pub const MAX_OVERSCROLL_PULL: f32 = 1.0e6;
