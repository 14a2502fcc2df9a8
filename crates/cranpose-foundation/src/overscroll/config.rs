use cranpose_animation::SpringSpec;
use cranpose_ui_graphics::Dp;

use crate::gesture_constants::{
    MAX_FLING_VELOCITY, MAX_STRETCH_DP, RUBBER_BAND_RESISTANCE, SETTLE_THRESHOLD,
};

/// Tuning for [`crate::overscroll::StretchOverscrollEffect`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverscrollConfig {
    /// Upper bound of the rendered displacement, px.
    pub max_stretch: f32,
    /// How quickly the displacement saturates towards `max_stretch`.
    pub resistance: f32,
    /// Spring that pulls the stretch back to rest.
    pub relax_spring: SpringSpec,
    /// Share of a fling's leftover velocity turned into a bounce.
    pub absorb_fraction: f32,
    /// Bounce impulses are clamped to this, px/sec.
    pub max_absorb_velocity: f32,
    /// Pull below this (px) counts as relaxed.
    pub settle_threshold: f32,
}

impl OverscrollConfig {
    /// Android-style stretch: critically damped, absorbs a fraction of the
    /// fling that hit the edge.
    pub fn stretch(density: f32) -> Self {
        Self {
            max_stretch: Dp(MAX_STRETCH_DP).to_px(density),
            resistance: RUBBER_BAND_RESISTANCE,
            relax_spring: SpringSpec::new(
                SpringSpec::DAMPING_RATIO_NO_BOUNCY,
                SpringSpec::STIFFNESS_MEDIUM,
            )
            .with_thresholds(SETTLE_THRESHOLD, 1.0),
            absorb_fraction: 0.25,
            max_absorb_velocity: MAX_FLING_VELOCITY,
            settle_threshold: SETTLE_THRESHOLD,
        }
    }

    /// Cupertino-style rubber band: softer spring, more of the fling bounces.
    pub fn bounce(density: f32) -> Self {
        Self {
            max_stretch: Dp(MAX_STRETCH_DP * 1.5).to_px(density),
            relax_spring: SpringSpec::new(
                SpringSpec::DAMPING_RATIO_LOW_BOUNCY,
                SpringSpec::STIFFNESS_MEDIUM_LOW,
            )
            .with_thresholds(SETTLE_THRESHOLD, 1.0),
            absorb_fraction: 0.5,
            ..Self::stretch(density)
        }
    }

    /// Rendered displacement for an accumulated pull on one axis.
    ///
    /// Grows linearly for small pulls and saturates at `max_stretch`.
    pub fn displacement(&self, pull: f32) -> f32 {
        if pull == 0.0 || self.max_stretch <= 0.0 {
            return 0.0;
        }
        let scaled = pull.abs() * self.resistance / self.max_stretch;
        pull.signum() * self.max_stretch * (1.0 - 1.0 / (scaled + 1.0))
    }
}

impl Default for OverscrollConfig {
    fn default() -> Self {
        Self::stretch(1.0)
    }
}
