//! Overscroll effects.
//!
//! An [`OverscrollEffect`] sits between a scrollable container and its scroll
//! pipeline. Every scroll delta and every fling passes through it: the effect
//! may retain part of the delta as overscroll (rendering a stretch at the
//! edge) and forwards the rest to the container. What it retains plus what it
//! forwards always reconstructs the original delta.
//!
//! Which effect a container gets is decided once, at construction, by the
//! platform selector in [`platform`].

mod config;
mod noop;
pub mod platform;
mod stretch;

use std::fmt;
use std::rc::Rc;

use cranpose_ui_graphics::{GraphicsLayer, Offset, Size, Velocity};
use futures_util::future::LocalBoxFuture;

use crate::nested_scroll::{clamp_axis, NestedScrollSource};

pub use config::OverscrollConfig;
pub use noop::NoOpOverscrollEffect;
pub use platform::{
    default_overscroll_factory, platform_overscroll_effect, OverscrollFactory,
    PlatformOverscrollFactory, TargetPlatform,
};
pub use stretch::StretchOverscrollEffect;

/// Forwards a fling to the container and resolves to the velocity it could
/// not consume.
pub type PerformFling = Box<dyn FnOnce(Velocity) -> LocalBoxFuture<'static, Velocity>>;

/// Where an effect is in its stretch lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OverscrollPhase {
    /// Nothing retained, nothing drawn.
    #[default]
    Idle,
    /// A drag is pulling the content past its bound.
    Stretching,
    /// The pull is animating back to rest after release.
    Relaxing,
}

pub trait OverscrollEffect {
    /// Routes one scroll delta through the effect.
    ///
    /// `perform_scroll` is called exactly once with the part of `delta` the
    /// effect did not retain up front and returns what the container
    /// consumed. The return value is the overscroll-only part the effect kept.
    fn apply_to_scroll(
        &self,
        delta: Offset,
        source: NestedScrollSource,
        perform_scroll: &mut dyn FnMut(Offset) -> Offset,
    ) -> Offset;

    /// Routes a fling through the effect.
    ///
    /// `perform_fling` is called exactly once. Dropping the returned future
    /// cancels any relax animation and leaves the effect at rest.
    fn apply_to_fling(
        &self,
        velocity: Velocity,
        perform_fling: PerformFling,
    ) -> LocalBoxFuture<'static, ()>;

    fn phase(&self) -> OverscrollPhase;

    fn is_in_progress(&self) -> bool {
        self.phase() != OverscrollPhase::Idle
    }

    /// Decoration the render layer applies to the overscrolled container.
    fn effect_modifier(&self) -> OverscrollModifier;
}

/// Draw-time hook of an overscroll effect.
pub trait OverscrollDecoration {
    /// Layer transform for a container of the given size.
    fn layer(&self, size: Size) -> GraphicsLayer;
}

/// Presentational part of an overscroll effect.
///
/// An empty modifier always yields [`GraphicsLayer::IDENTITY`].
#[derive(Clone, Default)]
pub struct OverscrollModifier {
    decoration: Option<Rc<dyn OverscrollDecoration>>,
}

impl OverscrollModifier {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(decoration: Rc<dyn OverscrollDecoration>) -> Self {
        Self {
            decoration: Some(decoration),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.decoration.is_none()
    }

    pub fn layer(&self, size: Size) -> GraphicsLayer {
        match &self.decoration {
            Some(decoration) => decoration.layer(size),
            None => GraphicsLayer::IDENTITY,
        }
    }
}

impl fmt::Debug for OverscrollModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverscrollModifier")
            .field("empty", &self.is_empty())
            .finish()
    }
}

/// Treats non-finite scroll input as no movement.
pub(crate) fn sanitize_delta(delta: Offset, what: &str) -> Offset {
    if delta.is_finite() {
        delta
    } else {
        log::warn!("ignoring non-finite {what} {delta:?}");
        delta.sanitized()
    }
}

pub(crate) fn sanitize_velocity(velocity: Velocity, what: &str) -> Velocity {
    if velocity.is_finite() {
        velocity
    } else {
        log::warn!("ignoring non-finite {what} {velocity:?}");
        velocity.sanitized()
    }
}

/// Limits what `perform_scroll` reports to what was forwarded, per axis.
pub(crate) fn clamp_performed(performed: Offset, forwarded: Offset) -> Offset {
    let performed = sanitize_delta(performed, "performed scroll");
    let clamped = performed.zip(forwarded, clamp_axis);
    if clamped != performed {
        log::debug!("performed scroll {performed:?} exceeds forwarded {forwarded:?}");
    }
    clamped
}

#[cfg(test)]
#[path = "../tests/overscroll_tests.rs"]
mod tests;
