use cranpose_ui_graphics::{Offset, Velocity};
use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;

use super::{
    sanitize_delta, sanitize_velocity, OverscrollEffect, OverscrollModifier, OverscrollPhase,
    PerformFling,
};
use crate::nested_scroll::NestedScrollSource;

/// Effect for targets without overscroll feedback.
///
/// Retains nothing, forwards every delta and velocity untouched and never
/// leaves [`OverscrollPhase::Idle`].
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpOverscrollEffect;

impl OverscrollEffect for NoOpOverscrollEffect {
    fn apply_to_scroll(
        &self,
        delta: Offset,
        _source: NestedScrollSource,
        perform_scroll: &mut dyn FnMut(Offset) -> Offset,
    ) -> Offset {
        perform_scroll(sanitize_delta(delta, "scroll delta"));
        Offset::ZERO
    }

    fn apply_to_fling(
        &self,
        velocity: Velocity,
        perform_fling: PerformFling,
    ) -> LocalBoxFuture<'static, ()> {
        perform_fling(sanitize_velocity(velocity, "fling velocity"))
            .map(|_residual| ())
            .boxed_local()
    }

    fn phase(&self) -> OverscrollPhase {
        OverscrollPhase::Idle
    }

    fn effect_modifier(&self) -> OverscrollModifier {
        OverscrollModifier::empty()
    }
}
