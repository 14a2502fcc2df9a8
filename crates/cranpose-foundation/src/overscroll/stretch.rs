//! Stretch overscroll.
//!
//! Drag deltas the content cannot consume accumulate into a `pull`. The pull
//! is rendered as a rubber-banded stretch and springs back to zero when the
//! finger lifts. Dragging back against the pull unwinds it before the content
//! scrolls again.

use std::cell::RefCell;
use std::rc::Rc;

use cranpose_animation::{animate_spring, AnimationEndReason, FrameControl};
use cranpose_core::FrameClock;
use cranpose_ui_graphics::{GraphicsLayer, Offset, Size, Velocity};
use futures_util::future::{join, LocalBoxFuture};
use futures_util::FutureExt;

use super::{
    clamp_performed, sanitize_delta, sanitize_velocity, OverscrollConfig, OverscrollDecoration,
    OverscrollEffect, OverscrollModifier, OverscrollPhase, PerformFling,
};
use crate::gesture_constants::MAX_OVERSCROLL_PULL;
use crate::nested_scroll::NestedScrollSource;

/// Pull components smaller than this are rounding noise.
const PULL_EPSILON: f32 = 1e-3;

#[derive(Clone, Copy, Debug, Default)]
struct StretchState {
    pull: Offset,
    phase: OverscrollPhase,
    /// Identifies the relax animation allowed to write `pull`.
    relax_generation: u64,
}

struct StretchInner {
    config: OverscrollConfig,
    clock: FrameClock,
    state: RefCell<StretchState>,
}

/// Android-style stretch effect. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct StretchOverscrollEffect {
    inner: Rc<StretchInner>,
}

impl StretchOverscrollEffect {
    pub fn new(clock: FrameClock, config: OverscrollConfig) -> Self {
        Self {
            inner: Rc::new(StretchInner {
                config,
                clock,
                state: RefCell::new(StretchState::default()),
            }),
        }
    }

    pub fn config(&self) -> OverscrollConfig {
        self.inner.config
    }

    /// Accumulated overscroll not yet relaxed, in finger direction.
    pub fn pull(&self) -> Offset {
        self.inner.state.borrow().pull
    }

    /// Rendered displacement for the current pull.
    pub fn displacement(&self) -> Offset {
        let config = self.inner.config;
        self.pull().map(|pull| config.displacement(pull))
    }
}

impl StretchInner {
    fn is_current(&self, generation: u64) -> bool {
        self.state.borrow().relax_generation == generation
    }

    /// A drag during a relax takes over: the relax loop is orphaned and the
    /// pull drops to zero before the new delta is processed.
    fn supersede_relax(&self) {
        let mut state = self.state.borrow_mut();
        if state.phase == OverscrollPhase::Relaxing {
            log::trace!("drag supersedes relax at pull {:?}", state.pull);
            state.relax_generation = state.relax_generation.wrapping_add(1);
            state.pull = Offset::ZERO;
            state.phase = OverscrollPhase::Idle;
        }
    }

    /// Retains the part of `delta` that unwinds an existing stretch.
    fn release_pull(&self, delta: Offset) -> Offset {
        let mut state = self.state.borrow_mut();
        if state.phase != OverscrollPhase::Stretching {
            return Offset::ZERO;
        }
        let consumed = delta.zip(state.pull, |delta, pull| {
            if delta * pull < 0.0 {
                delta.signum() * delta.abs().min(pull.abs())
            } else {
                0.0
            }
        });
        state.pull = (state.pull + consumed).map(snap_to_zero);
        if state.pull.is_zero() {
            state.phase = OverscrollPhase::Idle;
        }
        consumed
    }

    fn grow_pull(&self, leftover: Offset) {
        let leftover = leftover.map(snap_to_zero);
        if leftover.is_zero() {
            return;
        }
        let mut state = self.state.borrow_mut();
        state.pull = (state.pull + leftover)
            .map(|pull| pull.clamp(-MAX_OVERSCROLL_PULL, MAX_OVERSCROLL_PULL));
        state.phase = OverscrollPhase::Stretching;
    }

    /// Starts a new relax generation, orphaning any running relax.
    fn begin_relax(&self) -> u64 {
        let mut state = self.state.borrow_mut();
        state.relax_generation = state.relax_generation.wrapping_add(1);
        state.phase = if state.pull.is_zero() {
            OverscrollPhase::Idle
        } else {
            OverscrollPhase::Relaxing
        };
        state.relax_generation
    }

    fn settle(&self, generation: u64) {
        let mut state = self.state.borrow_mut();
        if state.relax_generation == generation {
            state.pull = Offset::ZERO;
            state.phase = OverscrollPhase::Idle;
        }
    }

    fn set_pull_axis(&self, generation: u64, write: impl FnOnce(&mut Offset)) -> FrameControl {
        let mut state = self.state.borrow_mut();
        if state.relax_generation != generation {
            return FrameControl::Stop(AnimationEndReason::Interrupted);
        }
        write(&mut state.pull);
        FrameControl::Continue
    }
}

fn snap_to_zero(value: f32) -> f32 {
    if value.abs() < PULL_EPSILON {
        0.0
    } else {
        value
    }
}

/// Splits a release velocity into the part that drives the relax (against
/// the pull) and the part forwarded to the content.
fn split_velocity(velocity: Velocity, pull: Offset) -> (Velocity, Velocity) {
    let relax_axis = |velocity: f32, pull: f32| {
        if pull != 0.0 && velocity * pull < 0.0 {
            velocity
        } else {
            0.0
        }
    };
    let relax = Velocity::new(relax_axis(velocity.x, pull.x), relax_axis(velocity.y, pull.y));
    (relax, velocity - relax)
}

/// Springs the pull back to zero on both axes, starting from `velocity`.
///
/// Exits without writing once `generation` is no longer current.
async fn relax(inner: Rc<StretchInner>, generation: u64, velocity: Velocity) {
    let start = inner.state.borrow().pull;
    if !start.is_finite() || !velocity.is_finite() {
        log::warn!("relax {generation} started from non-finite state, settling");
        inner.settle(generation);
        return;
    }
    if start.is_zero() && velocity.is_zero() {
        inner.settle(generation);
        return;
    }
    {
        let mut state = inner.state.borrow_mut();
        if state.relax_generation != generation {
            return;
        }
        state.phase = OverscrollPhase::Relaxing;
    }

    let spec = inner.config.relax_spring;
    let clock = inner.clock.clone();
    let x_axis = animate_spring(&clock, start.x, velocity.x, 0.0, spec, |value, _| {
        inner.set_pull_axis(generation, |pull| pull.x = value)
    });
    let y_axis = animate_spring(&clock, start.y, velocity.y, 0.0, spec, |value, _| {
        inner.set_pull_axis(generation, |pull| pull.y = value)
    });
    let (x, y) = join(x_axis, y_axis).await;
    log::trace!(
        "relax {generation} ended: x {:?}, y {:?}",
        x.end_reason,
        y.end_reason
    );
    inner.settle(generation);
}

/// Resets the effect if a fling future is dropped mid-relax.
struct RelaxGuard {
    inner: Rc<StretchInner>,
    generation: u64,
    armed: bool,
}

impl RelaxGuard {
    fn new(inner: Rc<StretchInner>, generation: u64) -> Self {
        Self {
            inner,
            generation,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for RelaxGuard {
    fn drop(&mut self) {
        if self.armed && self.inner.is_current(self.generation) {
            log::debug!("fling cancelled, resetting overscroll");
            self.inner.settle(self.generation);
        }
    }
}

impl OverscrollEffect for StretchOverscrollEffect {
    fn apply_to_scroll(
        &self,
        delta: Offset,
        source: NestedScrollSource,
        perform_scroll: &mut dyn FnMut(Offset) -> Offset,
    ) -> Offset {
        let delta = sanitize_delta(delta, "scroll delta");
        let is_drag = source.is_user_input();
        if is_drag {
            self.inner.supersede_relax();
        }

        let retained = if is_drag {
            self.inner.release_pull(delta)
        } else {
            Offset::ZERO
        };
        let forwarded = delta - retained;
        let performed = clamp_performed(perform_scroll(forwarded), forwarded);
        let leftover = forwarded - performed;

        if is_drag {
            self.inner.grow_pull(leftover);
        }
        retained + leftover
    }

    fn apply_to_fling(
        &self,
        velocity: Velocity,
        perform_fling: PerformFling,
    ) -> LocalBoxFuture<'static, ()> {
        let velocity = sanitize_velocity(velocity, "fling velocity");
        let inner = Rc::clone(&self.inner);
        let generation = inner.begin_relax();
        let guard = RelaxGuard::new(Rc::clone(&inner), generation);
        let (relax_velocity, forwarded) = split_velocity(velocity, self.pull());
        let fling = perform_fling(forwarded);

        async move {
            let relaxing = relax(Rc::clone(&inner), generation, relax_velocity);
            let ((), residual) = join(relaxing, fling).await;
            let residual = sanitize_velocity(residual, "residual fling velocity");

            if !residual.is_zero() && inner.is_current(generation) {
                let config = inner.config;
                let impulse = Velocity::new(
                    residual.x * config.absorb_fraction,
                    residual.y * config.absorb_fraction,
                )
                .clamp_magnitude(config.max_absorb_velocity);
                log::trace!("absorbing residual fling {residual:?} as {impulse:?}");
                relax(Rc::clone(&inner), generation, impulse).await;
            }
            guard.disarm();
        }
        .boxed_local()
    }

    fn phase(&self) -> OverscrollPhase {
        self.inner.state.borrow().phase
    }

    fn effect_modifier(&self) -> OverscrollModifier {
        OverscrollModifier::new(Rc::new(StretchDecoration {
            effect: self.clone(),
        }))
    }
}

struct StretchDecoration {
    effect: StretchOverscrollEffect,
}

impl OverscrollDecoration for StretchDecoration {
    fn layer(&self, size: Size) -> GraphicsLayer {
        let displacement = self.effect.displacement();
        if displacement.is_zero() {
            return GraphicsLayer::IDENTITY;
        }
        let scale = |displacement: f32, extent: f32| {
            if extent > 0.0 {
                1.0 + displacement.abs() / extent
            } else {
                1.0
            }
        };
        GraphicsLayer {
            scale_x: scale(displacement.x, size.width),
            scale_y: scale(displacement.y, size.height),
            ..GraphicsLayer::translation(displacement)
        }
    }
}

#[cfg(test)]
#[path = "../tests/stretch_tests.rs"]
mod tests;
