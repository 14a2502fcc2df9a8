//! Frame-driven animation loops.
//!
//! Each loop awaits [`FrameClock::next_frame`], samples its physics at the
//! elapsed frame time and hands the sample to an `on_frame` callback. The
//! callback owns whatever the animation drives and may stop it early.
//! Dropping the returned future stops the animation between frames.

use cranpose_core::FrameClock;

use crate::decay_spec::DecayAnimationSpec;
use crate::spring::{SpringSimulation, SpringSpec, SpringState};

/// How an animation loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEndReason {
    /// The physics reached rest.
    Finished,
    /// `on_frame` reported that the animated value hit a bound.
    BoundReached,
    /// `on_frame` stopped the loop or the frame clock went away.
    Interrupted,
}

/// Instruction returned by an `on_frame` callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    Continue,
    Stop(AnimationEndReason),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationResult {
    pub end_reason: AnimationEndReason,
    /// Last value handed to `on_frame`.
    pub value: f32,
    /// Velocity at that frame, px/sec.
    pub velocity: f32,
}

impl AnimationResult {
    fn new(end_reason: AnimationEndReason, value: f32, velocity: f32) -> Self {
        Self {
            end_reason,
            value,
            velocity,
        }
    }
}

fn elapsed_since(start: &mut Option<u64>, frame_time: u64) -> u64 {
    let start = *start.get_or_insert(frame_time);
    frame_time.saturating_sub(start)
}

/// Animates from `initial_value` towards `target` with a spring.
///
/// `on_frame` receives `(value, velocity)` every frame, including the final
/// resting frame where the value equals `target` exactly.
pub async fn animate_spring(
    clock: &FrameClock,
    initial_value: f32,
    initial_velocity: f32,
    target: f32,
    spec: SpringSpec,
    mut on_frame: impl FnMut(f32, f32) -> FrameControl,
) -> AnimationResult {
    let simulation = SpringSimulation::new(spec, target);
    let initial = SpringState {
        value: initial_value,
        velocity: initial_velocity,
    };
    if simulation.is_at_rest(initial) {
        on_frame(target, 0.0);
        return AnimationResult::new(AnimationEndReason::Finished, target, 0.0);
    }

    let mut start = None;
    let mut last = initial;
    loop {
        let Some(frame_time) = clock.next_frame().await else {
            return AnimationResult::new(AnimationEndReason::Interrupted, last.value, last.velocity);
        };
        let elapsed = elapsed_since(&mut start, frame_time);
        let mut state =
            simulation.state_at(initial_value, initial_velocity, elapsed as f32 / 1e9);
        let at_rest = simulation.is_at_rest(state);
        if at_rest {
            state = SpringState {
                value: target,
                velocity: 0.0,
            };
        }
        last = state;

        if let FrameControl::Stop(reason) = on_frame(state.value, state.velocity) {
            return AnimationResult::new(reason, state.value, state.velocity);
        }
        if at_rest {
            return AnimationResult::new(AnimationEndReason::Finished, target, 0.0);
        }
    }
}

/// Animates a decaying value starting at `initial_value` with `initial_velocity`.
pub async fn animate_decay<D: DecayAnimationSpec>(
    clock: &FrameClock,
    initial_value: f32,
    initial_velocity: f32,
    spec: &D,
    mut on_frame: impl FnMut(f32, f32) -> FrameControl,
) -> AnimationResult {
    let duration = spec.duration_nanos(initial_value, initial_velocity);
    if duration == 0 {
        return AnimationResult::new(AnimationEndReason::Finished, initial_value, 0.0);
    }

    let mut start = None;
    let mut last = (initial_value, initial_velocity);
    loop {
        let Some(frame_time) = clock.next_frame().await else {
            return AnimationResult::new(AnimationEndReason::Interrupted, last.0, last.1);
        };
        let elapsed = elapsed_since(&mut start, frame_time).min(duration);
        let value = spec.value_at(elapsed, initial_value, initial_velocity);
        let velocity = spec.velocity_at(elapsed, initial_value, initial_velocity);
        last = (value, velocity);

        if let FrameControl::Stop(reason) = on_frame(value, velocity) {
            return AnimationResult::new(reason, value, velocity);
        }
        if elapsed >= duration {
            return AnimationResult::new(AnimationEndReason::Finished, value, 0.0);
        }
    }
}

#[cfg(test)]
#[path = "tests/animate_tests.rs"]
mod tests;
