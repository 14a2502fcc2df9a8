use std::fmt;
use std::future::Future;
use std::rc::Rc;

use cranpose_core::{FrameClock, RuntimeHandle, TaskHandle, FRAME_NANOS_60HZ};
use cranpose_foundation::{
    OverscrollConfig, OverscrollEffect, ScrollState, ScrollableDispatch, StretchOverscrollEffect,
};
use cranpose_runtime_std::StdRuntime;

/// Frames [`OverscrollTestRule::run_until_idle`] drives before giving up.
pub const MAX_IDLE_FRAMES: usize = 600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestRuleError {
    /// The runtime refused to spawn a task.
    SpawnFailed,
    /// Work was still pending after the frame budget ran out.
    NotIdle { frames: usize },
}

impl fmt::Display for TestRuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestRuleError::SpawnFailed => write!(f, "runtime refused to spawn a task"),
            TestRuleError::NotIdle { frames } => {
                write!(f, "runtime still busy after {frames} frames")
            }
        }
    }
}

impl std::error::Error for TestRuleError {}

/// Headless harness for exercising scroll and overscroll behaviour.
///
/// Owns a runtime and a virtual frame clock: every
/// [`advance_frame`](Self::advance_frame) moves time forward by one frame
/// interval, so animations are deterministic regardless of wall time.
pub struct OverscrollTestRule {
    runtime: StdRuntime,
    frame_time_nanos: u64,
    frame_interval_nanos: u64,
    density: f32,
}

impl OverscrollTestRule {
    pub fn new() -> Self {
        Self {
            runtime: StdRuntime::new(),
            frame_time_nanos: 0,
            frame_interval_nanos: FRAME_NANOS_60HZ,
            density: 1.0,
        }
    }

    pub fn with_frame_interval(mut self, nanos: u64) -> Self {
        self.frame_interval_nanos = nanos.max(1);
        self
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.runtime_handle()
    }

    pub fn frame_clock(&self) -> FrameClock {
        self.runtime.frame_clock()
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    /// Virtual time of the last frame.
    pub fn frame_time_nanos(&self) -> u64 {
        self.frame_time_nanos
    }

    /// Spawns `future` on the rule's runtime. It first runs on the next
    /// frame or [`pump_ui`](Self::pump_ui).
    pub fn launch(
        &self,
        future: impl Future<Output = ()> + 'static,
    ) -> Result<TaskHandle, TestRuleError> {
        self.runtime_handle()
            .spawn_ui(future)
            .ok_or(TestRuleError::SpawnFailed)
    }

    /// Polls woken tasks without advancing time.
    pub fn pump_ui(&self) {
        self.runtime_handle().drain_ui();
    }

    pub fn advance_frame(&mut self) {
        let handle = self.runtime_handle();
        handle.drain_ui();
        self.frame_time_nanos += self.frame_interval_nanos;
        handle.drain_frame_callbacks(self.frame_time_nanos);
        handle.drain_ui();
        self.runtime.take_frame_request();
    }

    pub fn advance_frames(&mut self, count: usize) {
        for _ in 0..count {
            self.advance_frame();
        }
    }

    /// True when no task is pending and no frame callback is registered.
    pub fn is_idle(&self) -> bool {
        let handle = self.runtime_handle();
        !handle.has_pending_ui() && !handle.has_frame_callbacks()
    }

    /// Advances frames until the runtime is idle.
    ///
    /// Returns the number of frames it took.
    pub fn run_until_idle(&mut self) -> Result<usize, TestRuleError> {
        self.pump_ui();
        for frames in 0..MAX_IDLE_FRAMES {
            if self.is_idle() {
                return Ok(frames);
            }
            self.advance_frame();
        }
        if self.is_idle() {
            Ok(MAX_IDLE_FRAMES)
        } else {
            Err(TestRuleError::NotIdle {
                frames: MAX_IDLE_FRAMES,
            })
        }
    }

    pub fn stretch_effect(&self, config: OverscrollConfig) -> StretchOverscrollEffect {
        StretchOverscrollEffect::new(self.frame_clock(), config)
    }

    /// A vertical container scrollable over `[0, max_value]`.
    pub fn scroll_container(
        &self,
        max_value: f32,
        effect: Option<Rc<dyn OverscrollEffect>>,
    ) -> (ScrollState, ScrollableDispatch) {
        let state = ScrollState::new(0.0);
        state.set_max_value(max_value);
        let dispatch = ScrollableDispatch::builder(state.clone(), self.frame_clock())
            .overscroll_effect(effect)
            .density(self.density)
            .build();
        (state, dispatch)
    }
}

impl Default for OverscrollTestRule {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/testing_tests.rs"]
mod tests;
