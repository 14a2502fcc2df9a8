use super::*;

use std::future::Future;

use crate::decay_spec::SplineBasedDecaySpec;
use cranpose_core::{DefaultScheduler, Runtime, FRAME_NANOS_60HZ};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

struct FrameDriver {
    runtime: Runtime,
    time: u64,
}

impl FrameDriver {
    fn new() -> Self {
        Self {
            runtime: Runtime::new(Arc::new(DefaultScheduler)),
            time: 0,
        }
    }

    fn clock(&self) -> FrameClock {
        self.runtime.frame_clock()
    }

    fn frame(&mut self) {
        let handle = self.runtime.handle();
        handle.drain_ui();
        self.time += FRAME_NANOS_60HZ;
        handle.drain_frame_callbacks(self.time);
        handle.drain_ui();
    }
}

#[test]
fn spring_animation_reaches_target_and_reports_finished() {
    let mut driver = FrameDriver::new();
    let clock = driver.clock();
    let samples = Rc::new(RefCell::new(Vec::new()));
    let result = Rc::new(RefCell::new(None));

    let samples_in_task = Rc::clone(&samples);
    let result_in_task = Rc::clone(&result);
    let _task = driver.runtime.handle().spawn_ui(async move {
        let outcome = animate_spring(&clock, 60.0, 0.0, 0.0, SpringSpec::default(), |value, _| {
            samples_in_task.borrow_mut().push(value);
            FrameControl::Continue
        })
        .await;
        *result_in_task.borrow_mut() = Some(outcome);
    });

    for _ in 0..120 {
        driver.frame();
    }

    let outcome = result.borrow().expect("animation finished");
    assert_eq!(outcome.end_reason, AnimationEndReason::Finished);
    assert_eq!(outcome.value, 0.0);
    let samples = samples.borrow();
    assert_eq!(samples.last().copied(), Some(0.0));
    assert!(samples.iter().any(|value| *value > 0.0 && *value < 60.0));
}

#[test]
fn spring_already_at_rest_finishes_without_frames() {
    let driver = FrameDriver::new();
    let clock = driver.clock();
    let result = Rc::new(RefCell::new(None));

    let result_in_task = Rc::clone(&result);
    let _task = driver.runtime.handle().spawn_ui(async move {
        let outcome = animate_spring(&clock, 0.1, 0.0, 0.0, SpringSpec::default(), |_, _| {
            FrameControl::Continue
        })
        .await;
        *result_in_task.borrow_mut() = Some(outcome);
    });
    driver.runtime.handle().drain_ui();

    let outcome = result.borrow().expect("finished immediately");
    assert_eq!(outcome.end_reason, AnimationEndReason::Finished);
    assert!(!driver.runtime.handle().has_frame_callbacks());
}

#[test]
fn on_frame_can_stop_decay_at_bound() {
    let mut driver = FrameDriver::new();
    let clock = driver.clock();
    let result = Rc::new(RefCell::new(None));

    let result_in_task = Rc::clone(&result);
    let _task = driver.runtime.handle().spawn_ui(async move {
        let spec = SplineBasedDecaySpec::new(1.0);
        let outcome = animate_decay(&clock, 0.0, 3_000.0, &spec, |value, _| {
            if value >= 100.0 {
                FrameControl::Stop(AnimationEndReason::BoundReached)
            } else {
                FrameControl::Continue
            }
        })
        .await;
        *result_in_task.borrow_mut() = Some(outcome);
    });

    for _ in 0..240 {
        driver.frame();
    }

    let outcome = result.borrow().expect("decay stopped");
    assert_eq!(outcome.end_reason, AnimationEndReason::BoundReached);
    assert!(outcome.value >= 100.0);
    assert!(outcome.velocity > 0.0);
}

#[test]
fn dropping_runtime_interrupts_pending_animation() {
    let driver = FrameDriver::new();
    let clock = driver.clock();
    let handle = driver.runtime.handle();
    let result = Rc::new(RefCell::new(None));

    let result_in_task = Rc::clone(&result);
    let mut future = Box::pin(async move {
        let outcome = animate_spring(&clock, 50.0, 0.0, 0.0, SpringSpec::default(), |_, _| {
            FrameControl::Continue
        })
        .await;
        *result_in_task.borrow_mut() = Some(outcome);
    });
    drop(driver);
    assert!(!handle.is_alive());

    let waker = futures_waker();
    let mut cx = std::task::Context::from_waker(&waker);
    assert!(future.as_mut().poll(&mut cx).is_ready());
    let outcome = result.borrow().expect("interrupted");
    assert_eq!(outcome.end_reason, AnimationEndReason::Interrupted);
    assert_eq!(outcome.value, 50.0);
}

fn futures_waker() -> std::task::Waker {
    struct Noop;
    impl std::task::Wake for Noop {
        fn wake(self: Arc<Self>) {}
    }
    std::task::Waker::from(Arc::new(Noop))
}
