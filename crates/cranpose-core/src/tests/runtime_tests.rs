use super::*;

use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
struct CountingScheduler {
    frames_requested: AtomicUsize,
}

impl RuntimeScheduler for CountingScheduler {
    fn schedule_frame(&self) {
        self.frames_requested.fetch_add(1, Ordering::SeqCst);
    }
}

fn test_runtime() -> (Runtime, Arc<CountingScheduler>) {
    let scheduler = Arc::new(CountingScheduler::default());
    (Runtime::new(scheduler.clone()), scheduler)
}

struct DropFlag(Rc<Cell<bool>>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.set(true);
    }
}

#[test]
fn frame_callbacks_fire_once_with_frame_time() {
    let (runtime, scheduler) = test_runtime();
    let handle = runtime.handle();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let seen_in_callback = Rc::clone(&seen);
    let registration = runtime
        .frame_clock()
        .with_frame_nanos(move |time| seen_in_callback.borrow_mut().push(time));
    assert!(registration.is_active());
    assert!(runtime.needs_frame());
    assert!(scheduler.frames_requested.load(Ordering::SeqCst) >= 1);

    handle.drain_frame_callbacks(42);
    handle.drain_frame_callbacks(84);

    assert_eq!(seen.borrow().as_slice(), &[42]);
    assert!(!runtime.needs_frame());
    drop(registration);
}

#[test]
fn dropping_registration_cancels_callback() {
    let (runtime, _) = test_runtime();
    let fired = Rc::new(Cell::new(false));

    let fired_in_callback = Rc::clone(&fired);
    let registration = runtime
        .frame_clock()
        .with_frame_millis(move |_| fired_in_callback.set(true));
    drop(registration);

    assert!(!runtime.handle().has_frame_callbacks());
    runtime.handle().drain_frame_callbacks(16_000_000);
    assert!(!fired.get());
}

#[test]
fn spawned_task_waits_for_next_frame() {
    let (runtime, _) = test_runtime();
    let handle = runtime.handle();
    let clock = runtime.frame_clock();
    let frame_seen = Rc::new(Cell::new(None));

    let frame_in_task = Rc::clone(&frame_seen);
    let task = handle
        .spawn_ui(async move {
            let time = clock.next_frame().await;
            frame_in_task.set(time);
        })
        .expect("runtime alive");

    handle.drain_ui();
    assert_eq!(frame_seen.get(), None);
    assert!(!task.is_finished());
    assert!(handle.has_frame_callbacks());

    handle.drain_frame_callbacks(crate::FRAME_NANOS_60HZ);
    handle.drain_ui();
    assert_eq!(frame_seen.get(), Some(crate::FRAME_NANOS_60HZ));
    assert!(task.is_finished());
}

#[test]
fn cancelling_task_drops_future_immediately() {
    let (runtime, _) = test_runtime();
    let handle = runtime.handle();
    let clock = runtime.frame_clock();
    let dropped = Rc::new(Cell::new(false));

    let flag = DropFlag(Rc::clone(&dropped));
    let task = handle
        .spawn_ui(async move {
            let _flag = flag;
            loop {
                if clock.next_frame().await.is_none() {
                    break;
                }
            }
        })
        .expect("runtime alive");
    handle.drain_ui();
    assert!(!dropped.get());

    task.cancel();
    assert!(dropped.get());
    assert!(!handle.has_pending_ui());
    // The pending frame registration went with the future.
    assert!(!handle.has_frame_callbacks());
}

#[test]
fn task_cancelled_while_being_polled_is_dropped_after_poll() {
    let (runtime, _) = test_runtime();
    let handle = runtime.handle();
    let clock = runtime.frame_clock();
    let dropped = Rc::new(Cell::new(false));
    let own_handle: Rc<RefCell<Option<TaskHandle>>> = Rc::new(RefCell::new(None));

    let flag = DropFlag(Rc::clone(&dropped));
    let slot = Rc::clone(&own_handle);
    let task = handle
        .spawn_ui(async move {
            let _flag = flag;
            if let Some(task) = slot.borrow_mut().take() {
                task.cancel();
            }
            clock.next_frame().await;
        })
        .expect("runtime alive");
    *own_handle.borrow_mut() = Some(task);

    handle.drain_ui();
    assert!(dropped.get());
    assert!(!handle.has_pending_ui());
}

#[test]
fn local_tasks_run_in_order() {
    let (runtime, _) = test_runtime();
    let handle = runtime.handle();
    let order = Rc::new(RefCell::new(Vec::new()));

    for index in 0..3 {
        let order = Rc::clone(&order);
        handle.enqueue_ui_task(Box::new(move || order.borrow_mut().push(index)));
    }
    handle.drain_ui();

    assert_eq!(order.borrow().as_slice(), &[0, 1, 2]);
}

#[test]
fn handle_degrades_after_runtime_drop() {
    let (runtime, _) = test_runtime();
    let handle = runtime.handle();
    let clock = runtime.frame_clock();
    drop(runtime);

    assert!(!handle.is_alive());
    assert!(handle.spawn_ui(async {}).is_none());
    assert!(handle.register_frame_callback(|_| {}).is_none());

    let ran = Rc::new(Cell::new(false));
    let ran_in_task = Rc::clone(&ran);
    handle.enqueue_ui_task(Box::new(move || ran_in_task.set(true)));
    assert!(ran.get());

    let mut next = Box::pin(clock.next_frame());
    let waker = futures_task::noop_waker();
    let mut cx = Context::from_waker(&waker);
    assert_eq!(next.as_mut().poll(&mut cx), Poll::Ready(None));
}
