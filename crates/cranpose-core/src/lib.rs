//! Frame-driven runtime for Cranpose scroll and animation work.
//!
//! Everything here runs on one UI thread: frame callbacks fire when the host
//! drains a frame, and spawned futures are polled cooperatively between
//! frames. Dropping a spawned future through its [`TaskHandle`] is the only
//! cancellation mechanism.

pub mod frame_clock;
pub mod platform;
pub mod runtime;

pub use frame_clock::{FrameCallbackRegistration, FrameClock, NextFrame};
pub use platform::{Clock, RuntimeScheduler};
pub use runtime::{DefaultScheduler, Runtime, RuntimeHandle, TaskHandle};

pub type FrameCallbackId = u64;
pub type TaskId = u64;

/// Nanoseconds in one frame at 60Hz, the default step used by test drivers.
pub const FRAME_NANOS_60HZ: u64 = 16_666_667;
