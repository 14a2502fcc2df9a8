//! Host services the runtime delegates to.
//!
//! The runtime never asks the operating system for frames or time directly;
//! the embedding platform supplies both through these traits.

/// Asks the host for another frame.
///
/// Wakers created by the runtime hold the scheduler, so implementations must
/// be `Send + Sync` even though the runtime itself is single-threaded.
pub trait RuntimeScheduler: Send + Sync {
    fn schedule_frame(&self);
}

/// Monotonic time source used to stamp frames.
pub trait Clock: Send + Sync {
    type Instant: Copy + Send + Sync;

    fn now(&self) -> Self::Instant;

    fn elapsed_nanos(&self, since: Self::Instant) -> u64;

    fn elapsed_millis(&self, since: Self::Instant) -> u64 {
        self.elapsed_nanos(since) / 1_000_000
    }
}
