//! Nested scroll dispatch.
//!
//! A scrollable container sits inside zero or more scrollable parents. Before
//! it consumes a delta, parents get a chance to take part of it (outermost
//! first); whatever the container leaves over is then offered back out
//! (innermost first). Flings follow the same shape.

use std::rc::Rc;

use cranpose_ui_graphics::{Offset, Velocity};
use futures_util::future::{self, LocalBoxFuture};
use futures_util::FutureExt;
use smallvec::SmallVec;

/// Where a scroll delta came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NestedScrollSource {
    /// Pointer or touch drag by the user.
    Drag,
    /// Inertial movement after the pointer was released.
    Fling,
    /// Programmatic or animation driven scrolling.
    SideEffect,
}

impl NestedScrollSource {
    /// True for deltas the user is actively producing. Only these grow an
    /// overscroll stretch.
    pub fn is_user_input(self) -> bool {
        matches!(self, NestedScrollSource::Drag)
    }
}

/// A parent participating in nested scrolling.
///
/// Every hook returns how much it consumed. Defaults consume nothing.
pub trait NestedScrollConnection {
    fn on_pre_scroll(&self, _available: Offset, _source: NestedScrollSource) -> Offset {
        Offset::ZERO
    }

    fn on_post_scroll(
        &self,
        _consumed: Offset,
        _available: Offset,
        _source: NestedScrollSource,
    ) -> Offset {
        Offset::ZERO
    }

    fn on_pre_fling(&self, _available: Velocity) -> LocalBoxFuture<'static, Velocity> {
        future::ready(Velocity::ZERO).boxed_local()
    }

    fn on_post_fling(
        &self,
        _consumed: Velocity,
        _available: Velocity,
    ) -> LocalBoxFuture<'static, Velocity> {
        future::ready(Velocity::ZERO).boxed_local()
    }
}

/// Limits what a parent claims to have consumed to what was on offer.
fn clamp_consumed(consumed: Offset, available: Offset) -> Offset {
    consumed.sanitized().zip(available, clamp_axis)
}

fn clamp_consumed_velocity(consumed: Velocity, available: Velocity) -> Velocity {
    let clamped = clamp_consumed(consumed.as_offset(), available.as_offset());
    Velocity::new(clamped.x, clamped.y)
}

pub(crate) fn clamp_axis(consumed: f32, available: f32) -> f32 {
    if available > 0.0 {
        consumed.clamp(0.0, available)
    } else if available < 0.0 {
        consumed.clamp(available, 0.0)
    } else {
        0.0
    }
}

/// Scrollable parents of one container, innermost first.
#[derive(Clone, Default)]
pub struct NestedScrollChain {
    parents: SmallVec<[Rc<dyn NestedScrollConnection>; 4]>,
}

impl NestedScrollChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the next parent out from the container.
    pub fn with_parent(mut self, parent: Rc<dyn NestedScrollConnection>) -> Self {
        self.parents.push(parent);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn pre_scroll(&self, available: Offset, source: NestedScrollSource) -> Offset {
        let mut remaining = available;
        for parent in self.parents.iter().rev() {
            let consumed = clamp_consumed(parent.on_pre_scroll(remaining, source), remaining);
            remaining -= consumed;
        }
        available - remaining
    }

    pub fn post_scroll(
        &self,
        consumed: Offset,
        available: Offset,
        source: NestedScrollSource,
    ) -> Offset {
        let mut consumed_so_far = consumed;
        let mut remaining = available;
        for parent in self.parents.iter() {
            let taken = clamp_consumed(
                parent.on_post_scroll(consumed_so_far, remaining, source),
                remaining,
            );
            consumed_so_far += taken;
            remaining -= taken;
        }
        available - remaining
    }

    pub fn pre_fling(&self, available: Velocity) -> LocalBoxFuture<'static, Velocity> {
        let parents = self.parents.clone();
        async move {
            let mut remaining = available;
            for parent in parents.iter().rev() {
                let consumed =
                    clamp_consumed_velocity(parent.on_pre_fling(remaining).await, remaining);
                remaining = remaining - consumed;
            }
            available - remaining
        }
        .boxed_local()
    }

    pub fn post_fling(
        &self,
        consumed: Velocity,
        available: Velocity,
    ) -> LocalBoxFuture<'static, Velocity> {
        let parents = self.parents.clone();
        async move {
            let mut consumed_so_far = consumed;
            let mut remaining = available;
            for parent in parents.iter() {
                let taken = clamp_consumed_velocity(
                    parent.on_post_fling(consumed_so_far, remaining).await,
                    remaining,
                );
                consumed_so_far = consumed_so_far + taken;
                remaining = remaining - taken;
            }
            available - remaining
        }
        .boxed_local()
    }
}

#[cfg(test)]
#[path = "tests/nested_scroll_tests.rs"]
mod tests;
