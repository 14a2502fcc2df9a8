//! Scroll state and the dispatch pipeline of a scrollable container.
//!
//! - `ScrollState`: scroll position clamped to `[0, max_value]`
//! - `ScrollableDispatch`: routes drags, programmatic scrolls and flings
//!   through the overscroll effect, the nested scroll chain and the state
//!
//! Deltas and velocities are in finger direction: dragging the finger up
//! (negative y) moves a vertical container's position forward.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use cranpose_animation::{
    animate_decay, animate_spring, AnimationEndReason, FrameControl, SplineBasedDecaySpec,
    SpringSpec,
};
use cranpose_core::{FrameClock, TaskHandle};
use cranpose_ui_graphics::{GraphicsLayer, Offset, Size, Velocity};
use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;

use crate::gesture_constants::{BOUND_HIT_THRESHOLD, MAX_FLING_VELOCITY};
use crate::nested_scroll::{NestedScrollChain, NestedScrollSource};
use crate::overscroll::{
    sanitize_delta, sanitize_velocity, OverscrollEffect, OverscrollFactory, OverscrollModifier,
    PerformFling,
};

static NEXT_SCROLL_STATE_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_CALLBACK_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

impl Orientation {
    /// Component of `offset` along this orientation.
    pub fn axis(self, offset: Offset) -> f32 {
        match self {
            Orientation::Vertical => offset.y,
            Orientation::Horizontal => offset.x,
        }
    }

    pub fn offset(self, value: f32) -> Offset {
        match self {
            Orientation::Vertical => Offset::new(0.0, value),
            Orientation::Horizontal => Offset::new(value, 0.0),
        }
    }

    /// Drops the cross-axis component.
    pub fn project(self, offset: Offset) -> Offset {
        self.offset(self.axis(offset))
    }

    pub fn velocity_axis(self, velocity: Velocity) -> f32 {
        self.axis(velocity.as_offset())
    }

    pub fn velocity(self, value: f32) -> Velocity {
        let offset = self.offset(value);
        Velocity::new(offset.x, offset.y)
    }
}

/// Scroll position of one container.
#[derive(Clone)]
pub struct ScrollState {
    inner: Rc<ScrollStateInner>,
}

struct ScrollStateInner {
    id: u64,
    value: Cell<f32>,
    /// Content size minus viewport size.
    max_value: Cell<f32>,
    invalidate_callbacks: RefCell<HashMap<u64, Box<dyn Fn()>>>,
    /// Set when the value changed before anyone listened.
    pending_invalidation: Cell<bool>,
}

impl ScrollState {
    pub fn new(initial: f32) -> Self {
        let id = NEXT_SCROLL_STATE_ID.fetch_add(1, Ordering::Relaxed);
        let initial = if initial.is_finite() {
            initial.max(0.0)
        } else {
            0.0
        };
        Self {
            inner: Rc::new(ScrollStateInner {
                id,
                value: Cell::new(initial),
                max_value: Cell::new(0.0),
                invalidate_callbacks: RefCell::new(HashMap::new()),
                pending_invalidation: Cell::new(false),
            }),
        }
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn value(&self) -> f32 {
        self.inner.value.get()
    }

    pub fn max_value(&self) -> f32 {
        self.inner.max_value.get()
    }

    /// Updates the scroll range, pulling the position back inside it.
    pub fn set_max_value(&self, max: f32) {
        let max = if max.is_finite() { max.max(0.0) } else { 0.0 };
        self.inner.max_value.set(max);
        if self.value() > max {
            self.set_value(max);
        }
    }

    pub fn can_scroll_forward(&self) -> bool {
        self.value() < self.max_value()
    }

    pub fn can_scroll_backward(&self) -> bool {
        self.value() > 0.0
    }

    /// Scrolls by `delta`, clamping to `[0, max_value]`.
    /// Returns the amount actually scrolled.
    pub fn dispatch_raw_delta(&self, delta: f32) -> f32 {
        if !delta.is_finite() {
            log::warn!("ignoring non-finite scroll delta {delta}");
            return 0.0;
        }
        let current = self.value();
        let new_value = (current + delta).clamp(0.0, self.max_value());
        let actual_delta = new_value - current;

        if actual_delta.abs() > 0.001 {
            self.set_value(new_value);
            actual_delta
        } else {
            0.0
        }
    }

    pub fn scroll_to(&self, position: f32) {
        if !position.is_finite() {
            log::warn!("ignoring non-finite scroll position {position}");
            return;
        }
        self.set_value(position.clamp(0.0, self.max_value()));
    }

    fn set_value(&self, value: f32) {
        self.inner.value.set(value);
        let callbacks = self.inner.invalidate_callbacks.borrow();
        if callbacks.is_empty() {
            self.inner.pending_invalidation.set(true);
        } else {
            for callback in callbacks.values() {
                callback();
            }
        }
    }

    /// Registers a listener called whenever the position changes.
    ///
    /// A change that happened before the first listener registered is
    /// delivered immediately.
    pub fn add_invalidate_callback(&self, callback: Box<dyn Fn()>) -> u64 {
        let id = NEXT_CALLBACK_ID.fetch_add(1, Ordering::Relaxed);
        self.inner
            .invalidate_callbacks
            .borrow_mut()
            .insert(id, callback);
        if self.inner.pending_invalidation.replace(false) {
            if let Some(callback) = self.inner.invalidate_callbacks.borrow().get(&id) {
                callback();
            }
        }
        id
    }

    pub fn remove_invalidate_callback(&self, id: u64) {
        self.inner.invalidate_callbacks.borrow_mut().remove(&id);
    }
}

impl fmt::Debug for ScrollState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollState")
            .field("id", &self.id())
            .field("value", &self.value())
            .field("max_value", &self.max_value())
            .finish()
    }
}

impl PartialEq for ScrollState {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Outcome of one scroll dispatch.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct ScrollConsumption {
    /// Kept by the overscroll effect.
    overscroll: Offset,
    /// Consumed by the nested chain and the container.
    performed: Offset,
}

impl ScrollConsumption {
    fn total(self) -> Offset {
        self.overscroll + self.performed
    }
}

/// Scroll pipeline of one container.
///
/// Cheap to clone; clones drive the same container.
#[derive(Clone)]
pub struct ScrollableDispatch {
    inner: Rc<DispatchInner>,
}

struct DispatchInner {
    state: ScrollState,
    orientation: Orientation,
    reverse_direction: bool,
    overscroll: Option<Rc<dyn OverscrollEffect>>,
    modifier: OverscrollModifier,
    nested: NestedScrollChain,
    clock: FrameClock,
    decay: SplineBasedDecaySpec,
    max_fling_velocity: f32,
    fling_task: RefCell<Option<TaskHandle>>,
}

pub struct ScrollableDispatchBuilder {
    state: ScrollState,
    clock: FrameClock,
    orientation: Orientation,
    reverse_direction: bool,
    overscroll: Option<Rc<dyn OverscrollEffect>>,
    nested: NestedScrollChain,
    density: f32,
}

impl ScrollableDispatchBuilder {
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn reverse_direction(mut self, reverse: bool) -> Self {
        self.reverse_direction = reverse;
        self
    }

    pub fn overscroll_effect(mut self, effect: Option<Rc<dyn OverscrollEffect>>) -> Self {
        self.overscroll = effect;
        self
    }

    /// Asks `factory` for this container's effect. No factory means no
    /// overscroll.
    pub fn overscroll_factory(mut self, factory: Option<&dyn OverscrollFactory>) -> Self {
        self.overscroll = factory.and_then(|factory| factory.create_overscroll_effect());
        self
    }

    pub fn nested_scroll(mut self, chain: NestedScrollChain) -> Self {
        self.nested = chain;
        self
    }

    /// Pixel density used to scale fling limits and decay. Values that are
    /// not finite and positive fall back to 1.0.
    pub fn density(mut self, density: f32) -> Self {
        self.density = if density.is_finite() && density > 0.0 {
            density
        } else {
            log::warn!("ignoring invalid scroll density {density}");
            1.0
        };
        self
    }

    pub fn build(self) -> ScrollableDispatch {
        let modifier = self
            .overscroll
            .as_ref()
            .map(|effect| effect.effect_modifier())
            .unwrap_or_default();
        ScrollableDispatch {
            inner: Rc::new(DispatchInner {
                state: self.state,
                orientation: self.orientation,
                reverse_direction: self.reverse_direction,
                overscroll: self.overscroll,
                modifier,
                nested: self.nested,
                clock: self.clock,
                decay: SplineBasedDecaySpec::new(self.density),
                max_fling_velocity: MAX_FLING_VELOCITY * self.density,
                fling_task: RefCell::new(None),
            }),
        }
    }
}

impl ScrollableDispatch {
    pub fn builder(state: ScrollState, clock: FrameClock) -> ScrollableDispatchBuilder {
        ScrollableDispatchBuilder {
            state,
            clock,
            orientation: Orientation::Vertical,
            reverse_direction: false,
            overscroll: None,
            nested: NestedScrollChain::new(),
            density: 1.0,
        }
    }

    pub fn state(&self) -> &ScrollState {
        &self.inner.state
    }

    pub fn orientation(&self) -> Orientation {
        self.inner.orientation
    }

    pub fn overscroll_effect(&self) -> Option<&Rc<dyn OverscrollEffect>> {
        self.inner.overscroll.as_ref()
    }

    /// Routes `delta` through the effect (if any) and the scroll pipeline.
    /// Returns everything consumed, overscroll included.
    pub fn dispatch_scroll(&self, delta: Offset, source: NestedScrollSource) -> Offset {
        self.dispatch(delta, source).total()
    }

    /// User drag. Stops a running fling first.
    pub fn drag_by(&self, delta: Offset) -> Offset {
        self.cancel_fling();
        self.dispatch_scroll(delta, NestedScrollSource::Drag)
    }

    /// Programmatic scroll.
    pub fn scroll_by(&self, delta: Offset) -> Offset {
        self.dispatch_scroll(delta, NestedScrollSource::SideEffect)
    }

    fn dispatch(&self, delta: Offset, source: NestedScrollSource) -> ScrollConsumption {
        let delta = self
            .inner
            .orientation
            .project(sanitize_delta(delta, "scroll delta"));
        let mut performed = Offset::ZERO;
        let overscroll = {
            let mut perform = |available: Offset| {
                let consumed = self.perform_scroll(available, source);
                performed = consumed;
                consumed
            };
            match &self.inner.overscroll {
                Some(effect) => effect.apply_to_scroll(delta, source, &mut perform),
                None => {
                    perform(delta);
                    Offset::ZERO
                }
            }
        };
        ScrollConsumption {
            overscroll,
            performed,
        }
    }

    /// Nested pre-scroll, then the container, then nested post-scroll.
    fn perform_scroll(&self, available: Offset, source: NestedScrollSource) -> Offset {
        let nested = &self.inner.nested;
        let pre = nested.pre_scroll(available, source);
        let available = available - pre;
        let consumed = self.consume(available);
        let post = nested.post_scroll(consumed, available - consumed, source);
        pre + consumed + post
    }

    fn consume(&self, available: Offset) -> Offset {
        let orientation = self.inner.orientation;
        let direction = if self.inner.reverse_direction {
            1.0
        } else {
            -1.0
        };
        let scrolled = self
            .inner
            .state
            .dispatch_raw_delta(orientation.axis(available) * direction);
        orientation.offset(scrolled * direction)
    }

    /// Flings with `velocity`, letting the overscroll effect wrap the decay.
    ///
    /// Resolves once the decay and any relax animation have finished.
    pub fn fling(&self, velocity: Velocity) -> LocalBoxFuture<'static, ()> {
        let velocity = sanitize_velocity(velocity, "fling velocity")
            .clamp_magnitude(self.inner.max_fling_velocity);
        let velocity = self
            .inner
            .orientation
            .velocity(self.inner.orientation.velocity_axis(velocity));
        let this = self.clone();
        let perform_fling: PerformFling = Box::new(move |available| this.perform_fling(available));
        match &self.inner.overscroll {
            Some(effect) => effect.apply_to_fling(velocity, perform_fling),
            None => perform_fling(velocity).map(|_residual| ()).boxed_local(),
        }
    }

    fn perform_fling(&self, available: Velocity) -> LocalBoxFuture<'static, Velocity> {
        let this = self.clone();
        async move {
            let nested = this.inner.nested.clone();
            let pre = nested.pre_fling(available).await;
            let available = available - pre;
            let residual = this.fling_decay(available).await;
            let post = nested.post_fling(available - residual, residual).await;
            residual - post
        }
        .boxed_local()
    }

    /// Decays `velocity` through the scroll pipeline, returning what is left
    /// when the content hits a bound.
    async fn fling_decay(&self, velocity: Velocity) -> Velocity {
        let orientation = self.inner.orientation;
        let initial = orientation.velocity_axis(velocity);
        if initial == 0.0 {
            return Velocity::ZERO;
        }

        let mut last_value = 0.0;
        let result = animate_decay(&self.inner.clock, 0.0, initial, &self.inner.decay, |value, _| {
            let delta = value - last_value;
            last_value = value;
            let consumption = self.dispatch(orientation.offset(delta), NestedScrollSource::Fling);
            let performed = orientation.axis(consumption.performed);
            if (delta - performed).abs() > BOUND_HIT_THRESHOLD {
                FrameControl::Stop(AnimationEndReason::BoundReached)
            } else {
                FrameControl::Continue
            }
        })
        .await;

        log::trace!(
            "fling decay ended {:?} at velocity {}",
            result.end_reason,
            result.velocity
        );
        match result.end_reason {
            AnimationEndReason::BoundReached => orientation.velocity(result.velocity),
            AnimationEndReason::Finished | AnimationEndReason::Interrupted => Velocity::ZERO,
        }
    }

    /// Spawns [`fling`](Self::fling) on the runtime, replacing any running
    /// fling. Returns `false` when the runtime is gone.
    pub fn start_fling(&self, velocity: Velocity) -> bool {
        self.cancel_fling();
        let handle = self.inner.clock.runtime_handle().spawn_ui(self.fling(velocity));
        let started = handle.is_some();
        *self.inner.fling_task.borrow_mut() = handle;
        started
    }

    /// Drops the running fling, if any. The overscroll effect comes back to
    /// rest synchronously.
    pub fn cancel_fling(&self) {
        let task = self.inner.fling_task.borrow_mut().take();
        if let Some(task) = task {
            if !task.is_finished() {
                log::trace!("cancelling fling task {}", task.id());
            }
            task.cancel();
        }
    }

    pub fn is_flinging(&self) -> bool {
        self.inner
            .fling_task
            .borrow()
            .as_ref()
            .map(|task| !task.is_finished())
            .unwrap_or(false)
    }

    /// Smoothly scrolls by `delta` along the container's axis.
    ///
    /// Resolves with what was consumed; stops early at a content bound.
    pub fn animate_scroll_by(&self, delta: Offset) -> LocalBoxFuture<'static, Offset> {
        let this = self.clone();
        let orientation = self.inner.orientation;
        let target = orientation.axis(sanitize_delta(delta, "animated scroll delta"));
        async move {
            let mut last_value = 0.0;
            let mut consumed = Offset::ZERO;
            animate_spring(
                &this.inner.clock,
                0.0,
                0.0,
                target,
                SpringSpec::default_spring(),
                |value, _| {
                    let step = value - last_value;
                    last_value = value;
                    let consumption =
                        this.dispatch(orientation.offset(step), NestedScrollSource::SideEffect);
                    consumed += consumption.total();
                    if (step - orientation.axis(consumption.performed)).abs() > BOUND_HIT_THRESHOLD
                    {
                        FrameControl::Stop(AnimationEndReason::BoundReached)
                    } else {
                        FrameControl::Continue
                    }
                },
            )
            .await;
            consumed
        }
        .boxed_local()
    }

    /// Layer the render layer applies to the container's content.
    pub fn layer(&self, size: Size) -> GraphicsLayer {
        self.inner.modifier.layer(size)
    }

    /// Whether another frame is needed to finish a fling or an overscroll
    /// animation.
    pub fn needs_invalidation(&self) -> bool {
        self.is_flinging()
            || self
                .inner
                .overscroll
                .as_ref()
                .map(|effect| effect.is_in_progress())
                .unwrap_or(false)
    }
}

impl fmt::Debug for ScrollableDispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollableDispatch")
            .field("state", &self.inner.state)
            .field("orientation", &self.inner.orientation)
            .field("reverse_direction", &self.inner.reverse_direction)
            .field("has_overscroll", &self.inner.overscroll.is_some())
            .field("nested_parents", &self.inner.nested.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/scrollable_tests.rs"]
mod tests;
