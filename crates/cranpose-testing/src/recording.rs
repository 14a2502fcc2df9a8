//! An overscroll effect that records how the scroll pipeline drives it.

use std::cell::RefCell;
use std::rc::Rc;

use cranpose_foundation::{
    NestedScrollSource, OverscrollDecoration, OverscrollEffect, OverscrollModifier,
    OverscrollPhase, PerformFling,
};
use cranpose_ui_graphics::{GraphicsLayer, Offset, Size, Velocity};
use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;

/// Everything a [`RecordingOverscrollEffect`] observed so far.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverscrollRecord {
    pub scroll_calls: usize,
    pub fling_calls: usize,
    /// Each delta with its source, in call order.
    pub scroll_deltas: Vec<(Offset, NestedScrollSource)>,
    /// Sum of the deltas the container could not consume.
    pub scroll_overscroll: Offset,
    pub fling_velocities: Vec<Velocity>,
    /// Velocity left over by the most recent fling.
    pub fling_overscroll: Velocity,
    pub draw_calls: usize,
}

/// Forwards everything and keeps whatever the container leaves over.
///
/// Never animates, so it stays [`OverscrollPhase::Idle`].
#[derive(Clone, Default)]
pub struct RecordingOverscrollEffect {
    record: Rc<RefCell<OverscrollRecord>>,
}

impl RecordingOverscrollEffect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) -> OverscrollRecord {
        self.record.borrow().clone()
    }

    pub fn reset(&self) {
        *self.record.borrow_mut() = OverscrollRecord::default();
    }
}

impl OverscrollEffect for RecordingOverscrollEffect {
    fn apply_to_scroll(
        &self,
        delta: Offset,
        source: NestedScrollSource,
        perform_scroll: &mut dyn FnMut(Offset) -> Offset,
    ) -> Offset {
        let performed = perform_scroll(delta);
        let leftover = delta - performed;
        let mut record = self.record.borrow_mut();
        record.scroll_calls += 1;
        record.scroll_deltas.push((delta, source));
        record.scroll_overscroll += leftover;
        leftover
    }

    fn apply_to_fling(
        &self,
        velocity: Velocity,
        perform_fling: PerformFling,
    ) -> LocalBoxFuture<'static, ()> {
        {
            let mut record = self.record.borrow_mut();
            record.fling_calls += 1;
            record.fling_velocities.push(velocity);
        }
        let record = Rc::clone(&self.record);
        perform_fling(velocity)
            .map(move |residual| {
                log::trace!("recorded fling residual {residual:?}");
                record.borrow_mut().fling_overscroll = residual;
            })
            .boxed_local()
    }

    fn phase(&self) -> OverscrollPhase {
        OverscrollPhase::Idle
    }

    fn effect_modifier(&self) -> OverscrollModifier {
        OverscrollModifier::new(Rc::new(CountingDecoration {
            record: Rc::clone(&self.record),
        }))
    }
}

struct CountingDecoration {
    record: Rc<RefCell<OverscrollRecord>>,
}

impl OverscrollDecoration for CountingDecoration {
    fn layer(&self, _size: Size) -> GraphicsLayer {
        self.record.borrow_mut().draw_calls += 1;
        GraphicsLayer::IDENTITY
    }
}
