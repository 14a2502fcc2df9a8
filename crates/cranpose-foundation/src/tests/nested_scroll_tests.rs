use super::*;

use std::cell::RefCell;

struct TakeHalf {
    name: &'static str,
    log: Rc<RefCell<Vec<String>>>,
}

impl NestedScrollConnection for TakeHalf {
    fn on_pre_scroll(&self, available: Offset, _source: NestedScrollSource) -> Offset {
        self.log
            .borrow_mut()
            .push(format!("{} pre {}", self.name, available.y));
        available * 0.5
    }

    fn on_post_scroll(
        &self,
        _consumed: Offset,
        available: Offset,
        _source: NestedScrollSource,
    ) -> Offset {
        self.log
            .borrow_mut()
            .push(format!("{} post {}", self.name, available.y));
        available * 0.5
    }
}

struct Greedy;

impl NestedScrollConnection for Greedy {
    fn on_pre_scroll(&self, available: Offset, _source: NestedScrollSource) -> Offset {
        available * 10.0
    }

    fn on_pre_fling(&self, available: Velocity) -> LocalBoxFuture<'static, Velocity> {
        future::ready(Velocity::new(available.x, -available.y)).boxed_local()
    }
}

#[test]
fn empty_chain_consumes_nothing() {
    let chain = NestedScrollChain::new();
    assert!(chain.is_empty());
    let delta = Offset::new(0.0, -30.0);
    assert_eq!(chain.pre_scroll(delta, NestedScrollSource::Drag), Offset::ZERO);
    assert_eq!(
        chain.post_scroll(Offset::ZERO, delta, NestedScrollSource::Drag),
        Offset::ZERO
    );
}

#[test]
fn pre_scroll_runs_outermost_first_and_post_scroll_innermost_first() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let chain = NestedScrollChain::new()
        .with_parent(Rc::new(TakeHalf {
            name: "inner",
            log: Rc::clone(&log),
        }))
        .with_parent(Rc::new(TakeHalf {
            name: "outer",
            log: Rc::clone(&log),
        }));

    let pre = chain.pre_scroll(Offset::new(0.0, 40.0), NestedScrollSource::Drag);
    assert_eq!(pre, Offset::new(0.0, 30.0));

    let post = chain.post_scroll(Offset::ZERO, Offset::new(0.0, 40.0), NestedScrollSource::Drag);
    assert_eq!(post, Offset::new(0.0, 30.0));

    assert_eq!(
        *log.borrow(),
        vec![
            "outer pre 40".to_string(),
            "inner pre 20".to_string(),
            "inner post 40".to_string(),
            "outer post 20".to_string(),
        ]
    );
}

#[test]
fn parent_cannot_consume_more_than_available() {
    let chain = NestedScrollChain::new().with_parent(Rc::new(Greedy));
    let pre = chain.pre_scroll(Offset::new(5.0, -12.0), NestedScrollSource::Drag);
    assert_eq!(pre, Offset::new(5.0, -12.0));
}

#[test]
fn fling_consumption_is_clamped_to_direction_of_available() {
    let chain = NestedScrollChain::new().with_parent(Rc::new(Greedy));
    let consumed = chain
        .pre_fling(Velocity::new(100.0, 200.0))
        .now_or_never()
        .expect("ready fling hooks resolve immediately");
    assert_eq!(consumed, Velocity::new(100.0, 0.0));
}

#[test]
fn clamp_axis_respects_sign() {
    assert_eq!(clamp_axis(50.0, 20.0), 20.0);
    assert_eq!(clamp_axis(-5.0, 20.0), 0.0);
    assert_eq!(clamp_axis(-50.0, -20.0), -20.0);
    assert_eq!(clamp_axis(3.0, 0.0), 0.0);
}
