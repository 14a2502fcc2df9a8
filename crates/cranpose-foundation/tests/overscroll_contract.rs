use std::rc::Rc;

use cranpose_foundation::{
    default_overscroll_factory, NestedScrollSource, NoOpOverscrollEffect, OverscrollConfig,
    OverscrollEffect, OverscrollPhase, ScrollableDispatch, TargetPlatform,
};
use cranpose_testing::{
    assert_offset_approx_eq, OverscrollRecord, OverscrollTestRule, RecordingOverscrollEffect,
};
use cranpose_ui_graphics::{Offset, Size, Velocity};

/// Deterministic mix of drags in both directions, with a few large ones.
fn drag_sequence() -> Vec<Offset> {
    (0..64)
        .map(|step| {
            let magnitude = ((step * 37) % 23) as f32 * 3.5 + 0.25;
            let sign = if (step / 5) % 2 == 0 { 1.0 } else { -1.0 };
            Offset::new(0.0, sign * magnitude)
        })
        .collect()
}

fn assert_conserves(effect: &dyn OverscrollEffect, content_room: f32) {
    let mut position = 0.0f32;
    for delta in drag_sequence() {
        let mut forwarded = Offset::ZERO;
        let mut performed = Offset::ZERO;
        let retained =
            effect.apply_to_scroll(delta, NestedScrollSource::Drag, &mut |available| {
                forwarded = available;
                let target = (position - available.y).clamp(0.0, content_room);
                let consumed = Offset::new(0.0, position - target);
                position = target;
                performed = consumed;
                consumed
            });
        assert_offset_approx_eq(retained + performed, delta, 1e-3, "retained + performed");
        assert!(forwarded.y.abs() <= delta.y.abs() + 1e-3);
    }
}

#[test]
fn stretch_and_noop_conserve_every_drag() {
    let rule = OverscrollTestRule::new();
    assert_conserves(&rule.stretch_effect(OverscrollConfig::stretch(1.0)), 120.0);
    assert_conserves(&rule.stretch_effect(OverscrollConfig::bounce(3.0)), 40.0);
    assert_conserves(&NoOpOverscrollEffect, 120.0);
}

#[test]
fn container_routes_every_scroll_through_its_effect() {
    let rule = OverscrollTestRule::new();
    let effect = RecordingOverscrollEffect::new();
    let (state, dispatch) = rule.scroll_container(100.0, Some(Rc::new(effect.clone())));

    dispatch.drag_by(Offset::new(0.0, -60.0));
    dispatch.drag_by(Offset::new(0.0, -60.0));
    dispatch.scroll_by(Offset::new(0.0, 10.0));

    let record = effect.record();
    assert_eq!(record.scroll_calls, 3);
    assert_eq!(
        record.scroll_deltas,
        vec![
            (Offset::new(0.0, -60.0), NestedScrollSource::Drag),
            (Offset::new(0.0, -60.0), NestedScrollSource::Drag),
            (Offset::new(0.0, 10.0), NestedScrollSource::SideEffect),
        ]
    );
    assert_offset_approx_eq(record.scroll_overscroll, Offset::new(0.0, -20.0), 1e-3, "leftover");
    assert_eq!(state.value(), 90.0);
}

#[test]
fn recording_reset_starts_a_fresh_gesture() {
    let rule = OverscrollTestRule::new();
    let effect = RecordingOverscrollEffect::new();
    let (state, dispatch) = rule.scroll_container(100.0, Some(Rc::new(effect.clone())));

    dispatch.drag_by(Offset::new(0.0, 30.0));
    assert_eq!(effect.record().scroll_calls, 1);

    effect.reset();
    assert_eq!(effect.record(), OverscrollRecord::default());

    dispatch.drag_by(Offset::new(0.0, -40.0));
    let record = effect.record();
    assert_eq!(record.scroll_calls, 1);
    assert_eq!(
        record.scroll_deltas,
        vec![(Offset::new(0.0, -40.0), NestedScrollSource::Drag)]
    );
    assert_eq!(record.scroll_overscroll, Offset::ZERO);
    assert_eq!(state.value(), 40.0);
}

#[test]
fn fling_into_bound_reports_leftover_velocity_once() {
    let mut rule = OverscrollTestRule::new();
    let effect = RecordingOverscrollEffect::new();
    let (state, dispatch) = rule.scroll_container(50.0, Some(Rc::new(effect.clone())));

    assert!(dispatch.start_fling(Velocity::new(0.0, -5_000.0)));
    rule.run_until_idle().expect("fling settles");

    let record = effect.record();
    assert_eq!(record.fling_calls, 1);
    assert_eq!(record.fling_velocities, vec![Velocity::new(0.0, -5_000.0)]);
    assert!(record.fling_overscroll.y < 0.0);
    assert!(record
        .scroll_deltas
        .iter()
        .all(|(_, source)| *source == NestedScrollSource::Fling));
    assert_eq!(state.value(), 50.0);
}

#[test]
fn render_layer_consults_the_effect_decoration() {
    let rule = OverscrollTestRule::new();
    let effect = RecordingOverscrollEffect::new();
    let (_state, dispatch) = rule.scroll_container(10.0, Some(Rc::new(effect.clone())));

    let size = Size::new(320.0, 640.0);
    assert!(dispatch.layer(size).is_identity());
    dispatch.layer(size);
    assert_eq!(effect.record().draw_calls, 2);
}

#[test]
fn missing_factory_disables_overscroll() {
    let rule = OverscrollTestRule::new();
    let factory = default_overscroll_factory(TargetPlatform::Desktop, &rule.frame_clock(), 1.0);
    assert!(factory.is_none());

    let (state, _) = rule.scroll_container(100.0, None);
    let dispatch = ScrollableDispatch::builder(state.clone(), rule.frame_clock())
        .overscroll_factory(factory.as_deref())
        .build();
    assert!(dispatch.overscroll_effect().is_none());
    assert_eq!(dispatch.drag_by(Offset::new(0.0, 30.0)), Offset::ZERO);
    assert!(!dispatch.needs_invalidation());
}

#[test]
fn android_factory_gives_each_container_a_stretch() {
    let rule = OverscrollTestRule::new();
    let factory = default_overscroll_factory(TargetPlatform::Android, &rule.frame_clock(), 2.0);

    let (state, _) = rule.scroll_container(100.0, None);
    let dispatch = ScrollableDispatch::builder(state, rule.frame_clock())
        .overscroll_factory(factory.as_deref())
        .build();
    assert_eq!(dispatch.drag_by(Offset::new(0.0, 30.0)), Offset::new(0.0, 30.0));
    let effect = dispatch.overscroll_effect().expect("stretch installed");
    assert_eq!(effect.phase(), OverscrollPhase::Stretching);
}

#[test]
fn stretch_relaxes_after_release() {
    let mut rule = OverscrollTestRule::new();
    let effect = rule.stretch_effect(OverscrollConfig::stretch(1.0));
    let (_state, dispatch) = rule.scroll_container(100.0, Some(Rc::new(effect.clone())));

    dispatch.drag_by(Offset::new(0.0, 45.0));
    assert!(dispatch.needs_invalidation());

    dispatch.start_fling(Velocity::ZERO);
    let frames = rule.run_until_idle().expect("relax settles");
    assert!(frames > 1);
    assert_eq!(effect.phase(), OverscrollPhase::Idle);
    assert_eq!(effect.pull(), Offset::ZERO);
    assert!(!dispatch.needs_invalidation());
}

#[test]
fn new_drag_cancels_relax_before_it_is_applied() {
    let mut rule = OverscrollTestRule::new();
    let effect = rule.stretch_effect(OverscrollConfig::stretch(1.0));
    let (state, dispatch) = rule.scroll_container(100.0, Some(Rc::new(effect.clone())));

    dispatch.drag_by(Offset::new(0.0, 45.0));
    dispatch.start_fling(Velocity::ZERO);
    rule.advance_frames(3);
    assert_eq!(effect.phase(), OverscrollPhase::Relaxing);

    // The drag cancels the fling task, which resets the stretch, so the
    // whole delta scrolls content instead of unwinding a stale pull.
    dispatch.drag_by(Offset::new(0.0, -20.0));
    assert_eq!(effect.pull(), Offset::ZERO);
    assert_eq!(effect.phase(), OverscrollPhase::Idle);
    assert_eq!(state.value(), 20.0);
    assert!(rule.run_until_idle().is_ok());
}
