//! Drag tracking: state machine transitions, pointer filtering, pause and
//! teardown behavior.

use momentum_core::PointerId;
use momentum_testing::{ManualFrameDriver, ScriptedPointerSource};

use super::harness::{rig, rig_with};
use crate::engine::{Momentum, Phase, PrevUpdate};
use crate::builder::MomentumError;

const TOUCH: PointerId = PointerId::Touch(1);

#[test]
fn construction_fails_without_source() {
    let driver = ManualFrameDriver::new();
    let result = Momentum::builder()
        .on_update(|_, _, _, _| {})
        .build(driver.clock());
    assert_eq!(result.err(), Some(MomentumError::SourceMissing));
}

#[test]
fn construction_fails_without_update_callback() {
    let driver = ManualFrameDriver::new();
    let source = ScriptedPointerSource::new();
    let result = Momentum::builder().source(source).build(driver.clock());
    assert_eq!(result.err(), Some(MomentumError::UpdateCallbackMissing));
}

#[test]
fn initial_values_fire_one_synchronous_update() {
    let rig = rig_with(|builder| builder.initial_values(10.0, 20.0));

    assert_eq!(
        *rig.recorder.updates.borrow(),
        vec![(10.0, 20.0, None, None)]
    );
    assert_eq!(rig.engine.position(), (10.0, 20.0));
}

#[test]
fn no_initial_values_means_no_synchronous_update() {
    let rig = rig();
    assert!(rig.recorder.updates.borrow().is_empty());
    assert_eq!(rig.engine.position(), (0.0, 0.0));
}

#[test]
fn drag_applies_pointer_deltas_once_per_frame() {
    let rig = rig();

    rig.source.press(0.0, 0.0, TOUCH, 0);
    assert_eq!(rig.recorder.starts.get(), 1);
    assert_eq!(rig.engine.phase(), Phase::Dragging);

    rig.source.move_to(10.0, 4.0, TOUCH, 5);
    rig.driver.advance(16);
    rig.source.move_to(25.0, 10.0, TOUCH, 21);
    rig.driver.advance(16);

    let updates = rig.recorder.updates.borrow();
    assert_eq!(updates[0].0, 10.0);
    assert_eq!(updates[0].1, 4.0);
    assert_eq!(updates[1].0, 25.0);
    assert_eq!(updates[1].1, 10.0);
    // prev values track the previously notified pair
    assert_eq!(updates[0].2, None);
    assert_eq!(updates[1].2, Some(10.0));
}

#[test]
fn move_bursts_coalesce_into_one_tick() {
    let rig = rig();

    rig.source.press(0.0, 0.0, TOUCH, 0);
    rig.source.move_to(3.0, 0.0, TOUCH, 2);
    rig.source.move_to(6.0, 0.0, TOUCH, 4);
    rig.source.move_to(9.0, 0.0, TOUCH, 6);
    rig.driver.advance(16);

    // One frame, one update, at the latest pointer position.
    assert_eq!(rig.recorder.update_xs(), vec![9.0]);
}

#[test]
fn second_press_is_ignored_while_dragging() {
    let rig = rig();

    rig.source.press(0.0, 0.0, TOUCH, 0);
    rig.source.press(50.0, 50.0, PointerId::Touch(2), 1);
    assert_eq!(rig.recorder.starts.get(), 1);

    // Only the tracked contact moves the target.
    rig.source.move_to(10.0, 0.0, PointerId::Touch(2), 5);
    rig.driver.advance(16);
    assert!(rig.recorder.updates.borrow().is_empty());

    rig.source.move_to(10.0, 0.0, TOUCH, 6);
    rig.driver.advance(16);
    assert_eq!(rig.recorder.update_xs(), vec![10.0]);
}

#[test]
fn untracked_motion_schedules_no_frame() {
    let rig = rig();

    rig.source.press(0.0, 0.0, TOUCH, 0);
    rig.source.move_to(10.0, 0.0, PointerId::Mouse, 5);
    assert!(!rig.driver.needs_frame());

    rig.source.release(10.0, 0.0, PointerId::Mouse, 6);
    assert_eq!(rig.engine.phase(), Phase::Dragging);
    assert_eq!(rig.recorder.decel_starts.get(), 0);
}

#[test]
fn cancel_ends_drag_regardless_of_pointer() {
    let rig = rig();

    rig.source.press(0.0, 0.0, TOUCH, 0);
    rig.source.cancel(0.0, 0.0, PointerId::Touch(9), 5);

    assert_eq!(rig.recorder.decel_starts.get(), 1);
    assert_eq!(rig.recorder.decel_ends.get(), 1);
    assert_eq!(rig.engine.phase(), Phase::Idle);
    assert_eq!(rig.source.motion_subscribers(), 0);
}

#[test]
fn zero_length_drag_releases_with_zero_velocity() {
    let rig = rig();

    rig.source.press(5.0, 5.0, TOUCH, 0);
    rig.source.release(5.0, 5.0, TOUCH, 0);

    // No animation: decel start and end fire back-to-back, no frames run.
    assert_eq!(rig.recorder.decel_starts.get(), 1);
    assert_eq!(rig.recorder.decel_ends.get(), 1);
    assert!(!rig.driver.needs_frame());
    assert_eq!(rig.engine.phase(), Phase::Idle);
}

// A move samples the position the pointer is leaving, not the one it
// arrived at. Releasing before any frame ran therefore yields zero release
// velocity even though the pointer jumped 60 px.
#[test]
fn release_velocity_lags_by_one_move() {
    let rig = rig();

    rig.source.press(0.0, 0.0, TOUCH, 0);
    rig.source.move_to(60.0, 0.0, TOUCH, 30);
    rig.source.release(60.0, 0.0, TOUCH, 30);

    assert_eq!(rig.recorder.decel_starts.get(), 1);
    assert_eq!(rig.recorder.decel_ends.get(), 1);
    assert!(rig.recorder.updates.borrow().is_empty());
    assert!(!rig.driver.needs_frame());
}

#[test]
fn multiplier_scales_drag_displacement() {
    let rig = rig_with(|builder| builder.multiplier(2.0));

    rig.source.press(0.0, 0.0, TOUCH, 0);
    rig.source.move_to(10.0, -5.0, TOUCH, 5);
    rig.driver.advance(16);

    assert_eq!(rig.recorder.last_update(), Some((20.0, -10.0, None, None)));
}

#[test]
fn set_values_applies_components_independently() {
    let rig = rig();

    rig.engine
        .set_values(Some(5.0), None, PrevUpdate::Clear, PrevUpdate::Set(3.0));
    rig.engine.force_update();

    assert_eq!(
        rig.recorder.last_update(),
        Some((5.0, 0.0, None, Some(3.0)))
    );
}

#[test]
fn pause_suppresses_an_already_scheduled_tick() {
    let rig = rig();

    rig.source.press(0.0, 0.0, TOUCH, 0);
    rig.source.move_to(10.0, 0.0, TOUCH, 5);
    assert!(rig.driver.needs_frame());

    rig.engine.pause();
    rig.driver.advance(16);

    assert!(rig.recorder.updates.borrow().is_empty());
    assert_eq!(rig.engine.phase(), Phase::Paused);
    assert_eq!(rig.source.motion_subscribers(), 0);
}

#[test]
fn paused_engine_ignores_presses_until_resume() {
    let rig = rig();

    rig.engine.pause();
    rig.source.press(0.0, 0.0, TOUCH, 0);
    assert_eq!(rig.recorder.starts.get(), 0);

    rig.engine.resume();
    rig.source.press(0.0, 0.0, TOUCH, 10);
    assert_eq!(rig.recorder.starts.get(), 1);
    assert_eq!(rig.engine.phase(), Phase::Dragging);
}

#[test]
fn destroy_unsubscribes_and_is_idempotent() {
    let rig = rig();
    assert_eq!(rig.source.press_subscribers(), 1);

    rig.engine.destroy();
    rig.engine.destroy();

    assert_eq!(rig.source.press_subscribers(), 0);
    rig.source.press(0.0, 0.0, TOUCH, 0);
    assert_eq!(rig.recorder.starts.get(), 0);
}

#[test]
fn destroy_mid_drag_halts_pending_tick() {
    let rig = rig();

    rig.source.press(0.0, 0.0, TOUCH, 0);
    rig.source.move_to(10.0, 0.0, TOUCH, 5);
    rig.engine.destroy();
    rig.driver.advance(16);

    assert!(rig.recorder.updates.borrow().is_empty());
    assert_eq!(rig.source.motion_subscribers(), 0);
}

// Only test that opts into the workaround: its install guard is
// process-wide, so exactly one test may observe the first install.
#[test]
fn scroll_workaround_installs_once_across_instances() {
    let source = ScriptedPointerSource::new();
    let driver = ManualFrameDriver::new();

    let first = Momentum::builder()
        .source(source.clone())
        .on_update(|_, _, _, _| {})
        .build(driver.clock())
        .unwrap();
    let second = Momentum::builder()
        .source(source.clone())
        .on_update(|_, _, _, _| {})
        .build(driver.clock())
        .unwrap();

    assert_eq!(source.fix_installs(), 1);
    drop((first, second));
}
