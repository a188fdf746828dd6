//! End-to-end tests for the Controller → AlarmService → Dispatcher chain.
//!
//! Events go in through `Controller::submit`, time is passed explicitly,
//! and every assertion is made on what the mock adapters recorded.

use crate::mock_hw::{ActuatorCall, MockState, TestController, controller, controller_with};

use homealarm::events::AlarmEvent;
use homealarm::registry::truncated;
use homealarm::state::{AlarmMode, AlarmState, AlarmStatus};

const EVENTS: &str = "alarm/events";

fn command(c: &mut TestController, json: &str, now_ms: u64) {
    assert!(c.submit(AlarmEvent::command(json.as_bytes()).unwrap()));
    c.run_pending(now_ms);
}

fn hit(c: &mut TestController, id: &str, now_ms: u64) {
    assert!(c.submit(AlarmEvent::SensorTriggered(truncated(id))));
    c.run_pending(now_ms);
}

fn clear(c: &mut TestController, id: &str, now_ms: u64) {
    assert!(c.submit(AlarmEvent::SensorCleared(truncated(id))));
    c.run_pending(now_ms);
}

fn saves(c: &TestController) -> &[AlarmState] {
    &c.dispatcher().store().port().saves
}

// ── Startup ──────────────────────────────────────────────────

#[test]
fn first_start_persists_defaults_and_announces() {
    let c = controller();
    assert_eq!(saves(&c), &[AlarmState::default()]);
    assert_eq!(
        c.dispatcher().publisher().on(EVENTS),
        vec!["Alarm started: status=disarmed mode=full tempo=0s"]
    );
    assert_eq!(
        c.dispatcher().actuators().calls,
        vec![ActuatorCall::Indicator(false)]
    );
}

#[test]
fn restart_restores_persisted_alerting_state() {
    let c = controller_with(MockState {
        record: Some(AlarmState {
            status: AlarmStatus::Alerting,
            mode: AlarmMode::Full,
            entry_delay_secs: 10,
        }),
        ..Default::default()
    });
    assert!(saves(&c).is_empty());
    assert!(c.dispatcher().actuators().siren_on());
    assert!(c.dispatcher().actuators().indicator_on());
}

// ── Arming and the immediate siren ───────────────────────────

#[test]
fn arm_then_magnetic_hit_with_zero_delay_sounds_siren() {
    let mut c = controller();
    c.dispatcher_mut().publisher_mut().clear();

    command(&mut c, r#"{"status":"armed"}"#, 0);
    assert_eq!(c.service().state().status, AlarmStatus::Armed);
    assert_eq!(saves(&c).last().unwrap().status, AlarmStatus::Armed);
    assert!(c.dispatcher().actuators().indicator_on());

    c.dispatcher_mut().publisher_mut().clear();
    hit(&mut c, "GPA04", 10);

    assert_eq!(c.service().state().status, AlarmStatus::Alerting);
    assert_eq!(saves(&c).last().unwrap().status, AlarmStatus::Alerting);
    assert!(c.dispatcher().actuators().siren_on());
    assert_eq!(c.dispatcher().alert().sent, vec!["Alarm intrusion!"]);
    assert_eq!(
        c.dispatcher().publisher().on(EVENTS),
        vec!["Sensor Porte d'entrée hit", "Siren on!!"]
    );
    let snapshots = c.dispatcher().publisher().on("alarm/sensors/GPA04");
    assert_eq!(snapshots.len(), 1);
    assert!(snapshots[0].contains(r#""active":true"#));
}

#[test]
fn siren_waits_for_the_entry_delay() {
    let mut c = controller();
    command(&mut c, r#"{"tempo":30,"status":"armed"}"#, 0);
    hit(&mut c, "GPA02", 1_000);
    assert!(c.service().timer().is_pending());
    assert_eq!(c.next_deadline_ms(), Some(31_000));

    c.run_pending(30_999);
    assert_eq!(c.service().state().status, AlarmStatus::Armed);

    c.run_pending(31_000);
    assert_eq!(c.service().state().status, AlarmStatus::Alerting);
    assert_eq!(c.dispatcher().actuators().siren_activations(), 1);

    // Nothing left to fire.
    c.run_pending(60_000);
    assert_eq!(c.dispatcher().actuators().siren_activations(), 1);
    assert_eq!(c.dispatcher().alert().sent.len(), 1);
}

// ── Qualification ────────────────────────────────────────────

#[test]
fn perimeter_mode_ignores_motion_sensors() {
    let mut c = controller();
    command(&mut c, r#"{"mode":"perimeter-only","status":"armed"}"#, 0);
    hit(&mut c, "GPA01", 10);
    assert!(!c.service().timer().is_pending());
    c.run_pending(100_000);
    assert_eq!(c.service().state().status, AlarmStatus::Armed);
    assert_eq!(c.dispatcher().actuators().siren_activations(), 0);
    // The hit itself is still announced.
    assert!(
        c.dispatcher()
            .publisher()
            .on(EVENTS)
            .contains(&"Sensor Hall d'entrée hit")
    );
}

#[test]
fn hits_while_disarmed_never_change_status() {
    let mut c = controller();
    for (i, id) in ["GPA01", "GPA04", "GPA05", "GPA03"].iter().enumerate() {
        hit(&mut c, id, i as u64 * 100);
        clear(&mut c, id, i as u64 * 100 + 50);
    }
    c.run_pending(1_000_000);
    assert_eq!(c.service().state().status, AlarmStatus::Disarmed);
    assert_eq!(saves(&c).len(), 1);
    assert!(!c.service().timer().is_pending());
}

// ── Cancellation ─────────────────────────────────────────────

#[test]
fn disarm_cancels_pending_countdown() {
    let mut c = controller();
    command(&mut c, r#"{"tempo":10,"status":"armed"}"#, 0);
    hit(&mut c, "GPA05", 0);
    command(&mut c, r#"{"status":"disarmed"}"#, 5_000);

    assert!(!c.service().timer().is_pending());
    c.run_pending(20_000);
    assert_eq!(c.service().state().status, AlarmStatus::Disarmed);
    assert_eq!(c.dispatcher().actuators().siren_activations(), 0);
    assert!(!c.dispatcher().actuators().indicator_on());
    assert!(c.dispatcher().alert().sent.is_empty());
}

#[test]
fn disarm_silences_a_sounding_siren() {
    let mut c = controller();
    command(&mut c, r#"{"status":"armed"}"#, 0);
    hit(&mut c, "GPA04", 0);
    assert!(c.dispatcher().actuators().siren_on());
    command(&mut c, r#"{"status":"off"}"#, 1_000);
    assert!(!c.dispatcher().actuators().siren_on());
    assert_eq!(c.service().state().status, AlarmStatus::Disarmed);
}

#[test]
fn clearing_the_sensor_does_not_cancel_countdown() {
    let mut c = controller();
    command(&mut c, r#"{"tempo":5,"status":"armed"}"#, 0);
    hit(&mut c, "GPA04", 0);
    clear(&mut c, "GPA04", 200);
    assert_eq!(c.service().is_active("GPA04"), Some(false));
    c.run_pending(5_000);
    assert_eq!(c.service().state().status, AlarmStatus::Alerting);
}

#[test]
fn repeated_arm_and_second_hit_keep_a_single_countdown() {
    let mut c = controller();
    command(&mut c, r#"{"tempo":10,"status":"armed"}"#, 0);
    hit(&mut c, "GPA04", 1_000);
    command(&mut c, r#"{"status":"armed"}"#, 2_000);
    hit(&mut c, "GPA05", 3_000);
    assert_eq!(c.next_deadline_ms(), Some(11_000));

    c.run_pending(11_000);
    c.run_pending(13_000);
    assert_eq!(c.dispatcher().actuators().siren_activations(), 1);
    assert_eq!(c.dispatcher().alert().sent.len(), 1);
    assert_eq!(
        c.dispatcher().publisher().on(EVENTS)
            .iter()
            .filter(|p| **p == "Siren on!!")
            .count(),
        1
    );
}

// ── Command handling ─────────────────────────────────────────

#[test]
fn unknown_mode_alone_changes_nothing() {
    let mut c = controller();
    c.dispatcher_mut().publisher_mut().clear();
    command(&mut c, r#"{"mode":"bogus"}"#, 0);
    assert_eq!(c.service().state().mode, AlarmMode::Full);
    assert!(c.dispatcher().publisher().messages.is_empty());
    assert_eq!(saves(&c).len(), 1);
}

#[test]
fn malformed_payload_is_dropped() {
    let mut c = controller();
    c.dispatcher_mut().publisher_mut().clear();
    command(&mut c, "{status: armed", 0);
    command(&mut c, "[1,2,3]", 0);
    assert_eq!(c.service().state(), AlarmState::default());
    assert!(c.dispatcher().publisher().messages.is_empty());
    assert_eq!(saves(&c).len(), 1);
}

#[test]
fn full_command_publishes_each_field_and_saves_once() {
    let mut c = controller();
    c.dispatcher_mut().publisher_mut().clear();
    command(
        &mut c,
        r#"{"tempo":45,"mode":"perimetric","status":"armed"}"#,
        0,
    );
    assert_eq!(
        c.dispatcher().publisher().on(EVENTS),
        vec![
            "Command entry delay 45 sec",
            "Command mode perimeter-only",
            "Command status armed",
        ]
    );
    assert_eq!(
        saves(&c),
        &[
            AlarmState::default(),
            AlarmState {
                status: AlarmStatus::Armed,
                mode: AlarmMode::PerimeterOnly,
                entry_delay_secs: 45,
            }
        ]
    );
}

#[test]
fn persistence_failure_does_not_block_transition() {
    let mut c = controller_with(MockState {
        fail: true,
        ..Default::default()
    });
    command(&mut c, r#"{"status":"armed"}"#, 0);
    assert_eq!(c.service().state().status, AlarmStatus::Armed);
    assert!(c.dispatcher().store().save_failures() >= 2);
    hit(&mut c, "GPA04", 0);
    assert_eq!(c.service().state().status, AlarmStatus::Alerting);
}

#[test]
fn unknown_sensor_events_are_ignored() {
    let mut c = controller();
    command(&mut c, r#"{"status":"armed"}"#, 0);
    c.dispatcher_mut().publisher_mut().clear();
    hit(&mut c, "GPA99", 0);
    assert!(c.dispatcher().publisher().messages.is_empty());
    assert_eq!(c.service().state().status, AlarmStatus::Armed);
}
