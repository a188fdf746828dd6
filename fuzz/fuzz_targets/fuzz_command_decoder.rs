//! Fuzz target: `RemoteCommand::parse` through `AlarmService::handle`
//!
//! Drives arbitrary payloads into the command path of a service that is
//! armed with a pending countdown, and asserts that it never panics and
//! that a rejected payload leaves the state and the countdown untouched.
//!
//! cargo fuzz run fuzz_command_decoder

#![no_main]

use homealarm::app::commands::RemoteCommand;
use homealarm::app::service::AlarmService;
use homealarm::events::AlarmEvent;
use homealarm::registry::SensorRegistry;
use homealarm::state::{AlarmMode, AlarmState, AlarmStatus};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let armed = AlarmState {
        status: AlarmStatus::Armed,
        mode: AlarmMode::Full,
        entry_delay_secs: 30,
    };
    let mut svc = AlarmService::new(SensorRegistry::default(), armed, "alert");
    let _ = svc.sensor_triggered("GPA04", 0);
    assert!(svc.timer().is_pending());

    let Some(event) = AlarmEvent::command(data) else {
        return;
    };
    let effects = svc.handle(&event, 1_000);

    match RemoteCommand::parse(data) {
        Err(_) => {
            assert!(effects.is_empty());
            assert_eq!(svc.state(), armed);
            assert!(svc.timer().is_pending());
        }
        Ok(cmd) => {
            // A countdown only survives while the alarm stays armed.
            if svc.state().status != AlarmStatus::Armed {
                assert!(!svc.timer().is_pending());
            }
            if cmd.is_empty() {
                assert!(effects.is_empty());
            }
        }
    }
});
