//! Persistence fidelity across process restarts, using the directory
//! backed `KvStore`.

use std::path::{Path, PathBuf};

use homealarm::adapters::store::KvStore;
use homealarm::app::dispatcher::Dispatcher;
use homealarm::app::service::AlarmService;
use homealarm::config::TopicConfig;
use homealarm::controller::Controller;
use homealarm::events::AlarmEvent;
use homealarm::registry::SensorRegistry;
use homealarm::state::{AlarmMode, AlarmState, AlarmStatus, StateStore};

use crate::mock_hw::{MockActuators, MockAlert, MockPublisher};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "homealarm-it-{}-{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn boot(dir: &Path) -> Controller<MockPublisher, KvStore, MockActuators, MockAlert> {
    let mut store = StateStore::new(KvStore::open(dir).unwrap());
    let state = store.load();
    let service = AlarmService::new(SensorRegistry::default(), state, "Alarm intrusion!");
    let dispatcher = Dispatcher::new(
        MockPublisher::default(),
        store,
        MockActuators::default(),
        MockAlert::default(),
        TopicConfig::default(),
    );
    let mut controller = Controller::new(service, dispatcher);
    controller.start();
    controller
}

#[test]
fn applied_state_survives_restart() {
    let dir = scratch_dir("apply");
    let wanted = AlarmState {
        status: AlarmStatus::Armed,
        mode: AlarmMode::Full,
        entry_delay_secs: 30,
    };
    {
        let mut store = StateStore::new(KvStore::open(&dir).unwrap());
        store.load();
        store.apply(wanted);
        assert_eq!(store.save_failures(), 0);
    }
    let mut store = StateStore::new(KvStore::open(&dir).unwrap());
    assert_eq!(store.load(), wanted);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn commanded_state_is_restored_by_the_next_controller() {
    let dir = scratch_dir("controller");
    {
        let mut c = boot(&dir);
        c.submit(
            AlarmEvent::command(br#"{"tempo":12,"mode":"perimeter-only","status":"armed"}"#)
                .unwrap(),
        );
        c.run_pending(0);
    }
    let c = boot(&dir);
    assert_eq!(
        c.service().state(),
        AlarmState {
            status: AlarmStatus::Armed,
            mode: AlarmMode::PerimeterOnly,
            entry_delay_secs: 12,
        }
    );
    assert!(c.dispatcher().actuators().indicator_on());
    assert!(!c.dispatcher().actuators().siren_on());
    let _ = std::fs::remove_dir_all(&dir);
}
