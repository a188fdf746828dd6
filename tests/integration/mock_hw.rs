//! Mock adapters for integration tests.
//!
//! Record every outbound call so tests can assert on the full effect
//! history without a broker, a disk or real pins.

use homealarm::app::dispatcher::Dispatcher;
use homealarm::app::ports::{
    ActuatorError, ActuatorPort, AlertError, AlertPort, PublishError, PublishPort, StateError,
    StatePort,
};
use homealarm::app::service::AlarmService;
use homealarm::config::TopicConfig;
use homealarm::controller::Controller;
use homealarm::registry::SensorRegistry;
use homealarm::state::{AlarmState, StateStore};

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Siren(bool),
    Indicator(bool),
}

// ── MockActuators ─────────────────────────────────────────────

#[derive(Default)]
pub struct MockActuators {
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockActuators {
    pub fn siren_on(&self) -> bool {
        self.last(|c| match c {
            ActuatorCall::Siren(on) => Some(on),
            ActuatorCall::Indicator(_) => None,
        })
    }

    pub fn indicator_on(&self) -> bool {
        self.last(|c| match c {
            ActuatorCall::Indicator(on) => Some(on),
            ActuatorCall::Siren(_) => None,
        })
    }

    pub fn siren_activations(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == ActuatorCall::Siren(true))
            .count()
    }

    fn last(&self, pick: impl Fn(ActuatorCall) -> Option<bool>) -> bool {
        self.calls.iter().rev().find_map(|c| pick(*c)).unwrap_or(false)
    }
}

impl ActuatorPort for MockActuators {
    fn set_siren(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.calls.push(ActuatorCall::Siren(on));
        Ok(())
    }

    fn set_indicator(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.calls.push(ActuatorCall::Indicator(on));
        Ok(())
    }
}

// ── MockPublisher ─────────────────────────────────────────────

#[derive(Default)]
pub struct MockPublisher {
    pub messages: Vec<(String, String)>,
}

#[allow(dead_code)]
impl MockPublisher {
    /// Payloads published on `topic`, in order.
    pub fn on(&self, topic: &str) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, p)| p.as_str())
            .collect()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl PublishPort for MockPublisher {
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), PublishError> {
        self.messages.push((
            topic.to_string(),
            String::from_utf8_lossy(payload).into_owned(),
        ));
        Ok(())
    }
}

// ── MockState ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockState {
    pub record: Option<AlarmState>,
    pub saves: Vec<AlarmState>,
    pub fail: bool,
}

impl StatePort for MockState {
    fn load(&self) -> Result<Option<AlarmState>, StateError> {
        Ok(self.record)
    }

    fn save(&mut self, state: &AlarmState) -> Result<(), StateError> {
        if self.fail {
            return Err(StateError::Encode);
        }
        self.record = Some(*state);
        self.saves.push(*state);
        Ok(())
    }
}

// ── MockAlert ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockAlert {
    pub sent: Vec<String>,
}

impl AlertPort for MockAlert {
    fn send_alert(&mut self, message: &str) -> Result<(), AlertError> {
        self.sent.push(message.to_string());
        Ok(())
    }
}

// ── Harness ───────────────────────────────────────────────────

pub type TestController = Controller<MockPublisher, MockState, MockActuators, MockAlert>;

/// Controller over the default catalogue, loaded from `port`, started.
pub fn controller_with(port: MockState) -> TestController {
    let mut store = StateStore::new(port);
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

/// Fresh controller: no persisted record.
pub fn controller() -> TestController {
    controller_with(MockState::default())
}
