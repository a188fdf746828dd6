//! Outbound effects and notifications.
//!
//! The [`AlarmService`](super::service::AlarmService) never performs I/O.
//! Each handler returns the list of [`Effect`]s the event requires, in
//! the order they must be executed, and the
//! [`Dispatcher`](super::dispatcher::Dispatcher) carries them out.

use serde::Serialize;

use crate::config::TopicConfig;
use crate::registry::{Sensor, SensorKind};
use crate::state::{AlarmMode, AlarmState, AlarmStatus};

/// Effect list produced by one event.
pub type Effects = Vec<Effect>;

/// Output channels the service can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actuator {
    Siren,
    /// Lit while the alarm is armed or alerting.
    Indicator,
}

/// A side effect to execute against an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Publish a notification on its topic.
    Publish(Notification),
    /// Persist the whole state record.
    Persist(AlarmState),
    /// Switch an output.
    Actuate { actuator: Actuator, on: bool },
    /// Send an out-of-band alert.
    Alert(String),
}

/// Per-sensor snapshot published on `<sensor_prefix><id>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensorSnapshot {
    pub id: String,
    pub category: SensorKind,
    pub label: String,
    pub active: bool,
}

impl SensorSnapshot {
    pub fn of(sensor: &Sensor, active: bool) -> Self {
        Self {
            id: sensor.id.as_str().into(),
            category: sensor.category,
            label: sensor.label.as_str().into(),
            active,
        }
    }
}

/// Structured notifications; rendered to topic + payload on dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Sensor state snapshot (hit or clear).
    Sensor(SensorSnapshot),
    /// A sensor was hit (shared events topic).
    SensorHit { label: String },
    /// Entry delay changed by command.
    DelayChanged(u32),
    /// Mode changed by command.
    ModeChanged(AlarmMode),
    /// Status changed by command.
    StatusChanged(AlarmStatus),
    /// The siren countdown elapsed.
    SirenOn,
    /// The controller started with this state.
    Started(AlarmState),
}

impl Notification {
    /// Topic this notification is published on.
    pub fn topic(&self, topics: &TopicConfig) -> String {
        match self {
            Self::Sensor(s) => format!("{}{}", topics.sensor_prefix, s.id),
            _ => topics.events.clone(),
        }
    }

    /// Wire payload: JSON for sensor snapshots, free text otherwise.
    pub fn payload(&self) -> String {
        match self {
            Self::Sensor(s) => serde_json::to_string(s).unwrap_or_default(),
            Self::SensorHit { label } => format!("Sensor {} hit", label),
            Self::DelayChanged(secs) => format!("Command entry delay {} sec", secs),
            Self::ModeChanged(mode) => format!("Command mode {}", mode.as_str()),
            Self::StatusChanged(status) => format!("Command status {}", status.as_str()),
            Self::SirenOn => "Siren on!!".into(),
            Self::Started(state) => format!("Alarm started: {}", state),
        }
    }
}
