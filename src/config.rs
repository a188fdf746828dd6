//! System configuration parameters
//!
//! All tunable parameters for the alarm controller.  Every field has a
//! default, so a config file only needs to list what it overrides.

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::registry::{MAX_SENSORS, Sensor, default_catalogue};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Sensors ---
    /// Monitored sensor catalogue (fixed for the process lifetime)
    pub sensors: Vec<Sensor>,
    /// Inputs use pull-ups: a LOW level means "triggered"
    pub inputs_active_low: bool,
    /// A level must hold this long before an edge is reported (milliseconds)
    pub debounce_ms: u32,

    // --- Outputs ---
    /// Output channel driving the siren
    pub siren_pin: u8,
    /// Output channel driving the armed/alerting indicator
    pub indicator_pin: u8,

    // --- Messaging ---
    pub topics: TopicConfig,
    /// Text sent over the out-of-band alert channel when the siren fires
    pub alert_message: String,

    // --- Persistence ---
    /// Directory holding the persisted state; `None` keeps it in memory
    pub state_dir: Option<String>,

    // --- Timing ---
    /// Upper bound on the controller's idle wait (milliseconds)
    pub poll_interval_ms: u32,
}

/// Publish/subscribe topic names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicConfig {
    /// Inbound command topic.
    pub commands: String,
    /// Per-sensor snapshot topics are `<sensor_prefix><id>`.
    pub sensor_prefix: String,
    /// Shared human-readable event topic.
    pub events: String,
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            commands: "alarm/commands".into(),
            sensor_prefix: "alarm/sensors/".into(),
            events: "alarm/events".into(),
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Sensors
            sensors: default_catalogue(),
            inputs_active_low: true,
            debounce_ms: 50,

            // Outputs (MCP23017 bank B)
            siren_pin: 8,
            indicator_pin: 9,

            // Messaging
            topics: TopicConfig::default(),
            alert_message: "Alarm intrusion!".into(),

            // Persistence
            state_dir: None,

            // Timing
            poll_interval_ms: 20,
        }
    }
}

impl SystemConfig {
    /// Read a JSON config file, fill unspecified fields with defaults and
    /// validate the result.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|_| ConfigError::IoError)?;
        let config = Self::from_json(&bytes)?;
        info!("Config loaded from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(bytes).map_err(|_| ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Range and consistency checks.  Invalid values are rejected, never
    /// clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sensors.is_empty() {
            return Err(ConfigError::ValidationFailed("sensors must not be empty"));
        }
        if self.sensors.len() > MAX_SENSORS {
            return Err(ConfigError::ValidationFailed("at most 16 sensors are supported"));
        }
        for (i, a) in self.sensors.iter().enumerate() {
            if a.id.is_empty() {
                return Err(ConfigError::ValidationFailed("sensor id must not be empty"));
            }
            for b in &self.sensors[i + 1..] {
                if a.id == b.id {
                    return Err(ConfigError::ValidationFailed("sensor ids must be unique"));
                }
                if a.index == b.index {
                    return Err(ConfigError::ValidationFailed("sensor indexes must be unique"));
                }
            }
        }
        if self.siren_pin == self.indicator_pin {
            return Err(ConfigError::ValidationFailed(
                "siren_pin and indicator_pin must differ",
            ));
        }
        if self
            .sensors
            .iter()
            .any(|s| s.index == self.siren_pin || s.index == self.indicator_pin)
        {
            return Err(ConfigError::ValidationFailed(
                "output channels must not be sensor channels",
            ));
        }
        if self.debounce_ms > 5000 {
            return Err(ConfigError::ValidationFailed("debounce_ms must be 0–5000"));
        }
        if !(1..=1000).contains(&self.poll_interval_ms) {
            return Err(ConfigError::ValidationFailed("poll_interval_ms must be 1–1000"));
        }
        if self.topics.events.is_empty() || self.topics.sensor_prefix.is_empty() {
            return Err(ConfigError::ValidationFailed("topics must not be empty"));
        }
        if self.alert_message.is_empty() {
            return Err(ConfigError::ValidationFailed("alert_message must not be empty"));
        }
        Ok(())
    }
}

/// Errors from loading or validating a [`SystemConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The config file could not be read.
    IoError,
    /// The document is not valid JSON or has the wrong shape.
    Parse,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::IoError => write!(f, "I/O error"),
            Self::Parse => write!(f, "parse error"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}
