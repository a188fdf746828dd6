//! Sensor registry — the catalogue of monitored sensors.
//!
//! Built once at startup from [`SystemConfig::sensors`](crate::config::SystemConfig)
//! and never mutated afterwards.  Every handler looks sensors up here by
//! identifier, so the registry is the single source of truth for sensor
//! identity, category and label.

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Maximum number of sensors (stack-allocated).
pub const MAX_SENSORS: usize = 16;

/// Stable sensor identifier, e.g. `"GPA01"`.
pub type SensorId = String<16>;

/// Human-readable sensor description.
pub type SensorLabel = String<48>;

/// What a sensor physically detects.  Only affects trigger qualification
/// in perimeter-only mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SensorKind {
    /// Passive infrared motion detector.
    Motion,
    /// Reed switch on a door or window.
    MagneticContact,
}

impl SensorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Motion => "motion",
            Self::MagneticContact => "magnetic-contact",
        }
    }
}

/// One catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: SensorId,
    /// Physical input channel.  Only the I/O adapter interprets it.
    pub index: u8,
    pub category: SensorKind,
    pub label: SensorLabel,
}

impl Sensor {
    /// Build an entry, truncating `id` and `label` to their capacity.
    pub fn new(id: &str, index: u8, category: SensorKind, label: &str) -> Self {
        Self {
            id: truncated(id),
            index,
            category,
            label: truncated(label),
        }
    }
}

/// Copy `s` into a fixed-capacity string, stopping at the last whole
/// character that fits.
pub fn truncated<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// The compiled-in catalogue used when no configuration overrides it.
pub fn default_catalogue() -> Vec<Sensor> {
    vec![
        Sensor::new("GPA01", 0, SensorKind::Motion, "Hall d'entrée"),
        Sensor::new("GPA02", 1, SensorKind::Motion, "Salon"),
        Sensor::new("GPA03", 2, SensorKind::Motion, "Chambre"),
        Sensor::new("GPA04", 3, SensorKind::MagneticContact, "Porte d'entrée"),
        Sensor::new("GPA05", 4, SensorKind::MagneticContact, "Porte de garage"),
    ]
}

/// Immutable, validated sensor catalogue.
#[derive(Debug, Clone)]
pub struct SensorRegistry {
    sensors: heapless::Vec<Sensor, MAX_SENSORS>,
}

impl SensorRegistry {
    /// Validate and copy `sensors` into a registry.
    pub fn new(sensors: &[Sensor]) -> Result<Self, RegistryError> {
        if sensors.is_empty() {
            return Err(RegistryError::Empty);
        }
        let mut out: heapless::Vec<Sensor, MAX_SENSORS> = heapless::Vec::new();
        for sensor in sensors {
            if out.iter().any(|s| s.id == sensor.id) {
                return Err(RegistryError::DuplicateId);
            }
            if out.iter().any(|s| s.index == sensor.index) {
                return Err(RegistryError::DuplicateIndex);
            }
            out.push(sensor.clone())
                .map_err(|_| RegistryError::TooManySensors)?;
        }
        Ok(Self { sensors: out })
    }

    /// Look a sensor up by identifier.
    pub fn get(&self, id: &str) -> Option<&Sensor> {
        self.sensors.iter().find(|s| s.id.as_str() == id)
    }

    /// Position of `id` in catalogue order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.sensors.iter().position(|s| s.id.as_str() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sensor> {
        self.sensors.iter()
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }
}

impl Default for SensorRegistry {
    fn default() -> Self {
        let mut sensors = heapless::Vec::new();
        for sensor in default_catalogue() {
            // The default catalogue is well below MAX_SENSORS.
            let _ = sensors.push(sensor);
        }
        Self { sensors }
    }
}
