//! Alarm state — the durable `{status, mode, tempo}` triplet.
//!
//! [`AlarmState`] is plain data owned by the
//! [`AlarmService`](crate::app::service::AlarmService).  [`StateStore`]
//! wraps a [`StatePort`] with the load-or-initialise and
//! persist-whole-record rules; persistence failures are logged and never
//! block the in-memory change.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::{StateError, StatePort};

/// Arming status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlarmStatus {
    #[default]
    Disarmed,
    Armed,
    Alerting,
}

impl AlarmStatus {
    /// Parse a wire value.  Legacy names (`off`, `siren`) are accepted.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "disarmed" | "off" => Some(Self::Disarmed),
            "armed" => Some(Self::Armed),
            "alerting" | "siren" => Some(Self::Alerting),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disarmed => "disarmed",
            Self::Armed => "armed",
            Self::Alerting => "alerting",
        }
    }
}

/// Response mode.  Independent of status; only affects which sensor
/// categories qualify as intrusion triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlarmMode {
    /// Only magnetic contacts (doors, windows) qualify.
    PerimeterOnly,
    /// Every sensor qualifies.
    #[default]
    Full,
}

impl AlarmMode {
    /// Parse a wire value.  Legacy names (`perimetric`, `perimetrique`)
    /// are accepted.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "perimeter-only" | "perimetric" | "perimetrique" => Some(Self::PerimeterOnly),
            "full" => Some(Self::Full),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PerimeterOnly => "perimeter-only",
            Self::Full => "full",
        }
    }
}

/// The persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlarmState {
    pub status: AlarmStatus,
    pub mode: AlarmMode,
    /// Entry delay in seconds between a qualifying trigger and the siren.
    #[serde(rename = "tempo")]
    pub entry_delay_secs: u32,
}

impl core::fmt::Display for AlarmState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "status={} mode={} tempo={}s",
            self.status.as_str(),
            self.mode.as_str(),
            self.entry_delay_secs
        )
    }
}

// ───────────────────────────────────────────────────────────────
// StateStore
// ───────────────────────────────────────────────────────────────

/// Load-at-startup / save-on-change wrapper around a [`StatePort`].
pub struct StateStore<P: StatePort> {
    port: P,
    /// Number of failed saves since startup.
    save_failures: u32,
}

impl<P: StatePort> StateStore<P> {
    pub fn new(port: P) -> Self {
        Self {
            port,
            save_failures: 0,
        }
    }

    /// Return the persisted record, or persist and return the default
    /// when none exists.
    ///
    /// An undecodable record is replaced by the default.  A storage read
    /// failure leaves the stored record alone: the default is used in
    /// memory only, and the next successful save reconciles storage.
    pub fn load(&mut self) -> AlarmState {
        match self.port.load() {
            Ok(Some(state)) => {
                info!("Alarm state restored: {}", state);
                state
            }
            Ok(None) => {
                info!("First alarm initialisation");
                self.apply(AlarmState::default())
            }
            Err(StateError::Storage(e)) => {
                warn!("Alarm state unreadable ({}), using defaults without saving", e);
                AlarmState::default()
            }
            Err(e) => {
                warn!("Alarm state load failed ({}), resetting to defaults", e);
                self.apply(AlarmState::default())
            }
        }
    }

    /// Persist the whole record.  Returns `state` regardless of the
    /// outcome: memory stays authoritative and the next successful save
    /// reconciles storage.
    pub fn apply(&mut self, state: AlarmState) -> AlarmState {
        match self.port.save(&state) {
            Ok(()) => info!("Alarm state saved: {}", state),
            Err(e) => {
                self.save_failures = self.save_failures.saturating_add(1);
                warn!("Alarm state save failed: {}", e);
            }
        }
        state
    }

    pub fn save_failures(&self) -> u32 {
        self.save_failures
    }

    pub fn port(&self) -> &P {
        &self.port
    }
}
