//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   AlarmService ──▶ Effect list ──▶ Dispatcher ──▶ Port trait ──▶ Adapter
//! ```
//!
//! Driven adapters (publish channel, state record, actuators, alert
//! sender) implement these traits.  The [`Dispatcher`](super::dispatcher::Dispatcher)
//! consumes them via generics, so the state machine never touches I/O.
//!
//! All port errors are typed and `Copy`; the dispatcher logs them and
//! carries on.

use crate::state::AlarmState;

// ───────────────────────────────────────────────────────────────
// Publish port (driven adapter: domain → message channel)
// ───────────────────────────────────────────────────────────────

/// Outbound publish/subscribe channel.
pub trait PublishPort {
    /// Publish `payload` on `topic`.  Delivery is at-most-once from the
    /// core's point of view; no retry is attempted on failure.
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), PublishError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to drive outputs.
pub trait ActuatorPort {
    /// Switch the siren on or off.
    fn set_siren(&mut self, on: bool) -> Result<(), ActuatorError>;

    /// Switch the armed/alerting status indicator on or off.
    fn set_indicator(&mut self, on: bool) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Alert port (driven adapter: domain → out-of-band channel)
// ───────────────────────────────────────────────────────────────

/// Out-of-band alert sender (SMS gateway, push service, ...).
pub trait AlertPort {
    fn send_alert(&mut self, message: &str) -> Result<(), AlertError>;
}

// ───────────────────────────────────────────────────────────────
// State port (driven adapter: domain ↔ persisted alarm record)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the `{status, mode, tempo}` record.
///
/// The record is always written whole; partial updates are not part of
/// the contract.
pub trait StatePort {
    /// Load the persisted record.  `Ok(None)` when nothing was ever saved.
    fn load(&self) -> Result<Option<AlarmState>, StateError>;

    /// Upsert the record.
    fn save(&mut self, state: &AlarmState) -> Result<(), StateError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Failures of the blob store underneath a [`StatePort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Nothing stored under the key.
    Missing,
    /// Blob larger than the store accepts.
    TooLarge,
    /// The backing medium failed.
    Io,
}

/// Errors from [`StatePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    /// Stored record failed deserialization.
    Corrupted,
    /// Record could not be encoded.
    Encode,
    /// Underlying storage failed.
    Storage(StorageError),
}

/// Errors from [`PublishPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishError {
    /// The channel is not connected.
    Disconnected,
    /// The channel refused the message (queue full, payload too large).
    Rejected,
}

/// Errors from [`ActuatorPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO set failed.
    GpioWriteFailed,
}

/// Errors from [`AlertPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertError {
    /// The alert gateway could not be reached.
    Unreachable,
    /// The gateway refused the message.
    Rejected,
}

impl From<StorageError> for StateError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Missing => write!(f, "no stored record"),
            Self::TooLarge => write!(f, "record exceeds blob limit"),
            Self::Io => write!(f, "backing store I/O failure"),
        }
    }
}

impl core::fmt::Display for StateError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "state record corrupted"),
            Self::Encode => write!(f, "state record encode failed"),
            Self::Storage(e) => write!(f, "{}", e),
        }
    }
}

impl core::fmt::Display for PublishError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "channel disconnected"),
            Self::Rejected => write!(f, "message rejected"),
        }
    }
}

impl core::fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl core::fmt::Display for AlertError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unreachable => write!(f, "alert gateway unreachable"),
            Self::Rejected => write!(f, "alert rejected"),
        }
    }
}
