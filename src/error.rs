//! Unified error types for the alarm controller.
//!
//! Port-level errors live next to their traits in [`crate::app::ports`];
//! this module gathers them into a single [`Error`] so startup code and
//! the binary boundary can propagate with `?`.  All variants are `Copy`.

use core::fmt;

use crate::app::ports::{ActuatorError, AlertError, PublishError, StateError, StorageError};
use crate::config::ConfigError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Sensor catalogue is inconsistent.
    Registry(RegistryError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
    /// Key/value storage backend failed.
    Storage(StorageError),
    /// The persisted alarm record could not be read or written.
    State(StateError),
    /// An actuator command failed.
    Actuator(ActuatorError),
    /// The publish channel rejected a notification.
    Publish(PublishError),
    /// The out-of-band alert could not be delivered.
    Alert(AlertError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registry(e) => write!(f, "registry: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::State(e) => write!(f, "state: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Publish(e) => write!(f, "publish: {e}"),
            Self::Alert(e) => write!(f, "alert: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Registry errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// Two entries share the same identifier.
    DuplicateId,
    /// Two entries share the same physical channel.
    DuplicateIndex,
    /// More sensors than the registry can hold.
    TooManySensors,
    /// The catalogue has no sensors at all.
    Empty,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId => write!(f, "duplicate sensor id"),
            Self::DuplicateIndex => write!(f, "duplicate sensor index"),
            Self::TooManySensors => write!(f, "too many sensors"),
            Self::Empty => write!(f, "empty sensor catalogue"),
        }
    }
}

impl From<RegistryError> for Error {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

// ---------------------------------------------------------------------------
// Conversions from port errors
// ---------------------------------------------------------------------------

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<StateError> for Error {
    fn from(e: StateError) -> Self {
        Self::State(e)
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

impl From<PublishError> for Error {
    fn from(e: PublishError) -> Self {
        Self::Publish(e)
    }
}

impl From<AlertError> for Error {
    fn from(e: AlertError) -> Self {
        Self::Alert(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_subsystem() {
        let e: Error = RegistryError::DuplicateId.into();
        assert_eq!(e.to_string(), "registry: duplicate sensor id");

        let e: Error = StorageError::Io.into();
        assert_eq!(e.to_string(), "storage: backing store I/O failure");
    }
}
