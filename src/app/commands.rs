//! Inbound remote commands.
//!
//! A command is a JSON object with three optional fields:
//!
//! ```text
//! { "tempo": <non-negative integer>, "mode": "<perimeter-only|full>", "status": "<disarmed|armed|alerting>" }
//! ```
//!
//! Decoding is permissive: each field is validated on its own and an
//! unusable field is simply left out, so the rest of the command still
//! applies.  Only a payload that is not a JSON object is rejected.

use log::debug;
use serde_json::Value;

use crate::state::{AlarmMode, AlarmStatus};

/// A decoded remote command.  `None` fields are not applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoteCommand {
    /// New entry delay in seconds.
    pub tempo: Option<u32>,
    pub mode: Option<AlarmMode>,
    pub status: Option<AlarmStatus>,
}

/// Why a payload was dropped entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Not valid JSON.
    Malformed,
    /// Valid JSON, but not an object.
    NotAnObject,
}

impl core::fmt::Display for CommandError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed payload"),
            Self::NotAnObject => write!(f, "payload is not an object"),
        }
    }
}

impl RemoteCommand {
    /// Decode a raw payload.
    pub fn parse(payload: &[u8]) -> Result<Self, CommandError> {
        let value: Value = serde_json::from_slice(payload).map_err(|_| CommandError::Malformed)?;
        let Value::Object(fields) = value else {
            return Err(CommandError::NotAnObject);
        };

        let tempo = fields.get("tempo").and_then(|v| {
            let t = tempo_from(v);
            if t.is_none() {
                debug!("Ignoring tempo {}", v);
            }
            t
        });
        let mode = fields.get("mode").and_then(|v| {
            let m = v.as_str().and_then(AlarmMode::parse);
            if m.is_none() {
                debug!("Ignoring mode {}", v);
            }
            m
        });
        let status = fields.get("status").and_then(|v| {
            let s = v.as_str().and_then(AlarmStatus::parse);
            if s.is_none() {
                debug!("Ignoring status {}", v);
            }
            s
        });

        Ok(Self {
            tempo,
            mode,
            status,
        })
    }

    /// `true` when no field survived decoding.
    pub fn is_empty(&self) -> bool {
        self.tempo.is_none() && self.mode.is_none() && self.status.is_none()
    }
}

/// Accept integral JSON numbers (including `30.0`) in `0..=u32::MAX`.
fn tempo_from(v: &Value) -> Option<u32> {
    if let Some(n) = v.as_u64() {
        return u32::try_from(n).ok();
    }
    let f = v.as_f64()?;
    if f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&f) {
        Some(f as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_command() {
        let c = RemoteCommand::parse(br#"{"tempo":30,"mode":"full","status":"armed"}"#).unwrap();
        assert_eq!(
            c,
            RemoteCommand {
                tempo: Some(30),
                mode: Some(AlarmMode::Full),
                status: Some(AlarmStatus::Armed),
            }
        );
    }

    #[test]
    fn unknown_values_are_dropped_per_field() {
        let c = RemoteCommand::parse(br#"{"mode":"bogus","status":"disarmed"}"#).unwrap();
        assert_eq!(c.mode, None);
        assert_eq!(c.status, Some(AlarmStatus::Disarmed));

        let c = RemoteCommand::parse(br#"{"mode":"bogus"}"#).unwrap();
        assert!(c.is_empty());
    }

    #[test]
    fn tempo_must_be_a_non_negative_integer() {
        let t = |s: &[u8]| RemoteCommand::parse(s).unwrap().tempo;
        assert_eq!(t(br#"{"tempo":0}"#), Some(0));
        assert_eq!(t(br#"{"tempo":12.0}"#), Some(12));
        assert_eq!(t(br#"{"tempo":2.5}"#), None);
        assert_eq!(t(br#"{"tempo":-1}"#), None);
        assert_eq!(t(br#"{"tempo":"10"}"#), None);
        assert_eq!(t(br#"{"tempo":99999999999}"#), None);
    }

    #[test]
    fn non_string_enums_are_ignored() {
        let c = RemoteCommand::parse(br#"{"mode":1,"status":null}"#).unwrap();
        assert!(c.is_empty());
    }

    #[test]
    fn malformed_payloads_are_rejected() {
        assert_eq!(RemoteCommand::parse(b"{status:"), Err(CommandError::Malformed));
        assert_eq!(RemoteCommand::parse(b""), Err(CommandError::Malformed));
        assert_eq!(RemoteCommand::parse(b"42"), Err(CommandError::NotAnObject));
        assert_eq!(
            RemoteCommand::parse(br#"["armed"]"#),
            Err(CommandError::NotAnObject)
        );
    }
}
