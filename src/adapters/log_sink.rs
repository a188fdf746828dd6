//! Log-based publish and alert adapters.
//!
//! Implements [`PublishPort`] and [`AlertPort`] by writing every message
//! to the process logger (stderr via `env_logger`).  A broker or SMS
//! gateway adapter would implement the same traits.

use log::{info, warn};

use crate::app::ports::{AlertError, AlertPort, PublishError, PublishPort};

/// Adapter that logs every publication.
#[derive(Debug, Default)]
pub struct LogPublisher {
    published: u64,
}

impl LogPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages published since startup.
    pub fn published(&self) -> u64 {
        self.published
    }
}

impl PublishPort for LogPublisher {
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), PublishError> {
        let text = core::str::from_utf8(payload).map_err(|_| PublishError::Rejected)?;
        info!("PUB | {} | {}", topic, text);
        self.published += 1;
        Ok(())
    }
}

/// Adapter that logs alerts at warning level.
#[derive(Debug, Default)]
pub struct LogAlert;

impl LogAlert {
    pub fn new() -> Self {
        Self
    }
}

impl AlertPort for LogAlert {
    fn send_alert(&mut self, message: &str) -> Result<(), AlertError> {
        if message.is_empty() {
            return Err(AlertError::Rejected);
        }
        warn!("ALERT | {}", message);
        Ok(())
    }
}
