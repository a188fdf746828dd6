//! Inbound event types and the controller's serialized queue.
//!
//! Events are produced by:
//! - sensor inputs (debounced edges, or an external sensor bridge)
//! - the command transport (raw payload, parsed by the service)
//! - the siren timer (deadline reached, carries its token)
//!
//! They are consumed by the controller, which processes them one at a
//! time in FIFO order, each one to completion before the next.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Sensor input │────▶│              │     │              │
//! │ Transport    │────▶│  EventQueue  │────▶│  Controller  │
//! │ Siren timer  │────▶│  (bounded)   │     │  (consumer)  │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```

use heapless::Deque;
use log::warn;

use crate::registry::SensorId;
use crate::timer::TimerToken;

/// Maximum number of pending events.
pub const EVENT_QUEUE_CAP: usize = 32;

/// Largest command payload accepted from the transport.
pub const MAX_COMMAND_LEN: usize = 256;

/// Raw command bytes as received on the command topic.
pub type CommandPayload = heapless::Vec<u8, MAX_COMMAND_LEN>;

/// Everything the controller reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlarmEvent {
    /// A sensor reported "triggered".
    SensorTriggered(SensorId),
    /// A sensor reported "cleared".
    SensorCleared(SensorId),
    /// A payload arrived on the command topic.
    CommandReceived(CommandPayload),
    /// The siren countdown identified by the token reached its deadline.
    SirenElapsed(TimerToken),
}

impl AlarmEvent {
    /// Wrap a command payload.  Returns `None` if it exceeds
    /// [`MAX_COMMAND_LEN`].
    pub fn command(payload: &[u8]) -> Option<Self> {
        CommandPayload::from_slice(payload)
            .ok()
            .map(Self::CommandReceived)
    }
}

/// Bounded FIFO of pending events.
#[derive(Debug, Default)]
pub struct EventQueue {
    inner: Deque<AlarmEvent, EVENT_QUEUE_CAP>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event.  Returns `false` if the queue is full (event dropped).
    pub fn push(&mut self, event: AlarmEvent) -> bool {
        match self.inner.push_back(event) {
            Ok(()) => true,
            Err(dropped) => {
                warn!("Event queue full, dropping {:?}", dropped);
                false
            }
        }
    }

    /// Pop the next event, oldest first.
    pub fn pop(&mut self) -> Option<AlarmEvent> {
        self.inner.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}
