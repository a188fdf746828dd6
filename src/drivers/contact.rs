//! Debounced contact inputs.
//!
//! ## Hardware
//!
//! Each sensor drives one digital input.  With pull-ups (the default) the
//! line idles HIGH and a detector pulls it LOW when it trips; with
//! `active_low = false` the polarity is inverted.  The main loop calls
//! [`SensorBank::poll`] at its poll rate and each [`ContactInput`] runs
//! the debounce state machine below.
//!
//! ## Debounce
//!
//! | State     | Raw level                        | Next                          |
//! |-----------|----------------------------------|-------------------------------|
//! | Stable    | differs from stable level        | Settling (since = now)        |
//! | Settling  | back to stable level             | Stable, no edge               |
//! | Settling  | held for `debounce_ms`           | Stable, edge reported         |

use embedded_hal::digital::InputPin;
use log::{debug, warn};

use crate::events::AlarmEvent;
use crate::registry::{MAX_SENSORS, SensorId, SensorRegistry};

/// A debounced level change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactEdge {
    Triggered,
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebounceState {
    Stable,
    Settling { level: bool, since_ms: u64 },
}

pub struct ContactInput<P: InputPin> {
    pin: P,
    active_low: bool,
    debounce_ms: u64,
    /// Debounced level: `true` = triggered.
    triggered: bool,
    state: DebounceState,
}

impl<P: InputPin> ContactInput<P> {
    /// Starts in the cleared state; a line that is already tripped is
    /// reported once it has held for `debounce_ms`.
    pub fn new(pin: P, active_low: bool, debounce_ms: u32) -> Self {
        Self {
            pin,
            active_low,
            debounce_ms: u64::from(debounce_ms),
            triggered: false,
            state: DebounceState::Stable,
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// Sample the pin.  Returns an edge once a new level has held for the
    /// debounce period.
    pub fn poll(&mut self, now_ms: u64) -> Option<ContactEdge> {
        let high = match self.pin.is_high() {
            Ok(high) => high,
            Err(e) => {
                warn!("Contact read failed: {:?}", e);
                return None;
            }
        };
        let raw = high != self.active_low;

        match self.state {
            DebounceState::Stable => {
                if raw != self.triggered {
                    if self.debounce_ms == 0 {
                        return Some(self.commit(raw));
                    }
                    self.state = DebounceState::Settling {
                        level: raw,
                        since_ms: now_ms,
                    };
                }
                None
            }
            DebounceState::Settling { level, since_ms } => {
                if raw != level {
                    // Bounced back before settling.
                    self.state = DebounceState::Stable;
                    None
                } else if now_ms.saturating_sub(since_ms) >= self.debounce_ms {
                    Some(self.commit(level))
                } else {
                    None
                }
            }
        }
    }

    fn commit(&mut self, level: bool) -> ContactEdge {
        self.triggered = level;
        self.state = DebounceState::Stable;
        if level {
            ContactEdge::Triggered
        } else {
            ContactEdge::Cleared
        }
    }
}

/// One debounced input per registered sensor.
pub struct SensorBank<P: InputPin> {
    inputs: heapless::Vec<(SensorId, ContactInput<P>), MAX_SENSORS>,
}

impl<P: InputPin> SensorBank<P> {
    /// Build a bank for every sensor in `registry`.  `pin_for` maps the
    /// sensor's input channel to a pin.
    pub fn new(
        registry: &SensorRegistry,
        active_low: bool,
        debounce_ms: u32,
        mut pin_for: impl FnMut(u8) -> P,
    ) -> Self {
        let mut inputs = heapless::Vec::new();
        for sensor in registry.iter() {
            let input = ContactInput::new(pin_for(sensor.index), active_low, debounce_ms);
            // Registry length is bounded by MAX_SENSORS.
            let _ = inputs.push((sensor.id.clone(), input));
        }
        Self { inputs }
    }

    /// Poll every input and translate debounced edges into events.
    pub fn poll(&mut self, now_ms: u64) -> heapless::Vec<AlarmEvent, MAX_SENSORS> {
        let mut events = heapless::Vec::new();
        for (id, input) in &mut self.inputs {
            let event = match input.poll(now_ms) {
                Some(ContactEdge::Triggered) => AlarmEvent::SensorTriggered(id.clone()),
                Some(ContactEdge::Cleared) => AlarmEvent::SensorCleared(id.clone()),
                None => continue,
            };
            debug!("Input edge: {:?}", event);
            let _ = events.push(event);
        }
        events
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}
