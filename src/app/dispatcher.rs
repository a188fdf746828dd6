//! Notification dispatcher — executes effects against the outbound ports.
//!
//! Effects run strictly in the order the service produced them.  A failing
//! collaborator is logged and counted; it never aborts the remaining
//! effects and never feeds back into the alarm state.

use log::{debug, warn};

use crate::config::TopicConfig;
use crate::state::StateStore;

use super::events::{Actuator, Effect, Notification};
use super::ports::{ActuatorPort, AlertPort, PublishPort, StatePort};

/// Per-port failure counters since startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub publish_failures: u32,
    pub actuator_failures: u32,
    pub alert_failures: u32,
}

/// Owns every outbound collaborator.
pub struct Dispatcher<P, S, A, L>
where
    P: PublishPort,
    S: StatePort,
    A: ActuatorPort,
    L: AlertPort,
{
    publisher: P,
    store: StateStore<S>,
    actuators: A,
    alert: L,
    topics: TopicConfig,
    stats: DispatchStats,
}

impl<P, S, A, L> Dispatcher<P, S, A, L>
where
    P: PublishPort,
    S: StatePort,
    A: ActuatorPort,
    L: AlertPort,
{
    pub fn new(publisher: P, store: StateStore<S>, actuators: A, alert: L, topics: TopicConfig) -> Self {
        Self {
            publisher,
            store,
            actuators,
            alert,
            topics,
            stats: DispatchStats::default(),
        }
    }

    /// Execute `effects` in order.
    pub fn dispatch(&mut self, effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::Publish(n) => self.publish(n),
                Effect::Persist(state) => {
                    self.store.apply(*state);
                }
                Effect::Actuate { actuator, on } => self.actuate(*actuator, *on),
                Effect::Alert(message) => {
                    if let Err(e) = self.alert.send_alert(message) {
                        self.stats.alert_failures = self.stats.alert_failures.saturating_add(1);
                        warn!("Alert delivery failed: {}", e);
                    }
                }
            }
        }
    }

    fn publish(&mut self, notification: &Notification) {
        let topic = notification.topic(&self.topics);
        let payload = notification.payload();
        debug!("PUB {} <- {}", topic, payload);
        if let Err(e) = self.publisher.publish(&topic, payload.as_bytes()) {
            self.stats.publish_failures = self.stats.publish_failures.saturating_add(1);
            warn!("Publish on {} failed: {}", topic, e);
        }
    }

    fn actuate(&mut self, actuator: Actuator, on: bool) {
        let result = match actuator {
            Actuator::Siren => self.actuators.set_siren(on),
            Actuator::Indicator => self.actuators.set_indicator(on),
        };
        if let Err(e) = result {
            self.stats.actuator_failures = self.stats.actuator_failures.saturating_add(1);
            warn!("{:?} -> {} failed: {}", actuator, on, e);
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    pub fn store(&self) -> &StateStore<S> {
        &self.store
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn publisher_mut(&mut self) -> &mut P {
        &mut self.publisher
    }

    pub fn actuators(&self) -> &A {
        &self.actuators
    }

    pub fn alert(&self) -> &L {
        &self.alert
    }
}
