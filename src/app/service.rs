//! Alarm service — the event processor at the hexagonal core.
//!
//! [`AlarmService`] owns the alarm state, the per-sensor observations and
//! the siren timer.  Each handler applies the transition rules for one
//! event and returns the [`Effects`] that must accompany it; nothing in
//! here performs I/O, so the whole state machine is testable with plain
//! assertions on the returned list.
//!
//! ```text
//!  sensor edge ──┐    ┌──────────────────────────────┐
//!  command ──────┼──▶ │         AlarmService         │ ──▶ Effects ──▶ Dispatcher
//!  siren elapse ─┘    │ state · observations · timer │
//!                     └──────────────────────────────┘
//! ```
//!
//! ## Transition rules
//!
//! | Event            | Condition                                   | Outcome                              |
//! |------------------|---------------------------------------------|--------------------------------------|
//! | sensor triggered | always                                      | mark active, publish snapshot + hit  |
//! |                  | armed, and full mode or magnetic contact    | start siren timer unless pending     |
//! | sensor cleared   | always                                      | mark inactive, publish snapshot      |
//! | siren elapsed    | token matches the pending countdown         | alerting, persist, siren, alert      |
//! | command          | per field (tempo, mode, status)             | apply, publish, persist once         |

use log::{debug, info, warn};

use crate::events::AlarmEvent;
use crate::registry::{MAX_SENSORS, Sensor, SensorKind, SensorRegistry};
use crate::state::{AlarmMode, AlarmState, AlarmStatus};
use crate::timer::{SirenTimer, TimerToken};

use super::commands::RemoteCommand;
use super::events::{Actuator, Effect, Effects, Notification, SensorSnapshot};

// ───────────────────────────────────────────────────────────────
// AlarmService
// ───────────────────────────────────────────────────────────────

/// The event processor.  Single owner of [`AlarmState`].
pub struct AlarmService {
    registry: SensorRegistry,
    state: AlarmState,
    /// Last known level per sensor, in registry order.
    active: heapless::Vec<bool, MAX_SENSORS>,
    timer: SirenTimer,
    /// Text handed to the out-of-band alert sender.
    alert_message: String,
}

impl AlarmService {
    /// Construct the service around a loaded state.  Every sensor starts
    /// cleared.
    pub fn new(registry: SensorRegistry, state: AlarmState, alert_message: impl Into<String>) -> Self {
        let mut active = heapless::Vec::new();
        for _ in registry.iter() {
            // Registry length is bounded by MAX_SENSORS.
            let _ = active.push(false);
        }
        Self {
            registry,
            state,
            active,
            timer: SirenTimer::new(),
            alert_message: alert_message.into(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Effects that bring the outputs in line with the restored state.
    pub fn start(&self) -> Effects {
        info!("AlarmService started: {}", self.state);
        let mut effects = vec![
            Effect::Publish(Notification::Started(self.state)),
            Effect::Actuate {
                actuator: Actuator::Indicator,
                on: self.state.status != AlarmStatus::Disarmed,
            },
        ];
        if self.state.status == AlarmStatus::Alerting {
            effects.push(Effect::Actuate {
                actuator: Actuator::Siren,
                on: true,
            });
        }
        effects
    }

    // ── Event dispatch ────────────────────────────────────────

    /// Process one event to completion.
    pub fn handle(&mut self, event: &AlarmEvent, now_ms: u64) -> Effects {
        match event {
            AlarmEvent::SensorTriggered(id) => self.sensor_triggered(id, now_ms),
            AlarmEvent::SensorCleared(id) => self.sensor_cleared(id),
            AlarmEvent::CommandReceived(payload) => match RemoteCommand::parse(payload) {
                Ok(cmd) => self.command(&cmd),
                Err(e) => {
                    warn!("Dropping command: {}", e);
                    Effects::new()
                }
            },
            AlarmEvent::SirenElapsed(token) => self.siren_elapsed(*token),
        }
    }

    // ── Sensor transitions ────────────────────────────────────

    /// A sensor reported "triggered".
    pub fn sensor_triggered(&mut self, id: &str, now_ms: u64) -> Effects {
        let Some(pos) = self.registry.position(id) else {
            warn!("Trigger from unknown sensor '{}'", id);
            return Effects::new();
        };
        self.active[pos] = true;
        let Some(sensor) = self.registry.get(id) else {
            return Effects::new();
        };
        info!("Sensor hit: {} ({})", sensor.id, sensor.label);

        let effects = vec![
            Effect::Publish(Notification::Sensor(SensorSnapshot::of(sensor, true))),
            Effect::Publish(Notification::SensorHit {
                label: sensor.label.as_str().into(),
            }),
        ];

        if !qualifies(self.state, sensor) {
            debug!("Trigger from {} does not qualify ({})", sensor.id, self.state);
            return effects;
        }

        if self
            .timer
            .start(now_ms, self.state.entry_delay_secs, &sensor.id)
            .is_none()
        {
            debug!("Siren timer already pending, {} ignored", sensor.id);
        }
        effects
    }

    /// A sensor reported "cleared".  Never cancels a pending countdown.
    pub fn sensor_cleared(&mut self, id: &str) -> Effects {
        let Some(pos) = self.registry.position(id) else {
            warn!("Clear from unknown sensor '{}'", id);
            return Effects::new();
        };
        self.active[pos] = false;
        let Some(sensor) = self.registry.get(id) else {
            return Effects::new();
        };
        info!("Sensor off: {} ({})", sensor.id, sensor.label);
        vec![Effect::Publish(Notification::Sensor(SensorSnapshot::of(
            sensor, false,
        )))]
    }

    // ── Timer ─────────────────────────────────────────────────

    /// The countdown identified by `token` reached its deadline.
    ///
    /// A token that no longer matches the pending countdown (cancelled,
    /// already fired) is ignored.
    pub fn siren_elapsed(&mut self, token: TimerToken) -> Effects {
        let Some(pending) = self.timer.take_if(token) else {
            debug!("Stale siren timer {} ignored", token.raw());
            return Effects::new();
        };
        if self.state.status != AlarmStatus::Armed {
            warn!(
                "Siren timer {} elapsed while {}, ignored",
                token.raw(),
                self.state.status.as_str()
            );
            return Effects::new();
        }

        warn!("!!Siren on!! (triggered by {})", pending.sensor_id);
        self.state.status = AlarmStatus::Alerting;
        vec![
            Effect::Persist(self.state),
            Effect::Publish(Notification::SirenOn),
            Effect::Actuate {
                actuator: Actuator::Siren,
                on: true,
            },
            Effect::Alert(self.alert_message.clone()),
        ]
    }

    /// Token of the pending countdown if it is due at `now_ms`.
    pub fn due_timer(&self, now_ms: u64) -> Option<TimerToken> {
        self.timer.due(now_ms)
    }

    /// Deadline of the pending countdown, if any.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.timer.deadline_ms()
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply a remote command: tempo, then mode, then status.  The
    /// resulting record is persisted once, and only if a field applied.
    pub fn command(&mut self, cmd: &RemoteCommand) -> Effects {
        let mut effects = Effects::new();
        if cmd.is_empty() {
            debug!("Command carries no usable field");
            return effects;
        }

        if let Some(tempo) = cmd.tempo {
            info!("Command tempo: {}s", tempo);
            self.state.entry_delay_secs = tempo;
            effects.push(Effect::Publish(Notification::DelayChanged(tempo)));
        }

        if let Some(mode) = cmd.mode {
            info!("Command mode: {}", mode.as_str());
            self.state.mode = mode;
            effects.push(Effect::Publish(Notification::ModeChanged(mode)));
        }

        if let Some(status) = cmd.status {
            info!("Command status: {}", status.as_str());
            self.state.status = status;
            effects.push(Effect::Publish(Notification::StatusChanged(status)));
            if status == AlarmStatus::Disarmed {
                self.timer.cancel();
                effects.push(Effect::Actuate {
                    actuator: Actuator::Siren,
                    on: false,
                });
                effects.push(Effect::Actuate {
                    actuator: Actuator::Indicator,
                    on: false,
                });
            } else {
                if status != AlarmStatus::Armed {
                    self.timer.cancel();
                }
                effects.push(Effect::Actuate {
                    actuator: Actuator::Indicator,
                    on: true,
                });
            }
        }

        info!("New alarm state: {}", self.state);
        effects.push(Effect::Persist(self.state));
        effects
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> AlarmState {
        self.state
    }

    pub fn timer(&self) -> &SirenTimer {
        &self.timer
    }

    /// Last known level of `id`; `None` for unknown sensors.
    pub fn is_active(&self, id: &str) -> Option<bool> {
        self.registry.position(id).map(|pos| self.active[pos])
    }
}

/// Whether a trigger from `sensor` counts as an intrusion in `state`.
fn qualifies(state: AlarmState, sensor: &Sensor) -> bool {
    if state.status != AlarmStatus::Armed {
        return false;
    }
    !(state.mode == AlarmMode::PerimeterOnly && sensor.category != SensorKind::MagneticContact)
}
