//! Siren delay timer.
//!
//! A single one-shot slot.  Starting it while a countdown is pending is
//! refused, so a later trigger never restarts (or shortens) the running
//! entry delay.  Every start hands out a fresh [`TimerToken`]; an elapse
//! is only honoured if its token still matches the pending slot, which
//! makes cancellation idempotent and turns a late elapse into a no-op.
//!
//! ```text
//!            start(token=n)               due(now) → n
//!   Idle ───────────────────▶ Pending ───────────────▶ (elapse event queued)
//!    ▲                          │                              │
//!    │        cancel()          │         take_if(n)           │
//!    └──────────────────────────┴──────────────────────────────┘
//! ```
//!
//! The timer never sleeps.  The controller asks [`SirenTimer::due`] after
//! each event and feeds the result back through the event queue.

use log::info;

use crate::registry::SensorId;

/// Identity of one countdown.  Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

impl TimerToken {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// The outstanding countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSiren {
    pub token: TimerToken,
    /// Monotonic deadline in milliseconds.
    pub deadline_ms: u64,
    /// Sensor whose trigger started the countdown.
    pub sensor_id: SensorId,
}

/// Single-slot siren timer.
#[derive(Debug, Default)]
pub struct SirenTimer {
    pending: Option<PendingSiren>,
    next_token: u64,
}

impl SirenTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a countdown of `delay_secs` from `now_ms`.  Returns `None`
    /// when a countdown is already pending.
    pub fn start(&mut self, now_ms: u64, delay_secs: u32, sensor_id: &SensorId) -> Option<TimerToken> {
        if self.pending.is_some() {
            return None;
        }
        let token = TimerToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        let deadline_ms = now_ms.saturating_add(u64::from(delay_secs) * 1000);
        info!(
            "Siren timer {} started by {} ({}s)",
            token.0, sensor_id, delay_secs
        );
        self.pending = Some(PendingSiren {
            token,
            deadline_ms,
            sensor_id: sensor_id.clone(),
        });
        Some(token)
    }

    /// Drop the pending countdown.  Returns `true` if one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(p) => {
                info!("Siren timer {} cancelled", p.token.0);
                true
            }
            None => false,
        }
    }

    /// Token of the pending countdown if its deadline has passed.
    pub fn due(&self, now_ms: u64) -> Option<TimerToken> {
        self.pending
            .as_ref()
            .filter(|p| now_ms >= p.deadline_ms)
            .map(|p| p.token)
    }

    /// Consume the pending countdown if `token` still identifies it.
    pub fn take_if(&mut self, token: TimerToken) -> Option<PendingSiren> {
        if self.pending.as_ref().is_some_and(|p| p.token == token) {
            self.pending.take()
        } else {
            None
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingSiren> {
        self.pending.as_ref()
    }

    /// Deadline of the pending countdown, if any.
    pub fn deadline_ms(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.deadline_ms)
    }
}
