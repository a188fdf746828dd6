//! Inbound inter-thread channel.
//!
//! Uses an `embassy-sync` bounded channel to bridge producer threads (the
//! console reader, an external sensor bridge) with the controller loop.
//! Producers never block: a full channel drops the event with a warning.
//!
//! ```text
//! ┌──────────────┐  AlarmEvent  ┌──────────────┐
//! │  Producers   │─────────────▶│  Controller  │
//! │  (threads)   │   INBOUND    │  loop (sync) │
//! └──────────────┘              └──────────────┘
//! ```

use core::time::Duration;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
// Links the std time driver that async-io-mini's timers run on.
use embassy_time as _;
use futures_lite::future;
use log::warn;

use crate::events::AlarmEvent;

/// Channel depth for inbound events.
const INBOUND_DEPTH: usize = 16;

/// Inbound event channel: producers → controller loop.
pub static INBOUND: Channel<CriticalSectionRawMutex, AlarmEvent, INBOUND_DEPTH> = Channel::new();

/// Hand an event to the controller loop.  Returns `false` if the channel
/// was full and the event was dropped.
pub fn submit(event: AlarmEvent) -> bool {
    match INBOUND.try_send(event) {
        Ok(()) => true,
        Err(_) => {
            warn!("Inbound channel full, dropping event");
            false
        }
    }
}

/// Take an inbound event without waiting.
pub fn try_recv() -> Option<AlarmEvent> {
    INBOUND.try_receive().ok()
}

/// Wait up to `timeout` for an inbound event.
///
/// The controller thread parks until either a producer sends or the
/// timer fires.  The timer is driven by the `embassy-time` std driver,
/// which wakes it from its own alarm thread.
pub fn recv_timeout(timeout: Duration) -> Option<AlarmEvent> {
    future::block_on(future::or(
        async { Some(INBOUND.receive().await) },
        async {
            async_io_mini::Timer::after(timeout).await;
            None
        },
    ))
}

// ── Tests ────────────────────────────────────────────────────
