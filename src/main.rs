//! Home alarm controller — main entry point.
//!
//! Hexagonal architecture with a single serialized event loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SensorBank      Console        PinActuators    KvStore        │
//! │  (debounced in)  (stdin bridge) (ActuatorPort)  (StatePort)    │
//! │  LogPublisher    LogAlert       HostClock                      │
//! │  (PublishPort)   (AlertPort)                                   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │          AlarmService (pure logic) → Dispatcher        │    │
//! │  │  state · observations · siren timer                    │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Controller (FIFO queue) · INBOUND channel (producer threads)  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `homealarm [config.json]`.  Log level follows `RUST_LOG`.

use std::time::Duration;

use anyhow::{Context, Result};
use log::info;

use homealarm::adapters::console::{self, ConsolePins};
use homealarm::adapters::hardware::PinActuators;
use homealarm::adapters::log_sink::{LogAlert, LogPublisher};
use homealarm::adapters::store::KvStore;
use homealarm::adapters::time::HostClock;
use homealarm::app::dispatcher::Dispatcher;
use homealarm::app::service::AlarmService;
use homealarm::channels;
use homealarm::config::SystemConfig;
use homealarm::controller::Controller;
use homealarm::drivers::contact::SensorBank;
use homealarm::drivers::sim_pin::SimPin;
use homealarm::error::Error;
use homealarm::registry::SensorRegistry;
use homealarm::state::StateStore;

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("╔══════════════════════════════════════╗");
    info!("║  HomeAlarm v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = match std::env::args().nth(1) {
        Some(path) => SystemConfig::load_from_path(&path)
            .map_err(Error::from)
            .with_context(|| format!("loading config from {path}"))?,
        None => {
            info!("No config file given, using defaults");
            SystemConfig::default()
        }
    };

    // ── 3. Sensor registry ────────────────────────────────────
    let registry = SensorRegistry::new(&config.sensors)
        .map_err(Error::from)
        .context("building sensor registry")?;
    for sensor in registry.iter() {
        info!(
            "Sensor {} on channel {}: {} ({})",
            sensor.id,
            sensor.index,
            sensor.label,
            sensor.category.as_str()
        );
    }

    // ── 4. Persisted state ────────────────────────────────────
    let kv = match &config.state_dir {
        Some(dir) => KvStore::open(dir)
            .map_err(Error::from)
            .with_context(|| format!("opening state directory {dir}"))?,
        None => KvStore::in_memory(),
    };
    let mut store = StateStore::new(kv);
    let state = store.load();

    // ── 5. Pins ───────────────────────────────────────────────
    // Inputs idle at their inactive level.
    let idle_high = config.inputs_active_low;
    let mut pins = ConsolePins::default();
    let mut bank = SensorBank::new(&registry, config.inputs_active_low, config.debounce_ms, |index| {
        let pin = SimPin::new(idle_high);
        pins.inputs.insert(index, pin.handle());
        pin
    });
    let siren = SimPin::new(false);
    let indicator = SimPin::new(false);
    pins.outputs.insert(config.siren_pin, siren.handle());
    pins.outputs.insert(config.indicator_pin, indicator.handle());
    info!(
        "Outputs: siren on channel {}, indicator on channel {}",
        config.siren_pin, config.indicator_pin
    );
    let actuators = PinActuators::new(siren, indicator);

    // ── 6. Core ───────────────────────────────────────────────
    let service = AlarmService::new(registry, state, config.alert_message.clone());
    let dispatcher = Dispatcher::new(
        LogPublisher::new(),
        store,
        actuators,
        LogAlert::new(),
        config.topics.clone(),
    );
    let mut controller = Controller::new(service, dispatcher);
    controller.start();

    // ── 7. Inbound transport ──────────────────────────────────
    console::spawn(pins).context("spawning console reader")?;
    info!("Listening for commands on '{}' (console)", config.topics.commands);

    // ── 8. Event loop ─────────────────────────────────────────
    let clock = HostClock::new();
    let poll_ms = u64::from(config.poll_interval_ms);

    loop {
        let now_ms = clock.now_ms();

        for event in bank.poll(now_ms) {
            controller.submit(event);
        }
        while let Some(event) = channels::try_recv() {
            controller.submit(event);
        }
        controller.run_pending(now_ms);

        // Sleep until the next poll, the siren deadline or an inbound
        // event, whichever comes first.
        let wait_ms = controller
            .next_deadline_ms()
            .map_or(poll_ms, |deadline| deadline.saturating_sub(now_ms).min(poll_ms));
        if let Some(event) = channels::recv_timeout(Duration::from_millis(wait_ms)) {
            controller.submit(event);
        }
    }
}
