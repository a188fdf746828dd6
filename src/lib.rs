//! Home intrusion-alarm controller library.
//!
//! Exposes the alarm core, its adapters and the input drivers for the
//! binary and for integration testing.  Everything runs on the host;
//! real hardware plugs in through the `embedded-hal` pin traits and the
//! port traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod app;
pub mod channels;
pub mod config;
pub mod controller;
pub mod events;
pub mod registry;
pub mod state;
pub mod timer;

pub mod error;

pub mod adapters;
pub mod drivers;
