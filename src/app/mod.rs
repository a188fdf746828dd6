//! Application core — alarm rules, zero I/O.
//!
//! The [`service`] decides, the [`dispatcher`] acts.  All interaction with
//! the outside world happens through the **port traits** defined in
//! [`ports`], keeping the state machine testable without a broker, a
//! disk or real pins.

pub mod commands;
pub mod dispatcher;
pub mod events;
pub mod ports;
pub mod service;
