//! Input drivers and simulated pins.

pub mod contact;
pub mod sim_pin;
