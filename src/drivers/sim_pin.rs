//! Simulated digital pin.
//!
//! A [`SimPin`] is a shared level cell that implements both
//! `embedded-hal` [`InputPin`] and [`OutputPin`].  The matching
//! [`SimPinHandle`] lets another thread (the console, a test) read or
//! force the level.

use core::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

/// Shared view of a [`SimPin`]'s level.
#[derive(Debug, Clone)]
pub struct SimPinHandle(Arc<AtomicBool>);

impl SimPinHandle {
    /// Current level (`true` = high).
    pub fn level(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Force the level, as an external circuit would.
    pub fn set_level(&self, high: bool) {
        self.0.store(high, Ordering::Release);
    }
}

#[derive(Debug)]
pub struct SimPin {
    level: Arc<AtomicBool>,
}

impl SimPin {
    pub fn new(high: bool) -> Self {
        Self {
            level: Arc::new(AtomicBool::new(high)),
        }
    }

    pub fn handle(&self) -> SimPinHandle {
        SimPinHandle(Arc::clone(&self.level))
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level.load(Ordering::Acquire))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level.load(Ordering::Acquire))
    }
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.level.store(false, Ordering::Release);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.level.store(true, Ordering::Release);
        Ok(())
    }
}
