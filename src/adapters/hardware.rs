//! Hardware adapter — bridges output pins to the [`ActuatorPort`].
//!
//! Generic over `embedded-hal` output pins, so the same adapter drives a
//! GPIO expander on the target and [`SimPin`](crate::drivers::sim_pin::SimPin)s
//! on the host.  Outputs are active-high.

use embedded_hal::digital::OutputPin;
use log::{debug, warn};

use crate::app::ports::{ActuatorError, ActuatorPort};

/// Siren and indicator outputs behind [`ActuatorPort`].
pub struct PinActuators<S, I>
where
    S: OutputPin,
    I: OutputPin,
{
    siren: S,
    indicator: I,
    siren_on: bool,
    indicator_on: bool,
}

impl<S, I> PinActuators<S, I>
where
    S: OutputPin,
    I: OutputPin,
{
    pub fn new(siren: S, indicator: I) -> Self {
        Self {
            siren,
            indicator,
            siren_on: false,
            indicator_on: false,
        }
    }

    pub fn siren_on(&self) -> bool {
        self.siren_on
    }

    pub fn indicator_on(&self) -> bool {
        self.indicator_on
    }
}

fn drive<P: OutputPin>(pin: &mut P, on: bool) -> Result<(), ActuatorError> {
    let result = if on { pin.set_high() } else { pin.set_low() };
    result.map_err(|e| {
        warn!("Output pin write failed: {:?}", e);
        ActuatorError::GpioWriteFailed
    })
}

impl<S, I> ActuatorPort for PinActuators<S, I>
where
    S: OutputPin,
    I: OutputPin,
{
    fn set_siren(&mut self, on: bool) -> Result<(), ActuatorError> {
        drive(&mut self.siren, on)?;
        debug!("Siren {}", if on { "ON" } else { "OFF" });
        self.siren_on = on;
        Ok(())
    }

    fn set_indicator(&mut self, on: bool) -> Result<(), ActuatorError> {
        drive(&mut self.indicator, on)?;
        debug!("Indicator {}", if on { "ON" } else { "OFF" });
        self.indicator_on = on;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::sim_pin::SimPin;

    #[test]
    fn drives_pins_high_and_low() {
        let siren = SimPin::new(false);
        let indicator = SimPin::new(false);
        let (siren_line, indicator_line) = (siren.handle(), indicator.handle());
        let mut outs = PinActuators::new(siren, indicator);

        outs.set_siren(true).unwrap();
        outs.set_indicator(true).unwrap();
        assert!(siren_line.level());
        assert!(indicator_line.level());
        assert!(outs.siren_on());

        outs.set_siren(false).unwrap();
        assert!(!siren_line.level());
        assert!(!outs.siren_on());
        assert!(outs.indicator_on());
    }
}
