//! RP2350 GPIO implementation
//!
//! Push-pull outputs only: the board uses GPIO for the status LEDs and the
//! flash chip select.

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::{GpioInterface, GpioMode},
    Result,
};
use embassy_rp::gpio::Output;

/// RP2350 output pin
///
/// Wraps an `embassy-rp` output to implement the `GpioInterface` trait.
pub struct Rp2350Gpio<'d> {
    pin: Output<'d>,
}

impl<'d> Rp2350Gpio<'d> {
    /// Wrap an output pin; its current level is kept
    pub fn new(pin: Output<'d>) -> Self {
        Self { pin }
    }
}

impl GpioInterface for Rp2350Gpio<'_> {
    fn set_high(&mut self) -> Result<()> {
        self.pin.set_high();
        Ok(())
    }

    fn set_low(&mut self) -> Result<()> {
        self.pin.set_low();
        Ok(())
    }

    fn toggle(&mut self) -> Result<()> {
        self.pin.toggle();
        Ok(())
    }

    fn read(&self) -> bool {
        self.pin.is_set_high()
    }

    fn set_mode(&mut self, mode: GpioMode) -> Result<()> {
        // Input modes would need the pin rebuilt as `Input`
        if mode.is_output() {
            Ok(())
        } else {
            Err(PlatformError::Gpio(GpioError::InvalidMode))
        }
    }

    fn mode(&self) -> GpioMode {
        GpioMode::OutputPushPull
    }
}
