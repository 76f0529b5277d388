//! RP2350 I2C implementation
//!
//! Async I2C master on `embassy-rp`. A transfer in flight parks the task on
//! the I2C interrupt, so the other task keeps running.
//!
//! # Example
//!
//! ```ignore
//! use embassy_rp::bind_interrupts;
//! use embassy_rp::i2c::{Config, I2c, InterruptHandler};
//! use embassy_rp::peripherals::I2C0;
//! use gnss_spif_demo::platform::rp2350::Rp2350I2c;
//!
//! bind_interrupts!(struct Irqs {
//!     I2C0_IRQ => InterruptHandler<I2C0>;
//! });
//!
//! let mut config = Config::default();
//! config.frequency = 100_000;
//! let i2c = Rp2350I2c::new(I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, config), 100_000);
//! ```

use crate::platform::{
    error::{I2cError, PlatformError},
    traits::I2cInterface,
    Result,
};
use embassy_rp::i2c::{Async, I2c as EmbassyI2c, Instance};
use embedded_hal_async::i2c::I2c as AsyncI2cTrait;

/// RP2350 I2C implementation using Embassy async I2C
///
/// # Type Parameters
///
/// * `T` - I2C peripheral instance (I2C0 or I2C1)
pub struct Rp2350I2c<'d, T: Instance> {
    i2c: EmbassyI2c<'d, T, Async>,
    frequency: u32,
}

impl<'d, T: Instance> Rp2350I2c<'d, T> {
    /// Wrap a configured bus
    ///
    /// `frequency` is the bus speed the peripheral was created with.
    pub fn new(i2c: EmbassyI2c<'d, T, Async>, frequency: u32) -> Self {
        Self { i2c, frequency }
    }

    /// Bus speed in Hz
    pub fn frequency(&self) -> u32 {
        self.frequency
    }
}

impl<T: Instance> I2cInterface for Rp2350I2c<'_, T> {
    async fn write(&mut self, addr: u8, data: &[u8]) -> Result<()> {
        self.i2c.write(addr, data).await.map_err(map_embassy_error)
    }

    async fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()> {
        self.i2c.read(addr, buffer).await.map_err(map_embassy_error)
    }

    async fn write_read(
        &mut self,
        addr: u8,
        write_data: &[u8],
        read_buffer: &mut [u8],
    ) -> Result<()> {
        self.i2c
            .write_read(addr, write_data, read_buffer)
            .await
            .map_err(map_embassy_error)
    }

    fn set_frequency(&mut self, frequency: u32) -> Result<()> {
        // Bus speed is fixed when the peripheral is created
        if frequency == self.frequency {
            Ok(())
        } else {
            Err(PlatformError::InvalidConfig)
        }
    }
}

/// Map Embassy I2C errors to platform I2C errors
#[allow(deprecated)]
fn map_embassy_error(error: embassy_rp::i2c::Error) -> PlatformError {
    use embassy_rp::i2c::{AbortReason, Error};

    match error {
        Error::Abort(AbortReason::NoAcknowledge) => PlatformError::I2c(I2cError::Nack),
        Error::Abort(AbortReason::ArbitrationLoss) => {
            PlatformError::I2c(I2cError::ArbitrationLost)
        }
        Error::AddressOutOfRange(_) | Error::AddressReserved(_) => {
            PlatformError::I2c(I2cError::InvalidAddress)
        }
        _ => PlatformError::I2c(I2cError::BusError),
    }
}
