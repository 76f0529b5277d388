//! Platform abstraction traits
//!
//! This module defines the peripheral traits the board backends must provide.
//! The GNSS transports and the LEDs are generic over these traits; the SPI
//! flash goes through `embedded-hal` `SpiDevice` instead, so chip select can
//! be handled by `embedded-hal-bus`.

pub mod gpio;
pub mod i2c;
pub mod timer;
pub mod uart;

// Re-export trait interfaces
pub use gpio::{GpioInterface, GpioMode};
pub use i2c::{I2cConfig, I2cInterface};
pub use timer::TimerInterface;
pub use uart::{UartConfig, UartInterface, UartParity, UartStopBits};
