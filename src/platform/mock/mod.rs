//! Mock platform implementation for testing
//!
//! In-memory implementations of the platform traits so the reporter, the
//! exerciser and the device drivers can be exercised without hardware.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled
//!
//! # Example
//!
//! ```ignore
//! use gnss_spif_demo::platform::mock::{MockSpiNor, MockTimer};
//! use gnss_spif_demo::devices::storage::{BlockDevice, SpiFlashBlockDevice};
//!
//! let chip = MockSpiNor::new();
//! let mut flash = SpiFlashBlockDevice::new(chip.device(), MockTimer::new());
//! flash.init().await.unwrap();
//! assert_eq!(flash.size(), 8 * 1024 * 1024);
//! ```

#![cfg(any(test, feature = "mock"))]

mod gpio;
mod i2c;
mod spi_nor;
mod timer;
mod uart;

pub use gpio::MockGpio;
pub use i2c::{I2cTransaction, MockI2c};
pub use spi_nor::{MockNorChipSelect, MockNorDevice, MockNorSpi, MockSpiNor};
pub use timer::MockTimer;
pub use uart::MockUart;
