//! RP2350 platform implementation for Raspberry Pi Pico 2 W
//!
//! Concrete implementations of the platform traits on top of the async
//! `embassy-rp` drivers. Peripherals are configured by the caller (pins,
//! bus speed, interrupt bindings) and handed over already constructed.
//!
//! The SPI flash does not go through a wrapper here: the async
//! `embassy_rp::spi::Spi` is an `embedded-hal-async` `SpiBus` and is paired
//! with its chip-select `Output` by `embedded_hal_bus::spi::ExclusiveDevice`.
//!
//! # Feature Gate
//!
//! This module is only available when the `pico2_w` feature is enabled:
//!
//! ```toml
//! [dependencies]
//! gnss_spif_demo = { version = "0.1", features = ["pico2_w"] }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use embassy_rp::gpio::{Level, Output};
//! use embassy_rp::spi::Spi;
//! use embassy_time::Delay;
//! use embedded_hal_bus::spi::ExclusiveDevice;
//! use gnss_spif_demo::platform::rp2350::Rp2350Timer;
//!
//! let p = embassy_rp::init(Default::default());
//! let spi = Spi::new(
//!     p.SPI0, p.PIN_18, p.PIN_19, p.PIN_16, p.DMA_CH0, p.DMA_CH1, spi_config,
//! );
//! let cs = Output::new(p.PIN_17, Level::High);
//! let device = ExclusiveDevice::new(spi, cs, Delay).unwrap_or_else(|e| match e {});
//! let flash = SpiFlashBlockDevice::new(device, Rp2350Timer::new());
//! ```

mod gpio;
mod i2c;
mod timer;

pub use gpio::Rp2350Gpio;
pub use i2c::Rp2350I2c;
pub use timer::Rp2350Timer;
