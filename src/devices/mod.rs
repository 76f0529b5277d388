//! Device drivers
//!
//! Drivers are generic over the platform traits so the same code runs on the
//! RP2350 and against the host mocks.
//!
//! ## Modules
//!
//! - `gnss`: u-blox receiver message source (I2C and UART transports)
//! - `storage`: block device trait and SPI NOR flash driver
//! - `led`: RGB status LED

pub mod gnss;
pub mod led;
pub mod storage;
