//! Platform abstraction layer
//!
//! This module provides hardware abstraction for the GNSS/flash demo board.
//! All target-specific code is isolated in `rp2350`; host tests run against `mock`.

pub mod error;
pub mod time;
pub mod traits;

// Platform implementations (feature-gated)
#[cfg(feature = "pico2_w")]
pub mod rp2350;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{PlatformError, Result};
pub use traits::{GpioInterface, I2cInterface, TimerInterface, UartInterface};
