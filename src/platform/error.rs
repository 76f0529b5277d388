//! Platform error types
//!
//! This module defines error types for platform and device operations.

use core::fmt;
use embedded_storage::nor_flash::{NorFlashError, NorFlashErrorKind};

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
///
/// All platform implementations map their HAL-specific errors to these variants.
/// Device drivers built on the platform traits add their own sub-enums.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlatformError {
    /// UART operation failed
    Uart(UartError),
    /// I2C operation failed
    I2c(I2cError),
    /// SPI operation failed
    Spi(SpiError),
    /// GPIO operation failed
    Gpio(GpioError),
    /// Timer operation failed
    Timer(TimerError),
    /// GNSS receiver operation failed
    Gnss(GnssError),
    /// Block device operation failed
    BlockDevice(BlockDeviceError),
    /// Platform initialization failed
    InitializationFailed,
    /// Invalid configuration provided
    InvalidConfig,
    /// Resource not available
    ResourceUnavailable,
}

/// UART-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartError {
    /// Write operation failed
    WriteFailed,
    /// Read operation failed
    ReadFailed,
    /// Timeout occurred
    Timeout,
    /// Invalid baud rate
    InvalidBaudRate,
    /// Framing error
    FramingError,
    /// Parity error
    ParityError,
    /// Overrun error
    Overrun,
}

/// I2C-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cError {
    /// Bus error occurred
    BusError,
    /// No acknowledgment received
    Nack,
    /// Arbitration lost
    ArbitrationLost,
    /// Timeout occurred
    Timeout,
    /// Invalid address
    InvalidAddress,
}

/// SPI-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiError {
    /// Transfer failed
    TransferFailed,
    /// Timeout occurred
    Timeout,
    /// Mode fault
    ModeFault,
    /// Overrun error
    Overrun,
}

/// GPIO-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// Invalid pin number
    InvalidPin,
    /// Invalid mode for operation
    InvalidMode,
    /// Pin already in use
    PinInUse,
    /// HAL reported a pin failure
    HardwareError,
}

/// Timer-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// Timer overflow
    Overflow,
    /// Invalid duration
    InvalidDuration,
}

/// GNSS receiver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GnssError {
    /// Receiver produced no data after the wake-up sequence
    NotResponding,
    /// Receiver has not been initialized
    NotInitialized,
}

/// Block device errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlockDeviceError {
    /// Device used before `init`
    NotInitialized,
    /// JEDEC ID not recognized (bus floating or unsupported part)
    UnknownDevice,
    /// Address or length outside the device
    OutOfBounds,
    /// Address or length not a multiple of the operation unit
    Unaligned,
    /// Write-in-progress bit did not clear in time
    Timeout,
}

impl From<GnssError> for PlatformError {
    fn from(e: GnssError) -> Self {
        PlatformError::Gnss(e)
    }
}

impl From<BlockDeviceError> for PlatformError {
    fn from(e: BlockDeviceError) -> Self {
        PlatformError::BlockDevice(e)
    }
}

impl NorFlashError for PlatformError {
    fn kind(&self) -> NorFlashErrorKind {
        match self {
            PlatformError::BlockDevice(BlockDeviceError::Unaligned) => NorFlashErrorKind::NotAligned,
            PlatformError::BlockDevice(BlockDeviceError::OutOfBounds) => {
                NorFlashErrorKind::OutOfBounds
            }
            _ => NorFlashErrorKind::Other,
        }
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Uart(e) => write!(f, "UART error: {:?}", e),
            PlatformError::I2c(e) => write!(f, "I2C error: {:?}", e),
            PlatformError::Spi(e) => write!(f, "SPI error: {:?}", e),
            PlatformError::Gpio(e) => write!(f, "GPIO error: {:?}", e),
            PlatformError::Timer(e) => write!(f, "Timer error: {:?}", e),
            PlatformError::Gnss(e) => write!(f, "GNSS error: {:?}", e),
            PlatformError::BlockDevice(e) => write!(f, "Block device error: {:?}", e),
            PlatformError::InitializationFailed => write!(f, "Platform initialization failed"),
            PlatformError::InvalidConfig => write!(f, "Invalid configuration"),
            PlatformError::ResourceUnavailable => write!(f, "Resource not available"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_error_conversion() {
        let e: PlatformError = BlockDeviceError::Unaligned.into();
        assert_eq!(e, PlatformError::BlockDevice(BlockDeviceError::Unaligned));

        let e: PlatformError = GnssError::NotResponding.into();
        assert_eq!(e, PlatformError::Gnss(GnssError::NotResponding));
    }

    #[test]
    fn test_nor_flash_error_kind() {
        assert_eq!(
            PlatformError::BlockDevice(BlockDeviceError::Unaligned).kind(),
            NorFlashErrorKind::NotAligned
        );
        assert_eq!(
            PlatformError::BlockDevice(BlockDeviceError::OutOfBounds).kind(),
            NorFlashErrorKind::OutOfBounds
        );
        assert_eq!(
            PlatformError::Spi(SpiError::TransferFailed).kind(),
            NorFlashErrorKind::Other
        );
    }

    #[test]
    fn test_display() {
        let e = PlatformError::Gnss(GnssError::NotResponding);
        assert_eq!(format!("{}", e), "GNSS error: NotResponding");
    }
}
