//! Block storage devices
//!
//! Storage is exposed through `embedded-storage-async` [`NorFlash`]: a flat
//! byte address space with three operation granularities, the read unit
//! (`READ_SIZE`), the program unit (`WRITE_SIZE`) and the erase unit
//! (`ERASE_SIZE`). Every offset and length passed to an operation must be a
//! multiple of the respective unit and lie inside `capacity()`.
//!
//! [`BlockDevice`] adds the bring-up the NOR traits leave out, plus the
//! geometry queries under the names the exerciser reports them by:
//!
//! | Operation            | Call                                  |
//! |----------------------|---------------------------------------|
//! | init / deinit        | [`BlockDevice::init`], [`BlockDevice::deinit`] |
//! | read(buf, addr)      | `ReadNorFlash::read(addr, buf)`       |
//! | program(buf, addr)   | `NorFlash::write(addr, buf)`          |
//! | erase(addr, len)     | `NorFlash::erase(addr, addr + len)`   |

pub mod spi_flash;

pub use spi_flash::SpiFlashBlockDevice;

use crate::platform::{error::BlockDeviceError, PlatformError, Result};
use embedded_storage_async::nor_flash::NorFlash;

/// NOR flash with explicit bring-up
///
/// Programming only clears bits; a region must be erased before it is
/// programmed with new content.
#[allow(async_fn_in_trait)]
pub trait BlockDevice: NorFlash<Error = PlatformError> {
    /// Bring up the device and discover its geometry
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::BlockDevice(BlockDeviceError::UnknownDevice)` if
    /// the device does not identify itself, or the bus error.
    async fn init(&mut self) -> Result<()>;

    /// Release the device; operations fail until the next `init`
    ///
    /// # Errors
    ///
    /// Returns the bus error if the device cannot be released.
    async fn deinit(&mut self) -> Result<()>;

    /// Total device size in bytes (0 before `init`)
    fn size(&self) -> usize {
        self.capacity()
    }

    /// Read unit in bytes
    fn read_size(&self) -> usize {
        Self::READ_SIZE
    }

    /// Program unit in bytes
    fn program_size(&self) -> usize {
        Self::WRITE_SIZE
    }

    /// Erase unit in bytes
    fn erase_size(&self) -> usize {
        Self::ERASE_SIZE
    }

    /// Whether `addr`/`len` form a valid read
    fn is_valid_read(&self, addr: u32, len: usize) -> bool {
        check_range(self.size(), self.read_size(), addr, len).is_ok()
    }

    /// Whether `addr`/`len` form a valid program
    fn is_valid_program(&self, addr: u32, len: usize) -> bool {
        check_range(self.size(), self.program_size(), addr, len).is_ok()
    }

    /// Whether `addr`/`len` form a valid erase
    fn is_valid_erase(&self, addr: u32, len: usize) -> bool {
        check_range(self.size(), self.erase_size(), addr, len).is_ok()
    }
}

/// Check that `addr..addr + len` lies in a device of `size` bytes and is
/// aligned to `unit`
pub fn check_range(size: usize, unit: usize, addr: u32, len: usize) -> Result<()> {
    let end = (addr as usize)
        .checked_add(len)
        .ok_or(BlockDeviceError::OutOfBounds)?;
    if end > size {
        return Err(BlockDeviceError::OutOfBounds.into());
    }
    if unit == 0 || addr as usize % unit != 0 || len % unit != 0 {
        return Err(BlockDeviceError::Unaligned.into());
    }
    Ok(())
}
