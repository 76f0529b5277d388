//! SPI NOR flash block device
//!
//! Works with common serial NOR parts (Winbond W25Q, Macronix MX25, ...)
//! using the basic command set and 3-byte addressing:
//!
//! | Command | Opcode | Notes                              |
//! |---------|--------|------------------------------------|
//! | JEDEC ID| 0x9F   | capacity = 2^id[2] bytes           |
//! | Read    | 0x03   | + 24-bit address                   |
//! | WREN    | 0x06   | before every program / erase       |
//! | Program | 0x02   | + 24-bit address, within one page  |
//! | Erase   | 0x20   | + 24-bit address, 4 KiB sector     |
//! | Status  | 0x05   | bit 0 = write in progress          |
//!
//! The bus is an `embedded-hal-async` [`SpiDevice`], so chip select is
//! asserted for exactly one command per transaction. On the board this is an
//! `embedded-hal-bus` `ExclusiveDevice` over the SPI peripheral and the CS pin.

use super::{check_range, BlockDevice};
use crate::platform::{
    error::{BlockDeviceError, PlatformError, SpiError},
    traits::TimerInterface,
    Result,
};
use embedded_hal_async::spi::{Operation, SpiDevice};
use embedded_storage::nor_flash::ErrorType;
use embedded_storage_async::nor_flash::{NorFlash, ReadNorFlash};

const CMD_READ: u8 = 0x03;
const CMD_PAGE_PROGRAM: u8 = 0x02;
const CMD_SECTOR_ERASE: u8 = 0x20;
const CMD_WRITE_ENABLE: u8 = 0x06;
const CMD_READ_STATUS: u8 = 0x05;
const CMD_READ_JEDEC_ID: u8 = 0x9F;

const STATUS_WIP: u8 = 0x01;

/// Program page size in bytes
pub const PAGE_SIZE: usize = 256;

/// Sector (erase unit) size in bytes
pub const SECTOR_SIZE: usize = 4096;

/// Largest capacity reachable with 3-byte addresses
const MAX_3BYTE_SIZE: usize = 1 << 24;

/// Interval between status polls while the device is busy
const BUSY_POLL_US: u32 = 100;

/// Longest wait for one program or erase (sector erase max is ~400 ms)
const BUSY_TIMEOUT_US: u64 = 2_000_000;

/// SPI NOR flash on an SPI device
pub struct SpiFlashBlockDevice<SPI: SpiDevice, T: TimerInterface> {
    spi: SPI,
    timer: T,
    size: usize,
    jedec_id: [u8; 3],
    initialized: bool,
}

impl<SPI: SpiDevice, T: TimerInterface> SpiFlashBlockDevice<SPI, T> {
    /// Create a new driver; call [`BlockDevice::init`] before use
    pub fn new(spi: SPI, timer: T) -> Self {
        Self {
            spi,
            timer,
            size: 0,
            jedec_id: [0; 3],
            initialized: false,
        }
    }

    /// JEDEC manufacturer, memory type and capacity bytes read by `init`
    pub fn jedec_id(&self) -> [u8; 3] {
        self.jedec_id
    }

    /// Get mutable reference to the SPI device
    pub fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }

    /// Run one command with chip select asserted
    async fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<()> {
        self.spi
            .transaction(operations)
            .await
            .map_err(map_spi_error)
    }

    fn command(opcode: u8, addr: u32) -> [u8; 4] {
        [opcode, (addr >> 16) as u8, (addr >> 8) as u8, addr as u8]
    }

    async fn read_jedec_id(&mut self) -> Result<[u8; 3]> {
        let mut id = [0u8; 3];
        self.transaction(&mut [
            Operation::Write(&[CMD_READ_JEDEC_ID]),
            Operation::Read(&mut id),
        ])
        .await?;
        Ok(id)
    }

    async fn read_status(&mut self) -> Result<u8> {
        let mut status = [0u8; 1];
        self.transaction(&mut [
            Operation::Write(&[CMD_READ_STATUS]),
            Operation::Read(&mut status),
        ])
        .await?;
        Ok(status[0])
    }

    async fn write_enable(&mut self) -> Result<()> {
        self.transaction(&mut [Operation::Write(&[CMD_WRITE_ENABLE])])
            .await
    }

    async fn wait_ready(&mut self) -> Result<()> {
        let deadline = self.timer.now_us().saturating_add(BUSY_TIMEOUT_US);
        loop {
            if self.read_status().await? & STATUS_WIP == 0 {
                return Ok(());
            }
            if self.timer.now_us() >= deadline {
                crate::log_warn!("SPIF: device busy for more than {} us", BUSY_TIMEOUT_US);
                return Err(BlockDeviceError::Timeout.into());
            }
            self.timer.delay_us(BUSY_POLL_US).await?;
        }
    }

    fn check(&self, unit: usize, addr: u32, len: usize) -> Result<()> {
        if !self.initialized {
            return Err(BlockDeviceError::NotInitialized.into());
        }
        check_range(self.size, unit, addr, len)
    }
}

fn map_spi_error<E: embedded_hal::spi::Error>(error: E) -> PlatformError {
    use embedded_hal::spi::ErrorKind;

    match error.kind() {
        ErrorKind::Overrun => PlatformError::Spi(SpiError::Overrun),
        ErrorKind::ModeFault => PlatformError::Spi(SpiError::ModeFault),
        _ => PlatformError::Spi(SpiError::TransferFailed),
    }
}

impl<SPI: SpiDevice, T: TimerInterface> ErrorType for SpiFlashBlockDevice<SPI, T> {
    type Error = PlatformError;
}

impl<SPI: SpiDevice, T: TimerInterface> ReadNorFlash for SpiFlashBlockDevice<SPI, T> {
    const READ_SIZE: usize = 1;

    async fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<()> {
        self.check(Self::READ_SIZE, offset, bytes.len())?;
        if bytes.is_empty() {
            return Ok(());
        }
        let header = Self::command(CMD_READ, offset);
        self.transaction(&mut [Operation::Write(&header), Operation::Read(bytes)])
            .await
    }

    fn capacity(&self) -> usize {
        self.size
    }
}

impl<SPI: SpiDevice, T: TimerInterface> NorFlash for SpiFlashBlockDevice<SPI, T> {
    const WRITE_SIZE: usize = 1;
    const ERASE_SIZE: usize = SECTOR_SIZE;

    async fn erase(&mut self, from: u32, to: u32) -> Result<()> {
        let len = to.checked_sub(from).ok_or(BlockDeviceError::OutOfBounds)?;
        self.check(Self::ERASE_SIZE, from, len as usize)?;

        let mut sector = from;
        while sector < to {
            let header = Self::command(CMD_SECTOR_ERASE, sector);
            self.write_enable().await?;
            self.transaction(&mut [Operation::Write(&header)]).await?;
            self.wait_ready().await?;
            sector += SECTOR_SIZE as u32;
        }
        Ok(())
    }

    async fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<()> {
        self.check(Self::WRITE_SIZE, offset, bytes.len())?;

        let mut addr = offset;
        let mut data = bytes;
        while !data.is_empty() {
            let room = PAGE_SIZE - addr as usize % PAGE_SIZE;
            let (chunk, rest) = data.split_at(room.min(data.len()));
            let header = Self::command(CMD_PAGE_PROGRAM, addr);

            self.write_enable().await?;
            self.transaction(&mut [Operation::Write(&header), Operation::Write(chunk)])
                .await?;
            self.wait_ready().await?;

            addr += chunk.len() as u32;
            data = rest;
        }
        Ok(())
    }
}

impl<SPI: SpiDevice, T: TimerInterface> BlockDevice for SpiFlashBlockDevice<SPI, T> {
    async fn init(&mut self) -> Result<()> {
        let id = self.read_jedec_id().await?;
        self.jedec_id = id;
        if id[0] == 0x00 || id[0] == 0xFF || !(8..=31).contains(&id[2]) {
            crate::log_warn!(
                "SPIF: unknown device id {:x} {:x} {:x}",
                id[0],
                id[1],
                id[2]
            );
            return Err(BlockDeviceError::UnknownDevice.into());
        }

        let capacity = 1usize << id[2];
        if capacity > MAX_3BYTE_SIZE {
            crate::log_warn!(
                "SPIF: {} byte device, using the first {} bytes",
                capacity,
                MAX_3BYTE_SIZE
            );
        }
        self.size = capacity.min(MAX_3BYTE_SIZE);
        self.initialized = true;

        crate::log_debug!(
            "SPIF: JEDEC {:x} {:x} {:x}, {} bytes",
            id[0],
            id[1],
            id[2],
            self.size
        );
        Ok(())
    }

    async fn deinit(&mut self) -> Result<()> {
        self.initialized = false;
        Ok(())
    }
}
