//! Stateful SPI NOR flash simulator
//!
//! A shared chip model split into an `embedded-hal` SPI bus half and a
//! chip-select pin half. [`MockSpiNor::device`] joins them with
//! `embedded-hal-bus` `ExclusiveDevice`, the same way the firmware joins the
//! RP2350 bus and CS pin, while the test keeps a handle to inspect memory.
//!
//! Supported commands: 0x9F (JEDEC ID), 0x05 (read status), 0x03 (read),
//! 0x06 / 0x04 (write enable / disable), 0x02 (page program) and 0x20
//! (4 KiB sector erase). Commands execute when CS is released.

use core::convert::Infallible;
use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin};
use embedded_hal::spi::{ErrorKind, ErrorType};
use embedded_hal_async::spi::SpiBus;
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use std::{cell::RefCell, rc::Rc, vec::Vec};

/// `SpiDevice` wired to a [`MockSpiNor`]
pub type MockNorDevice = ExclusiveDevice<MockNorSpi, MockNorChipSelect, NoDelay>;

const PAGE_SIZE: usize = 256;
const SECTOR_SIZE: usize = 4096;

const STATUS_WIP: u8 = 0x01;
const STATUS_WEL: u8 = 0x02;

#[derive(Debug)]
struct NorChip {
    memory: Vec<u8>,
    jedec: [u8; 3],
    erase_counts: Vec<u32>,
    executed: Vec<u8>,
    write_enabled: bool,
    busy_remaining: u32,
    busy_polls: u32,
    stuck_busy: bool,
    fail_transfers: bool,
    selected: bool,
    command: Vec<u8>,
    out_pos: usize,
}

impl NorChip {
    fn new(jedec: [u8; 3]) -> Self {
        let size = if jedec[2] < 32 { 1usize << jedec[2] } else { 0 };
        Self {
            memory: vec![0xFF; size],
            jedec,
            erase_counts: vec![0; size.div_ceil(SECTOR_SIZE)],
            executed: Vec::new(),
            write_enabled: false,
            busy_remaining: 0,
            busy_polls: 0,
            stuck_busy: false,
            fail_transfers: false,
            selected: false,
            command: Vec::new(),
            out_pos: 0,
        }
    }

    fn busy(&self) -> bool {
        self.stuck_busy || self.busy_remaining > 0
    }

    fn status(&self) -> u8 {
        let mut status = 0;
        if self.busy() {
            status |= STATUS_WIP;
        }
        if self.write_enabled {
            status |= STATUS_WEL;
        }
        status
    }

    /// Bytes the opcode consumes before the chip starts driving MISO
    fn header_len(&self) -> usize {
        match self.command.first() {
            Some(0x9F) | Some(0x05) => 1,
            Some(0x03) => 4,
            _ => usize::MAX,
        }
    }

    fn address(&self) -> usize {
        let addr = (usize::from(self.command[1]) << 16)
            | (usize::from(self.command[2]) << 8)
            | usize::from(self.command[3]);
        if self.memory.is_empty() {
            0
        } else {
            addr % self.memory.len()
        }
    }

    fn respond(&mut self) -> u8 {
        if !self.selected || self.command.len() < self.header_len() {
            return 0xFF;
        }
        let pos = self.out_pos;
        self.out_pos += 1;
        match self.command[0] {
            0x9F => self.jedec.get(pos).copied().unwrap_or(0),
            0x05 => {
                let status = self.status();
                if self.busy_remaining > 0 {
                    self.busy_remaining -= 1;
                }
                status
            }
            0x03 => {
                if self.memory.is_empty() {
                    return 0xFF;
                }
                let index = (self.address() + pos) % self.memory.len();
                self.memory[index]
            }
            _ => 0xFF,
        }
    }

    fn accept(&mut self, byte: u8) {
        if self.selected && self.command.len() < self.header_len() {
            self.command.push(byte);
        }
    }

    /// Clock one byte in, returning the byte driven on MISO
    fn shift(&mut self, byte: u8) -> u8 {
        if self.command.len() < self.header_len() {
            self.accept(byte);
            0xFF
        } else {
            self.respond()
        }
    }

    fn select(&mut self) {
        self.selected = true;
        self.command.clear();
        self.out_pos = 0;
    }

    fn release(&mut self) {
        if !self.selected {
            return;
        }
        self.selected = false;
        let Some(&opcode) = self.command.first() else {
            return;
        };
        self.executed.push(opcode);

        match opcode {
            0x06 => self.write_enabled = true,
            0x04 => self.write_enabled = false,
            0x02 if self.write_enabled && !self.busy() && self.command.len() >= 4 => {
                let addr = self.address();
                let page_base = addr & !(PAGE_SIZE - 1);
                let mut offset = addr % PAGE_SIZE;
                for &byte in &self.command[4..] {
                    self.memory[page_base + offset] &= byte;
                    offset = (offset + 1) % PAGE_SIZE;
                }
                self.finish_write();
            }
            0x20 if self.write_enabled && !self.busy() && self.command.len() >= 4 => {
                let sector = self.address() / SECTOR_SIZE;
                let start = sector * SECTOR_SIZE;
                let end = (start + SECTOR_SIZE).min(self.memory.len());
                self.memory[start..end].fill(0xFF);
                self.erase_counts[sector] += 1;
                self.finish_write();
            }
            _ => {}
        }
    }

    fn finish_write(&mut self) {
        self.write_enabled = false;
        self.busy_remaining = self.busy_polls;
    }
}

/// Simulated SPI NOR flash chip
///
/// Cloning the handle shares the same chip.
#[derive(Debug, Clone)]
pub struct MockSpiNor {
    chip: Rc<RefCell<NorChip>>,
}

impl MockSpiNor {
    /// 8 MiB part (JEDEC EF 40 17)
    pub fn new() -> Self {
        Self::with_jedec([0xEF, 0x40, 0x17])
    }

    /// Chip reporting the given JEDEC ID; capacity is `2^id[2]` bytes
    ///
    /// An ID of `FF FF FF` models a floating bus with no chip attached.
    pub fn with_jedec(jedec: [u8; 3]) -> Self {
        Self {
            chip: Rc::new(RefCell::new(NorChip::new(jedec))),
        }
    }

    /// Bus and chip-select halves wired to this chip
    pub fn split(&self) -> (MockNorSpi, MockNorChipSelect) {
        (
            MockNorSpi {
                chip: Rc::clone(&self.chip),
            },
            MockNorChipSelect {
                chip: Rc::clone(&self.chip),
            },
        )
    }

    /// `SpiDevice` over both halves, chip select managed per transaction
    pub fn device(&self) -> MockNorDevice {
        let (spi, cs) = self.split();
        match ExclusiveDevice::new_no_delay(spi, cs) {
            Ok(device) => device,
            Err(e) => match e {},
        }
    }

    /// Copy of `len` bytes of memory at `addr`
    pub fn contents(&self, addr: usize, len: usize) -> Vec<u8> {
        self.chip.borrow().memory[addr..addr + len].to_vec()
    }

    /// Overwrite memory directly, bypassing the command set
    pub fn preload(&self, addr: usize, data: &[u8]) {
        self.chip.borrow_mut().memory[addr..addr + data.len()].copy_from_slice(data);
    }

    /// Number of erases applied to the 4 KiB sector with index `sector`
    pub fn erase_count(&self, sector: usize) -> u32 {
        self.chip.borrow().erase_counts[sector]
    }

    /// Opcodes executed so far, in order
    pub fn executed(&self) -> Vec<u8> {
        self.chip.borrow().executed.clone()
    }

    /// Keep WIP set for `polls` status reads after each program or erase
    pub fn set_busy_polls(&self, polls: u32) {
        self.chip.borrow_mut().busy_polls = polls;
    }

    /// Keep WIP set forever
    pub fn set_stuck_busy(&self, stuck: bool) {
        self.chip.borrow_mut().stuck_busy = stuck;
    }

    /// Make every following bus operation fail
    pub fn fail_transfers(&self, fail: bool) {
        self.chip.borrow_mut().fail_transfers = fail;
    }

    /// Whether the write-enable latch is set
    pub fn write_enabled(&self) -> bool {
        self.chip.borrow().write_enabled
    }

    /// Whether chip select is asserted
    pub fn selected(&self) -> bool {
        self.chip.borrow().selected
    }
}

impl Default for MockSpiNor {
    fn default() -> Self {
        Self::new()
    }
}

/// SPI bus half of a [`MockSpiNor`]
#[derive(Debug)]
pub struct MockNorSpi {
    chip: Rc<RefCell<NorChip>>,
}

impl MockNorSpi {
    fn check(&self) -> Result<(), ErrorKind> {
        if self.chip.borrow().fail_transfers {
            return Err(ErrorKind::Other);
        }
        Ok(())
    }
}

impl ErrorType for MockNorSpi {
    type Error = ErrorKind;
}

impl SpiBus<u8> for MockNorSpi {
    async fn read(&mut self, words: &mut [u8]) -> Result<(), ErrorKind> {
        self.check()?;
        let mut chip = self.chip.borrow_mut();
        for word in words.iter_mut() {
            *word = chip.shift(0x00);
        }
        Ok(())
    }

    async fn write(&mut self, words: &[u8]) -> Result<(), ErrorKind> {
        self.check()?;
        let mut chip = self.chip.borrow_mut();
        for &word in words {
            chip.shift(word);
        }
        Ok(())
    }

    async fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), ErrorKind> {
        self.check()?;
        let mut chip = self.chip.borrow_mut();
        for i in 0..read.len().max(write.len()) {
            let out = chip.shift(write.get(i).copied().unwrap_or(0x00));
            if let Some(word) = read.get_mut(i) {
                *word = out;
            }
        }
        Ok(())
    }

    async fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), ErrorKind> {
        self.check()?;
        let mut chip = self.chip.borrow_mut();
        for word in words.iter_mut() {
            *word = chip.shift(*word);
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), ErrorKind> {
        Ok(())
    }
}

/// Chip-select half of a [`MockSpiNor`] (active low)
#[derive(Debug)]
pub struct MockNorChipSelect {
    chip: Rc<RefCell<NorChip>>,
}

impl PinErrorType for MockNorChipSelect {
    type Error = Infallible;
}

impl OutputPin for MockNorChipSelect {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.chip.borrow_mut().select();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.chip.borrow_mut().release();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_async::spi::{Operation, SpiDevice};

    async fn command(device: &mut MockNorDevice, bytes: &[u8]) {
        device.write(bytes).await.unwrap();
    }

    async fn read(device: &mut MockNorDevice, addr: u32, len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len];
        let header = [0x03, (addr >> 16) as u8, (addr >> 8) as u8, addr as u8];
        device
            .transaction(&mut [Operation::Write(&header), Operation::Read(&mut buf)])
            .await
            .unwrap();
        buf
    }

    #[tokio::test]
    async fn test_jedec_id() {
        let chip = MockSpiNor::with_jedec([0xC2, 0x20, 0x16]);
        let mut device = chip.device();

        let mut id = [0u8; 3];
        device
            .transaction(&mut [Operation::Write(&[0x9F]), Operation::Read(&mut id)])
            .await
            .unwrap();

        assert_eq!(id, [0xC2, 0x20, 0x16]);
        assert!(!chip.selected());
    }

    #[tokio::test]
    async fn test_program_requires_write_enable() {
        let chip = MockSpiNor::with_jedec([0xEF, 0x40, 0x10]);
        let mut device = chip.device();

        command(&mut device, &[0x02, 0x00, 0x00, 0x00, 0x12]).await;
        assert_eq!(chip.contents(0, 1), vec![0xFF]);

        command(&mut device, &[0x06]).await;
        assert!(chip.write_enabled());
        command(&mut device, &[0x02, 0x00, 0x00, 0x00, 0x12]).await;
        assert_eq!(read(&mut device, 0, 2).await, vec![0x12, 0xFF]);
        assert!(!chip.write_enabled());
    }

    #[tokio::test]
    async fn test_program_only_clears_bits() {
        let chip = MockSpiNor::with_jedec([0xEF, 0x40, 0x10]);
        let mut device = chip.device();
        chip.preload(0, &[0x0F]);

        command(&mut device, &[0x06]).await;
        command(&mut device, &[0x02, 0x00, 0x00, 0x00, 0xF1]).await;

        assert_eq!(chip.contents(0, 1), vec![0x01]);
    }

    #[tokio::test]
    async fn test_program_wraps_within_page() {
        let chip = MockSpiNor::with_jedec([0xEF, 0x40, 0x10]);
        let mut device = chip.device();

        command(&mut device, &[0x06]).await;
        command(&mut device, &[0x02, 0x00, 0x00, 0xFF, 0xAA, 0xBB]).await;

        assert_eq!(chip.contents(0xFF, 1), vec![0xAA]);
        assert_eq!(chip.contents(0x00, 1), vec![0xBB]);
        assert_eq!(chip.contents(0x100, 1), vec![0xFF]);
    }

    #[tokio::test]
    async fn test_sector_erase() {
        let chip = MockSpiNor::with_jedec([0xEF, 0x40, 0x10]);
        let mut device = chip.device();
        chip.preload(0x1000, &[0x00; 16]);
        chip.preload(0x0FFF, &[0x00]);

        command(&mut device, &[0x06]).await;
        command(&mut device, &[0x20, 0x00, 0x10, 0x00]).await;

        assert_eq!(chip.contents(0x1000, 16), vec![0xFF; 16]);
        assert_eq!(chip.contents(0x0FFF, 1), vec![0x00]);
        assert_eq!(chip.erase_count(1), 1);
        assert_eq!(chip.erase_count(0), 0);
        assert_eq!(chip.executed(), vec![0x06, 0x20]);
    }

    #[tokio::test]
    async fn test_status_busy_polls() {
        let chip = MockSpiNor::with_jedec([0xEF, 0x40, 0x10]);
        chip.set_busy_polls(2);
        let mut device = chip.device();

        command(&mut device, &[0x06]).await;
        command(&mut device, &[0x20, 0x00, 0x00, 0x00]).await;

        let mut status = [0u8; 3];
        device
            .transaction(&mut [Operation::Write(&[0x05]), Operation::Read(&mut status)])
            .await
            .unwrap();

        assert_eq!(status, [STATUS_WIP, STATUS_WIP, 0x00]);
    }

    #[tokio::test]
    async fn test_transfer_full_duplex_read() {
        let chip = MockSpiNor::with_jedec([0xEF, 0x40, 0x10]);
        chip.preload(0x20, &[0x48, 0x69]);
        let mut device = chip.device();

        let tx = [0x03, 0x00, 0x00, 0x20, 0x00, 0x00];
        let mut rx = [0u8; 6];
        device.transfer(&mut rx, &tx).await.unwrap();

        assert_eq!(&rx[4..], &[0x48, 0x69]);
    }

    #[tokio::test]
    async fn test_injected_bus_failure_releases_cs() {
        let chip = MockSpiNor::new();
        let mut device = chip.device();
        chip.fail_transfers(true);

        assert!(device.write(&[0x06]).await.is_err());
        assert!(!chip.selected());
        assert!(!chip.write_enabled());
    }
}
