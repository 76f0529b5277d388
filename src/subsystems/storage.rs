//! Storage exerciser
//!
//! Writes a greeting to the first erase unit of a block device and reads it
//! back forever. Device failures are logged and never stop the loop; a failed
//! read leaves the previous buffer contents in place.

use core::convert::Infallible;

use crate::core::logging::{format_line, Ascii};
use crate::devices::storage::BlockDevice;
use crate::platform::time;

/// Greeting written at address 0
pub const GREETING: &[u8] = b"Hello World!\r\n";

/// Work buffer size; erase units above this are exercised partially
pub const WORK_BUFFER_SIZE: usize = 4096;

/// Storage exerciser configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExerciserConfig {
    /// Seconds to sleep between read-backs (default: 1)
    pub sleep_secs: u32,
}

impl Default for ExerciserConfig {
    fn default() -> Self {
        Self {
            sleep_secs: crate::config::STORAGE_SLEEP_SECS,
        }
    }
}

/// Progress of the exerciser
///
/// A failed step leaves the state where it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExerciserState {
    /// Device not brought up (or `init` failed)
    Uninit,
    /// Device identified and geometry known
    Initialized,
    /// First erase unit erased
    Erased,
    /// Greeting programmed at address 0
    Programmed,
    /// At least one read-back succeeded
    ReadLoop,
}

/// Erase, program and read back a block device
pub struct StorageExerciser<B: BlockDevice> {
    device: B,
    config: ExerciserConfig,
    state: ExerciserState,
    buf: [u8; WORK_BUFFER_SIZE],
}

impl<B: BlockDevice> StorageExerciser<B> {
    /// Create an exerciser in [`ExerciserState::Uninit`]; the device is not
    /// touched until [`start`](Self::start)
    pub fn new(device: B, config: ExerciserConfig) -> Self {
        Self {
            device,
            config,
            state: ExerciserState::Uninit,
            buf: [0; WORK_BUFFER_SIZE],
        }
    }

    /// Bring up the device and write the greeting
    ///
    /// The whole erase unit at address 0 is erased. The greeting, zero-padded
    /// to the exercised window (the erase unit capped at the work buffer), is
    /// then programmed at address 0; the rest of a larger unit stays erased.
    pub async fn start(&mut self) {
        crate::log_info!("SPI: starting the storage exerciser");

        match self.device.init().await {
            Ok(()) => self.state = ExerciserState::Initialized,
            Err(e) => crate::log_warn!("SPI: init failed: {}", e),
        }

        crate::log_info!("SPI: size: {}", self.device.size());
        crate::log_info!("SPI: read size: {}", self.device.read_size());
        crate::log_info!("SPI: program size: {}", self.device.program_size());
        crate::log_info!("SPI: erase size: {}", self.device.erase_size());

        let window = Self::window();
        self.buf[..window].fill(0);
        let len = GREETING.len().min(window);
        self.buf[..len].copy_from_slice(&GREETING[..len]);

        match self.device.erase(0, B::ERASE_SIZE as u32).await {
            Ok(()) => self.state = ExerciserState::Erased,
            Err(e) => crate::log_warn!("SPI: erase failed: {}", e),
        }
        match self.device.write(0, &self.buf[..window]).await {
            Ok(()) => self.state = ExerciserState::Programmed,
            Err(e) => crate::log_warn!("SPI: program failed: {}", e),
        }
    }

    /// Read the exercised window back and return its text up to the first NUL
    pub async fn read_back(&mut self) -> &[u8] {
        let window = Self::window();
        match self.device.read(0, &mut self.buf[..window]).await {
            Ok(()) => self.state = ExerciserState::ReadLoop,
            Err(e) => crate::log_warn!("SPI: read failed: {}", e),
        }

        let end = self.buf[..window]
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(window);
        &self.buf[..end]
    }

    /// One loop iteration: read back, print, sleep
    pub async fn step(&mut self) {
        let sleep_secs = self.config.sleep_secs;
        let line = format_line(format_args!("SPI: {}", Ascii(self.read_back().await)));
        crate::log_info!("{}", line.as_str());
        crate::log_info!("SPI: sleeping for {} seconds", sleep_secs);
        time::sleep_secs(sleep_secs).await;
    }

    /// Write the greeting, then read it back forever
    pub async fn run(&mut self) -> Infallible {
        self.start().await;
        loop {
            self.step().await;
        }
    }

    /// Current progress
    pub fn state(&self) -> ExerciserState {
        self.state
    }

    /// Exercised block device
    pub fn device(&self) -> &B {
        &self.device
    }

    /// Get mutable reference to the block device
    pub fn device_mut(&mut self) -> &mut B {
        &mut self.device
    }

    /// Bytes programmed and read back at address 0
    fn window() -> usize {
        match B::ERASE_SIZE {
            0 => WORK_BUFFER_SIZE,
            size => size.min(WORK_BUFFER_SIZE),
        }
    }
}
