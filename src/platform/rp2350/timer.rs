//! RP2350 Timer implementation
//!
//! Delays await `embassy_time::Timer`, which runs on the RP2350 64-bit
//! microsecond timer. A waiting driver yields to the executor.

use crate::platform::{traits::TimerInterface, Result};
use embassy_time::{Duration, Instant, Timer};

/// RP2350 Timer implementation
#[derive(Debug, Default, Clone, Copy)]
pub struct Rp2350Timer;

impl Rp2350Timer {
    /// Create a timer handle; all handles share the embassy time driver
    pub fn new() -> Self {
        Self
    }
}

impl TimerInterface for Rp2350Timer {
    async fn delay_us(&mut self, us: u32) -> Result<()> {
        Timer::after(Duration::from_micros(u64::from(us))).await;
        Ok(())
    }

    async fn delay_ms(&mut self, ms: u32) -> Result<()> {
        Timer::after(Duration::from_millis(u64::from(ms))).await;
        Ok(())
    }

    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }
}
