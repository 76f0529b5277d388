//! Mock Timer implementation for testing

use crate::platform::{traits::TimerInterface, Result};

/// Mock Timer implementation
///
/// Delays advance a simulated clock and complete immediately, so driver
/// retry loops can be checked for how long they would have waited.
#[derive(Debug, Default)]
pub struct MockTimer {
    now_us: u64,
    delays: usize,
}

impl MockTimer {
    /// Create a new mock timer at t = 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of delay calls made so far
    pub fn delay_count(&self) -> usize {
        self.delays
    }
}

impl TimerInterface for MockTimer {
    async fn delay_us(&mut self, us: u32) -> Result<()> {
        self.now_us = self.now_us.wrapping_add(u64::from(us));
        self.delays += 1;
        Ok(())
    }

    async fn delay_ms(&mut self, ms: u32) -> Result<()> {
        self.delay_us(ms.saturating_mul(1000)).await
    }

    fn now_us(&self) -> u64 {
        self.now_us
    }
}
