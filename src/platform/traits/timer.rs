//! Timer interface trait
//!
//! Delays used by drivers while waiting on hardware (flash busy polling,
//! receiver wake-up). Delays are awaited, so a waiting driver never holds up
//! the other task.

use crate::platform::Result;

/// Timer interface trait
///
/// # Safety Invariants
///
/// - Monotonic time source (never goes backwards)
#[allow(async_fn_in_trait)]
pub trait TimerInterface {
    /// Wait at least `us` microseconds
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Timer` if the delay operation fails.
    async fn delay_us(&mut self, us: u32) -> Result<()>;

    /// Wait at least `ms` milliseconds
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Timer` if the delay operation fails.
    async fn delay_ms(&mut self, ms: u32) -> Result<()>;

    /// Microseconds since platform initialization
    fn now_us(&self) -> u64;

    /// Milliseconds since platform initialization
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }
}
