//! Task sleep primitives
//!
//! On embassy targets these await `embassy_time::Timer`. Host builds get
//! no-op stubs so loop bodies can be driven directly from tests.

#[cfg(feature = "embassy")]
mod embassy_ops {
    use embassy_time::{Duration, Timer};

    /// Sleep the calling task for `secs` seconds
    pub async fn sleep_secs(secs: u32) {
        Timer::after(Duration::from_secs(secs as u64)).await;
    }

    /// Yield to other tasks briefly while polling a device
    pub async fn yield_poll() {
        Timer::after(Duration::from_millis(1)).await;
    }
}

#[cfg(feature = "embassy")]
pub use embassy_ops::{sleep_secs, yield_poll};

// =============================================================================
// Host Test Stubs
// =============================================================================

#[cfg(not(feature = "embassy"))]
mod stub_ops {
    /// No-op sleep for host tests
    pub async fn sleep_secs(_secs: u32) {}

    /// No-op yield for host tests
    pub async fn yield_poll() {}
}

#[cfg(not(feature = "embassy"))]
pub use stub_ops::{sleep_secs, yield_poll};
