//! GNSS receiver message source
//!
//! A u-blox receiver streams NMEA sentences and UBX frames. Transports move
//! the raw bytes into a [`GnssParser`], which frames one message per call.
//!
//! # Example
//!
//! ```ignore
//! use gnss_spif_demo::devices::gnss::{GnssI2c, GnssSource, Protocol};
//!
//! let mut gnss = GnssI2c::new(i2c, timer, 0x42);
//! gnss.init().await?;
//!
//! let mut buf = [0u8; 256];
//! let code = gnss.get_message(&mut buf).await?;
//! if code.is_message() && code.protocol() == Protocol::Nmea {
//!     let sentence = &buf[..code.length()];
//!     let altitude = nmea::get_nmea_item(9, sentence);
//! }
//! ```

pub mod code;
pub mod i2c;
pub mod nmea;
pub mod parser;
pub mod serial;
pub mod ubx;

pub use code::{MessageCode, Protocol};
pub use i2c::GnssI2c;
pub use nmea::{
    convert_angle, fields, find_nmea_item_pos, get_nmea_angle, get_nmea_char, get_nmea_item,
    NmeaField, NmeaFields,
};
pub use parser::GnssParser;
pub use serial::GnssSerial;

use crate::platform::{error::GnssError, traits::TimerInterface, Result};

/// Number of polls while waiting for the receiver to start talking
pub const WAKE_POLLS: u32 = 34;

/// Delay between wake-up polls (34 x 30 ms, about one second)
pub const WAKE_POLL_INTERVAL_MS: u32 = 30;

/// Source of framed GNSS messages
///
/// Both calls are async: bus transfers and wake-up delays yield to the
/// executor instead of spinning.
#[allow(async_fn_in_trait)]
pub trait GnssSource {
    /// Wake and configure the receiver
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Gnss(GnssError::NotResponding)` if the receiver
    /// produces no data, or the transport error if configuration fails.
    async fn init(&mut self) -> Result<()>;

    /// Fetch pending bytes from the receiver and return the next message
    ///
    /// See [`GnssParser::get_message`] for the meaning of the code.
    ///
    /// # Errors
    ///
    /// Returns the transport error if reading from the receiver fails.
    async fn get_message(&mut self, buf: &mut [u8]) -> Result<MessageCode>;
}

/// Bytes a transport can hand over without blocking
pub(crate) trait PendingBytes {
    /// Copy up to `buf.len()` pending bytes, returning how many were copied
    async fn read_pending(&mut self, buf: &mut [u8]) -> Result<usize>;
}

/// Poll `source` until the parser holds at least one byte
///
/// Transport errors during the wait count as "no data yet".
pub(crate) async fn wait_for_data<T, S>(
    parser: &mut GnssParser,
    timer: &mut T,
    source: &mut S,
) -> Result<()>
where
    T: TimerInterface,
    S: PendingBytes,
{
    let mut chunk = [0u8; 64];

    for attempt in 0..WAKE_POLLS {
        match source.read_pending(&mut chunk).await {
            Ok(n) if n > 0 => {
                parser.put(&chunk[..n]);
            }
            Ok(_) => {}
            Err(e) => crate::log_debug!("GNSS: poll {} failed: {}", attempt, e),
        }
        if !parser.is_empty() {
            return Ok(());
        }
        timer.delay_ms(WAKE_POLL_INTERVAL_MS).await?;
    }

    crate::log_warn!("GNSS: no data after {} polls", WAKE_POLLS);
    Err(GnssError::NotResponding.into())
}
