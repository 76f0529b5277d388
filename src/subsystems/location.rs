//! GNSS location reporter
//!
//! Pulls framed messages from a [`GnssSource`], prints every message, and
//! extracts position, altitude, time and speed from the NMEA sentences it
//! recognizes. The status LED follows progress:
//!
//! - any message: [`LedPattern::Searching`]
//! - time seen in `GGA`/`GNS`: [`LedPattern::TimeFix`]
//! - valid `GLL` position: [`LedPattern::PositionFix`]
//! - receiver failed to start: [`LedPattern::Failure`] (terminal)

use core::convert::Infallible;
use core::fmt;

use crate::core::logging::{format_line, Ascii};
use crate::devices::gnss::{
    find_nmea_item_pos, get_nmea_angle, get_nmea_char, get_nmea_item, GnssSource, MessageCode,
    Protocol,
};
use crate::devices::led::{LedPattern, LedPort};
use crate::platform::{time, PlatformError, Result};

/// Receive buffer size; longer messages arrive as `Unknown` chunks
pub const MESSAGE_BUFFER_SIZE: usize = 256;

/// Maximum reports extracted from one sentence
pub const MAX_REPORTS: usize = 4;

/// Reports extracted from one message
pub type Reports = heapless::Vec<Report, MAX_REPORTS>;

/// Location reporter configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReporterConfig {
    /// Seconds to sleep after each received message (default: 5)
    pub sleep_secs: u32,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            sleep_secs: crate::config::LOCATION_SLEEP_SECS,
        }
    }
}

/// One fact extracted from a sentence
///
/// `Display` renders the console line for the fact.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    /// Position in signed decimal degrees
    Location { latitude: f64, longitude: f64 },
    /// Map link for the position
    MapLink { latitude: f64, longitude: f64 },
    /// Altitude above mean sea level in meters
    Altitude(f64),
    /// UTC time as `hhmmss` (fewer bytes if the sentence ends early)
    Time(heapless::Vec<u8, 6>),
    /// Speed over ground in km/h
    Speed(f64),
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Location {
                latitude,
                longitude,
            } => write!(f, "GNSS: location is {:.5} {:.5}.", latitude, longitude),
            Report::MapLink {
                latitude,
                longitude,
            } => write!(
                f,
                "I am here: https://maps.google.com/?q={:.5},{:.5}",
                latitude, longitude
            ),
            Report::Altitude(meters) => write!(f, "GNSS: altitude is {:.1} m.", meters),
            Report::Time(hhmmss) => write!(f, "GNSS: time is {}.", Ascii(hhmmss)),
            Report::Speed(kmh) => write!(f, "GNSS: speed is {:.1} km/h.", kmh),
        }
    }
}

/// Extract reports from one message and drive the LEDs
///
/// Any message sets [`LedPattern::Searching`]. Only NMEA messages longer
/// than six bytes whose address starts with `$` or has a `G` talker are
/// inspected further.
pub fn process_message<L: LedPort + ?Sized>(
    protocol: Protocol,
    msg: &[u8],
    leds: &mut L,
) -> Reports {
    let mut reports = Reports::new();
    LedPattern::Searching.apply(leds);

    if protocol != Protocol::Nmea || msg.len() <= 6 {
        return reports;
    }
    if msg[0] != b'$' && msg[1] != b'G' {
        return reports;
    }

    match &msg[3..6] {
        b"GLL" => {
            let latitude = get_nmea_angle(1, msg);
            let longitude = get_nmea_angle(3, msg);
            let status = get_nmea_char(6, msg);
            if let (Some(latitude), Some(longitude), Some(b'A')) = (latitude, longitude, status) {
                LedPattern::PositionFix.apply(leds);
                let _ = reports.push(Report::Location {
                    latitude,
                    longitude,
                });
                let _ = reports.push(Report::MapLink {
                    latitude,
                    longitude,
                });
            }
        }
        b"GGA" | b"GNS" => {
            if let Some(altitude) = get_nmea_item(9, msg) {
                let _ = reports.push(Report::Altitude(altitude));
            }
            if let Some(pos) = find_nmea_item_pos(1, msg) {
                LedPattern::TimeFix.apply(leds);
                let end = msg.len().min(pos + 6);
                let mut hhmmss = heapless::Vec::new();
                let _ = hhmmss.extend_from_slice(&msg[pos..end]);
                let _ = reports.push(Report::Time(hhmmss));
            }
        }
        b"VTG" => {
            if let Some(speed) = get_nmea_item(7, msg) {
                let _ = reports.push(Report::Speed(speed));
            }
        }
        _ => {}
    }

    reports
}

/// Reads messages from a GNSS source and reports what they contain
pub struct LocationReporter<G: GnssSource, L: LedPort> {
    gnss: G,
    leds: L,
    config: ReporterConfig,
    buf: [u8; MESSAGE_BUFFER_SIZE],
}

impl<G: GnssSource, L: LedPort> LocationReporter<G, L> {
    /// Create a reporter; the receiver is not touched until [`run`](Self::run)
    pub fn new(gnss: G, leds: L, config: ReporterConfig) -> Self {
        Self {
            gnss,
            leds,
            config,
            buf: [0; MESSAGE_BUFFER_SIZE],
        }
    }

    /// Wake the receiver, setting the failure pattern if it does not start
    ///
    /// # Errors
    ///
    /// Returns the error from [`GnssSource::init`].
    pub async fn start(&mut self) -> Result<()> {
        crate::log_info!("Starting up...");
        if let Err(e) = self.gnss.init().await {
            crate::log_error!("Unable to initialize GNSS: {}", e);
            LedPattern::Failure.apply(&mut self.leds);
            return Err(e);
        }
        crate::log_info!("Waiting for GNSS to receive something...");
        Ok(())
    }

    /// Fetch and process at most one message
    ///
    /// Returns `Ok(None)` when no complete message is available.
    ///
    /// # Errors
    ///
    /// Returns the transport error from [`GnssSource::get_message`].
    pub async fn poll_once(&mut self) -> Result<Option<Reports>> {
        let code: MessageCode = self.gnss.get_message(&mut self.buf).await?;
        if !code.is_message() {
            return Ok(None);
        }

        let msg = &self.buf[..code.length().min(MESSAGE_BUFFER_SIZE)];
        let echo = &msg[..msg.len().saturating_sub(2)];
        let line = format_line(format_args!("NMEA: {}", Ascii(echo)));
        crate::log_info!("{}", line.as_str());

        let reports = process_message(code.protocol(), msg, &mut self.leds);
        for report in &reports {
            let line = format_line(format_args!("{}", report));
            crate::log_info!("{}", line.as_str());
        }
        Ok(Some(reports))
    }

    /// One loop iteration: process a message, then sleep or yield
    ///
    /// Sleeps for the configured period after a message and yields briefly
    /// otherwise. Read errors are logged and treated as "no message".
    pub async fn step(&mut self) -> Option<Reports> {
        match self.poll_once().await {
            Ok(Some(reports)) => {
                time::sleep_secs(self.config.sleep_secs).await;
                Some(reports)
            }
            Ok(None) => {
                time::yield_poll().await;
                None
            }
            Err(e) => {
                crate::log_warn!("GNSS: read failed: {}", e);
                time::yield_poll().await;
                None
            }
        }
    }

    /// Start the receiver and report forever
    ///
    /// # Errors
    ///
    /// Returns the init error; the reporter does not retry.
    pub async fn run(&mut self) -> core::result::Result<Infallible, PlatformError> {
        self.start().await?;
        loop {
            self.step().await;
        }
    }

    /// LED sink
    pub fn leds(&self) -> &L {
        &self.leds
    }

    /// GNSS source
    pub fn gnss_mut(&mut self) -> &mut G {
        &mut self.gnss
    }
}
