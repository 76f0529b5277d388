//! Logging abstraction
//!
//! Provides unified logging macros that work across different targets:
//! - Embedded (pico2_w): Uses defmt
//! - Host tests: Uses println!/eprintln!
//! - Host non-test: No-op (arguments are still type-checked)
//!
//! defmt cannot apply float precision, so console lines that need it are
//! rendered with [`format_line`] first and logged as a plain string.

use core::fmt::{self, Write};

/// Capacity of a rendered console line
pub const LINE_SIZE: usize = 160;

/// Console line rendered on the stack
pub type Line = heapless::String<LINE_SIZE>;

/// Render `args` into a fixed-capacity string
///
/// Output that does not fit is truncated at the last complete character.
pub fn format_line(args: fmt::Arguments<'_>) -> Line {
    let mut line = Truncating(Line::new());
    let _ = line.write_fmt(args);
    line.0
}

/// Raw bytes shown as text; non-printable bytes appear as `.`
#[derive(Debug, Clone, Copy)]
pub struct Ascii<'a>(pub &'a [u8]);

impl fmt::Display for Ascii<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.0 {
            let c = if (0x20..=0x7E).contains(&b) { b as char } else { '.' };
            f.write_char(c)?;
        }
        Ok(())
    }
}

struct Truncating(Line);

impl Write for Truncating {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                return Err(fmt::Error);
            }
        }
        Ok(())
    }
}

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "pico2_w")]
        ::defmt::info!($($arg)*);

        #[cfg(all(not(feature = "pico2_w"), test))]
        println!("[INFO] {}", format!($($arg)*));

        #[cfg(all(not(feature = "pico2_w"), not(test)))]
        let _ = format_args!($($arg)*);
    }};
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "pico2_w")]
        ::defmt::warn!($($arg)*);

        #[cfg(all(not(feature = "pico2_w"), test))]
        println!("[WARN] {}", format!($($arg)*));

        #[cfg(all(not(feature = "pico2_w"), not(test)))]
        let _ = format_args!($($arg)*);
    }};
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "pico2_w")]
        ::defmt::error!($($arg)*);

        #[cfg(all(not(feature = "pico2_w"), test))]
        eprintln!("[ERROR] {}", format!($($arg)*));

        #[cfg(all(not(feature = "pico2_w"), not(test)))]
        let _ = format_args!($($arg)*);
    }};
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "pico2_w")]
        ::defmt::debug!($($arg)*);

        #[cfg(all(not(feature = "pico2_w"), test))]
        println!("[DEBUG] {}", format!($($arg)*));

        #[cfg(all(not(feature = "pico2_w"), not(test)))]
        let _ = format_args!($($arg)*);
    }};
}

/// Log trace message
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "pico2_w")]
        ::defmt::trace!($($arg)*);

        #[cfg(all(not(feature = "pico2_w"), test))]
        println!("[TRACE] {}", format!($($arg)*));

        #[cfg(all(not(feature = "pico2_w"), not(test)))]
        let _ = format_args!($($arg)*);
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line_precision() {
        let line = format_line(format_args!("GNSS: altitude is {:.1} m.", 545.4f64));
        assert_eq!(line.as_str(), "GNSS: altitude is 545.4 m.");
    }

    #[test]
    fn test_format_line_truncates() {
        let long = [b'x'; LINE_SIZE + 10];
        let text = core::str::from_utf8(&long).unwrap();
        let line = format_line(format_args!("{}", text));
        assert_eq!(line.len(), LINE_SIZE);
    }

    #[test]
    fn test_ascii_display() {
        let line = format_line(format_args!("NMEA: {}", Ascii(b"$GP\xB5\r")));
        assert_eq!(line.as_str(), "NMEA: $GP..");
    }

    #[test]
    fn test_macros_expand() {
        log_info!("info {}", 1);
        log_warn!("warn {}", 2);
        log_error!("error {}", 3);
        log_debug!("debug");
        log_trace!("trace");
    }
}
