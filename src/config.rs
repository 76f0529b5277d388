//! Build-time configuration
//!
//! Values come from `build.rs`, which exports environment variables (or their
//! defaults) as `rustc-env` entries. They are parsed here at compile time so the
//! firmware carries plain constants.
//!
//! | Variable              | Default | Meaning                                  |
//! |-----------------------|---------|------------------------------------------|
//! | `LOCATION_SLEEP_SECS` | 5       | Reporter sleep after a received message  |
//! | `STORAGE_SLEEP_SECS`  | 1       | Exerciser sleep between read-backs       |
//! | `GNSS_I2C_ADDRESS`    | 66      | 7-bit DDC address of the receiver (0x42) |

/// Seconds the location reporter sleeps after processing a message
pub const LOCATION_SLEEP_SECS: u32 = const_parse_u32(env!("LOCATION_SLEEP_SECS"), 5);

/// Seconds the storage exerciser sleeps between read-backs
pub const STORAGE_SLEEP_SECS: u32 = const_parse_u32(env!("STORAGE_SLEEP_SECS"), 1);

/// 7-bit I2C address of the GNSS receiver
pub const GNSS_I2C_ADDRESS: u8 = {
    let addr = const_parse_u32(env!("GNSS_I2C_ADDRESS"), 0x42);
    if addr > 0x7F {
        0x42
    } else {
        addr as u8
    }
};

/// Parse an unsigned decimal integer at compile time
///
/// Returns `fallback` for an empty string, a non-digit character or overflow.
pub const fn const_parse_u32(s: &str, fallback: u32) -> u32 {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return fallback;
    }

    let mut value: u32 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b < b'0' || b > b'9' {
            return fallback;
        }
        value = match value.checked_mul(10) {
            Some(v) => v,
            None => return fallback,
        };
        value = match value.checked_add((b - b'0') as u32) {
            Some(v) => v,
            None => return fallback,
        };
        i += 1;
    }
    value
}
