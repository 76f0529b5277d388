use std::env;

/// Build-time settings exported to the crate as `rustc-env` values.
///
/// Each entry is `(name, default)`. The parsed values are consumed by
/// `src/config.rs` at compile time.
const SETTINGS: &[(&str, &str)] = &[
    // Seconds the location reporter sleeps after each received message
    ("LOCATION_SLEEP_SECS", "5"),
    // Seconds the storage exerciser sleeps between read-backs
    ("STORAGE_SLEEP_SECS", "1"),
    // 7-bit I2C address of the u-blox receiver (decimal, 66 = 0x42)
    ("GNSS_I2C_ADDRESS", "66"),
];

fn main() {
    for (name, default) in SETTINGS {
        match env::var(name) {
            Ok(value) if is_unsigned(&value) => {
                println!("cargo:rustc-env={}={}", name, value);
                println!("cargo:warning=Using {} from environment: {}", name, value);
            }
            Ok(value) => {
                println!(
                    "cargo:warning=Ignoring {}={} (not an unsigned integer), using {}",
                    name, value, default
                );
                println!("cargo:rustc-env={}={}", name, default);
            }
            Err(_) => {
                println!("cargo:rustc-env={}={}", name, default);
            }
        }

        // Rerun if environment variables change
        println!("cargo:rerun-if-env-changed={}", name);
    }
}

fn is_unsigned(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
