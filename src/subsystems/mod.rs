//! Application subsystems
//!
//! Each subsystem owns its devices and runs as one long-lived task:
//!
//! - [`location`]: GNSS location reporter with status LEDs
//! - [`storage`]: block device erase/program/read-back loop

pub mod location;
pub mod storage;

pub use location::{LocationReporter, Report, ReporterConfig};
pub use storage::{ExerciserConfig, ExerciserState, StorageExerciser};
