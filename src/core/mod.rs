//! Core infrastructure
//!
//! Logging macros and console line formatting shared by both firmware loops.

pub mod logging;
