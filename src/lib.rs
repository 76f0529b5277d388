#![cfg_attr(not(any(test, feature = "mock")), no_std)]

//! gnss_spif_demo - GNSS location reporter and SPI flash exerciser
//!
//! This library provides platform abstraction, device drivers (u-blox GNSS,
//! SPI NOR flash, RGB status LED) and the two application subsystems for the
//! Raspberry Pi Pico 2 W firmware.

// Platform abstraction layer
pub mod platform;

// Device drivers using platform abstraction
pub mod devices;

// Logging
pub mod core;

// Location reporter and storage exerciser
pub mod subsystems;

// Build-time configuration
pub mod config;
