//! GNSS location reporter and SPI flash exerciser for Raspberry Pi Pico 2 W
//!
//! Two independent tasks on one executor; every bus wait and delay is an
//! `await`, so neither task stalls the other:
//!
//! - location: polls a u-blox receiver over I2C (DDC) and prints position,
//!   altitude, time and speed; an RGB LED shows progress
//! - storage: writes a greeting to an SPI NOR flash and reads it back forever
//!
//! # Hardware Setup
//!
//! | Device        | Signal | GPIO |
//! |---------------|--------|------|
//! | u-blox GNSS   | SDA    | GP4  |
//! | u-blox GNSS   | SCL    | GP5  |
//! | SPI NOR flash | MISO   | GP16 |
//! | SPI NOR flash | CS     | GP17 |
//! | SPI NOR flash | SCK    | GP18 |
//! | SPI NOR flash | MOSI   | GP19 |
//! | RGB LED       | Red    | GP13 |
//! | RGB LED       | Green  | GP14 |
//! | RGB LED       | Blue   | GP15 |
//!
//! LEDs are active-low.
//!
//! # Usage
//!
//! ```bash
//! cargo build --release --features pico2_w --target thumbv8m.main-none-eabihf
//! probe-rs run --chip RP2350 target/thumbv8m.main-none-eabihf/release/gnss_spif_demo
//! ```
//!
//! Sleep periods and the receiver address are set at build time, see
//! `config.rs`.

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{self, Config as EmbassyI2cConfig, I2c};
use embassy_rp::peripherals::{I2C0, SPI0};
use embassy_rp::spi::{self, Config as EmbassySpiConfig, Spi};
use embassy_time::{Delay, Timer};
use embedded_hal_bus::spi::ExclusiveDevice;
use gnss_spif_demo::config::GNSS_I2C_ADDRESS;
use gnss_spif_demo::devices::gnss::GnssI2c;
use gnss_spif_demo::devices::led::RgbLed;
use gnss_spif_demo::devices::storage::SpiFlashBlockDevice;
use gnss_spif_demo::platform::rp2350::{Rp2350Gpio, Rp2350I2c, Rp2350Timer};
use gnss_spif_demo::platform::traits::I2cConfig;
use gnss_spif_demo::subsystems::{
    ExerciserConfig, LocationReporter, ReporterConfig, StorageExerciser,
};
use gnss_spif_demo::{log_error, log_info};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

/// Flash SPI clock in Hz
const FLASH_SPI_FREQUENCY: u32 = 8_000_000;

type Gnss = GnssI2c<Rp2350I2c<'static, I2C0>, Rp2350Timer>;
type Leds = RgbLed<Rp2350Gpio<'static>, Rp2350Gpio<'static>, Rp2350Gpio<'static>>;
type FlashBus = ExclusiveDevice<Spi<'static, SPI0, spi::Async>, Output<'static>, Delay>;
type Flash = SpiFlashBlockDevice<FlashBus, Rp2350Timer>;

// Work buffers are too large for the task arena
static REPORTER: StaticCell<LocationReporter<Gnss, Leds>> = StaticCell::new();
static EXERCISER: StaticCell<StorageExerciser<Flash>> = StaticCell::new();

#[embassy_executor::task]
async fn location_task(reporter: &'static mut LocationReporter<Gnss, Leds>) {
    if let Err(e) = reporter.run().await {
        log_error!("Location reporter stopped: {}", e);
    }

    // Failure pattern stays on
    loop {
        Timer::after_secs(3600).await;
    }
}

#[embassy_executor::task]
async fn storage_task(exerciser: &'static mut StorageExerciser<Flash>) {
    match exerciser.run().await {}
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    log_info!("GNSS + SPI flash demo");

    let i2c_config = I2cConfig::default();
    let mut embassy_i2c_config = EmbassyI2cConfig::default();
    embassy_i2c_config.frequency = i2c_config.frequency;
    let i2c = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, embassy_i2c_config);
    let gnss = GnssI2c::new(
        Rp2350I2c::new(i2c, i2c_config.frequency),
        Rp2350Timer::new(),
        GNSS_I2C_ADDRESS,
    );

    let leds = RgbLed::new(
        Rp2350Gpio::new(Output::new(p.PIN_13, Level::High)),
        Rp2350Gpio::new(Output::new(p.PIN_14, Level::High)),
        Rp2350Gpio::new(Output::new(p.PIN_15, Level::High)),
    );

    let mut embassy_spi_config = EmbassySpiConfig::default();
    embassy_spi_config.frequency = FLASH_SPI_FREQUENCY;
    let spi = Spi::new(
        p.SPI0,
        p.PIN_18,
        p.PIN_19,
        p.PIN_16,
        p.DMA_CH0,
        p.DMA_CH1,
        embassy_spi_config,
    );
    let cs = Output::new(p.PIN_17, Level::High);
    // Output pins cannot fail
    let bus = ExclusiveDevice::new(spi, cs, Delay).unwrap_or_else(|e| match e {});
    let flash = SpiFlashBlockDevice::new(bus, Rp2350Timer::new());

    let reporter = REPORTER.init(LocationReporter::new(gnss, leds, ReporterConfig::default()));
    let exerciser = EXERCISER.init(StorageExerciser::new(flash, ExerciserConfig::default()));

    if let Err(e) = spawner.spawn(storage_task(exerciser)) {
        log_error!("Failed to spawn storage task: {}", e);
    }
    if let Err(e) = spawner.spawn(location_task(reporter)) {
        log_error!("Failed to spawn location task: {}", e);
    }
}
