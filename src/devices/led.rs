//! Status LEDs
//!
//! The board carries a red, a green and a blue LED wired active-low: driving
//! a pin low lights its LED. Levels below are pin levels, not lit states.

use crate::platform::traits::GpioInterface;

/// Sink for the three status LED levels
pub trait LedPort {
    /// Drive the red LED pin
    fn set_red(&mut self, level: bool);
    /// Drive the green LED pin
    fn set_green(&mut self, level: bool);
    /// Drive the blue LED pin
    fn set_blue(&mut self, level: bool);
}

/// Pin levels of the three LEDs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedLevels {
    pub red: bool,
    pub green: bool,
    pub blue: bool,
}

/// Named LED states of the location reporter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedPattern {
    /// Power-on: all off
    Idle,
    /// A message arrived: green on
    Searching,
    /// Time received: blue on
    TimeFix,
    /// Position received: all on (white)
    PositionFix,
    /// Receiver failed to start: red on
    Failure,
}

impl LedPattern {
    /// Pin levels of this pattern
    pub const fn levels(self) -> LedLevels {
        let (red, green, blue) = match self {
            LedPattern::Idle => (true, true, true),
            LedPattern::Searching => (true, false, true),
            LedPattern::TimeFix => (true, true, false),
            LedPattern::PositionFix => (false, false, false),
            LedPattern::Failure => (false, true, true),
        };
        LedLevels { red, green, blue }
    }

    /// Drive `port` to this pattern
    pub fn apply<L: LedPort + ?Sized>(self, port: &mut L) {
        let levels = self.levels();
        port.set_red(levels.red);
        port.set_green(levels.green);
        port.set_blue(levels.blue);
    }
}

/// Three GPIO pins driven as one RGB status LED
pub struct RgbLed<R: GpioInterface, G: GpioInterface, B: GpioInterface> {
    red: R,
    green: G,
    blue: B,
}

impl<R: GpioInterface, G: GpioInterface, B: GpioInterface> RgbLed<R, G, B> {
    /// Wrap three output pins and switch the LEDs off
    pub fn new(red: R, green: G, blue: B) -> Self {
        let mut led = Self { red, green, blue };
        LedPattern::Idle.apply(&mut led);
        led
    }

    /// Current pin levels
    pub fn levels(&self) -> LedLevels {
        LedLevels {
            red: self.red.read(),
            green: self.green.read(),
            blue: self.blue.read(),
        }
    }

    /// Release the pins
    pub fn release(self) -> (R, G, B) {
        (self.red, self.green, self.blue)
    }
}

fn drive<P: GpioInterface>(pin: &mut P, level: bool, name: &str) {
    if let Err(e) = pin.set_level(level) {
        crate::log_warn!("LED: failed to drive {} pin: {}", name, e);
    }
}

impl<R: GpioInterface, G: GpioInterface, B: GpioInterface> LedPort for RgbLed<R, G, B> {
    fn set_red(&mut self, level: bool) {
        drive(&mut self.red, level, "red");
    }

    fn set_green(&mut self, level: bool) {
        drive(&mut self.green, level, "green");
    }

    fn set_blue(&mut self, level: bool) {
        drive(&mut self.blue, level, "blue");
    }
}
