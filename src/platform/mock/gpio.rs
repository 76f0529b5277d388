//! Mock GPIO implementation for testing

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::{GpioInterface, GpioMode},
    Result,
};

/// Mock GPIO implementation
///
/// Tracks pin level, mode and the number of level writes for test
/// verification. Writes can be made to fail to exercise error paths.
#[derive(Debug)]
pub struct MockGpio {
    state: bool,
    mode: GpioMode,
    writes: usize,
    fail_writes: bool,
}

impl MockGpio {
    /// Create a new mock GPIO in output mode, driven low
    pub fn new_output() -> Self {
        Self {
            state: false,
            mode: GpioMode::OutputPushPull,
            writes: 0,
            fail_writes: false,
        }
    }

    /// Create a new mock GPIO in output mode with an initial level
    pub fn new_output_level(high: bool) -> Self {
        Self {
            state: high,
            ..Self::new_output()
        }
    }

    /// Create a new mock GPIO in input mode
    pub fn new_input() -> Self {
        Self {
            state: false,
            mode: GpioMode::Input,
            writes: 0,
            fail_writes: false,
        }
    }

    /// Set the input state (for simulating input pin reads)
    pub fn set_input_state(&mut self, high: bool) {
        self.state = high;
    }

    /// Number of successful level writes since creation
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Make every following write fail with `GpioError::HardwareError`
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    fn drive(&mut self, level: bool) -> Result<()> {
        if !self.mode.is_output() {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        if self.fail_writes {
            return Err(PlatformError::Gpio(GpioError::HardwareError));
        }
        self.state = level;
        self.writes += 1;
        Ok(())
    }
}

impl GpioInterface for MockGpio {
    fn set_high(&mut self) -> Result<()> {
        self.drive(true)
    }

    fn set_low(&mut self) -> Result<()> {
        self.drive(false)
    }

    fn toggle(&mut self) -> Result<()> {
        let level = !self.state;
        self.drive(level)
    }

    fn read(&self) -> bool {
        self.state
    }

    fn set_mode(&mut self, mode: GpioMode) -> Result<()> {
        self.mode = mode;
        Ok(())
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_gpio_output() {
        let mut gpio = MockGpio::new_output();
        assert!(!gpio.read());

        gpio.set_high().unwrap();
        assert!(gpio.read());

        gpio.set_low().unwrap();
        assert!(!gpio.read());
        assert_eq!(gpio.write_count(), 2);
    }

    #[test]
    fn test_mock_gpio_set_level() {
        let mut gpio = MockGpio::new_output_level(true);
        assert!(gpio.read());

        gpio.set_level(false).unwrap();
        assert!(!gpio.read());

        gpio.toggle().unwrap();
        assert!(gpio.read());
    }

    #[test]
    fn test_mock_gpio_input_rejects_writes() {
        let mut gpio = MockGpio::new_input();
        gpio.set_input_state(true);
        assert!(gpio.read());

        assert!(gpio.set_high().is_err());
        assert!(gpio.set_low().is_err());
        assert!(gpio.toggle().is_err());
        assert_eq!(gpio.write_count(), 0);
    }

    #[test]
    fn test_mock_gpio_injected_failure() {
        let mut gpio = MockGpio::new_output();
        gpio.fail_writes(true);
        assert_eq!(
            gpio.set_high(),
            Err(PlatformError::Gpio(GpioError::HardwareError))
        );
        assert!(!gpio.read());
    }
}
