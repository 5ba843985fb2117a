//! Configuration primitives for the ADS1220 driver.

use crate::conversion::{DEFAULT_CALIBRATION_OFFSET, INTERNAL_REFERENCE_VOLTAGE};
use crate::drdy::DrdyTiming;

// ADS1220 datasheet reset time is 50 µs + 32 t(CLK); the bench setup waits much longer.
const DEFAULT_RESET_SETTLE_MS: u32 = 100;
// Gap between a register write and the next command.
const DEFAULT_WRITE_SETTLE_MS: u32 = 1;

/// How a register readback that differs from the written value is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VerifyPolicy {
    /// Initialization fails with [`Error::ConfigurationMismatch`](crate::Error::ConfigurationMismatch).
    #[default]
    Strict,
    /// The mismatch is logged and returned in the
    /// [`InitReport`](crate::device::InitReport); the device is marked configured.
    WarnOnly,
}

/// User-facing configuration for the ADS1220 driver.
///
/// The register contents live in a separate
/// [`RegisterProfile`](crate::registers::RegisterProfile); this struct
/// carries the conversion constants and bus timing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Reference voltage in volts used for code-to-volt scaling.
    pub reference_voltage: f64,
    /// Offset in volts added after scaling.
    pub calibration_offset: f64,
    /// DRDY polling cadence and timeout.
    pub drdy: DrdyTiming,
    /// Wait after `RESET` before the first register access, in milliseconds.
    pub reset_settle_ms: u32,
    /// Wait after each register write, in milliseconds.
    pub write_settle_ms: u32,
    /// Readback verification policy.
    pub verify: VerifyPolicy,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Checks whether this configuration can drive the device.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if !self.reference_voltage.is_finite() || self.reference_voltage <= 0.0 {
            return Err(ConfigError::InvalidReferenceVoltage);
        }

        if !self.calibration_offset.is_finite() {
            return Err(ConfigError::InvalidCalibrationOffset);
        }

        if self.drdy.poll_interval_us == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }

        if self.drdy.budget_us() < u64::from(self.drdy.poll_interval_us) {
            return Err(ConfigError::TimeoutShorterThanPoll);
        }

        if self.drdy.max_polls() > u64::from(u32::MAX) {
            return Err(ConfigError::TooManyPolls);
        }

        Ok(())
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the reference voltage.
    pub fn reference_voltage(mut self, volts: f64) -> Self {
        self.config.reference_voltage = volts;
        self
    }

    /// Overrides the calibration offset.
    pub fn calibration_offset(mut self, volts: f64) -> Self {
        self.config.calibration_offset = volts;
        self
    }

    /// Sets the DRDY poll interval in microseconds.
    pub fn drdy_poll_interval_us(mut self, interval_us: u32) -> Self {
        self.config.drdy.poll_interval_us = interval_us;
        self
    }

    /// Sets the DRDY timeout in milliseconds.
    pub fn drdy_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.config.drdy.timeout_ms = timeout_ms;
        self
    }

    /// Sets the post-reset settle time.
    pub fn reset_settle_ms(mut self, millis: u32) -> Self {
        self.config.reset_settle_ms = millis;
        self
    }

    /// Sets the post-write settle time.
    pub fn write_settle_ms(mut self, millis: u32) -> Self {
        self.config.write_settle_ms = millis;
        self
    }

    /// Selects the readback verification policy.
    pub fn verify(mut self, policy: VerifyPolicy) -> Self {
        self.config.verify = policy;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference_voltage: INTERNAL_REFERENCE_VOLTAGE,
            calibration_offset: DEFAULT_CALIBRATION_OFFSET,
            drdy: DrdyTiming::default(),
            reset_settle_ms: DEFAULT_RESET_SETTLE_MS,
            write_settle_ms: DEFAULT_WRITE_SETTLE_MS,
            verify: VerifyPolicy::Strict,
        }
    }
}

/// Validation errors generated while verifying a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Reference voltage is not a positive finite number.
    InvalidReferenceVoltage,
    /// Calibration offset is NaN or infinite.
    InvalidCalibrationOffset,
    /// DRDY would be polled without any delay.
    ZeroPollInterval,
    /// The DRDY budget does not cover a single poll interval.
    TimeoutShorterThanPoll,
    /// The DRDY budget needs more polls than the poll counter can hold.
    TooManyPolls,
}
