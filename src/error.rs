//! Error handling primitives for the ADS1220 driver.

use core::fmt;

use crate::config::ConfigError;
use crate::device::DeviceState;
use crate::verify::RegisterMismatch;

/// Crate-wide result type alias.
pub type Result<T, E, P> = core::result::Result<T, Error<E, P>>;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E, P> {
    /// Any error reported by the underlying bus interface.
    Interface(E),
    /// The data-ready line could not be read.
    Pin(P),
    /// The provided configuration parameters are invalid.
    InvalidConfig(ConfigError),
    /// The post-reset probe read the all-ones pattern, so nothing is driving MISO.
    DeviceUnresponsive {
        /// Register that was probed.
        register: u8,
        /// Value read back from the probe.
        value: u8,
    },
    /// A configuration register did not read back the value written to it.
    ConfigurationMismatch(RegisterMismatch),
    /// DRDY never went low within the configured budget.
    DrdyTimeout {
        /// Number of delay intervals waited.
        polls: u32,
        /// Time spent waiting in microseconds.
        elapsed_us: u64,
    },
    /// A conversion was requested while the device was not configured.
    NotConfigured {
        /// State the driver was in when the request was made.
        state: DeviceState,
    },
}

impl<E, P> fmt::Display for Error<E, P>
where
    E: fmt::Debug,
    P: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interface(err) => write!(f, "bus transfer failed: {err:?}"),
            Self::Pin(err) => write!(f, "failed to read DRDY line: {err:?}"),
            Self::InvalidConfig(err) => write!(f, "invalid driver configuration: {err:?}"),
            Self::DeviceUnresponsive { register, value } => write!(
                f,
                "device not responding: register {register:#04x} read {value:#04x} after reset"
            ),
            Self::ConfigurationMismatch(mismatch) => write!(
                f,
                "register {:#04x} read back {:#04x}, expected {:#04x}",
                mismatch.register, mismatch.actual, mismatch.expected
            ),
            Self::DrdyTimeout { polls, elapsed_us } => write!(
                f,
                "DRDY did not assert within {elapsed_us} us ({polls} polls)"
            ),
            Self::NotConfigured { state } => {
                write!(f, "conversion requested in state {state:?}")
            }
        }
    }
}

impl<E, P> core::error::Error for Error<E, P>
where
    E: fmt::Debug,
    P: fmt::Debug,
{
}
