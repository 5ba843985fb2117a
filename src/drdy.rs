//! Data-ready synchronization.
//!
//! DRDY is driven low by the ADS1220 when a conversion result is available
//! and returns high once the result is read. The line is polled with a delay
//! between reads instead of waiting on an edge, so any `InputPin` works.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

/// Number of polls between two progress events.
pub const PROGRESS_INTERVAL: u32 = 1_000;

/// Polling cadence and budget for the DRDY wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrdyTiming {
    /// Delay between two reads of the line, in microseconds.
    pub poll_interval_us: u32,
    /// Total time allowed for DRDY to assert, in milliseconds.
    pub timeout_ms: u32,
}

impl DrdyTiming {
    /// Creates a timing description.
    pub const fn new(poll_interval_us: u32, timeout_ms: u32) -> Self {
        Self {
            poll_interval_us,
            timeout_ms,
        }
    }

    /// Timeout expressed in microseconds.
    pub const fn budget_us(&self) -> u64 {
        self.timeout_ms as u64 * 1_000
    }

    /// Number of polls needed to spend the whole budget, rounded up.
    pub const fn max_polls(&self) -> u64 {
        let interval = if self.poll_interval_us == 0 {
            1
        } else {
            self.poll_interval_us as u64
        };
        self.budget_us().div_ceil(interval)
    }
}

impl Default for DrdyTiming {
    fn default() -> Self {
        Self::new(1_000, 2_000)
    }
}

/// Emitted every [`PROGRESS_INTERVAL`] polls while DRDY stays high.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrdyProgress {
    /// Polls performed so far.
    pub polls: u32,
    /// Time waited so far, in microseconds.
    pub elapsed_us: u64,
}

/// Failure modes of [`wait_ready`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitError<P> {
    /// The line did not go low within the budget.
    Timeout {
        /// Polls performed.
        polls: u32,
        /// Time waited, in microseconds.
        elapsed_us: u64,
    },
    /// Reading the line failed.
    Pin(P),
}

/// Blocks until `line` reads low or the timing budget is spent.
///
/// Returns the number of delay intervals waited. A timeout is only reported
/// after the full budget has elapsed, and the line is sampled once more at
/// that point. `on_progress` is called every [`PROGRESS_INTERVAL`] polls.
pub fn wait_ready<PIN, D, F>(
    line: &mut PIN,
    delay: &mut D,
    timing: DrdyTiming,
    mut on_progress: F,
) -> Result<u32, WaitError<PIN::Error>>
where
    PIN: InputPin,
    D: DelayNs,
    F: FnMut(DrdyProgress),
{
    let interval_us = timing.poll_interval_us.max(1);
    let budget_us = timing.budget_us();
    let mut polls: u32 = 0;
    // Tracked on its own so the deadline holds even once `polls` saturates.
    let mut elapsed_us: u64 = 0;

    loop {
        if line.is_low().map_err(WaitError::Pin)? {
            return Ok(polls);
        }

        if elapsed_us >= budget_us {
            return Err(WaitError::Timeout { polls, elapsed_us });
        }

        delay.delay_us(interval_us);
        polls = polls.saturating_add(1);
        elapsed_us += u64::from(interval_us);

        if polls % PROGRESS_INTERVAL == 0 {
            on_progress(DrdyProgress { polls, elapsed_us });
        }
    }
}
