//! Acquisition results and their text record format.

use core::fmt;

use crate::params::Gain;

/// One converted sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Sign-extended 24-bit conversion code.
    pub raw: i32,
    /// Calibrated voltage in volts.
    pub voltage: f64,
    /// PGA gain in effect for the conversion.
    pub gain: Gain,
}

/// Wall-clock time of a sample, to one-second resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp {
    /// Calendar year, e.g. `2024`.
    pub year: u16,
    /// Month, `1..=12`.
    pub month: u8,
    /// Day of month, `1..=31`.
    pub day: u8,
    /// Hour, `0..=23`.
    pub hour: u8,
    /// Minute, `0..=59`.
    pub minute: u8,
    /// Second, `0..=59`.
    pub second: u8,
}

impl Timestamp {
    /// Creates a timestamp from calendar fields.
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }
}

/// Formats as `DD/MM/YY - HH:MM:SS`.
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}/{:02}/{:02} - {:02}:{:02}:{:02}",
            self.day,
            self.month,
            self.year % 100,
            self.hour,
            self.minute,
            self.second
        )
    }
}

/// Source of wall-clock time for sample records.
pub trait Clock {
    /// Returns the current time.
    fn now(&mut self) -> Timestamp;
}

impl<C> Clock for &mut C
where
    C: Clock + ?Sized,
{
    fn now(&mut self) -> Timestamp {
        C::now(self)
    }
}

/// A timestamped reading.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SampleRecord {
    /// Time the sample was read.
    pub timestamp: Timestamp,
    /// The reading itself.
    pub reading: Reading,
}

/// Formats as `timestamp ; raw_binary ; volts ; gain`.
///
/// Negative codes print as a minus sign followed by the magnitude in binary.
impl fmt::Display for SampleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = self.reading.raw;
        let sign = if raw < 0 { "-" } else { "" };
        write!(
            f,
            "{} ; {}{:b} ; {:.6} ; {}",
            self.timestamp,
            sign,
            raw.unsigned_abs(),
            self.reading.voltage,
            self.reading.gain.factor()
        )
    }
}
