//! Conversion from raw ADC codes to volts.

/// Full-scale range of a signed 24-bit code (2^23).
pub const FULL_SCALE_RANGE: i32 = 1 << 23;

/// Internal reference voltage in volts.
pub const INTERNAL_REFERENCE_VOLTAGE: f64 = 2.048;

/// Additive offset measured on the reference bench setup, in volts.
pub const DEFAULT_CALIBRATION_OFFSET: f64 = 0.002_24;

/// Converts a sign-extended code to volts without calibration.
///
/// The division happens in floating point so small codes are not truncated.
#[inline]
pub fn raw_to_voltage(raw: i32, reference_voltage: f64) -> f64 {
    (f64::from(raw) / f64::from(FULL_SCALE_RANGE)) * reference_voltage
}

/// Converts a code to volts and applies the calibration offset after scaling.
#[inline]
pub fn calibrated_voltage(raw: i32, reference_voltage: f64, calibration_offset: f64) -> f64 {
    raw_to_voltage(raw, reference_voltage) + calibration_offset
}
