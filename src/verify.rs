//! Register readback verification.

use crate::registers::RegisterProfile;

/// A configuration register whose readback differs from the written value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterMismatch {
    /// Register address.
    pub register: u8,
    /// Value written.
    pub expected: u8,
    /// Value read back.
    pub actual: u8,
}

/// Compares a written profile with its readback.
///
/// Returns the first register, in programming order, that differs.
pub fn first_mismatch(
    written: &RegisterProfile,
    readback: &RegisterProfile,
) -> Option<RegisterMismatch> {
    written
        .iter()
        .zip(readback.iter())
        .find(|((_, expected), (_, actual))| expected != actual)
        .map(|((register, expected), (_, actual))| RegisterMismatch {
            register,
            expected,
            actual,
        })
}
