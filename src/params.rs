//! Strongly typed parameter enumerations for the ADS1220 configuration registers.
//!
//! These enums map directly to datasheet field encodings and back the
//! bitfield views in [`registers`](crate::registers). The driver applies one
//! fixed [`RegisterProfile`](crate::registers::RegisterProfile); the typed
//! fields are used to describe and report what that profile selects.
//!
//! # Examples
//!
//! ```rust
//! use ads1220::params::{DataRate, Gain, OperatingMode};
//!
//! assert_eq!(Gain::X16.factor(), 16);
//! assert_eq!(DataRate::Dr20.samples_per_second(OperatingMode::Normal), Some(20));
//! ```

use modular_bitfield::prelude::Specifier;

/// Input multiplexer selections encoded in `CONF0[7:4]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 4]
pub enum InputMux {
    /// AINP = AIN0, AINN = AIN1.
    Ain0Ain1 = 0b0000,
    /// AINP = AIN0, AINN = AIN2.
    Ain0Ain2 = 0b0001,
    /// AINP = AIN0, AINN = AIN3.
    Ain0Ain3 = 0b0010,
    /// AINP = AIN1, AINN = AIN2.
    Ain1Ain2 = 0b0011,
    /// AINP = AIN1, AINN = AIN3.
    Ain1Ain3 = 0b0100,
    /// AINP = AIN2, AINN = AIN3.
    Ain2Ain3 = 0b0101,
    /// AINP = AIN1, AINN = AIN0.
    Ain1Ain0 = 0b0110,
    /// AINP = AIN3, AINN = AIN2.
    Ain3Ain2 = 0b0111,
    /// AINP = AIN0, AINN = AVSS.
    Ain0Avss = 0b1000,
    /// AINP = AIN1, AINN = AVSS.
    Ain1Avss = 0b1001,
    /// AINP = AIN2, AINN = AVSS.
    Ain2Avss = 0b1010,
    /// AINP = AIN3, AINN = AVSS.
    Ain3Avss = 0b1011,
    /// (V(REFPx) - V(REFNx)) / 4 monitor, PGA bypassed.
    ReferenceMonitor = 0b1100,
    /// (AVDD - AVSS) / 4 monitor, PGA bypassed.
    SupplyMonitor = 0b1101,
    /// AINP and AINN shorted to (AVDD + AVSS) / 2.
    Shorted = 0b1110,
    /// Reserved encoding.
    Reserved = 0b1111,
}

/// PGA gain selections encoded in `CONF0[3:1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 3]
pub enum Gain {
    /// Gain of 1.
    X1 = 0b000,
    /// Gain of 2.
    X2 = 0b001,
    /// Gain of 4.
    X4 = 0b010,
    /// Gain of 8.
    X8 = 0b011,
    /// Gain of 16.
    X16 = 0b100,
    /// Gain of 32.
    X32 = 0b101,
    /// Gain of 64.
    X64 = 0b110,
    /// Gain of 128.
    X128 = 0b111,
}

impl Gain {
    /// Returns the amplification factor.
    pub const fn factor(self) -> u8 {
        1 << (self as u8)
    }
}

/// PGA bypass bit (`CONF0.PGA_BYPASS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 1]
pub enum PgaBypass {
    /// PGA enabled (default).
    Enabled = 0,
    /// PGA disabled and bypassed; only gains 1, 2 and 4 are usable.
    Bypassed = 1,
}

/// Data rate selections encoded in `CONF1[7:5]`.
///
/// The resulting sample rate depends on the [`OperatingMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 3]
pub enum DataRate {
    /// 20 SPS in normal mode.
    Dr20 = 0b000,
    /// 45 SPS in normal mode.
    Dr45 = 0b001,
    /// 90 SPS in normal mode.
    Dr90 = 0b010,
    /// 175 SPS in normal mode.
    Dr175 = 0b011,
    /// 330 SPS in normal mode.
    Dr330 = 0b100,
    /// 600 SPS in normal mode.
    Dr600 = 0b101,
    /// 1000 SPS in normal mode.
    Dr1000 = 0b110,
    /// Reserved encoding.
    Reserved = 0b111,
}

impl DataRate {
    /// Returns the nominal output rate for the given operating mode.
    ///
    /// Returns `None` for the reserved encoding or the reserved operating mode.
    pub const fn samples_per_second(self, mode: OperatingMode) -> Option<u16> {
        let normal = match self {
            Self::Dr20 => 20,
            Self::Dr45 => 45,
            Self::Dr90 => 90,
            Self::Dr175 => 175,
            Self::Dr330 => 330,
            Self::Dr600 => 600,
            Self::Dr1000 => 1_000,
            Self::Reserved => return None,
        };

        match mode {
            OperatingMode::Normal => Some(normal),
            // Duty-cycle mode runs at a quarter of the normal rate.
            OperatingMode::DutyCycle => Some(normal / 4),
            OperatingMode::Turbo => Some(normal * 2),
            OperatingMode::Reserved => None,
        }
    }
}

/// Operating modes encoded in `CONF1[4:3]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 2]
pub enum OperatingMode {
    /// Normal mode (256-kHz modulator clock).
    Normal = 0b00,
    /// Duty-cycle mode (internal duty cycle of 1:4).
    DutyCycle = 0b01,
    /// Turbo mode (512-kHz modulator clock).
    Turbo = 0b10,
    /// Reserved encoding.
    Reserved = 0b11,
}

/// Conversion mode bit (`CONF1.CM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 1]
pub enum ConversionMode {
    /// One conversion per START/SYNC command.
    SingleShot = 0,
    /// Back-to-back conversions after the first START/SYNC command.
    Continuous = 1,
}

/// Voltage reference selections encoded in `CONF2[7:6]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 2]
pub enum VoltageReference {
    /// Internal 2.048-V reference.
    Internal = 0b00,
    /// External reference on REFP0/REFN0.
    ExternalRef0 = 0b01,
    /// External reference on AIN0/REFP1 and AIN3/REFN1.
    ExternalRef1 = 0b10,
    /// Analog supply (AVDD - AVSS) used as reference.
    AnalogSupply = 0b11,
}

/// Digital FIR filter configuration encoded in `CONF2[5:4]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 2]
pub enum FilterRejection {
    /// No 50-Hz or 60-Hz rejection.
    Off = 0b00,
    /// Simultaneous 50-Hz and 60-Hz rejection.
    Both = 0b01,
    /// 50-Hz rejection only.
    Hz50 = 0b10,
    /// 60-Hz rejection only.
    Hz60 = 0b11,
}

/// IDAC current settings encoded in `CONF2[2:0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 3]
pub enum IdacCurrent {
    /// Current sources off.
    Off = 0b000,
    /// 10 µA.
    Ua10 = 0b001,
    /// 50 µA.
    Ua50 = 0b010,
    /// 100 µA.
    Ua100 = 0b011,
    /// 250 µA.
    Ua250 = 0b100,
    /// 500 µA.
    Ua500 = 0b101,
    /// 1000 µA.
    Ua1000 = 0b110,
    /// 1500 µA.
    Ua1500 = 0b111,
}

/// IDAC output routing encoded in `CONF3[7:5]` (IDAC1) and `CONF3[4:2]` (IDAC2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 3]
pub enum IdacRouting {
    /// IDAC disabled.
    Disabled = 0b000,
    /// Routed to AIN0/REFP1.
    Ain0 = 0b001,
    /// Routed to AIN1.
    Ain1 = 0b010,
    /// Routed to AIN2.
    Ain2 = 0b011,
    /// Routed to AIN3/REFN1.
    Ain3 = 0b100,
    /// Routed to REFP0.
    Refp0 = 0b101,
    /// Routed to REFN0.
    Refn0 = 0b110,
    /// Reserved encoding.
    Reserved = 0b111,
}

/// DRDY mode bit (`CONF3.DRDYM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 1]
pub enum DrdyMode {
    /// Only the dedicated DRDY pin signals data ready.
    DedicatedPin = 0,
    /// DOUT/DRDY also signals data ready.
    DoutAndPin = 1,
}
