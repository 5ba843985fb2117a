//! Register map definitions for the ADS1220 ADC.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{
    ConversionMode, DataRate, DrdyMode, FilterRejection, Gain, IdacCurrent, IdacRouting,
    InputMux, OperatingMode, PgaBypass, VoltageReference,
};

/// Register address of `CONF0`.
pub const REG_CONF0: u8 = 0x00;
/// Register address of `CONF1`.
pub const REG_CONF1: u8 = 0x01;
/// Register address of `CONF2`.
pub const REG_CONF2: u8 = 0x02;
/// Register address of `CONF3`.
pub const REG_CONF3: u8 = 0x03;

/// Number of configuration registers.
pub const REGISTER_COUNT: usize = 4;

/// Configuration register addresses in programming order.
pub const CONFIG_REGISTERS: [u8; REGISTER_COUNT] = [REG_CONF0, REG_CONF1, REG_CONF2, REG_CONF3];

/// Pattern read back when MISO floats high because nothing answers.
pub const UNRESPONSIVE_PATTERN: u8 = 0xFF;

/// Minimal metadata exposed by every register value type.
pub trait Register {
    /// Register address as documented in the datasheet.
    const ADDRESS: u8;
    /// Power-on reset value defined by the datasheet.
    const RESET_VALUE: u8;
}

/// Bitfield representation of the `CONF0` register (address `0x00`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conf0 {
    // PGA bypass (bit 0).
    pub pga_bypass: PgaBypass,
    // Gain selection (bits 3:1).
    pub gain: Gain,
    // Input multiplexer (bits 7:4).
    pub mux: InputMux,
}

impl From<u8> for Conf0 {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Conf0> for u8 {
    fn from(value: Conf0) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `CONF1` register (address `0x01`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conf1 {
    // Burn-out current sources enable (bit 0).
    pub burnout_sources: bool,
    // Temperature sensor mode (bit 1).
    pub temperature_sensor: bool,
    // Conversion mode (bit 2).
    pub conversion_mode: ConversionMode,
    // Operating mode (bits 4:3).
    pub mode: OperatingMode,
    // Data rate (bits 7:5).
    pub data_rate: DataRate,
}

impl From<u8> for Conf1 {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Conf1> for u8 {
    fn from(value: Conf1) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `CONF2` register (address `0x02`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conf2 {
    // IDAC current setting (bits 2:0).
    pub idac_current: IdacCurrent,
    // Low-side power switch (bit 3).
    pub low_side_switch: bool,
    // FIR filter configuration (bits 5:4).
    pub filter: FilterRejection,
    // Voltage reference selection (bits 7:6).
    pub vref: VoltageReference,
}

impl From<u8> for Conf2 {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Conf2> for u8 {
    fn from(value: Conf2) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `CONF3` register (address `0x03`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conf3 {
    #[skip]
    __: B1,
    // DRDY mode (bit 1).
    pub drdy_mode: DrdyMode,
    // IDAC2 routing (bits 4:2).
    pub idac2_routing: IdacRouting,
    // IDAC1 routing (bits 7:5).
    pub idac1_routing: IdacRouting,
}

impl From<u8> for Conf3 {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Conf3> for u8 {
    fn from(value: Conf3) -> Self {
        value.into_bytes()[0]
    }
}

impl Register for Conf0 {
    const ADDRESS: u8 = REG_CONF0;
    const RESET_VALUE: u8 = 0x00;
}

impl Register for Conf1 {
    const ADDRESS: u8 = REG_CONF1;
    const RESET_VALUE: u8 = 0x00;
}

impl Register for Conf2 {
    const ADDRESS: u8 = REG_CONF2;
    const RESET_VALUE: u8 = 0x00;
}

impl Register for Conf3 {
    const ADDRESS: u8 = REG_CONF3;
    const RESET_VALUE: u8 = 0x00;
}

/// The four configuration register values written during initialization.
///
/// Index `n` holds the value of `CONFn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterProfile {
    values: [u8; REGISTER_COUNT],
}

impl RegisterProfile {
    /// Profile used on the reference bench setup.
    ///
    /// AIN0/AIN1 differential input at gain 1, 20 SPS duty-cycle timing,
    /// internal 2.048 V reference with simultaneous 50/60 Hz rejection.
    pub const REFERENCE: Self = Self::new(0b0000_0000, 0b0000_1100, 0b0001_0000, 0b0000_0000);

    /// Creates a profile from raw register values.
    pub const fn new(conf0: u8, conf1: u8, conf2: u8, conf3: u8) -> Self {
        Self {
            values: [conf0, conf1, conf2, conf3],
        }
    }

    /// Creates a profile from the typed register views.
    pub fn from_registers(conf0: Conf0, conf1: Conf1, conf2: Conf2, conf3: Conf3) -> Self {
        Self::new(conf0.into(), conf1.into(), conf2.into(), conf3.into())
    }

    /// Returns the raw values in register order.
    pub const fn values(&self) -> [u8; REGISTER_COUNT] {
        self.values
    }

    /// Returns the raw value of the given configuration register.
    pub const fn value(&self, register: u8) -> u8 {
        self.values[(register & 0x03) as usize]
    }

    /// Iterates over `(address, value)` pairs in programming order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        CONFIG_REGISTERS.into_iter().zip(self.values.iter().copied())
    }

    /// Typed view of `CONF0`.
    pub fn conf0(&self) -> Conf0 {
        Conf0::from(self.values[0])
    }

    /// Typed view of `CONF1`.
    pub fn conf1(&self) -> Conf1 {
        Conf1::from(self.values[1])
    }

    /// Typed view of `CONF2`.
    pub fn conf2(&self) -> Conf2 {
        Conf2::from(self.values[2])
    }

    /// Typed view of `CONF3`.
    pub fn conf3(&self) -> Conf3 {
        Conf3::from(self.values[3])
    }

    /// PGA gain selected by this profile.
    pub fn gain(&self) -> Gain {
        self.conf0().gain()
    }
}

impl Default for RegisterProfile {
    fn default() -> Self {
        Self::REFERENCE
    }
}

impl From<[u8; REGISTER_COUNT]> for RegisterProfile {
    fn from(values: [u8; REGISTER_COUNT]) -> Self {
        Self { values }
    }
}
