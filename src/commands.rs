//! SPI command set and frame encoding for the ADS1220.
//!
//! Every exchange with the device is a single full-duplex frame: the command
//! byte first, followed by the payload or by don't-care bytes that clock the
//! response out. The helpers here only build and decode frames; they never
//! touch the bus.

/// Resets the device to its power-on state.
pub const CMD_RESET: u8 = 0x06;
/// Starts or restarts a conversion.
pub const CMD_START: u8 = 0x08;
/// Enters power-down mode.
pub const CMD_POWERDOWN: u8 = 0x02;
/// Reads the latest conversion result.
pub const CMD_RDATA: u8 = 0x10;
/// Reads `nn + 1` registers starting at `rr` (`0010 rrnn`).
pub const CMD_RREG: u8 = 0x20;
/// Writes `nn + 1` registers starting at `rr` (`0100 rrnn`).
pub const CMD_WREG: u8 = 0x40;

/// Length of a data-read frame: command byte plus three data bytes.
pub const DATA_FRAME_LEN: usize = 4;
/// Length of a single-register read or write frame.
pub const REGISTER_FRAME_LEN: usize = 2;

/// Sign bit of a 24-bit conversion code.
const SIGN_BIT_24: i32 = 1 << 23;
/// Offset removed from codes with the sign bit set.
const TWOS_COMPLEMENT_24: i32 = 1 << 24;

#[inline]
const fn register_field(register: u8) -> u8 {
    (register & 0x03) << 2
}

/// Builds a single-register write frame. The register count field stays `0`.
pub const fn encode_write(register: u8, value: u8) -> [u8; REGISTER_FRAME_LEN] {
    [CMD_WREG | register_field(register), value]
}

/// Builds a single-register read frame. Byte 1 of the response holds the value.
pub const fn encode_read(register: u8) -> [u8; REGISTER_FRAME_LEN] {
    [CMD_RREG | register_field(register), 0x00]
}

/// Builds the `RDATA` frame. Bytes 1..=3 of the response hold the sample, MSB first.
pub const fn encode_data_read() -> [u8; DATA_FRAME_LEN] {
    [CMD_RDATA, 0x00, 0x00, 0x00]
}

/// Builds the `RESET` frame.
pub const fn encode_reset() -> [u8; 1] {
    [CMD_RESET]
}

/// Builds the `START/SYNC` frame.
pub const fn encode_start() -> [u8; 1] {
    [CMD_START]
}

/// Builds the `POWERDOWN` frame.
pub const fn encode_powerdown() -> [u8; 1] {
    [CMD_POWERDOWN]
}

/// Extracts the register value from a register-read response.
#[inline]
pub const fn decode_register(response: &[u8; REGISTER_FRAME_LEN]) -> u8 {
    response[1]
}

/// Extracts the signed sample from a data-read response.
#[inline]
pub const fn decode_data(response: &[u8; DATA_FRAME_LEN]) -> i32 {
    decode_sample([response[1], response[2], response[3]])
}

/// Combines three big-endian bytes into a sign-extended 24-bit code.
///
/// The result always lies in `[-2^23, 2^23 - 1]`.
pub const fn decode_sample(bytes: [u8; 3]) -> i32 {
    let code = ((bytes[0] as i32) << 16) | ((bytes[1] as i32) << 8) | bytes[2] as i32;
    if code & SIGN_BIT_24 != 0 {
        code - TWOS_COMPLEMENT_24
    } else {
        code
    }
}

/// Commands understood by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Device reset.
    Reset,
    /// Start or restart a conversion.
    Start,
    /// Enter power-down mode.
    PowerDown,
    /// Read the latest conversion result.
    ReadData,
    /// Write one configuration register.
    WriteRegister {
        /// Register address (`0..=3`).
        register: u8,
        /// Value to store.
        value: u8,
    },
    /// Read one configuration register.
    ReadRegister {
        /// Register address (`0..=3`).
        register: u8,
    },
}

impl Command {
    /// Returns the full-duplex frame that carries this command.
    pub const fn frame(self) -> Frame {
        match self {
            Self::Reset => Frame::from_bytes(&encode_reset()),
            Self::Start => Frame::from_bytes(&encode_start()),
            Self::PowerDown => Frame::from_bytes(&encode_powerdown()),
            Self::ReadData => Frame::from_bytes(&encode_data_read()),
            Self::WriteRegister { register, value } => {
                Frame::from_bytes(&encode_write(register, value))
            }
            Self::ReadRegister { register } => Frame::from_bytes(&encode_read(register)),
        }
    }

    /// Returns `true` when the response carries payload bytes.
    pub const fn has_response(self) -> bool {
        matches!(self, Self::ReadData | Self::ReadRegister { .. })
    }
}

/// Fixed-capacity buffer holding one command frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    bytes: [u8; DATA_FRAME_LEN],
    len: usize,
}

impl Frame {
    const fn from_bytes(src: &[u8]) -> Self {
        let mut bytes = [0u8; DATA_FRAME_LEN];
        let mut i = 0;
        while i < src.len() {
            bytes[i] = src[i];
            i += 1;
        }
        Self {
            bytes,
            len: src.len(),
        }
    }

    /// Bytes to clock out.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Buffer for an in-place transfer; holds the response afterwards.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes[..self.len]
    }

    /// Frame length in bytes.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always `false`; every command is at least one byte.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_frame_places_register_in_bits_3_2() {
        assert_eq!(encode_write(0, 0xAB), [0x40, 0xAB]);
        assert_eq!(encode_write(1, 0x0C), [0x44, 0x0C]);
        assert_eq!(encode_write(3, 0x00), [0x4C, 0x00]);
    }

    #[test]
    fn read_frame_pads_with_zero() {
        assert_eq!(encode_read(0), [0x20, 0x00]);
        assert_eq!(encode_read(2), [0x28, 0x00]);
        assert_eq!(decode_register(&[0xFF, 0x5A]), 0x5A);
    }

    #[test]
    fn single_byte_commands() {
        assert_eq!(encode_reset(), [0x06]);
        assert_eq!(encode_start(), [0x08]);
        assert_eq!(encode_powerdown(), [0x02]);
        assert_eq!(encode_data_read(), [0x10, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn decode_sample_sign_extends_bit_23() {
        assert_eq!(decode_sample([0x80, 0x00, 0x00]), -8_388_608);
        assert_eq!(decode_sample([0x00, 0x00, 0x01]), 1);
        assert_eq!(decode_sample([0xFF, 0xFF, 0xFF]), -1);
        assert_eq!(decode_sample([0x7F, 0xFF, 0xFF]), 8_388_607);
        assert_eq!(decode_sample([0x00, 0x00, 0x00]), 0);
    }

    #[test]
    fn decode_sample_matches_subtracting_full_code_range() {
        for code in [0x80_0001u32, 0x9A_BCDE, 0xC0_0000, 0xFF_FFFE] {
            let [_, b0, b1, b2] = code.to_be_bytes();
            assert_eq!(decode_sample([b0, b1, b2]), code as i32 - (1 << 24));
        }
        for code in [0x00_0002u32, 0x12_3456, 0x40_0000, 0x7F_FFFE] {
            let [_, b0, b1, b2] = code.to_be_bytes();
            assert_eq!(decode_sample([b0, b1, b2]), code as i32);
        }
    }

    #[test]
    fn decode_data_skips_command_slot() {
        assert_eq!(decode_data(&[0xFF, 0x00, 0x01, 0x00]), 256);
    }

    #[test]
    fn command_frames_match_encoders() {
        assert_eq!(Command::Reset.frame().as_slice(), &[CMD_RESET]);
        assert_eq!(Command::ReadData.frame().len(), DATA_FRAME_LEN);
        assert_eq!(
            Command::WriteRegister { register: 2, value: 0x10 }.frame().as_slice(),
            &[0x48, 0x10]
        );
        assert_eq!(
            Command::ReadRegister { register: 3 }.frame().as_slice(),
            &[0x2C, 0x00]
        );
        assert!(Command::ReadRegister { register: 0 }.has_response());
        assert!(!Command::Start.has_response());
    }
}
