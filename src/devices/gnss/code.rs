//! Message return codes
//!
//! A return code packs the protocol of a framed message and its length into
//! one signed value, following the u-blox driver convention:
//! `code = protocol | length`. Non-positive codes carry no message.

/// Mask selecting the length part of a code
pub const LENGTH_MASK: i32 = 0x00_FFFF;

/// Mask selecting the protocol part of a code
pub const PROTOCOL_MASK: i32 = 0xFF_0000;

/// Protocol of a framed message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Protocol {
    /// Bytes that did not frame as any known protocol
    Unknown,
    /// NMEA 0183 sentence (`$...*HH\r\n`)
    Nmea,
    /// u-blox binary frame (`B5 62 ...`)
    Ubx,
}

impl Protocol {
    /// Protocol tag as stored in a return code
    pub const fn bits(self) -> i32 {
        match self {
            Protocol::Unknown => 0x00_0000,
            Protocol::Nmea => 0x10_0000,
            Protocol::Ubx => 0x20_0000,
        }
    }
}

/// Return code of [`GnssSource::get_message`](super::GnssSource::get_message)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MessageCode(i32);

impl MessageCode {
    /// A partial message is buffered, more bytes are needed
    pub const WAIT: Self = Self(-1);

    /// Nothing is buffered
    pub const NOT_FOUND: Self = Self(0);

    /// Code for a message of `len` bytes
    ///
    /// Lengths above the 16-bit field are clamped.
    pub const fn new(protocol: Protocol, len: usize) -> Self {
        let len = if len > LENGTH_MASK as usize {
            LENGTH_MASK
        } else {
            len as i32
        };
        Self(protocol.bits() | len)
    }

    /// Wrap a raw code
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw signed value
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Whether the code carries a message
    pub const fn is_message(self) -> bool {
        self.0 > 0
    }

    /// Message length in bytes
    pub const fn length(self) -> usize {
        (self.0 & LENGTH_MASK) as usize
    }

    /// Message protocol; unrecognized tags read as `Unknown`
    pub const fn protocol(self) -> Protocol {
        match self.0 & PROTOCOL_MASK {
            0x10_0000 => Protocol::Nmea,
            0x20_0000 => Protocol::Ubx,
            _ => Protocol::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_packs_protocol_and_length() {
        let code = MessageCode::new(Protocol::Nmea, 48);
        assert_eq!(code.raw(), 0x10_0030);
        assert_eq!(code.length(), 48);
        assert_eq!(code.protocol(), Protocol::Nmea);
        assert!(code.is_message());

        let code = MessageCode::new(Protocol::Ubx, 0x1234);
        assert_eq!(code.length(), 0x1234);
        assert_eq!(code.protocol(), Protocol::Ubx);
    }

    #[test]
    fn test_unknown_protocol_is_still_a_message() {
        let code = MessageCode::new(Protocol::Unknown, 3);
        assert_eq!(code.raw(), 3);
        assert!(code.is_message());
        assert_eq!(code.protocol(), Protocol::Unknown);
    }

    #[test]
    fn test_special_codes_carry_no_message() {
        assert!(!MessageCode::WAIT.is_message());
        assert!(!MessageCode::NOT_FOUND.is_message());
        assert_eq!(MessageCode::WAIT.raw(), -1);
        assert_eq!(MessageCode::NOT_FOUND.raw(), 0);
    }

    #[test]
    fn test_length_clamped() {
        let code = MessageCode::new(Protocol::Nmea, 0x1_0005);
        assert_eq!(code.length(), 0xFFFF);
        assert_eq!(code.protocol(), Protocol::Nmea);
    }

    #[test]
    fn test_unrecognized_protocol_tag() {
        let code = MessageCode::from_raw(0x30_0010);
        assert_eq!(code.protocol(), Protocol::Unknown);
        assert_eq!(code.length(), 0x10);
    }
}
