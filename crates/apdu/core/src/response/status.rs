//! Status word definitions for APDU responses
//!
//! Only the ISO/IEC 7816-4 interindustry codes live here. Application specific
//! families (GSM 11.11 `91`, `92`, `94`, `98`, `9E`, `9F`) are interpreted by
//! the crates that speak those applications.

use std::fmt;

/// Status Word (SW1-SW2) from an APDU response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusWord {
    /// First status byte (SW1)
    pub sw1: u8,
    /// Second status byte (SW2)
    pub sw2: u8,
}

impl StatusWord {
    /// Create a new status word
    pub const fn new(sw1: u8, sw2: u8) -> Self {
        Self { sw1, sw2 }
    }

    /// Create from a u16 value (SW1 | SW2)
    pub const fn from_u16(status: u16) -> Self {
        Self {
            sw1: (status >> 8) as u8,
            sw2: status as u8,
        }
    }

    /// Convert to a u16 value (SW1 | SW2)
    pub const fn to_u16(&self) -> u16 {
        ((self.sw1 as u16) << 8) | (self.sw2 as u16)
    }

    /// Check if this status word indicates success (90 00)
    pub const fn is_success(&self) -> bool {
        self.sw1 == 0x90 && self.sw2 == 0x00
    }

    /// Check if this status word indicates more data is available (61 XX)
    pub const fn is_more_data_available(&self) -> bool {
        self.sw1 == 0x61
    }

    /// Check if this status word indicates a warning (62 XX or 63 XX)
    pub const fn is_warning(&self) -> bool {
        self.sw1 == 0x62 || self.sw1 == 0x63
    }

    /// Get a description of this status word
    pub const fn description(&self) -> &'static str {
        match (self.sw1, self.sw2) {
            (0x90, 0x00) => "Success",
            (0x61, _) => "More data available",
            (0x62, 0x00) => "No information given",
            (0x62, 0x81) => "Part of returned data may be corrupted",
            (0x62, 0x82) => "End of file/record reached before reading Le bytes",
            (0x62, 0x83) => "Selected file invalidated",
            (0x62, 0x84) => "FCI not formatted according to specification",
            (0x63, 0x00) => "No information given",
            (0x63, 0x81) => "File filled up by the last write",
            (0x63, n) if (n & 0xF0) == 0xC0 => "Counter value",
            (0x64, 0x00) => "State of non-volatile memory unchanged",
            (0x65, 0x00) => "State of non-volatile memory changed",
            (0x65, 0x81) => "Memory failure",
            (0x67, 0x00) => "Wrong length",
            (0x68, 0x81) => "Logical channel not supported",
            (0x68, 0x82) => "Secure messaging not supported",
            (0x69, 0x81) => "Command incompatible with file structure",
            (0x69, 0x82) => "Security status not satisfied",
            (0x69, 0x83) => "Authentication method blocked",
            (0x69, 0x84) => "Referenced data invalidated",
            (0x69, 0x85) => "Conditions of use not satisfied",
            (0x69, 0x86) => "Command not allowed",
            (0x69, 0x87) => "Expected SM data objects missing",
            (0x69, 0x88) => "SM data objects incorrect",
            (0x6A, 0x80) => "Incorrect parameters in the data field",
            (0x6A, 0x81) => "Function not supported",
            (0x6A, 0x82) => "File not found",
            (0x6A, 0x83) => "Record not found",
            (0x6A, 0x84) => "Not enough memory space in the file",
            (0x6A, 0x85) => "Lc inconsistent with TLV structure",
            (0x6A, 0x86) => "Incorrect parameters P1-P2",
            (0x6A, 0x87) => "Lc inconsistent with P1-P2",
            (0x6A, 0x88) => "Referenced data not found",
            (0x6B, 0x00) => "Wrong parameters P1-P2",
            (0x6C, _) => "Wrong Le field",
            (0x6D, 0x00) => "Instruction code not supported or invalid",
            (0x6E, 0x00) => "Class not supported",
            (0x6F, 0x00) => "No precise diagnosis",
            _ => "Unknown status word",
        }
    }
}

impl From<(u8, u8)> for StatusWord {
    fn from(tuple: (u8, u8)) -> Self {
        Self::new(tuple.0, tuple.1)
    }
}

impl From<u16> for StatusWord {
    fn from(status: u16) -> Self {
        Self::from_u16(status)
    }
}

impl From<StatusWord> for u16 {
    fn from(status: StatusWord) -> Self {
        status.to_u16()
    }
}

impl fmt::Display for StatusWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X} {:02X}", self.sw1, self.sw2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_word_from_to_u16() {
        let sw = StatusWord::from_u16(0x9F0C);
        assert_eq!(sw.sw1, 0x9F);
        assert_eq!(sw.sw2, 0x0C);
        assert_eq!(sw.to_u16(), 0x9F0C);
        assert_eq!(StatusWord::from((0x90, 0x00)), StatusWord::new(0x90, 0x00));
    }

    #[test]
    fn test_status_word_is_methods() {
        assert!(StatusWord::new(0x90, 0x00).is_success());
        assert!(!StatusWord::new(0x9F, 0x0C).is_success());
        assert!(StatusWord::new(0x61, 0x10).is_more_data_available());
        assert!(StatusWord::new(0x62, 0x83).is_warning());
        assert!(!StatusWord::new(0x98, 0x04).is_warning());
    }

    #[test]
    fn test_status_word_description() {
        assert_eq!(StatusWord::new(0x90, 0x00).description(), "Success");
        assert_eq!(StatusWord::new(0x6A, 0x82).description(), "File not found");
        assert_eq!(
            StatusWord::new(0x6E, 0x00).description(),
            "Class not supported"
        );
        assert_eq!(
            StatusWord::new(0x12, 0x34).description(),
            "Unknown status word"
        );
    }

    #[test]
    fn test_status_word_display() {
        assert_eq!(StatusWord::new(0x9F, 0x0C).to_string(), "9F 0C");
    }
}
