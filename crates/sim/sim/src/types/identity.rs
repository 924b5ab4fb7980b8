use std::fmt;

use crate::constants::lengths;
use crate::error::{Error, Result};

use super::bcd::{decode_bcd, nibble_char};

/// International mobile subscriber identity, as digits
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Imsi(String);

impl Imsi {
    /// Decode the 9 byte content of EF IMSI
    ///
    /// Byte 0 is the length, the low nibble of byte 1 the parity.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != lengths::IMSI {
            return Err(Error::MalformedPayload {
                item: "IMSI",
                expected: lengths::IMSI,
                actual: bytes.len(),
            });
        }

        let last = usize::from(bytes[0]).clamp(1, lengths::IMSI - 1);
        let mut digits = first_digit(bytes[1]);
        digits.push_str(&decode_bcd(&bytes[2..=last]));
        Ok(Self(digits))
    }

    /// All digits
    pub fn digits(&self) -> &str {
        &self.0
    }

    /// Mobile country code (first three digits)
    pub fn mcc(&self) -> &str {
        self.0.get(0..3).unwrap_or("")
    }

    /// Mobile network code, assuming three digits
    pub fn mnc(&self) -> &str {
        self.0.get(3..6).unwrap_or("")
    }
}

fn first_digit(byte: u8) -> String {
    match byte >> 4 {
        0x0F => String::new(),
        nibble => nibble_char(nibble).to_string(),
    }
}

impl fmt::Display for Imsi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Integrated circuit card identifier, as digits
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Iccid(String);

impl Iccid {
    /// Decode the 10 byte content of EF ICCID
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != lengths::ICCID {
            return Err(Error::MalformedPayload {
                item: "ICCID",
                expected: lengths::ICCID,
                actual: bytes.len(),
            });
        }
        Ok(Self(decode_bcd(bytes)))
    }

    /// All digits
    pub fn digits(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iccid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imsi() {
        // 001010123456789, odd length
        let imsi =
            Imsi::from_bytes(&[0x08, 0x09, 0x10, 0x10, 0x10, 0x32, 0x54, 0x76, 0x98]).unwrap();
        assert_eq!(imsi.digits(), "001010123456789");
        assert_eq!(imsi.mcc(), "001");
        assert_eq!(imsi.mnc(), "010");
        assert_eq!(imsi.to_string(), "001010123456789");
    }

    #[test]
    fn test_imsi_wrong_length() {
        assert!(matches!(
            Imsi::from_bytes(&[0x08; 8]),
            Err(Error::MalformedPayload {
                expected: 9,
                actual: 8,
                ..
            })
        ));
    }

    #[test]
    fn test_iccid() {
        let iccid = Iccid::from_bytes(&[
            0x98, 0x94, 0x00, 0x21, 0x43, 0x65, 0x87, 0x09, 0x21, 0xF3,
        ])
        .unwrap();
        assert_eq!(iccid.digits(), "8949001234567890123");
    }
}
