use std::fmt;

use super::bcd::nibble_char;

/// Public land mobile network identity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Plmn {
    /// Mobile country code, three digits
    pub mcc: String,
    /// Mobile network code, two or three digits
    pub mnc: String,
}

impl Plmn {
    /// Encoded size
    pub const LEN: usize = 3;

    /// Decode a 3 byte PLMN, `None` for the unused `FF FF FF` entry
    pub fn from_bytes(bytes: [u8; 3]) -> Option<Self> {
        if bytes == [0xFF; 3] {
            return None;
        }

        let mcc = [bytes[0] & 0x0F, bytes[0] >> 4, bytes[1] & 0x0F]
            .into_iter()
            .map(nibble_char)
            .collect();

        let mut mnc: String = [bytes[2] & 0x0F, bytes[2] >> 4]
            .into_iter()
            .map(nibble_char)
            .collect();
        if bytes[1] >> 4 != 0x0F {
            mnc.push(nibble_char(bytes[1] >> 4));
        }

        Some(Self { mcc, mnc })
    }
}

impl fmt::Display for Plmn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.mcc, self.mnc)
    }
}

/// Decode a PLMN list (PLMNsel, FPLMN), stopping at the first unused entry
pub fn decode_plmn_list(bytes: &[u8]) -> Vec<Plmn> {
    bytes
        .chunks_exact(Plmn::LEN)
        .map_while(|chunk| Plmn::from_bytes([chunk[0], chunk[1], chunk[2]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_digit_mnc() {
        let plmn = Plmn::from_bytes([0x62, 0xF2, 0x10]).unwrap();
        assert_eq!(plmn.mcc, "262");
        assert_eq!(plmn.mnc, "01");
        assert_eq!(plmn.to_string(), "262-01");
    }

    #[test]
    fn test_three_digit_mnc() {
        let plmn = Plmn::from_bytes([0x13, 0x00, 0x62]).unwrap();
        assert_eq!(plmn.mcc, "310");
        assert_eq!(plmn.mnc, "260");
    }

    #[test]
    fn test_list_stops_at_unused_entry() {
        let list = decode_plmn_list(&[
            0x62, 0xF2, 0x10, 0x02, 0xF8, 0x01, 0xFF, 0xFF, 0xFF, 0x62, 0xF2, 0x20,
        ]);
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].to_string(), "208-10");
        assert!(decode_plmn_list(&[]).is_empty());
    }
}
