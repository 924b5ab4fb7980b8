use std::fmt;

use super::bcd::decode_bcd;

/// Length of the number block: length byte, TON/NPI, ten BCD bytes
const NUMBER_BLOCK_LEN: usize = 12;
/// Fixed tail of an EF MSISDN record after the alpha identifier
const MSISDN_TAIL_LEN: usize = 14;
/// Fixed tail of an EF SMSP record after the alpha identifier
const SMSP_TAIL_LEN: usize = 28;
/// Offset of the service centre address inside the SMSP tail
const SMSP_SERVICE_CENTRE_OFFSET: usize = 13;

/// A dialling number as stored in MSISDN and SMSP records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialingNumber {
    /// Type of number and numbering plan
    pub ton_npi: u8,
    /// Number digits
    pub digits: String,
}

impl DialingNumber {
    /// Decode the number of an EF MSISDN record
    pub fn from_msisdn_record(record: &[u8]) -> Option<Self> {
        let start = record.len().checked_sub(MSISDN_TAIL_LEN)?;
        Self::from_block(&record[start..start + NUMBER_BLOCK_LEN])
    }

    /// Decode the service centre address of an EF SMSP record
    pub fn from_smsp_record(record: &[u8]) -> Option<Self> {
        let start = record.len().checked_sub(SMSP_TAIL_LEN)? + SMSP_SERVICE_CENTRE_OFFSET;
        Self::from_block(&record[start..start + NUMBER_BLOCK_LEN])
    }

    /// `block` starts with the length byte, which counts TON/NPI and the BCD bytes
    fn from_block(block: &[u8]) -> Option<Self> {
        let length = usize::from(block[0]);
        if length == 0 || length == 0xFF {
            return None;
        }

        let end = (1 + length).min(block.len());
        Some(Self {
            ton_npi: block[1],
            digits: decode_bcd(&block[2..end]),
        })
    }

    /// Type of number is "international"
    pub const fn is_international(&self) -> bool {
        (self.ton_npi >> 4) & 0x07 == 0x01
    }
}

impl fmt::Display for DialingNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_international() {
            f.write_str("+")?;
        }
        f.write_str(&self.digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msisdn_record() {
        // Alpha "ME" then +491701234567
        let mut record = vec![b'M', b'E'];
        record.extend_from_slice(&[0x07, 0x91, 0x94, 0x71, 0x10, 0x32, 0x54, 0x76]);
        record.extend_from_slice(&[0xFF; 6]);
        let number = DialingNumber::from_msisdn_record(&record).unwrap();
        assert_eq!(number.digits, "491701234567");
        assert_eq!(number.to_string(), "+491701234567");
    }

    #[test]
    fn test_unused_msisdn_record() {
        assert_eq!(DialingNumber::from_msisdn_record(&[0xFF; 14]), None);
        assert_eq!(DialingNumber::from_msisdn_record(&[0xFF; 13]), None);
    }

    #[test]
    fn test_smsp_service_centre() {
        let mut record = vec![0xFF; 16];
        record.push(0xFD); // parameter indicators
        record.extend_from_slice(&[0xFF; 12]); // destination address
        record.extend_from_slice(&[0x06, 0x91, 0x94, 0x71, 0x12, 0x00, 0xF3]);
        record.extend_from_slice(&[0xFF; 5]);
        record.extend_from_slice(&[0x00, 0x00, 0xFF]);
        assert_eq!(record.len(), 44);

        let number = DialingNumber::from_smsp_record(&record).unwrap();
        assert_eq!(number.to_string(), "+491721003");
    }
}
