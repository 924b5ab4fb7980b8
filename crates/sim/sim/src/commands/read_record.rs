use simkit_apdu_core::{Bytes, ExpectedLength};
use simkit_apdu_macros::apdu_pair;

use crate::constants::{CLA_GSM, ins};

/// Absolute record addressing mode (P2)
const MODE_ABSOLUTE: u8 = 0x04;

apdu_pair! {
    /// READ RECORD command in absolute mode
    pub struct ReadRecord {
        command {
            cla: CLA_GSM,
            ins: ins::READ_RECORD,

            builders {
                /// Read record number `record` (1-based) of `le` bytes
                pub const fn record(record: u8, le: ExpectedLength) -> Self {
                    Self::new(record, MODE_ABSOLUTE).with_le(le)
                }
            }
        }

        response {
            ok {
                /// Record content
                #[sw(0x90, 0x00)]
                #[payload(field = "data")]
                Success {
                    /// Bytes of the record
                    data: Bytes,
                },
            }

            errors {
                /// `94 00`
                #[sw(0x94, 0x00)]
                #[error("No EF selected")]
                NoEfSelected,

                /// `94 02`
                #[sw(0x94, 0x02)]
                #[error("Out of range (invalid record)")]
                RecordNotFound,

                /// `94 08`
                #[sw(0x94, 0x08)]
                #[error("File is inconsistent with the command")]
                Inconsistent,

                /// `98 04`
                #[sw(0x98, 0x04)]
                #[error("Access condition not fulfilled")]
                AccessDenied,

                /// `67 XX`
                #[sw(0x67, _)]
                #[error("Incorrect parameter P3, {sw2:02X} expected")]
                WrongLength {
                    /// Record length the card expected
                    sw2: u8,
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use simkit_apdu_core::ApduCommand;

    use super::*;

    #[test]
    fn test_read_record_command() {
        assert_eq!(
            ReadRecordCommand::record(1, 0x2C).to_bytes().as_ref(),
            &[0xA0, 0xB2, 0x01, 0x04, 0x2C]
        );
    }

    #[test]
    fn test_read_record_response() {
        assert_eq!(
            ReadRecordCommand::parse_response_raw(&[0x0A, 0x0B, 0x90, 0x00]),
            Ok(ReadRecordOk::Success {
                data: Bytes::from_static(&[0x0A, 0x0B]),
            })
        );
        assert_eq!(
            ReadRecordCommand::parse_response_raw(&[0x94, 0x02]),
            Err(ReadRecordError::RecordNotFound)
        );
        assert_eq!(
            ReadRecordCommand::parse_response_raw(&[0x67, 0x1C]),
            Err(ReadRecordError::WrongLength { sw2: 0x1C })
        );
    }
}
