use simkit_apdu_core::{Bytes, ExpectedLength};
use simkit_apdu_macros::apdu_pair;

use crate::constants::{CLA_GSM, ins};

apdu_pair! {
    /// READ BINARY command on the currently selected transparent EF
    pub struct ReadBinary {
        command {
            cla: CLA_GSM,
            ins: ins::READ_BINARY,

            builders {
                /// Read `le` bytes starting at `offset`
                pub const fn from_offset(offset: u16, le: ExpectedLength) -> Self {
                    let [high, low] = offset.to_be_bytes();
                    Self::new(high, low).with_le(le)
                }
            }
        }

        response {
            ok {
                /// File content
                #[sw(0x90, 0x00)]
                #[payload(field = "data")]
                Success {
                    /// Bytes read
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
                #[error("Out of range (invalid address)")]
                OutOfRange,

                /// `94 08`
                #[sw(0x94, 0x08)]
                #[error("File is inconsistent with the command")]
                Inconsistent,

                /// `98 04`
                #[sw(0x98, 0x04)]
                #[error("Access condition not fulfilled")]
                AccessDenied,

                /// `98 10`
                #[sw(0x98, 0x10)]
                #[error("In contradiction with invalidation status")]
                Invalidated,

                /// `67 XX`
                #[sw(0x67, _)]
                #[error("Incorrect parameter P3, {sw2:02X} expected")]
                WrongLength {
                    /// Length the card expected
                    sw2: u8,
                },
            }
        }
    }
}
