use simkit_apdu_core::Bytes;
use simkit_apdu_macros::apdu_pair;

use crate::constants::{CLA_GSM, ins};

apdu_pair! {
    /// UPDATE BINARY command on the currently selected transparent EF
    pub struct UpdateBinary {
        command {
            cla: CLA_GSM,
            ins: ins::UPDATE_BINARY,

            builders {
                /// Write `data` at the start of the file
                pub fn write(data: impl Into<Bytes>) -> Self {
                    Self::write_at(0, data)
                }

                /// Write `data` at `offset`
                pub fn write_at(offset: u16, data: impl Into<Bytes>) -> Self {
                    let [high, low] = offset.to_be_bytes();
                    Self::new(high, low).with_data(data)
                }
            }
        }

        response {
            ok {
                /// Content written
                #[sw(0x90, 0x00)]
                Updated,

                /// Content written after `sw2` internal retries
                #[sw(0x92, !0x40)]
                UpdatedAfterRetries {
                    /// Retry count in the low nibble
                    sw2: u8,
                },
            }

            errors {
                /// `92 40`
                #[sw(0x92, 0x40)]
                #[error("Memory problem")]
                MemoryProblem,

                /// `94 00`
                #[sw(0x94, 0x00)]
                #[error("No EF selected")]
                NoEfSelected,

                /// `94 02`
                #[sw(0x94, 0x02)]
                #[error("Out of range (invalid address)")]
                OutOfRange,

                /// `98 04`
                #[sw(0x98, 0x04)]
                #[error("Access condition not fulfilled")]
                AccessDenied,

                /// `98 10`
                #[sw(0x98, 0x10)]
                #[error("In contradiction with invalidation status")]
                Invalidated,
            }
        }
    }
}
