use simkit_apdu_core::Bytes;
use simkit_apdu_macros::apdu_pair;

use crate::application::{Chv, Pin};
use crate::constants::{CLA_GSM, ins};

apdu_pair! {
    /// VERIFY CHV command
    pub struct VerifyChv {
        command {
            cla: CLA_GSM,
            ins: ins::VERIFY_CHV,

            builders {
                /// Present `pin` as the given CHV
                pub fn chv(chv: Chv, pin: &Pin) -> Self {
                    let block = Bytes::copy_from_slice(&pin.to_block());
                    Self::new(0x00, chv.reference()).with_data(block)
                }
            }
        }

        response {
            ok {
                /// CHV accepted
                #[sw(0x90, 0x00)]
                Verified,
            }

            errors {
                /// `98 02`
                #[sw(0x98, 0x02)]
                #[error("No CHV initialised")]
                NotInitialised,

                /// `98 04`, one attempt used up
                #[sw(0x98, 0x04)]
                #[error("Unsuccessful CHV verification, at least one attempt left")]
                Rejected,

                /// `98 08`
                #[sw(0x98, 0x08)]
                #[error("In contradiction with CHV status")]
                ChvStatus,

                /// `98 40`
                #[sw(0x98, 0x40)]
                #[error("Unsuccessful CHV verification, no attempt left")]
                Blocked,
            }
        }
    }
}
