use simkit_apdu_core::Bytes;
use simkit_apdu_macros::apdu_pair;

use crate::constants::{CLA_GSM, ins, lengths};

apdu_pair! {
    /// RUN GSM ALGORITHM (INTERNAL AUTHENTICATE) command
    ///
    /// The card answers `9F 0C`; SRES and Kc are then fetched with GET RESPONSE.
    pub struct InternalAuthenticate {
        command {
            cla: CLA_GSM,
            ins: ins::INTERNAL_AUTHENTICATE,

            builders {
                /// Submit a 16 byte RAND
                pub fn rand(rand: [u8; lengths::RAND]) -> Self {
                    Self::rand_with_params(0x00, 0x00, rand)
                }

                /// Submit a RAND with explicit P1/P2
                pub fn rand_with_params(p1: u8, p2: u8, rand: [u8; lengths::RAND]) -> Self {
                    Self::new(p1, p2).with_data(Bytes::copy_from_slice(&rand))
                }
            }
        }

        response {
            ok {
                /// SRES and Kc wait for GET RESPONSE
                #[sw(0x9F, _)]
                ResponseAvailable {
                    /// Length of the algorithm output
                    sw2: u8,
                },
            }

            errors {
                /// `94 00`, DF GSM is not the current directory
                #[sw(0x94, 0x00)]
                #[error("No EF selected")]
                NoEfSelected,

                /// `98 04`
                #[sw(0x98, 0x04)]
                #[error("Access condition not fulfilled")]
                AccessDenied,

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
