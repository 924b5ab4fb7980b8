use simkit_apdu_core::Bytes;
use simkit_apdu_macros::apdu_pair;

use crate::constants::{CLA_GSM, ins};
use crate::file::FileId;

apdu_pair! {
    /// SELECT command for a file identifier
    pub struct Select {
        command {
            cla: CLA_GSM,
            ins: ins::SELECT,

            builders {
                /// Select the given file
                pub fn file(file: FileId) -> Self {
                    Self::new(0x00, 0x00).with_data(Bytes::copy_from_slice(&file.to_bytes()))
                }
            }
        }

        response {
            ok {
                /// File selected, its descriptor waits for GET RESPONSE
                #[sw(0x9F, _)]
                ResponseAvailable {
                    /// Length of the descriptor
                    sw2: u8,
                },

                /// File selected without response data
                #[sw(0x90, 0x00)]
                Selected,
            }

            errors {
                /// `94 04`
                #[sw(0x94, 0x04)]
                #[error("File ID not found")]
                FileNotFound,

                /// `94 XX`
                #[sw(0x94, _)]
                #[error("Referencing error {sw2:02X}")]
                Referencing {
                    /// Second status byte
                    sw2: u8,
                },

                /// `6F XX`
                #[sw(0x6F, _)]
                #[error("Technical problem with no diagnostic given")]
                TechnicalProblem,
            }
        }
    }
}

impl SelectOk {
    /// Bytes waiting for GET RESPONSE
    pub const fn response_length(&self) -> Option<u8> {
        match self {
            Self::ResponseAvailable { sw2 } => Some(*sw2),
            Self::Selected => None,
        }
    }
}
