use simkit_apdu_core::{Bytes, ExpectedLength};
use simkit_apdu_macros::apdu_pair;

use crate::constants::{CLA_GSM, ins};

apdu_pair! {
    /// GET RESPONSE command, fetching what a `9F XX` status announced
    pub struct GetResponse {
        command {
            cla: CLA_GSM,
            ins: ins::GET_RESPONSE,

            builders {
                /// Fetch `le` bytes
                pub const fn expecting(le: ExpectedLength) -> Self {
                    Self::new(0x00, 0x00).with_le(le)
                }
            }
        }

        response {
            ok {
                /// Pending response data
                #[sw(0x90, 0x00)]
                #[payload(field = "data")]
                Success {
                    /// Descriptor or algorithm output
                    data: Bytes,
                },
            }

            errors {
                /// `67 XX`
                #[sw(0x67, _)]
                #[error("Incorrect parameter P3, {sw2:02X} expected")]
                WrongLength {
                    /// Length the card expected
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

#[cfg(test)]
mod tests {
    use simkit_apdu_core::ApduCommand;

    use super::*;

    #[test]
    fn test_get_response_command() {
        let cmd = GetResponseCommand::expecting(0x0C);
        assert_eq!(cmd.to_bytes().as_ref(), &[0xA0, 0xC0, 0x00, 0x00, 0x0C]);
    }

    #[test]
    fn test_get_response_response() {
        assert_eq!(
            GetResponseCommand::parse_response_raw(&[0x01, 0x02, 0x90, 0x00]),
            Ok(GetResponseOk::Success {
                data: Bytes::from_static(&[0x01, 0x02]),
            })
        );
        assert_eq!(
            GetResponseCommand::parse_response_raw(&[0x67, 0x0F]),
            Err(GetResponseError::WrongLength { sw2: 0x0F })
        );
        assert!(matches!(
            GetResponseCommand::parse_response_raw(&[0x90]),
            Err(GetResponseError::ResponseError(_))
        ));
    }
}
