//! Expansion of `apdu_pair!` against the APDU core
#![allow(missing_docs, unreachable_pub)]

use simkit_apdu_core::{ApduCommand, StatusWord};
use simkit_apdu_macros::apdu_pair;

const CLA_GSM: u8 = 0xA0;
const SW1_SECURITY: u8 = 0x98;
const SW_OK: StatusWord = StatusWord::new(0x90, 0x00);

apdu_pair! {
    /// STATUS
    pub struct Status {
        command {
            cla: CLA_GSM,
            ins: 0xF2,

            builders {
                /// Fetch `le` bytes of the current directory descriptor
                pub const fn current_directory(le: u8) -> Self {
                    Self::new(0x00, 0x00).with_le(le)
                }
            }
        }

        response {
            ok {
                /// Descriptor of the current directory
                #[sw(SW_OK)]
                #[payload(field = "descriptor")]
                Descriptor {
                    descriptor: Vec<u8>,
                    retries: u8,
                },

                /// Proactive command pending
                #[sw(0x91, !0x00)]
                Proactive {
                    sw2: u8,
                },
            }

            errors {
                #[sw(SW1_SECURITY, _)]
                #[error("Security management {sw1:02X}{sw2:02X}")]
                Security {
                    sw1: u8,
                    sw2: u8,
                },
            }
        }
    }
}

apdu_pair! {
    struct Sleep {
        command {
            cla: CLA_GSM,
            ins: 0xFA,
        }

        response {
            ok {
                #[sw(0x90, 0x00)]
                Done,
            }
        }
    }
}

#[test]
fn test_command_bytes() {
    let command = StatusCommand::current_directory(0x16);
    assert_eq!(command.class(), 0xA0);
    assert_eq!(command.instruction(), 0xF2);
    assert_eq!(command.data(), None);
    assert_eq!(command.to_bytes().as_ref(), &[0xA0, 0xF2, 0x00, 0x00, 0x16]);

    let command = SleepCommand::new(0x00, 0x00).with_data(vec![0x01]);
    assert_eq!(command.to_bytes().as_ref(), &[0xA0, 0xFA, 0x00, 0x00, 0x01, 0x01]);
}

#[test]
fn test_status_word_constant_and_payload() {
    assert_eq!(
        StatusCommand::parse_response_raw(&[0x7F, 0x20, 0x90, 0x00]),
        Ok(StatusOk::Descriptor {
            descriptor: vec![0x7F, 0x20],
            retries: 0,
        })
    );
}

#[test]
fn test_negated_and_constant_bytes() {
    assert_eq!(
        StatusCommand::parse_response_raw(&[0x91, 0x1A]),
        Ok(StatusOk::Proactive { sw2: 0x1A })
    );
    assert_eq!(
        StatusCommand::parse_response_raw(&[0x91, 0x00]),
        Err(StatusError::Unknown {
            sw1: 0x91,
            sw2: 0x00,
        })
    );

    let err = StatusCommand::parse_response_raw(&[0x98, 0x04]).unwrap_err();
    assert_eq!(
        err,
        StatusError::Security {
            sw1: 0x98,
            sw2: 0x04,
        }
    );
    assert_eq!(err.to_string(), "Security management 9804");
}

#[test]
fn test_unmatched_and_malformed_responses() {
    assert_eq!(
        SleepCommand::parse_response_raw(&[0x6D, 0x00]),
        Err(SleepError::Unknown {
            sw1: 0x6D,
            sw2: 0x00,
        })
    );
    assert_eq!(SleepCommand::parse_response_raw(&[0x90, 0x00]), Ok(SleepOk::Done));
    assert!(matches!(
        SleepCommand::parse_response_raw(&[0x90]),
        Err(SleepError::ResponseError(_))
    ));
}
