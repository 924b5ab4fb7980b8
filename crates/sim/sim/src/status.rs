//! Status word interpretation for GSM SIM cards
//!
//! GSM 11.11 extends the ISO 7816-4 status words with the `91`, `92`, `93`,
//! `94`, `98`, `9E` and `9F` families. [`interpret`] maps any status word to a
//! [`StatusOutcome`]; words outside those families fall back to the base
//! ISO classification carried by [`StatusWord`].

use std::fmt;

use derive_more::Display;
use simkit_apdu_core::StatusWord;
use tracing::Level;

/// Coarse classification of a status word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum StatusClass {
    /// Command completed normally
    Success,
    /// Command completed and the card has more to say
    Informational,
    /// Command completed with a caveat
    Warning,
    /// Command failed
    Error,
}

/// `92 XX` memory management family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryStatus {
    /// `92 0X`: successful after X internal retries
    SucceededAfterRetries(u8),
    /// `92 40`
    MemoryProblem,
    /// Any other `92 XX`
    Other(u8),
}

/// `94 XX` referencing management family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferencingStatus {
    /// `94 00`
    NoEfSelected,
    /// `94 02`
    OutOfRange,
    /// `94 04`
    NotFound,
    /// `94 08`
    Inconsistent,
    /// Any other `94 XX`
    Other(u8),
}

/// `98 XX` security management family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityStatus {
    /// `98 02`
    NoChvInitialized,
    /// `98 04`
    AccessDenied,
    /// `98 08`
    ChvContradiction,
    /// `98 10`
    InvalidationContradiction,
    /// `98 40`
    ChvBlocked,
    /// `98 50`
    CounterAtMax,
    /// `98 62`
    AuthenticationError,
    /// `98 63`
    SessionExpired,
    /// Any other `98 XX`
    Other(u8),
}

/// Family specific meaning of a status word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusDetail {
    /// `91 XX`: proactive command pending, XX response bytes
    TerminalCommand {
        /// Length of the response data
        length: u8,
    },
    /// `9E XX`: data download error, XX response bytes
    DataDownloadError {
        /// Length of the response data
        length: u8,
    },
    /// `9F XX`: XX response bytes available through GET RESPONSE
    ResponseAvailable {
        /// Length of the response data
        length: u8,
    },
    /// `93 00`
    ToolkitBusy,
    /// `92 XX`
    Memory(MemoryStatus),
    /// `94 XX`
    Referencing(ReferencingStatus),
    /// `98 XX`
    Security(SecurityStatus),
    /// Anything else, described by ISO 7816-4
    Base,
}

/// Semantic outcome of a status word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusOutcome {
    /// The status word interpreted
    pub status: StatusWord,
    /// Coarse classification
    pub class: StatusClass,
    /// Family specific meaning
    pub detail: StatusDetail,
}

impl StatusOutcome {
    /// Human readable description
    pub fn description(&self) -> String {
        self.to_string()
    }

    /// Only `90 00` counts as success
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Level at which this outcome should be logged
    pub const fn tracing_level(&self) -> Level {
        match self.class {
            StatusClass::Success | StatusClass::Informational => Level::DEBUG,
            StatusClass::Warning => Level::INFO,
            StatusClass::Error => Level::WARN,
        }
    }

    /// Number of bytes waiting for GET RESPONSE, for `9F XX`
    pub const fn response_length(&self) -> Option<u8> {
        match self.detail {
            StatusDetail::ResponseAvailable { length } => Some(length),
            _ => None,
        }
    }
}

impl fmt::Display for StatusOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.detail {
            StatusDetail::TerminalCommand { length } => write!(
                f,
                "normal processing, with extra info containing a command for the terminal: \
                 length of the response data {length}"
            ),
            StatusDetail::DataDownloadError { length } => write!(
                f,
                "normal processing, SIM data download error: \
                 length of the response data {length}"
            ),
            StatusDetail::ResponseAvailable { length } => {
                write!(f, "normal processing: length of the response data {length}")
            }
            StatusDetail::ToolkitBusy => f.write_str(
                "SIM application toolkit busy, command cannot be executed at present",
            ),
            StatusDetail::Memory(memory) => {
                f.write_str("memory management")?;
                match memory {
                    MemoryStatus::SucceededAfterRetries(n) => {
                        write!(f, ": command successful but after {n} retry routine")
                    }
                    MemoryStatus::MemoryProblem => f.write_str(": memory problem"),
                    MemoryStatus::Other(_) => Ok(()),
                }
            }
            StatusDetail::Referencing(referencing) => {
                f.write_str("referencing management")?;
                f.write_str(match referencing {
                    ReferencingStatus::NoEfSelected => ": no EF selected",
                    ReferencingStatus::OutOfRange => ": out of range (invalid address)",
                    ReferencingStatus::NotFound => ": file ID or pattern not found",
                    ReferencingStatus::Inconsistent => ": file inconsistent with the command",
                    ReferencingStatus::Other(_) => "",
                })
            }
            StatusDetail::Security(security) => {
                f.write_str("security management")?;
                f.write_str(match security {
                    SecurityStatus::NoChvInitialized => ": no CHV initialized",
                    SecurityStatus::AccessDenied => {
                        ": access condition not fulfilled, at least 1 attempt left"
                    }
                    SecurityStatus::ChvContradiction => ": in contradiction with CHV status",
                    SecurityStatus::InvalidationContradiction => {
                        ": in contradiction with invalidation status"
                    }
                    SecurityStatus::ChvBlocked => {
                        ": unsuccessful CHV verification, no attempt left"
                    }
                    SecurityStatus::CounterAtMax => {
                        ": increase cannot be performed, max value reached"
                    }
                    SecurityStatus::AuthenticationError => {
                        ": authentication error, application specific"
                    }
                    SecurityStatus::SessionExpired => ": security session expired",
                    SecurityStatus::Other(_) => "",
                })
            }
            StatusDetail::Base => f.write_str(self.status.description()),
        }
    }
}

/// Interpret a status word
///
/// Total and pure: every pair maps to some outcome.
pub const fn interpret(status: StatusWord) -> StatusOutcome {
    let StatusWord { sw1, sw2 } = status;
    let (class, detail) = match sw1 {
        0x91 => (
            StatusClass::Informational,
            StatusDetail::TerminalCommand { length: sw2 },
        ),
        0x9E => (
            StatusClass::Informational,
            StatusDetail::DataDownloadError { length: sw2 },
        ),
        0x9F => (
            StatusClass::Informational,
            StatusDetail::ResponseAvailable { length: sw2 },
        ),
        0x93 if sw2 == 0x00 => (StatusClass::Warning, StatusDetail::ToolkitBusy),
        0x92 => match sw2 {
            0x00..=0x0F => (
                StatusClass::Warning,
                StatusDetail::Memory(MemoryStatus::SucceededAfterRetries(sw2)),
            ),
            0x40 => (
                StatusClass::Error,
                StatusDetail::Memory(MemoryStatus::MemoryProblem),
            ),
            other => (
                StatusClass::Error,
                StatusDetail::Memory(MemoryStatus::Other(other)),
            ),
        },
        0x94 => (
            StatusClass::Error,
            StatusDetail::Referencing(match sw2 {
                0x00 => ReferencingStatus::NoEfSelected,
                0x02 => ReferencingStatus::OutOfRange,
                0x04 => ReferencingStatus::NotFound,
                0x08 => ReferencingStatus::Inconsistent,
                other => ReferencingStatus::Other(other),
            }),
        ),
        0x98 => (
            StatusClass::Error,
            StatusDetail::Security(match sw2 {
                0x02 => SecurityStatus::NoChvInitialized,
                0x04 => SecurityStatus::AccessDenied,
                0x08 => SecurityStatus::ChvContradiction,
                0x10 => SecurityStatus::InvalidationContradiction,
                0x40 => SecurityStatus::ChvBlocked,
                0x50 => SecurityStatus::CounterAtMax,
                0x62 => SecurityStatus::AuthenticationError,
                0x63 => SecurityStatus::SessionExpired,
                other => SecurityStatus::Other(other),
            }),
        ),
        _ => (base_class(status), StatusDetail::Base),
    };

    StatusOutcome {
        status,
        class,
        detail,
    }
}

const fn base_class(status: StatusWord) -> StatusClass {
    if status.is_success() {
        StatusClass::Success
    } else if status.is_more_data_available() {
        StatusClass::Informational
    } else if status.is_warning() {
        StatusClass::Warning
    } else {
        StatusClass::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn describe(sw1: u8, sw2: u8) -> (StatusClass, String) {
        let outcome = interpret(StatusWord::new(sw1, sw2));
        (outcome.class, outcome.description())
    }

    #[test]
    fn test_length_carrying_families() {
        assert_eq!(
            describe(0x91, 0x1A),
            (
                StatusClass::Informational,
                "normal processing, with extra info containing a command for the terminal: \
                 length of the response data 26"
                    .to_string()
            )
        );
        assert_eq!(
            describe(0x9E, 0x05).1,
            "normal processing, SIM data download error: length of the response data 5"
        );

        let outcome = interpret(StatusWord::new(0x9F, 0x0C));
        assert_eq!(outcome.class, StatusClass::Informational);
        assert_eq!(outcome.response_length(), Some(12));
        assert_eq!(
            outcome.description(),
            "normal processing: length of the response data 12"
        );
    }

    #[test]
    fn test_toolkit_busy() {
        assert_eq!(
            describe(0x93, 0x00),
            (
                StatusClass::Warning,
                "SIM application toolkit busy, command cannot be executed at present".to_string()
            )
        );
        // Only 93 00 is part of the table
        assert_eq!(describe(0x93, 0x01).1, "Unknown status word");
    }

    #[test]
    fn test_memory_management() {
        assert_eq!(
            describe(0x92, 0x03),
            (
                StatusClass::Warning,
                "memory management: command successful but after 3 retry routine".to_string()
            )
        );
        assert_eq!(
            describe(0x92, 0x40),
            (
                StatusClass::Error,
                "memory management: memory problem".to_string()
            )
        );
        assert_eq!(
            describe(0x92, 0x20),
            (StatusClass::Error, "memory management".to_string())
        );
    }

    #[test]
    fn test_referencing_management() {
        let table = [
            (0x00, "referencing management: no EF selected"),
            (0x02, "referencing management: out of range (invalid address)"),
            (0x04, "referencing management: file ID or pattern not found"),
            (0x08, "referencing management: file inconsistent with the command"),
            (0x06, "referencing management"),
        ];
        for (sw2, text) in table {
            assert_eq!(describe(0x94, sw2), (StatusClass::Error, text.to_string()));
        }
    }

    #[test]
    fn test_security_management() {
        let table = [
            (0x02, "security management: no CHV initialized"),
            (
                0x04,
                "security management: access condition not fulfilled, at least 1 attempt left",
            ),
            (0x08, "security management: in contradiction with CHV status"),
            (
                0x10,
                "security management: in contradiction with invalidation status",
            ),
            (
                0x40,
                "security management: unsuccessful CHV verification, no attempt left",
            ),
            (
                0x50,
                "security management: increase cannot be performed, max value reached",
            ),
            (
                0x62,
                "security management: authentication error, application specific",
            ),
            (0x63, "security management: security session expired"),
            (0x01, "security management"),
        ];
        for (sw2, text) in table {
            assert_eq!(describe(0x98, sw2), (StatusClass::Error, text.to_string()));
        }
    }

    #[test]
    fn test_base_fallback() {
        assert_eq!(
            describe(0x90, 0x00),
            (StatusClass::Success, "Success".to_string())
        );
        assert_eq!(describe(0x61, 0x10).0, StatusClass::Informational);
        assert_eq!(describe(0x62, 0x83).0, StatusClass::Warning);
        assert_eq!(
            describe(0x6A, 0x82),
            (StatusClass::Error, "File not found".to_string())
        );
        assert_eq!(describe(0x6F, 0x00).0, StatusClass::Error);
    }

    #[test]
    fn test_tracing_level() {
        assert_eq!(
            interpret(StatusWord::new(0x9F, 0x0F)).tracing_level(),
            Level::DEBUG
        );
        assert_eq!(
            interpret(StatusWord::new(0x92, 0x01)).tracing_level(),
            Level::INFO
        );
        assert_eq!(
            interpret(StatusWord::new(0x98, 0x04)).tracing_level(),
            Level::WARN
        );
    }

    #[test]
    fn test_total_over_all_pairs() {
        for sw1 in 0..=u8::MAX {
            for sw2 in 0..=u8::MAX {
                let outcome = interpret(StatusWord::new(sw1, sw2));
                assert!(!outcome.description().is_empty());
                assert_eq!(
                    outcome.is_success(),
                    (sw1, sw2) == (0x90, 0x00),
                    "{sw1:02X} {sw2:02X}"
                );
            }
        }
    }
}
