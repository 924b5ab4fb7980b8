use derive_more::Display;
use simkit_apdu_core::TransportError;
use simkit_apdu_core::response::error::ResponseError;

use crate::application::Chv;
use crate::file::{FileId, ParseError};
use crate::status::StatusOutcome;

/// Result type for SIM operations
pub type Result<T> = std::result::Result<T, Error>;

/// The protocol step a failing status word was returned for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Step {
    /// Selecting the owning directory
    #[display("select directory {_0}")]
    SelectDirectory(FileId),
    /// Selecting an elementary file
    #[display("select file {_0}")]
    SelectFile(FileId),
    /// Reading a descriptor with GET RESPONSE
    #[display("get response")]
    GetResponse,
    /// Writing transparent content
    #[display("update {_0}")]
    Update(FileId),
    /// Submitting RAND to the GSM algorithm
    #[display("run GSM algorithm")]
    InternalAuthenticate,
    /// Presenting a CHV
    #[display("verify {_0}")]
    Verify(Chv),
}

/// Error type for SIM operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The card answered a step with anything but the expected status
    #[error("{step} failed with {}: {outcome}", .outcome.status)]
    TransportFailure {
        /// Step that failed
        step: Step,
        /// Interpreted status word
        outcome: StatusOutcome,
    },

    /// Payload does not have the fixed size of the item
    #[error("Malformed {item}: expected {expected} bytes, got {actual}")]
    MalformedPayload {
        /// Name of the item
        item: &'static str,
        /// Expected length
        expected: usize,
        /// Received length
        actual: usize,
    },

    /// The selected file carried no content of the expected shape
    #[error("No content returned for {0}")]
    NoContent(&'static str),

    /// Caller supplied input rejected before any card interaction
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Dispatch table miss
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// File descriptor could not be parsed
    #[error(transparent)]
    Descriptor(#[from] ParseError),

    /// The underlying card link failed
    #[error(transparent)]
    Link(#[from] TransportError),

    /// Raw response too short to carry a status word
    #[error(transparent)]
    Response(#[from] ResponseError),
}

impl Error {
    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput(message.into())
    }

    /// The interpreted status word, for card-side failures
    pub const fn outcome(&self) -> Option<&StatusOutcome> {
        match self {
            Self::TransportFailure { outcome, .. } => Some(outcome),
            _ => None,
        }
    }

    /// Whether the error was raised before touching the card
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::UnknownOperation(_))
    }
}

#[cfg(test)]
mod tests {
    use simkit_apdu_core::StatusWord;

    use super::*;
    use crate::status::interpret;

    #[test]
    fn test_transport_failure_message() {
        let err = Error::TransportFailure {
            step: Step::SelectFile(FileId::EF_IMSI),
            outcome: interpret(StatusWord::new(0x94, 0x04)),
        };
        assert_eq!(
            err.to_string(),
            "select file 6F07 failed with 94 04: \
             referencing management: file ID or pattern not found"
        );
        assert!(err.outcome().is_some());
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_input_errors() {
        assert!(Error::invalid_input("RAND").is_input_error());
        assert!(Error::UnknownOperation("FOO".into()).is_input_error());
        assert!(
            !Error::MalformedPayload {
                item: "IMSI",
                expected: 9,
                actual: 8
            }
            .is_input_error()
        );
    }
}
