//! Error types specific to APDU responses

use thiserror::Error;

/// Error for APDU response processing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    /// Incomplete response (less than 2 bytes)
    #[error("Incomplete response: {0} byte(s), a status word needs 2")]
    Incomplete(usize),
}
