//! APDU response definitions and traits
//!
//! This module provides types and traits for working with APDU responses
//! according to ISO/IEC 7816-4.

pub mod error;
pub mod status;
pub mod utils;

use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use error::ResponseError;
use status::StatusWord;

/// Trait for APDU responses
pub trait ApduResponse: Sized {
    /// Get the response payload data
    fn payload(&self) -> &Bytes;

    /// Get the status word
    fn status(&self) -> StatusWord;

    /// Check if the response indicates success
    fn is_success(&self) -> bool {
        self.status().is_success()
    }

    /// Create from raw APDU response data
    fn from_bytes(data: &[u8]) -> Result<Self, ResponseError>;
}

/// Basic APDU response structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Response payload data, empty when the card only returned a status word
    payload: Bytes,
    /// Status word
    status: StatusWord,
}

impl Response {
    /// Create a new response with payload and status
    pub fn new(payload: Bytes, status: impl Into<StatusWord>) -> Self {
        Self {
            payload,
            status: status.into(),
        }
    }

    /// Create a success response
    pub const fn success(payload: Bytes) -> Self {
        Self {
            payload,
            status: StatusWord::new(0x90, 0x00),
        }
    }

    /// Create a response carrying only a status word
    pub fn status_only(status: impl Into<StatusWord>) -> Self {
        Self {
            payload: Bytes::new(),
            status: status.into(),
        }
    }

    /// Parse response from raw bytes (including status word)
    pub fn from_bytes(data: &[u8]) -> Result<Self, ResponseError> {
        let (status, payload) = utils::extract_status_and_payload(data)?;

        trace!(
            sw1 = format_args!("{:#04x}", status.sw1),
            sw2 = format_args!("{:#04x}", status.sw2),
            payload_len = payload.len(),
            "Parsed APDU response"
        );

        Ok(Self {
            payload: Bytes::copy_from_slice(payload),
            status,
        })
    }

    /// Get the status word as a tuple (SW1, SW2)
    pub const fn status_tuple(&self) -> (u8, u8) {
        (self.status.sw1, self.status.sw2)
    }

    /// Split the response into its status word and payload
    pub fn into_parts(self) -> (StatusWord, Bytes) {
        (self.status, self.payload)
    }
}

impl ApduResponse for Response {
    fn payload(&self) -> &Bytes {
        &self.payload
    }

    fn status(&self) -> StatusWord {
        self.status
    }

    fn from_bytes(data: &[u8]) -> Result<Self, ResponseError> {
        Self::from_bytes(data)
    }
}

impl TryFrom<&[u8]> for Response {
    type Error = ResponseError;

    fn try_from(data: &[u8]) -> Result<Self, ResponseError> {
        Self::from_bytes(data)
    }
}

impl TryFrom<Bytes> for Response {
    type Error = ResponseError;

    fn try_from(data: Bytes) -> Result<Self, ResponseError> {
        Self::from_bytes(&data)
    }
}

impl From<Response> for Bytes {
    fn from(response: Response) -> Self {
        let mut buf = BytesMut::with_capacity(response.payload.len() + 2);
        buf.put_slice(&response.payload);
        buf.put_u8(response.status.sw1);
        buf.put_u8(response.status.sw2);
        buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_creation() {
        let resp = Response::new(Bytes::from_static(&[0x01, 0x02, 0x03]), (0x90, 0x00));
        assert_eq!(resp.payload().as_ref(), &[0x01, 0x02, 0x03]);
        assert_eq!(resp.status(), StatusWord::new(0x90, 0x00));
        assert!(resp.is_success());
    }

    #[test]
    fn test_response_from_bytes() {
        let resp = Response::from_bytes(&[0x01, 0x02, 0x03, 0x90, 0x00]).unwrap();
        assert_eq!(resp.payload().as_ref(), &[0x01, 0x02, 0x03]);
        assert!(resp.is_success());

        let resp = Response::from_bytes(&[0x9F, 0x0F]).unwrap();
        assert!(resp.payload().is_empty());
        assert_eq!(resp.status_tuple(), (0x9F, 0x0F));
        assert!(!resp.is_success());

        assert_eq!(
            Response::from_bytes(&[0x01]),
            Err(ResponseError::Incomplete(1))
        );
    }

    #[test]
    fn test_response_into_raw_bytes() {
        let resp = Response::new(Bytes::from_static(&[0xAA]), (0x91, 0x10));
        let raw: Bytes = resp.into();
        assert_eq!(raw.as_ref(), &[0xAA, 0x91, 0x10]);
    }
}
