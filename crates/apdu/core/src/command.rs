//! APDU command definitions and traits
//!
//! This module provides types and traits for working with APDU commands
//! according to ISO/IEC 7816-4. Only short APDUs are supported: Lc and Le
//! are single bytes.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::response::Response;
use crate::response::error::ResponseError;

/// Expected length type for APDU commands
pub type ExpectedLength = u8;

/// Core trait for APDU commands
pub trait ApduCommand {
    /// Success response type
    type Success;

    /// Error response type
    type Error: fmt::Debug;

    /// Convert a response parsing error into the command error type
    fn convert_error(error: ResponseError) -> Self::Error;

    /// Command class (CLA)
    fn class(&self) -> u8;

    /// Instruction code (INS)
    fn instruction(&self) -> u8;

    /// First parameter (P1)
    fn p1(&self) -> u8;

    /// Second parameter (P2)
    fn p2(&self) -> u8;

    /// Command payload data (optional)
    fn data(&self) -> Option<&[u8]>;

    /// Expected response length (optional)
    fn expected_length(&self) -> Option<ExpectedLength>;

    /// Convert to raw APDU bytes
    fn to_bytes(&self) -> Bytes {
        let mut buffer = BytesMut::with_capacity(self.command_length());

        // Header: CLA, INS, P1, P2
        buffer.put_u8(self.class());
        buffer.put_u8(self.instruction());
        buffer.put_u8(self.p1());
        buffer.put_u8(self.p2());

        // Add Lc and data if present
        if let Some(data) = self.data() {
            buffer.put_u8(data.len() as u8);
            buffer.put_slice(data);
        }

        // Add Le if present
        if let Some(le) = self.expected_length() {
            buffer.put_u8(le);
        }

        buffer.freeze()
    }

    /// Calculate length of serialized command
    fn command_length(&self) -> usize {
        // Header (CLA, INS, P1, P2) is always 4 bytes
        let mut length = 4;

        if let Some(data) = self.data() {
            length += 1 + data.len();
        }

        if self.expected_length().is_some() {
            length += 1;
        }

        length
    }

    /// Parse a response into the command's success or error type
    fn parse_response(response: Response) -> Result<Self::Success, Self::Error>;

    /// Parse raw response bytes, status word included
    fn parse_response_raw(bytes: &[u8]) -> Result<Self::Success, Self::Error> {
        let response = Response::from_bytes(bytes).map_err(Self::convert_error)?;
        Self::parse_response(response)
    }
}
