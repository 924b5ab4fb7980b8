//! Core traits and types for APDU (Application Protocol Data Unit) operations
//!
//! This crate provides the foundational types and traits for working with smart card
//! APDU commands and responses according to ISO/IEC 7816-4.
//!
//! ## Overview
//!
//! APDU (Application Protocol Data Unit) is the communication format used by smart cards.
//! This crate provides abstractions for:
//!
//! - Creating and parsing APDU commands and responses
//! - Communicating with smart cards through different transport layers
//! - Base status word interpretation
//!
//! Every exchange hands its response back to the caller. Nothing here keeps a
//! "last response" around between calls.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

// Main modules
pub mod command;
pub mod response;
pub mod transport;

pub use command::{ApduCommand, ExpectedLength};
pub use response::status::StatusWord;
pub use response::{ApduResponse, Response};
pub use transport::{CardTransport, TransportError};
