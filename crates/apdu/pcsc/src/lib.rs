//! PC/SC transport implementation for APDU operations
//!
//! This crate provides an implementation of the `CardTransport` trait from
//! `simkit-apdu-core` using the PC/SC API for communication with smart cards.
//!
//! # Examples
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use simkit_apdu_core::{ApduResponse, CardTransport, Response};
//! use simkit_apdu_transport_pcsc::{ConnectStrategy, PcscConfig, PcscDeviceManager};
//!
//! let manager = PcscDeviceManager::new()?;
//! let mut transport = manager.connect_strategy(ConnectStrategy::AnyCard, PcscConfig::default())?;
//!
//! // SELECT the GSM directory with the SIM class byte
//! let raw = transport.transmit_raw(&[0xA0, 0xA4, 0x00, 0x00, 0x02, 0x7F, 0x20])?;
//! let response = Response::from_bytes(&raw)?;
//! println!("Status: {}", response.status());
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(missing_docs)]

mod config;
mod error;
mod manager;
mod reader;
mod transport;

pub use config::{ConnectStrategy, PcscConfig, ShareMode};
pub use error::PcscError;
pub use manager::PcscDeviceManager;
pub use reader::PcscReader;
pub use transport::PcscTransport;

// Re-export some pcsc types for convenience
pub use pcsc::{Protocol, Protocols};
