//! GSM SIM protocol layer
//!
//! Talks to a GSM 11.11 SIM over any [`CardTransport`](simkit_apdu_core::CardTransport):
//! status word interpretation, file descriptor parsing, subscriber data
//! reads/writes and the RUN GSM ALGORITHM sequence.
//!
//! ```no_run
//! # fn demo<T: simkit_apdu_core::CardTransport>(transport: T) -> simkit_sim::Result<()> {
//! use simkit_sim::{Rand, Sim, SimCard};
//!
//! let mut sim = Sim::new(SimCard::new(transport));
//! let imsi = sim.imsi()?;
//! let auth = sim.run_gsm_algorithm(Rand::ZERO.as_bytes())?;
//! println!("{} -> {auth}", hex::encode_upper(&imsi));
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(missing_docs)]

mod application;
mod card;
pub mod commands;
mod constants;
mod dispatch;
mod error;
pub mod file;
mod report;
pub mod status;
mod transport;
pub mod types;

pub use application::{Chv, GsmAuthentication, Pin, Rand, Sim};
pub use card::SimCard;
pub use constants::*;
pub use dispatch::{Operation, Output, Parameter};
pub use error::{Error, Result, Step};
pub use file::{FileDescriptor, FileId, ParseError};
pub use report::CardReport;
pub use status::{StatusClass, StatusOutcome, interpret};
pub use transport::{Exchange, FileContent, Selection, SimTransport};
