//! Card collaborator contract used by [`Sim`](crate::Sim)
//!
//! Every call hands its status word back in the returned value. There is no
//! "last response" slot to consult afterwards.

use bytes::Bytes;
use simkit_apdu_core::{Response, StatusWord};

use crate::application::{Chv, Pin};
use crate::error::Result;
use crate::file::{FileDescriptor, FileId};
use crate::status::{StatusOutcome, interpret};

/// One command/response round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// Status word of the response
    pub status: StatusWord,
    /// Response data, possibly empty
    pub payload: Bytes,
}

impl Exchange {
    /// Create an exchange
    pub fn new(status: impl Into<StatusWord>, payload: impl Into<Bytes>) -> Self {
        Self {
            status: status.into(),
            payload: payload.into(),
        }
    }

    /// An exchange carrying only a status word
    pub fn status_only(status: impl Into<StatusWord>) -> Self {
        Self::new(status, Bytes::new())
    }

    /// Interpret the status word
    pub const fn outcome(&self) -> StatusOutcome {
        interpret(self.status)
    }
}

impl From<Response> for Exchange {
    fn from(response: Response) -> Self {
        let (status, payload) = response.into_parts();
        Self { status, payload }
    }
}

/// Content of an elementary file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    /// Body of a transparent file
    Transparent(Bytes),
    /// Records of a linear fixed or cyclic file, in order
    Records(Vec<Bytes>),
}

impl FileContent {
    /// Body of a transparent file
    pub fn into_transparent(self) -> Option<Bytes> {
        match self {
            Self::Transparent(bytes) => Some(bytes),
            Self::Records(_) => None,
        }
    }

    /// First record of a record based file
    pub fn into_first_record(self) -> Option<Bytes> {
        match self {
            Self::Records(records) => records.into_iter().next(),
            Self::Transparent(_) => None,
        }
    }
}

/// Result of selecting a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Last status word seen while selecting and reading
    pub status: StatusWord,
    /// Parsed descriptor, when the card offered one
    pub descriptor: Option<FileDescriptor>,
    /// File content, for elementary files that could be read
    pub content: Option<FileContent>,
}

impl Selection {
    /// A selection that went no further than the given status word
    pub fn status_only(status: impl Into<StatusWord>) -> Self {
        Self {
            status: status.into(),
            descriptor: None,
            content: None,
        }
    }

    /// Interpret the status word
    pub const fn outcome(&self) -> StatusOutcome {
        interpret(self.status)
    }
}

/// Operations a SIM session needs from the card
///
/// [`SimCard`](crate::SimCard) implements this over any APDU transport. A
/// status word the card returns is never an `Err` here; `Err` is reserved for
/// link failures and undecodable answers.
pub trait SimTransport {
    /// Select a file and read its descriptor and content
    fn select(&mut self, file: FileId) -> Result<Selection>;

    /// Overwrite the currently selected transparent file
    fn update(&mut self, file: FileId, data: &[u8]) -> Result<Exchange>;

    /// Submit data to the GSM algorithm
    fn internal_authenticate(&mut self, p1: u8, p2: u8, data: &[u8]) -> Result<Exchange>;

    /// Fetch `expected` bytes announced by a `9F XX` status
    fn get_response(&mut self, expected: u8) -> Result<Exchange>;

    /// Present a CHV
    fn verify(&mut self, chv: Chv, pin: &Pin) -> Result<Exchange>;
}

impl<T: SimTransport + ?Sized> SimTransport for &mut T {
    fn select(&mut self, file: FileId) -> Result<Selection> {
        (**self).select(file)
    }

    fn update(&mut self, file: FileId, data: &[u8]) -> Result<Exchange> {
        (**self).update(file, data)
    }

    fn internal_authenticate(&mut self, p1: u8, p2: u8, data: &[u8]) -> Result<Exchange> {
        (**self).internal_authenticate(p1, p2, data)
    }

    fn get_response(&mut self, expected: u8) -> Result<Exchange> {
        (**self).get_response(expected)
    }

    fn verify(&mut self, chv: Chv, pin: &Pin) -> Result<Exchange> {
        (**self).verify(chv, pin)
    }
}
