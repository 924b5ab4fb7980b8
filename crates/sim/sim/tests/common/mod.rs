//! Test doubles shared by the integration tests
#![allow(dead_code, unreachable_pub)]

use std::collections::{HashMap, VecDeque};

use simkit_apdu_core::{Bytes, CardTransport, StatusWord, TransportError};
use simkit_sim::{Chv, Error, Exchange, FileContent, FileId, Pin, Result, Selection, SimTransport};

/// A call received by [`FakeSim`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Select(FileId),
    Update(FileId, Vec<u8>),
    InternalAuthenticate(Vec<u8>),
    GetResponse(u8),
    Verify(Chv),
}

/// File system backed [`SimTransport`]
///
/// Unknown files answer `94 04`. Updates are stored and visible to later reads.
#[derive(Debug)]
pub struct FakeSim {
    files: HashMap<FileId, Selection>,
    update_status: StatusWord,
    authenticate: Exchange,
    response: Exchange,
    pin: Option<Pin>,
    pub calls: Vec<Call>,
}

impl Default for FakeSim {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeSim {
    pub fn new() -> Self {
        let mut files = HashMap::new();
        for directory in [FileId::MF, FileId::DF_GSM, FileId::DF_TELECOM] {
            files.insert(directory, Selection::status_only((0x90, 0x00)));
        }
        Self {
            files,
            update_status: StatusWord::new(0x90, 0x00),
            authenticate: Exchange::status_only((0x6D, 0x00)),
            response: Exchange::status_only((0x6D, 0x00)),
            pin: None,
            calls: Vec::new(),
        }
    }

    pub fn with_file(mut self, file: FileId, content: &[u8]) -> Self {
        self.store(file, content);
        self
    }

    fn store(&mut self, file: FileId, content: &[u8]) {
        self.files.insert(
            file,
            Selection {
                status: StatusWord::new(0x90, 0x00),
                descriptor: None,
                content: Some(FileContent::Transparent(Bytes::copy_from_slice(content))),
            },
        );
    }

    pub fn with_records(mut self, file: FileId, records: &[&[u8]]) -> Self {
        self.files.insert(
            file,
            Selection {
                status: StatusWord::new(0x90, 0x00),
                descriptor: None,
                content: Some(FileContent::Records(
                    records.iter().map(|r| Bytes::copy_from_slice(r)).collect(),
                )),
            },
        );
        self
    }

    pub fn with_status(mut self, file: FileId, sw1: u8, sw2: u8) -> Self {
        self.files.insert(file, Selection::status_only((sw1, sw2)));
        self
    }

    pub fn with_update_status(mut self, sw1: u8, sw2: u8) -> Self {
        self.update_status = StatusWord::new(sw1, sw2);
        self
    }

    /// Script the RUN GSM ALGORITHM and GET RESPONSE answers
    pub fn with_gsm_algorithm(
        mut self,
        authenticate: (u8, u8),
        payload: &[u8],
        response: (u8, u8),
    ) -> Self {
        self.authenticate = Exchange::status_only(authenticate);
        self.response = Exchange::new(response, Bytes::copy_from_slice(payload));
        self
    }

    pub fn with_pin(mut self, pin: &str) -> Self {
        self.pin = Some(Pin::new(pin).unwrap());
        self
    }

    pub fn selected(&self) -> Vec<FileId> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Select(file) => Some(*file),
                _ => None,
            })
            .collect()
    }
}

impl SimTransport for FakeSim {
    fn select(&mut self, file: FileId) -> Result<Selection> {
        self.calls.push(Call::Select(file));
        Ok(self
            .files
            .get(&file)
            .cloned()
            .unwrap_or_else(|| Selection::status_only((0x94, 0x04))))
    }

    fn update(&mut self, file: FileId, data: &[u8]) -> Result<Exchange> {
        self.calls.push(Call::Update(file, data.to_vec()));
        if self.update_status.is_success() {
            self.store(file, data);
        }
        Ok(Exchange::status_only(self.update_status))
    }

    fn internal_authenticate(&mut self, p1: u8, p2: u8, data: &[u8]) -> Result<Exchange> {
        assert_eq!((p1, p2), (0x00, 0x00));
        self.calls.push(Call::InternalAuthenticate(data.to_vec()));
        Ok(self.authenticate.clone())
    }

    fn get_response(&mut self, expected: u8) -> Result<Exchange> {
        self.calls.push(Call::GetResponse(expected));
        Ok(self.response.clone())
    }

    fn verify(&mut self, chv: Chv, pin: &Pin) -> Result<Exchange> {
        self.calls.push(Call::Verify(chv));
        match self.pin {
            Some(expected) if expected == *pin => Ok(Exchange::status_only((0x90, 0x00))),
            Some(_) => Ok(Exchange::status_only((0x98, 0x04))),
            None => Err(Error::Link(TransportError::Connection)),
        }
    }
}

/// [`CardTransport`] answering from a fixed list of raw responses
#[derive(Debug, Default)]
pub struct ApduScript {
    responses: VecDeque<Vec<u8>>,
    pub commands: Vec<Vec<u8>>,
}

impl ApduScript {
    pub fn new(responses: &[&[u8]]) -> Self {
        Self {
            responses: responses.iter().map(|r| r.to_vec()).collect(),
            commands: Vec::new(),
        }
    }
}

impl CardTransport for ApduScript {
    fn do_transmit_raw(&mut self, command: &[u8]) -> std::result::Result<Bytes, TransportError> {
        self.commands.push(command.to_vec());
        self.responses
            .pop_front()
            .map(Bytes::from)
            .ok_or(TransportError::Transmission)
    }

    fn is_connected(&self) -> bool {
        true
    }

    fn reset(&mut self) -> std::result::Result<(), TransportError> {
        Ok(())
    }
}

/// 9 byte EF IMSI content for 001010123456789
pub const IMSI: [u8; 9] = [0x08, 0x09, 0x10, 0x10, 0x10, 0x32, 0x54, 0x76, 0x98];

/// SRES 01020304, Kc 05060708090A0B0C
pub const GSM_RESPONSE: [u8; 12] = [
    0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C,
];
