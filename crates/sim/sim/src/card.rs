//! [`SimTransport`] over an APDU [`CardTransport`]

use bytes::{Bytes, BytesMut};
use simkit_apdu_core::{ApduCommand, ApduResponse, CardTransport, Response, StatusWord};
use tracing::{Level, debug, info, trace, warn};

use crate::application::{Chv, Pin};
use crate::commands::*;
use crate::constants::{MAX_READ_CHUNK, lengths};
use crate::error::{Error, Result};
use crate::file::{FileDescriptor, FileId};
use crate::status::interpret;
use crate::transport::{Exchange, FileContent, Selection, SimTransport};

/// A GSM SIM reached through an APDU transport
///
/// SELECT is followed by GET RESPONSE for the descriptor and, for elementary
/// files, by READ BINARY or READ RECORD for the content.
#[derive(Debug)]
pub struct SimCard<T: CardTransport> {
    transport: T,
}

impl<T: CardTransport> SimCard<T> {
    /// Wrap a transport
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// The underlying transport
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Give the transport back
    pub fn into_inner(self) -> T {
        self.transport
    }

    fn transmit<C: ApduCommand>(&mut self, name: &'static str, command: &C) -> Result<Response> {
        let raw = self.transport.transmit_raw(&command.to_bytes())?;
        let response = Response::from_bytes(&raw)?;
        log_status(name, response.status());
        Ok(response)
    }

    fn exchange<C: ApduCommand>(&mut self, name: &'static str, command: &C) -> Result<Exchange> {
        self.transmit(name, command).map(Exchange::from)
    }

    fn read_transparent(&mut self, size: u16) -> Result<(StatusWord, Option<FileContent>)> {
        let size = usize::from(size);
        let mut content = BytesMut::with_capacity(size);
        let mut status = StatusWord::new(0x90, 0x00);

        while content.len() < size {
            let chunk = (size - content.len()).min(MAX_READ_CHUNK) as u8;
            let command = ReadBinaryCommand::from_offset(content.len() as u16, chunk);
            let response = self.transmit("READ BINARY", &command)?;
            status = response.status();
            match ReadBinaryCommand::parse_response(response) {
                Ok(ReadBinaryOk::Success { data }) if data.is_empty() => break,
                Ok(ReadBinaryOk::Success { data }) => content.extend_from_slice(&data),
                Err(_) => return Ok((status, None)),
            }
        }

        Ok((status, Some(FileContent::Transparent(content.freeze()))))
    }

    fn read_records(
        &mut self,
        count: u16,
        record_length: u8,
    ) -> Result<(StatusWord, Option<FileContent>)> {
        let count = count.min(u16::from(u8::MAX)) as u8;
        let mut records = Vec::with_capacity(usize::from(count));
        let mut status = StatusWord::new(0x90, 0x00);

        for record in 1..=count {
            let command = ReadRecordCommand::record(record, record_length);
            let response = self.transmit("READ RECORD", &command)?;
            status = response.status();
            match ReadRecordCommand::parse_response(response) {
                Ok(ReadRecordOk::Success { data }) => records.push(data),
                Err(_) => return Ok((status, None)),
            }
        }

        Ok((status, Some(FileContent::Records(records))))
    }
}

fn log_status(name: &str, status: StatusWord) {
    let outcome = interpret(status);
    let level = outcome.tracing_level();
    if level == Level::DEBUG {
        debug!(command = name, %status, "{outcome}");
    } else if level == Level::INFO {
        info!(command = name, %status, "{outcome}");
    } else {
        warn!(command = name, %status, "{outcome}");
    }
}

impl<T: CardTransport> SimTransport for SimCard<T> {
    fn select(&mut self, file: FileId) -> Result<Selection> {
        let selected = self.transmit("SELECT", &SelectCommand::file(file))?;
        let status = selected.status();
        let Some(length) = SelectCommand::parse_response(selected)
            .ok()
            .and_then(|ok| ok.response_length())
        else {
            return Ok(Selection::status_only(status));
        };

        let header = self.transmit("GET RESPONSE", &GetResponseCommand::expecting(length))?;
        let status = header.status();
        let Ok(GetResponseOk::Success { data }) = GetResponseCommand::parse_response(header) else {
            return Ok(Selection::status_only(status));
        };

        let descriptor = FileDescriptor::parse(&data)?;
        trace!(%file, ?descriptor, "Parsed file descriptor");

        let (status, content) = match descriptor.elementary() {
            Some(info) if info.structure.is_record_based() => match info.record_length {
                Some(record_length) => {
                    self.read_records(info.record_count(descriptor.size), record_length)?
                }
                None => (status, None),
            },
            Some(_) => self.read_transparent(descriptor.size)?,
            None => (status, None),
        };

        Ok(Selection {
            status,
            descriptor: Some(descriptor),
            content,
        })
    }

    fn update(&mut self, file: FileId, data: &[u8]) -> Result<Exchange> {
        if data.len() > MAX_READ_CHUNK {
            return Err(Error::invalid_input(format!(
                "update of {file} carries {} bytes, at most {MAX_READ_CHUNK} fit one command",
                data.len()
            )));
        }
        debug!(%file, data = %hex::encode_upper(data), "Updating selected file");
        self.exchange(
            "UPDATE BINARY",
            &UpdateBinaryCommand::write(Bytes::copy_from_slice(data)),
        )
    }

    fn internal_authenticate(&mut self, p1: u8, p2: u8, data: &[u8]) -> Result<Exchange> {
        let rand: [u8; lengths::RAND] = data.try_into().map_err(|_| {
            Error::invalid_input(format!(
                "RAND must be {} bytes, got {}",
                lengths::RAND,
                data.len()
            ))
        })?;
        self.exchange(
            "RUN GSM ALGORITHM",
            &InternalAuthenticateCommand::rand_with_params(p1, p2, rand),
        )
    }

    fn get_response(&mut self, expected: u8) -> Result<Exchange> {
        self.exchange("GET RESPONSE", &GetResponseCommand::expecting(expected))
    }

    fn verify(&mut self, chv: Chv, pin: &Pin) -> Result<Exchange> {
        self.exchange("VERIFY CHV", &VerifyChvCommand::chv(chv, pin))
    }
}
