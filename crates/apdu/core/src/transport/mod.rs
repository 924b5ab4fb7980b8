//! Transport traits for APDU communication with cards
//!
//! This module provides abstractions for communicating with smart cards through
//! different transport mechanisms.

pub mod error;

use std::fmt;

use bytes::Bytes;
pub use error::TransportError;
use tracing::{debug, trace};

/// Trait for basic card transports
///
/// A transport is responsible for sending and receiving raw APDU bytes.
/// It has no knowledge of command structure or protocol details, and it never
/// issues GET RESPONSE on its own: the caller decides what follows a `61 XX`
/// or `9F XX` status.
pub trait CardTransport: fmt::Debug {
    /// Send raw APDU bytes to card and return response bytes
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        trace!(command = %hex::encode_upper(command), "Transmitting raw command");
        let result = self.do_transmit_raw(command);
        match &result {
            Ok(response) => {
                trace!(response = %hex::encode_upper(response), "Received raw response");
            }
            Err(e) => {
                debug!(error = ?e, "Transport error during transmission");
            }
        }
        result
    }

    /// Internal implementation of transmit_raw
    /// This is the method that concrete implementations should override
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError>;

    /// Check if the transport is connected to a physical card
    fn is_connected(&self) -> bool;

    /// Reset the transport connection
    fn reset(&mut self) -> Result<(), TransportError>;
}

impl<T: CardTransport + ?Sized> CardTransport for &mut T {
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        (**self).transmit_raw(command)
    }

    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        (**self).do_transmit_raw(command)
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn reset(&mut self) -> Result<(), TransportError> {
        (**self).reset()
    }
}

#[cfg(test)]
#[derive(Debug, Clone)]
#[allow(missing_docs, unreachable_pub)]
pub struct MockTransport {
    /// Mock responses to return
    pub responses: Vec<Bytes>,
    /// Commands that were sent
    pub commands: Vec<Bytes>,
    /// Whether the transport is connected
    pub connected: bool,
}

#[cfg(test)]
impl MockTransport {
    /// Create a new mock transport with the given responses
    pub fn new(responses: Vec<Bytes>) -> Self {
        Self {
            responses,
            commands: Vec::new(),
            connected: true,
        }
    }

    /// Create a new mock transport that always returns success (90 00)
    pub fn with_success() -> Self {
        Self::new(vec![Bytes::from_static(&[0x90, 0x00])])
    }
}

#[cfg(test)]
impl CardTransport for MockTransport {
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        if !self.connected {
            return Err(TransportError::Connection);
        }

        self.commands.push(Bytes::copy_from_slice(command));

        if self.responses.is_empty() {
            return Err(TransportError::Transmission);
        }

        // Either clone the single response or take the next one
        if self.responses.len() == 1 {
            Ok(self.responses[0].clone())
        } else {
            Ok(self.responses.remove(0))
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn reset(&mut self) -> Result<(), TransportError> {
        self.connected = true;
        self.commands.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::{ApduResponse, Response};

    #[test]
    fn test_transmit_returns_scripted_responses() {
        let mut transport = MockTransport::new(vec![
            Bytes::from_static(&[0x9F, 0x0F]),
            Bytes::from_static(&[0x01, 0x02, 0x90, 0x00]),
        ]);

        let raw = transport
            .transmit_raw(&[0xA0, 0xA4, 0x00, 0x00, 0x02, 0x7F, 0x20])
            .unwrap();
        let response = Response::from_bytes(&raw).unwrap();
        assert_eq!(response.status_tuple(), (0x9F, 0x0F));

        let raw = transport.transmit_raw(&[0xA0, 0xC0, 0x00, 0x00, 0x0F]).unwrap();
        let response = Response::from_bytes(&raw).unwrap();
        assert!(response.is_success());
        assert_eq!(response.payload().as_ref(), &[0x01, 0x02]);

        assert_eq!(transport.commands.len(), 2);
        assert_eq!(
            transport.commands[0].as_ref(),
            &[0xA0, 0xA4, 0x00, 0x00, 0x02, 0x7F, 0x20]
        );
    }

    #[test]
    fn test_exhausted_script_is_a_transmission_error() {
        let mut transport = MockTransport::new(Vec::new());
        assert_eq!(
            transport.transmit_raw(&[0xA0, 0xF2, 0x00, 0x00]),
            Err(TransportError::Transmission)
        );
    }

    #[test]
    fn test_disconnected_transport_fails() {
        let mut transport = MockTransport::with_success();
        transport.connected = false;
        assert_eq!(
            transport.transmit_raw(&[0xA0, 0xF2, 0x00, 0x00]),
            Err(TransportError::Connection)
        );

        transport.reset().unwrap();
        assert!(transport.is_connected());
    }

    #[test]
    fn test_mutable_reference_is_a_transport() {
        let mut transport = MockTransport::with_success();
        {
            let mut borrowed = &mut transport;
            let raw = CardTransport::transmit_raw(&mut borrowed, &[0xA0, 0xF2, 0x00, 0x00]);
            assert_eq!(raw.unwrap().as_ref(), &[0x90, 0x00]);
        }
        assert_eq!(transport.commands.len(), 1);
    }
}
