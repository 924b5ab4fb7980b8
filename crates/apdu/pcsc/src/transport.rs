//! PC/SC transport implementation

use std::ffi::CString;
use std::fmt;

use bytes::Bytes;
use pcsc::{Card, Context, Disposition};
use simkit_apdu_core::{CardTransport, TransportError};
use tracing::{debug, warn};

use crate::{config::PcscConfig, error::PcscError};

/// Largest answer a short APDU can produce: 256 data bytes plus SW1 SW2
const MAX_RESPONSE_LEN: usize = 258;

/// Transport implementation using PC/SC
pub struct PcscTransport {
    /// PC/SC context
    context: Context,
    /// Card connection, if established
    card: Option<Card>,
    /// Reader name
    reader_name: String,
    /// Configuration
    config: PcscConfig,
}

impl fmt::Debug for PcscTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PcscTransport")
            .field("reader_name", &self.reader_name)
            .field("has_card", &self.card.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl PcscTransport {
    /// Create a new PC/SC transport for the specified reader
    ///
    /// The card connection is attempted eagerly; a missing card is not an
    /// error here and is retried on the first transmission.
    pub(crate) fn new(
        context: Context,
        reader_name: &str,
        config: PcscConfig,
    ) -> Result<Self, PcscError> {
        let mut transport = Self {
            context,
            card: None,
            reader_name: reader_name.to_string(),
            config,
        };

        if let Err(e) = transport.connect_card() {
            debug!(reader = %transport.reader_name, error = %e, "Deferred card connection");
        }

        Ok(transport)
    }

    fn connect_card(&mut self) -> Result<(), PcscError> {
        if self.card.is_some() {
            return Ok(());
        }

        let reader_cstr = CString::new(self.reader_name.clone())
            .map_err(|_| PcscError::ReaderNotFound(self.reader_name.clone()))?;

        match self.context.connect(
            &reader_cstr,
            self.config.share_mode.into(),
            self.config.protocols,
        ) {
            Ok(card) => {
                debug!(reader = %self.reader_name, "Connected to card");
                self.card = Some(card);
                Ok(())
            }
            Err(pcsc::Error::NoSmartcard) => Err(PcscError::NoCard(self.reader_name.clone())),
            Err(e) => Err(e.into()),
        }
    }

    /// Get the ATR of the current card
    pub fn atr(&self) -> Result<Vec<u8>, PcscError> {
        self.card.as_ref().map_or_else(
            || Err(PcscError::NoCard(self.reader_name.clone())),
            |card| {
                card.get_attribute_owned(pcsc::Attribute::AtrString)
                    .map_err(Into::into)
            },
        )
    }

    /// Get the reader name
    pub fn reader_name(&self) -> &str {
        &self.reader_name
    }

    /// Check if the transport is connected to a card
    pub const fn has_card(&self) -> bool {
        self.card.is_some()
    }

    fn transmit_command(&mut self, command: &[u8]) -> Result<Bytes, PcscError> {
        self.connect_card()?;

        let Some(card) = &mut self.card else {
            return Err(PcscError::NoCard(self.reader_name.clone()));
        };

        let mut response_buffer = [0u8; MAX_RESPONSE_LEN];

        match card.transmit(command, &mut response_buffer) {
            Ok(response) => Ok(Bytes::copy_from_slice(response)),
            Err(e) => {
                // A reset or removed card invalidates the handle
                if matches!(e, pcsc::Error::ResetCard | pcsc::Error::RemovedCard) {
                    self.card = None;

                    if self.config.auto_reconnect && e == pcsc::Error::ResetCard {
                        warn!(reader = %self.reader_name, "Card was reset, reconnecting");
                        if self.connect_card().is_ok() {
                            return self.transmit_command(command);
                        }
                    }
                }

                Err(e.into())
            }
        }
    }
}

impl CardTransport for PcscTransport {
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        self.transmit_command(command).map_err(TransportError::from)
    }

    fn is_connected(&self) -> bool {
        self.card.is_some()
    }

    fn reset(&mut self) -> Result<(), TransportError> {
        if let Some(card) = self.card.take() {
            let _ = card.disconnect(Disposition::ResetCard);
        }

        self.connect_card().map_err(Into::into)
    }
}

impl Drop for PcscTransport {
    fn drop(&mut self) {
        if let Some(card) = self.card.take() {
            let _ = card.disconnect(Disposition::LeaveCard);
        }
    }
}
