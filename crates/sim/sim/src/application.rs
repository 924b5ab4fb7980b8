//! SIM application implementation
//!
//! [`Sim`] reads and writes the subscriber files of a GSM SIM and runs the GSM
//! authentication algorithm. Every operation selects its directory and file
//! afresh and only accepts `90 00` as success.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use derive_more::Display;
use tracing::{debug, warn};

use crate::constants::lengths;
use crate::error::{Error, Result, Step};
use crate::file::FileId;
use crate::transport::{Exchange, FileContent, Selection, SimTransport};
use crate::types::{GsmTriplet, Imsi};

/// Card holder verification value reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Chv {
    /// CHV1 (PIN)
    #[display("CHV1")]
    Chv1,
    /// CHV2 (PIN2)
    #[display("CHV2")]
    Chv2,
}

impl Chv {
    /// Reference sent in P2
    pub const fn reference(self) -> u8 {
        match self {
            Self::Chv1 => 0x01,
            Self::Chv2 => 0x02,
        }
    }
}

/// A four digit CHV
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Pin([u8; 4]);

impl Pin {
    /// Validate a four digit PIN
    pub fn new(pin: &str) -> Result<Self> {
        let digits: [u8; 4] = pin
            .as_bytes()
            .try_into()
            .map_err(|_| Error::invalid_input("PIN must be exactly 4 digits"))?;
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(Error::invalid_input("PIN must only contain digits"));
        }
        Ok(Self(digits))
    }

    /// ASCII digits padded with `FF` to the 8 byte CHV block
    pub const fn to_block(&self) -> [u8; lengths::CHV_BLOCK] {
        let [a, b, c, d] = self.0;
        [a, b, c, d, 0xFF, 0xFF, 0xFF, 0xFF]
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(****)")
    }
}

impl FromStr for Pin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// 16 byte GSM authentication challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rand([u8; lengths::RAND]);

impl Rand {
    /// All-zero challenge
    pub const ZERO: Self = Self([0; lengths::RAND]);

    /// Wrap 16 bytes
    pub const fn new(bytes: [u8; lengths::RAND]) -> Self {
        Self(bytes)
    }

    /// Validate a slice of exactly 16 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        bytes.try_into().map(Self).map_err(|_| {
            Error::invalid_input(format!(
                "RAND must be {} bytes, got {}",
                lengths::RAND,
                bytes.len()
            ))
        })
    }

    /// Raw bytes
    pub const fn as_bytes(&self) -> &[u8; lengths::RAND] {
        &self.0
    }
}

impl FromStr for Rand {
    type Err = Error;

    /// Parse 32 hex digits
    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| Error::invalid_input(format!("RAND is not valid hex: {e}")))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Display for Rand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}

/// Output of the GSM algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GsmAuthentication {
    /// Signed response
    pub sres: [u8; lengths::SRES],
    /// Ciphering key
    pub kc: [u8; lengths::GSM_KC],
}

impl GsmAuthentication {
    const LEN: usize = lengths::SRES + lengths::GSM_KC;

    /// Split the 12 byte GET RESPONSE payload into SRES and Kc
    pub fn from_payload(payload: &[u8]) -> Result<Self> {
        let payload: &[u8; Self::LEN] =
            payload.try_into().map_err(|_| Error::MalformedPayload {
                item: "GSM algorithm response",
                expected: Self::LEN,
                actual: payload.len(),
            })?;

        let mut sres = [0u8; lengths::SRES];
        let mut kc = [0u8; lengths::GSM_KC];
        sres.copy_from_slice(&payload[..lengths::SRES]);
        kc.copy_from_slice(&payload[lengths::SRES..]);
        Ok(Self { sres, kc })
    }

    /// SRES followed by Kc
    pub fn to_bytes(&self) -> Bytes {
        let mut bytes = Vec::with_capacity(Self::LEN);
        bytes.extend_from_slice(&self.sres);
        bytes.extend_from_slice(&self.kc);
        Bytes::from(bytes)
    }
}

impl fmt::Display for GsmAuthentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SRES {}, Kc {}",
            hex::encode_upper(self.sres),
            hex::encode_upper(self.kc)
        )
    }
}

/// How a file's content must look
#[derive(Debug, Clone, Copy)]
enum Shape {
    /// Transparent body of a fixed size
    Fixed(usize),
    /// Transparent body of any size
    Any,
    /// First record, of a fixed size
    FirstRecord(usize),
    /// First record, of any size
    AnyRecord,
}

/// GSM SIM application
#[derive(Debug)]
pub struct Sim<S: SimTransport> {
    transport: S,
}

impl<S: SimTransport> Sim<S> {
    /// Create a SIM session over a transport
    pub const fn new(transport: S) -> Self {
        Self { transport }
    }

    /// The underlying transport
    pub const fn transport(&self) -> &S {
        &self.transport
    }

    /// Mutable access to the underlying transport
    pub const fn transport_mut(&mut self) -> &mut S {
        &mut self.transport
    }

    /// Give the transport back
    pub fn into_inner(self) -> S {
        self.transport
    }

    /// EF Kc: ciphering key and key sequence number, 9 bytes
    pub fn kc(&mut self) -> Result<Bytes> {
        self.read("Kc", FileId::DF_GSM, FileId::EF_KC, Shape::Fixed(lengths::KC))
    }

    /// EF IMSI, 9 bytes
    pub fn imsi(&mut self) -> Result<Bytes> {
        self.read(
            "IMSI",
            FileId::DF_GSM,
            FileId::EF_IMSI,
            Shape::Fixed(lengths::IMSI),
        )
    }

    /// EF LOCI: TMSI, LAI, TMSI time and update status, 11 bytes
    pub fn location_info(&mut self) -> Result<Bytes> {
        self.read(
            "LOCI",
            FileId::DF_GSM,
            FileId::EF_LOCI,
            Shape::Fixed(lengths::LOCI),
        )
    }

    /// EF HPLMN search period, 1 byte
    pub fn hplmn_search_period(&mut self) -> Result<Bytes> {
        self.read(
            "HPLMN",
            FileId::DF_GSM,
            FileId::EF_HPLMN,
            Shape::Fixed(lengths::HPLMN),
        )
    }

    /// EF PLMNsel, any length
    pub fn plmn_selector(&mut self) -> Result<Bytes> {
        self.read("PLMNsel", FileId::DF_GSM, FileId::EF_PLMNSEL, Shape::Any)
    }

    /// EF ICCID under the master file, 10 bytes
    pub fn iccid(&mut self) -> Result<Bytes> {
        self.read(
            "ICCID",
            FileId::MF,
            FileId::EF_ICCID,
            Shape::Fixed(lengths::ICCID),
        )
    }

    /// EF SPN, 17 bytes
    ///
    /// Deviates from the other accessors: the file selection status is not
    /// checked and content of any other length yields an empty value instead
    /// of an error. A failing directory selection is still an error.
    pub fn service_provider_name(&mut self) -> Result<Bytes> {
        self.enter(FileId::DF_GSM)?;
        let selection = self.transport.select(FileId::EF_SPN)?;

        match selection.content.and_then(FileContent::into_transparent) {
            Some(spn) if spn.len() == lengths::SPN => Ok(spn),
            other => {
                warn!(
                    status = %selection.status,
                    length = other.as_ref().map(Bytes::len),
                    "SPN unavailable, returning empty value"
                );
                Ok(Bytes::new())
            }
        }
    }

    /// EF ACC, 2 bytes
    pub fn access_control_class(&mut self) -> Result<Bytes> {
        self.read(
            "ACC",
            FileId::DF_GSM,
            FileId::EF_ACC,
            Shape::Fixed(lengths::ACC),
        )
    }

    /// EF FPLMN, 12 bytes
    ///
    /// Selection failures are errors, but content of any other length yields
    /// an empty value instead of an error.
    pub fn forbidden_plmns(&mut self) -> Result<Bytes> {
        self.enter(FileId::DF_GSM)?;
        let selection = self.select_file(FileId::EF_FPLMN)?;

        match selection.content.and_then(FileContent::into_transparent) {
            Some(fplmn) if fplmn.len() == lengths::FPLMN => Ok(fplmn),
            other => {
                warn!(
                    length = other.as_ref().map(Bytes::len),
                    "FPLMN has unexpected length, returning empty value"
                );
                Ok(Bytes::new())
            }
        }
    }

    /// First record of EF MSISDN under DF TELECOM
    pub fn msisdn(&mut self) -> Result<Bytes> {
        self.read(
            "MSISDN",
            FileId::DF_TELECOM,
            FileId::EF_MSISDN,
            Shape::AnyRecord,
        )
    }

    /// First record of EF SMSP under DF TELECOM, 44 bytes
    pub fn sms_parameters(&mut self) -> Result<Bytes> {
        self.read(
            "SMSP",
            FileId::DF_TELECOM,
            FileId::EF_SMSP,
            Shape::FirstRecord(lengths::SMSP),
        )
    }

    /// Overwrite EF Kc and return the value read back
    pub fn write_kc(&mut self, data: &[u8]) -> Result<Bytes> {
        check_input("Kc", data, lengths::KC)?;
        self.write(FileId::DF_GSM, FileId::EF_KC, data)?;
        self.kc()
    }

    /// Overwrite EF LOCI and return the value read back
    pub fn write_location_info(&mut self, data: &[u8]) -> Result<Bytes> {
        check_input("LOCI", data, lengths::LOCI)?;
        self.write(FileId::DF_GSM, FileId::EF_LOCI, data)?;
        self.location_info()
    }

    /// Present a CHV
    pub fn verify_chv(&mut self, chv: Chv, pin: &Pin) -> Result<()> {
        let exchange = self.transport.verify(chv, pin)?;
        require_success(Step::Verify(chv), &exchange)?;
        debug!(%chv, "CHV verified");
        Ok(())
    }

    /// Run the GSM algorithm on a 16 byte RAND
    ///
    /// Selects DF GSM, submits RAND, expects `9F XX` and fetches the XX
    /// bytes with GET RESPONSE. SRES and Kc are split from those bytes.
    pub fn run_gsm_algorithm(&mut self, rand: &[u8]) -> Result<GsmAuthentication> {
        let rand = Rand::from_slice(rand)?;
        debug!(%rand, "GSM algorithm: idle");

        self.enter(FileId::DF_GSM)?;
        debug!("GSM algorithm: directory selected");

        let submitted = self
            .transport
            .internal_authenticate(0x00, 0x00, rand.as_bytes())?;
        let outcome = submitted.outcome();
        let Some(length) = outcome.response_length() else {
            return Err(Error::TransportFailure {
                step: Step::InternalAuthenticate,
                outcome,
            });
        };
        debug!(length, "GSM algorithm: challenge submitted");

        let fetched = self.transport.get_response(length)?;
        require_success(Step::GetResponse, &fetched)?;
        debug!("GSM algorithm: response fetched");

        let authentication = GsmAuthentication::from_payload(&fetched.payload)?;
        debug!(%authentication, "GSM algorithm: done");
        Ok(authentication)
    }

    /// Read the IMSI and run the GSM algorithm, binding the result to the subscriber
    pub fn gsm_triplet(&mut self, rand: Rand) -> Result<GsmTriplet> {
        let imsi = Imsi::from_bytes(&self.imsi()?)?;
        let authentication = self.run_gsm_algorithm(rand.as_bytes())?;
        Ok(GsmTriplet {
            imsi,
            rand,
            authentication,
        })
    }

    fn enter(&mut self, directory: FileId) -> Result<Selection> {
        let selection = self.transport.select(directory)?;
        require_selected(Step::SelectDirectory(directory), selection)
    }

    fn select_file(&mut self, file: FileId) -> Result<Selection> {
        let selection = self.transport.select(file)?;
        require_selected(Step::SelectFile(file), selection)
    }

    fn read(
        &mut self,
        item: &'static str,
        directory: FileId,
        file: FileId,
        shape: Shape,
    ) -> Result<Bytes> {
        self.enter(directory)?;
        let content = self
            .select_file(file)?
            .content
            .ok_or(Error::NoContent(item))?;

        let (bytes, expected) = match shape {
            Shape::Fixed(len) => (content.into_transparent(), Some(len)),
            Shape::Any => (content.into_transparent(), None),
            Shape::FirstRecord(len) => (content.into_first_record(), Some(len)),
            Shape::AnyRecord => (content.into_first_record(), None),
        };
        let bytes = bytes.ok_or(Error::NoContent(item))?;

        if let Some(expected) = expected
            && bytes.len() != expected
        {
            return Err(Error::MalformedPayload {
                item,
                expected,
                actual: bytes.len(),
            });
        }

        debug!(item, value = %hex::encode_upper(&bytes), "Read subscriber data");
        Ok(bytes)
    }

    fn write(&mut self, directory: FileId, file: FileId, data: &[u8]) -> Result<()> {
        self.enter(directory)?;
        self.select_file(file)?;
        let exchange = self.transport.update(file, data)?;
        require_success(Step::Update(file), &exchange)
    }
}

fn require_selected(step: Step, selection: Selection) -> Result<Selection> {
    if selection.status.is_success() {
        Ok(selection)
    } else {
        Err(Error::TransportFailure {
            step,
            outcome: selection.outcome(),
        })
    }
}

fn require_success(step: Step, exchange: &Exchange) -> Result<()> {
    if exchange.status.is_success() {
        Ok(())
    } else {
        Err(Error::TransportFailure {
            step,
            outcome: exchange.outcome(),
        })
    }
}

fn check_input(item: &str, data: &[u8], expected: usize) -> Result<()> {
    if data.len() == expected {
        Ok(())
    } else {
        Err(Error::invalid_input(format!(
            "{item} must be {expected} bytes, got {}",
            data.len()
        )))
    }
}
