//! Named operations exposed to command line front ends
//!
//! [`Parameter`] is the closed set of names; [`Operation`] binds a parameter
//! to its argument and runs it against a [`Sim`].

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use derive_more::Display;

use crate::application::{GsmAuthentication, Rand, Sim};
use crate::error::{Error, Result};
use crate::report::CardReport;
use crate::transport::SimTransport;

/// Operation names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Parameter {
    /// Read EF Kc
    #[display("Kc")]
    Kc,
    /// Read EF IMSI
    #[display("IMSI")]
    Imsi,
    /// Read EF LOCI
    #[display("LOCI")]
    Loci,
    /// Read EF HPLMN
    #[display("HPLMN")]
    Hplmn,
    /// Read EF PLMNsel
    #[display("PLMN_SEL")]
    PlmnSel,
    /// Read EF ICCID
    #[display("ICCID")]
    Iccid,
    /// Read EF SPN
    #[display("SPN")]
    Spn,
    /// Read EF ACC
    #[display("ACC")]
    Acc,
    /// Read EF FPLMN
    #[display("FPLMN")]
    Fplmn,
    /// Read EF MSISDN
    #[display("MSISDN")]
    Msisdn,
    /// Read EF SMSP
    #[display("SMSP")]
    Smsp,
    /// Run the GSM algorithm
    #[display("GSM_ALGO")]
    GsmAlgo,
    /// Write EF Kc
    #[display("Kc-W")]
    KcWrite,
    /// Write EF LOCI
    #[display("LOCI-W")]
    LociWrite,
    /// Read everything
    #[display("PRINT_ALL")]
    PrintAll,
}

impl Parameter {
    /// Every parameter, in display order
    pub const ALL: [Self; 15] = [
        Self::Kc,
        Self::Imsi,
        Self::Loci,
        Self::Hplmn,
        Self::PlmnSel,
        Self::Iccid,
        Self::Spn,
        Self::Acc,
        Self::Fplmn,
        Self::Msisdn,
        Self::Smsp,
        Self::GsmAlgo,
        Self::KcWrite,
        Self::LociWrite,
        Self::PrintAll,
    ];

    /// Whether the operation needs an argument
    pub const fn takes_argument(self) -> bool {
        matches!(self, Self::GsmAlgo | Self::KcWrite | Self::LociWrite)
    }

    /// The write variant of a readable parameter, if it has one
    pub const fn write_variant(self) -> Option<Self> {
        match self {
            Self::Kc => Some(Self::KcWrite),
            Self::Loci => Some(Self::LociWrite),
            _ => None,
        }
    }
}

impl FromStr for Parameter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.to_string() == s)
            .ok_or_else(|| Error::UnknownOperation(s.to_string()))
    }
}

/// A parameter bound to its argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Read EF Kc
    Kc,
    /// Read EF IMSI
    Imsi,
    /// Read EF LOCI
    LocationInfo,
    /// Read EF HPLMN
    HplmnSearchPeriod,
    /// Read EF PLMNsel
    PlmnSelector,
    /// Read EF ICCID
    Iccid,
    /// Read EF SPN
    ServiceProviderName,
    /// Read EF ACC
    AccessControlClass,
    /// Read EF FPLMN
    ForbiddenPlmns,
    /// Read EF MSISDN
    Msisdn,
    /// Read EF SMSP
    SmsParameters,
    /// Run the GSM algorithm
    GsmAlgorithm(Rand),
    /// Write EF Kc
    WriteKc(Bytes),
    /// Write EF LOCI
    WriteLocationInfo(Bytes),
    /// Read everything
    PrintAll,
}

impl Operation {
    /// Bind a parameter to its argument
    ///
    /// Write variants take hex bytes, `GSM_ALGO` takes 32 hex digits. The
    /// others take nothing.
    pub fn new(parameter: Parameter, argument: Option<&str>) -> Result<Self> {
        let no_argument = |operation: Self| match argument {
            Some(_) => Err(Error::invalid_input(format!("{parameter} takes no argument"))),
            None => Ok(operation),
        };
        let required = || {
            argument
                .ok_or_else(|| Error::invalid_input(format!("{parameter} requires an argument")))
        };

        match parameter {
            Parameter::GsmAlgo => Ok(Self::GsmAlgorithm(required()?.parse()?)),
            Parameter::KcWrite => Ok(Self::WriteKc(decode_hex(parameter, required()?)?)),
            Parameter::LociWrite => {
                Ok(Self::WriteLocationInfo(decode_hex(parameter, required()?)?))
            }
            Parameter::Kc => no_argument(Self::Kc),
            Parameter::Imsi => no_argument(Self::Imsi),
            Parameter::Loci => no_argument(Self::LocationInfo),
            Parameter::Hplmn => no_argument(Self::HplmnSearchPeriod),
            Parameter::PlmnSel => no_argument(Self::PlmnSelector),
            Parameter::Iccid => no_argument(Self::Iccid),
            Parameter::Spn => no_argument(Self::ServiceProviderName),
            Parameter::Acc => no_argument(Self::AccessControlClass),
            Parameter::Fplmn => no_argument(Self::ForbiddenPlmns),
            Parameter::Msisdn => no_argument(Self::Msisdn),
            Parameter::Smsp => no_argument(Self::SmsParameters),
            Parameter::PrintAll => no_argument(Self::PrintAll),
        }
    }

    /// Look up a name and bind its argument
    pub fn parse(name: &str, argument: Option<&str>) -> Result<Self> {
        Self::new(name.parse()?, argument)
    }

    /// The parameter this operation was built from
    pub const fn parameter(&self) -> Parameter {
        match self {
            Self::Kc => Parameter::Kc,
            Self::Imsi => Parameter::Imsi,
            Self::LocationInfo => Parameter::Loci,
            Self::HplmnSearchPeriod => Parameter::Hplmn,
            Self::PlmnSelector => Parameter::PlmnSel,
            Self::Iccid => Parameter::Iccid,
            Self::ServiceProviderName => Parameter::Spn,
            Self::AccessControlClass => Parameter::Acc,
            Self::ForbiddenPlmns => Parameter::Fplmn,
            Self::Msisdn => Parameter::Msisdn,
            Self::SmsParameters => Parameter::Smsp,
            Self::GsmAlgorithm(_) => Parameter::GsmAlgo,
            Self::WriteKc(_) => Parameter::KcWrite,
            Self::WriteLocationInfo(_) => Parameter::LociWrite,
            Self::PrintAll => Parameter::PrintAll,
        }
    }

    /// Run the operation
    pub fn execute<S: SimTransport>(&self, sim: &mut Sim<S>) -> Result<Output> {
        let bytes = match self {
            Self::Kc => sim.kc()?,
            Self::Imsi => sim.imsi()?,
            Self::LocationInfo => sim.location_info()?,
            Self::HplmnSearchPeriod => sim.hplmn_search_period()?,
            Self::PlmnSelector => sim.plmn_selector()?,
            Self::Iccid => sim.iccid()?,
            Self::ServiceProviderName => sim.service_provider_name()?,
            Self::AccessControlClass => sim.access_control_class()?,
            Self::ForbiddenPlmns => sim.forbidden_plmns()?,
            Self::Msisdn => sim.msisdn()?,
            Self::SmsParameters => sim.sms_parameters()?,
            Self::WriteKc(data) => sim.write_kc(data)?,
            Self::WriteLocationInfo(data) => sim.write_location_info(data)?,
            Self::GsmAlgorithm(rand) => {
                return Ok(Output::Authentication(
                    sim.run_gsm_algorithm(rand.as_bytes())?,
                ));
            }
            Self::PrintAll => return Ok(Output::Report(Box::new(CardReport::collect(sim)?))),
        };
        Ok(Output::Bytes(bytes))
    }
}

fn decode_hex(parameter: Parameter, data: &str) -> Result<Bytes> {
    hex::decode(data.trim())
        .map(Bytes::from)
        .map_err(|e| Error::invalid_input(format!("{parameter} argument is not valid hex: {e}")))
}

/// Result of an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Raw file content
    Bytes(Bytes),
    /// GSM algorithm answer
    Authentication(GsmAuthentication),
    /// Full card report
    Report(Box<CardReport>),
}

impl Output {
    /// Raw bytes of the result, `None` for a report
    pub fn to_bytes(&self) -> Option<Bytes> {
        match self {
            Self::Bytes(bytes) => Some(bytes.clone()),
            Self::Authentication(auth) => Some(auth.to_bytes()),
            Self::Report(_) => None,
        }
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(bytes) => {
                let list = bytes
                    .iter()
                    .map(u8::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "[{list}]")
            }
            Self::Authentication(auth) => fmt::Display::fmt(auth, f),
            Self::Report(report) => fmt::Display::fmt(report, f),
        }
    }
}
