//! Summary of everything readable on a SIM

use std::fmt;

use bytes::Bytes;

use crate::application::{GsmAuthentication, Rand, Sim};
use crate::error::Result;
use crate::transport::SimTransport;
use crate::types::{
    DialingNumber, Iccid, Imsi, LocationInfo, Plmn, ServiceProviderName, decode_plmn_list,
};

/// Subscriber data and a GSM algorithm run on an all-zero RAND
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardReport {
    /// EF Kc
    pub kc: Bytes,
    /// EF LOCI
    pub location: LocationInfo,
    /// EF IMSI
    pub imsi: Imsi,
    /// EF HPLMN, in steps of 6 minutes
    pub hplmn_search_period: u8,
    /// EF PLMNsel
    pub plmn_selector: Vec<Plmn>,
    /// EF ICCID
    pub iccid: Iccid,
    /// EF SPN, absent when the card returned nothing usable
    pub service_provider_name: Option<ServiceProviderName>,
    /// EF ACC
    pub access_control_class: Bytes,
    /// EF FPLMN
    pub forbidden_plmns: Vec<Plmn>,
    /// Service centre address of the first EF SMSP record
    pub sms_service_centre: Option<DialingNumber>,
    /// Number of the first EF MSISDN record
    pub msisdn: Option<DialingNumber>,
    /// GSM algorithm answer to [`Rand::ZERO`]
    pub authentication: GsmAuthentication,
}

impl CardReport {
    /// Read everything, stopping at the first failure
    pub fn collect<S: SimTransport>(sim: &mut Sim<S>) -> Result<Self> {
        let kc = sim.kc()?;
        let location = LocationInfo::from_bytes(&sim.location_info()?)?;
        let imsi = Imsi::from_bytes(&sim.imsi()?)?;
        let hplmn_search_period = sim.hplmn_search_period()?[0];
        let plmn_selector = decode_plmn_list(&sim.plmn_selector()?);
        let iccid = Iccid::from_bytes(&sim.iccid()?)?;
        let service_provider_name = ServiceProviderName::from_bytes(&sim.service_provider_name()?);
        let access_control_class = sim.access_control_class()?;
        let forbidden_plmns = decode_plmn_list(&sim.forbidden_plmns()?);
        let sms_service_centre = DialingNumber::from_smsp_record(&sim.sms_parameters()?);
        let msisdn = DialingNumber::from_msisdn_record(&sim.msisdn()?);
        let authentication = sim.run_gsm_algorithm(Rand::ZERO.as_bytes())?;

        Ok(Self {
            kc,
            location,
            imsi,
            hplmn_search_period,
            plmn_selector,
            iccid,
            service_provider_name,
            access_control_class,
            forbidden_plmns,
            sms_service_centre,
            msisdn,
            authentication,
        })
    }

    /// Labelled, printable fields in reading order
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Stored Kc", hex::encode_upper(&self.kc)),
            ("Location", self.location.to_string()),
            ("IMSI", self.imsi.to_string()),
            (
                "HPLMN search period",
                format!("{} (x 6 min)", self.hplmn_search_period),
            ),
            ("PLMN selector", join(&self.plmn_selector)),
            ("ICCID", self.iccid.to_string()),
            (
                "Service provider name",
                self.service_provider_name
                    .as_ref()
                    .map_or_else(|| "-".to_string(), ToString::to_string),
            ),
            ("ACC", hex::encode_upper(&self.access_control_class)),
            ("Forbidden PLMNs", join(&self.forbidden_plmns)),
            ("SMS service centre", optional(self.sms_service_centre.as_ref())),
            ("MSISDN", optional(self.msisdn.as_ref())),
            ("RAND", Rand::ZERO.to_string()),
            ("SRES", hex::encode_upper(self.authentication.sres)),
            ("Kc (new)", hex::encode_upper(self.authentication.kc)),
        ]
    }
}

fn join(plmns: &[Plmn]) -> String {
    if plmns.is_empty() {
        return "-".to_string();
    }
    plmns
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn optional(number: Option<&DialingNumber>) -> String {
    number.map_or_else(|| "-".to_string(), ToString::to_string)
}

impl fmt::Display for CardReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, value) in self.entries() {
            writeln!(f, "{label:<24}{value}")?;
        }
        Ok(())
    }
}
