use std::fmt;

use crate::application::{GsmAuthentication, Rand};

use super::identity::Imsi;

/// A GSM authentication triplet bound to a subscriber
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GsmTriplet {
    /// Subscriber identity
    pub imsi: Imsi,
    /// Challenge
    pub rand: Rand,
    /// Card answer
    pub authentication: GsmAuthentication,
}

impl GsmTriplet {
    /// Line for a strongSwan `triplets.dat` file
    ///
    /// The realm assumes a three digit MNC.
    pub fn to_strongswan_line(&self) -> String {
        format!(
            "1{imsi}@uma.mnc{mnc}.mcc{mcc}.3gppnetwork.org,{rand},{sres},{kc}",
            imsi = self.imsi,
            mnc = self.imsi.mnc(),
            mcc = self.imsi.mcc(),
            rand = hex::encode(self.rand.as_bytes()),
            sres = hex::encode(self.authentication.sres),
            kc = hex::encode(self.authentication.kc),
        )
    }
}

impl fmt::Display for GsmTriplet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_strongswan_line())
    }
}
