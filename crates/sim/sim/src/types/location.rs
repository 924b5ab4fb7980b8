use std::fmt;

use derive_more::Display;

use crate::constants::lengths;
use crate::error::{Error, Result};

use super::plmn::Plmn;

/// Location update status (byte 11 of EF LOCI)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum UpdateStatus {
    /// Updated
    #[display("updated")]
    Updated,
    /// Not updated
    #[display("not updated")]
    NotUpdated,
    /// PLMN not allowed
    #[display("PLMN not allowed")]
    PlmnNotAllowed,
    /// Location area not allowed
    #[display("location area not allowed")]
    LocationAreaNotAllowed,
    /// Reserved value
    #[display("reserved ({_0})")]
    Reserved(u8),
}

impl From<u8> for UpdateStatus {
    fn from(byte: u8) -> Self {
        match byte & 0x07 {
            0 => Self::Updated,
            1 => Self::NotUpdated,
            2 => Self::PlmnNotAllowed,
            3 => Self::LocationAreaNotAllowed,
            other => Self::Reserved(other),
        }
    }
}

/// Location area identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationArea {
    /// Network, `None` when the area is unset
    pub plmn: Option<Plmn>,
    /// Location area code
    pub lac: u16,
}

/// Decoded content of EF LOCI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationInfo {
    /// Temporary mobile subscriber identity
    pub tmsi: [u8; 4],
    /// Location area identity
    pub lai: LocationArea,
    /// TMSI time
    pub tmsi_time: u8,
    /// Location update status
    pub update_status: UpdateStatus,
}

impl LocationInfo {
    /// Decode the 11 byte content of EF LOCI
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: &[u8; lengths::LOCI] = bytes.try_into().map_err(|_| Error::MalformedPayload {
            item: "LOCI",
            expected: lengths::LOCI,
            actual: bytes.len(),
        })?;

        Ok(Self {
            tmsi: [bytes[0], bytes[1], bytes[2], bytes[3]],
            lai: LocationArea {
                plmn: Plmn::from_bytes([bytes[4], bytes[5], bytes[6]]),
                lac: u16::from_be_bytes([bytes[7], bytes[8]]),
            },
            tmsi_time: bytes[9],
            update_status: UpdateStatus::from(bytes[10]),
        })
    }
}

impl fmt::Display for LocationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TMSI {}, LAI ", hex::encode_upper(self.tmsi))?;
        match &self.lai.plmn {
            Some(plmn) => write!(f, "({}, {}, {:04X})", plmn.mcc, plmn.mnc, self.lai.lac)?,
            None => write!(f, "(unset, {:04X})", self.lai.lac)?,
        }
        write!(
            f,
            ", TMSI time {:02X}, {}",
            self.tmsi_time, self.update_status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_info() {
        let loci = LocationInfo::from_bytes(&[
            0x12, 0x34, 0x56, 0x78, 0x62, 0xF2, 0x10, 0x1F, 0x40, 0xFF, 0x00,
        ])
        .unwrap();
        assert_eq!(loci.tmsi, [0x12, 0x34, 0x56, 0x78]);
        assert_eq!(loci.lai.plmn.as_ref().unwrap().to_string(), "262-01");
        assert_eq!(loci.lai.lac, 0x1F40);
        assert_eq!(loci.update_status, UpdateStatus::Updated);
        assert_eq!(
            loci.to_string(),
            "TMSI 12345678, LAI (262, 01, 1F40), TMSI time FF, updated"
        );
    }

    #[test]
    fn test_location_info_wrong_length() {
        assert!(LocationInfo::from_bytes(&[0x00; 10]).is_err());
    }
}
