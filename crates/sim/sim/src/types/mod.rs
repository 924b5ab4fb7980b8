//! Decoders for subscriber file contents

mod bcd;
mod identity;
mod location;
mod number;
mod plmn;
mod spn;
mod triplet;

pub use bcd::decode_bcd;
pub use identity::{Iccid, Imsi};
pub use location::{LocationArea, LocationInfo, UpdateStatus};
pub use number::DialingNumber;
pub use plmn::{Plmn, decode_plmn_list};
pub use spn::ServiceProviderName;
pub use triplet::GsmTriplet;
