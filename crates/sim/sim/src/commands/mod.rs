//! GSM 11.11 command APDUs
//!
//! Each command is declared with [`apdu_pair!`](simkit_apdu_macros::apdu_pair), which
//! generates the command struct together with typed `Ok` and `Error` responses.

pub mod get_response;
pub use get_response::*;
pub mod internal_authenticate;
pub use internal_authenticate::*;
pub mod read_binary;
pub use read_binary::*;
pub mod read_record;
pub use read_record::*;
pub mod select;
pub use select::*;
pub mod update_binary;
pub use update_binary::*;
pub mod verify_chv;
pub use verify_chv::*;
