//! SIM file system addressing and file descriptor parsing
//!
//! Selecting a file answers `9F XX`; the XX bytes fetched with GET RESPONSE
//! describe the file (GSM 11.11 section 9.2.1). [`FileDescriptor::parse`]
//! decodes them.

use bytes::Bytes;
use derive_more::Display;

/// Two byte file identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("{_0:04X}")]
pub struct FileId(pub u16);

impl FileId {
    /// Master file
    pub const MF: Self = Self(0x3F00);
    /// DF TELECOM
    pub const DF_TELECOM: Self = Self(0x7F10);
    /// DF GSM
    pub const DF_GSM: Self = Self(0x7F20);

    /// EF ICCID (under MF)
    pub const EF_ICCID: Self = Self(0x2FE2);

    /// EF Kc
    pub const EF_KC: Self = Self(0x6F20);
    /// EF IMSI
    pub const EF_IMSI: Self = Self(0x6F07);
    /// EF LOCI
    pub const EF_LOCI: Self = Self(0x6F7E);
    /// EF HPLMN search period
    pub const EF_HPLMN: Self = Self(0x6F31);
    /// EF PLMNsel
    pub const EF_PLMNSEL: Self = Self(0x6F30);
    /// EF SPN
    pub const EF_SPN: Self = Self(0x6F46);
    /// EF ACC
    pub const EF_ACC: Self = Self(0x6F78);
    /// EF FPLMN
    pub const EF_FPLMN: Self = Self(0x6F7B);

    /// EF MSISDN (under DF TELECOM)
    pub const EF_MSISDN: Self = Self(0x6F40);
    /// EF SMSP (under DF TELECOM)
    pub const EF_SMSP: Self = Self(0x6F42);

    /// Big-endian bytes as sent in SELECT
    pub const fn to_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

impl From<[u8; 2]> for FileId {
    fn from(bytes: [u8; 2]) -> Self {
        Self(u16::from_be_bytes(bytes))
    }
}

/// Errors raised while decoding a file descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Not enough bytes for the declared file type
    #[error("File descriptor truncated: need {needed} bytes, got {actual}")]
    Truncated {
        /// Minimum length for the declared type
        needed: usize,
        /// Length received
        actual: usize,
    },

    /// Type tag outside the known values
    #[error("Unknown file type tag {0:#04x}")]
    UnknownType(u8),

    /// Structure tag outside the known values
    #[error("Unknown file structure tag {0:#04x}")]
    UnknownStructure(u8),
}

/// Type of file as tagged in byte 7 of the descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FileType {
    /// Reserved (tag 0)
    #[display("RFU")]
    Rfu,
    /// Master file (tag 1)
    #[display("MF")]
    Master,
    /// Dedicated file (tag 2)
    #[display("DF")]
    Dedicated,
    /// Tag 3 carries no label
    #[display("")]
    Unlabelled,
    /// Elementary file (tag 4)
    #[display("EF")]
    Elementary,
}

impl TryFrom<u8> for FileType {
    type Error = ParseError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::Rfu),
            1 => Ok(Self::Master),
            2 => Ok(Self::Dedicated),
            3 => Ok(Self::Unlabelled),
            4 => Ok(Self::Elementary),
            other => Err(ParseError::UnknownType(other)),
        }
    }
}

/// Access condition level (one nibble)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AccessCondition {
    /// Always allowed
    #[display("ALW")]
    Always,
    /// CHV1 required
    #[display("CHV1")]
    Chv1,
    /// CHV2 required
    #[display("CHV2")]
    Chv2,
    /// Reserved
    #[display("RFU")]
    Rfu,
    /// Administrative level 4
    #[display("ADM_4")]
    Adm4,
    /// Administrative level 5
    #[display("ADM_5")]
    Adm5,
    /// Administrative level 6
    #[display("ADM_6")]
    Adm6,
    /// Administrative level 7
    #[display("ADM_7")]
    Adm7,
    /// Administrative level 8
    #[display("ADM_8")]
    Adm8,
    /// Administrative level 9
    #[display("ADM_9")]
    Adm9,
    /// Administrative level A
    #[display("ADM_A")]
    AdmA,
    /// Administrative level B
    #[display("ADM_B")]
    AdmB,
    /// Administrative level C
    #[display("ADM_C")]
    AdmC,
    /// Administrative level D
    #[display("ADM_D")]
    AdmD,
    /// Administrative level E
    #[display("ADM_E")]
    AdmE,
    /// Never allowed
    #[display("NEW")]
    Never,
}

impl AccessCondition {
    const ALL: [Self; 16] = [
        Self::Always,
        Self::Chv1,
        Self::Chv2,
        Self::Rfu,
        Self::Adm4,
        Self::Adm5,
        Self::Adm6,
        Self::Adm7,
        Self::Adm8,
        Self::Adm9,
        Self::AdmA,
        Self::AdmB,
        Self::AdmC,
        Self::AdmD,
        Self::AdmE,
        Self::Never,
    ];

    /// Decode the low nibble of `value`
    pub const fn from_nibble(value: u8) -> Self {
        Self::ALL[(value & 0x0F) as usize]
    }
}

/// Access condition for INCREASE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncreaseAccess {
    /// Condition from the access nibble
    Condition(AccessCondition),
    /// Cyclic files carry a single "increase allowed" bit instead
    Cyclic {
        /// Bit 7 of byte 8
        allowed: bool,
    },
}

/// Access conditions of an elementary file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessConditions {
    /// UPDATE
    pub update: AccessCondition,
    /// READ / SEEK
    pub read: AccessCondition,
    /// INCREASE
    pub increase: IncreaseAccess,
    /// INVALIDATE
    pub invalidate: AccessCondition,
    /// REHABILITATE
    pub rehabilitate: AccessCondition,
}

/// File status byte of an elementary file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStatus {
    /// File may be read and updated while invalidated
    pub readable_when_invalidated: bool,
    /// File is invalidated
    pub invalidated: bool,
}

impl FileStatus {
    const fn from_byte(byte: u8) -> Self {
        Self {
            readable_when_invalidated: byte & 0x04 != 0,
            invalidated: byte & 0x01 == 0,
        }
    }
}

/// Structure of an elementary file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FileStructure {
    /// Byte addressed content
    #[display("transparent")]
    Transparent,
    /// Fixed size records
    #[display("linear fixed")]
    LinearFixed,
    /// Tag 2 is reserved
    #[display("reserved")]
    Reserved,
    /// Fixed size records in a ring
    #[display("cyclic")]
    Cyclic,
}

impl FileStructure {
    /// Whether the content is read with READ RECORD
    pub const fn is_record_based(self) -> bool {
        matches!(self, Self::LinearFixed | Self::Cyclic)
    }
}

impl TryFrom<u8> for FileStructure {
    type Error = ParseError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::Transparent),
            1 => Ok(Self::LinearFixed),
            2 => Ok(Self::Reserved),
            3 => Ok(Self::Cyclic),
            other => Err(ParseError::UnknownStructure(other)),
        }
    }
}

/// State of one secret code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChvStatus {
    /// Secret code initialised
    pub initialized: bool,
    /// Remaining false presentations, 0..=15
    pub attempts_remaining: u8,
}

impl ChvStatus {
    const fn from_byte(byte: u8) -> Self {
        Self {
            initialized: byte & 0x80 != 0,
            attempts_remaining: byte & 0x0F,
        }
    }
}

/// MF/DF specific part of a descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryInfo {
    /// Number of child DFs
    pub dedicated_files: u8,
    /// Number of child EFs
    pub elementary_files: u8,
    /// Number of CHVs, unblock CHVs and administrative codes
    pub secret_codes: u8,
    /// CHV1
    pub chv1: ChvStatus,
    /// UNBLOCK CHV1
    pub unblock_chv1: ChvStatus,
    /// CHV2
    pub chv2: ChvStatus,
    /// UNBLOCK CHV2
    pub unblock_chv2: ChvStatus,
    /// Administrative management tail
    pub administrative: Option<Bytes>,
}

/// EF specific part of a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementaryInfo {
    /// Access conditions
    pub access: AccessConditions,
    /// File status
    pub status: FileStatus,
    /// Structure
    pub structure: FileStructure,
    /// Byte 15 of the descriptor, the record length of linear fixed and cyclic files
    pub record_length: Option<u8>,
}

impl ElementaryInfo {
    /// Number of records in a file of `size` bytes
    pub fn record_count(&self, size: u16) -> u16 {
        match self.record_length {
            Some(len) if len > 0 => size / u16::from(len),
            _ => 0,
        }
    }
}

/// Type specific part of a descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileKind {
    /// MF or DF
    Directory(DirectoryInfo),
    /// EF
    Elementary(ElementaryInfo),
    /// RFU or unlabelled tags, nothing more is decoded
    Unspecified,
}

/// Decoded response to SELECT
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// File size (EF) or free memory (MF/DF)
    pub size: u16,
    /// File identifier
    pub identifier: [u8; 2],
    /// Type tag
    pub file_type: FileType,
    /// Length of the remaining GSM specific data
    pub length: u8,
    /// Type specific data
    pub kind: FileKind,
}

impl FileDescriptor {
    /// Bytes needed by the common header
    pub const HEADER_LEN: usize = 13;
    /// Bytes needed by an MF/DF descriptor
    pub const DIRECTORY_LEN: usize = 22;
    /// Bytes needed by an EF descriptor
    pub const ELEMENTARY_LEN: usize = 15;

    const ADMINISTRATIVE_OFFSET: usize = 23;

    /// Parse the bytes returned by GET RESPONSE after SELECT
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseError> {
        require(bytes, Self::HEADER_LEN)?;

        let file_type = FileType::try_from(bytes[6])?;
        let kind = match file_type {
            FileType::Master | FileType::Dedicated => {
                FileKind::Directory(Self::parse_directory(bytes)?)
            }
            FileType::Elementary => FileKind::Elementary(Self::parse_elementary(bytes)?),
            FileType::Rfu | FileType::Unlabelled => FileKind::Unspecified,
        };

        Ok(Self {
            size: u16::from_be_bytes([bytes[2], bytes[3]]),
            identifier: [bytes[4], bytes[5]],
            file_type,
            length: bytes[12],
            kind,
        })
    }

    fn parse_directory(bytes: &[u8]) -> Result<DirectoryInfo, ParseError> {
        require(bytes, Self::DIRECTORY_LEN)?;

        let administrative = (bytes.len() > Self::ADMINISTRATIVE_OFFSET)
            .then(|| Bytes::copy_from_slice(&bytes[Self::ADMINISTRATIVE_OFFSET..]));

        Ok(DirectoryInfo {
            dedicated_files: bytes[14],
            elementary_files: bytes[15],
            secret_codes: bytes[16],
            chv1: ChvStatus::from_byte(bytes[18]),
            unblock_chv1: ChvStatus::from_byte(bytes[19]),
            chv2: ChvStatus::from_byte(bytes[20]),
            unblock_chv2: ChvStatus::from_byte(bytes[21]),
            administrative,
        })
    }

    fn parse_elementary(bytes: &[u8]) -> Result<ElementaryInfo, ParseError> {
        require(bytes, Self::ELEMENTARY_LEN)?;

        let structure = FileStructure::try_from(bytes[13])?;
        let increase = if structure == FileStructure::Cyclic {
            IncreaseAccess::Cyclic {
                allowed: bytes[7] & 0x40 != 0,
            }
        } else {
            IncreaseAccess::Condition(AccessCondition::from_nibble(bytes[9] >> 4))
        };

        Ok(ElementaryInfo {
            access: AccessConditions {
                update: AccessCondition::from_nibble(bytes[8]),
                read: AccessCondition::from_nibble(bytes[8] >> 4),
                increase,
                invalidate: AccessCondition::from_nibble(bytes[10]),
                rehabilitate: AccessCondition::from_nibble(bytes[10] >> 4),
            },
            status: FileStatus::from_byte(bytes[11]),
            structure,
            record_length: (bytes.len() > 14).then_some(bytes[14]),
        })
    }

    /// File identifier as a [`FileId`]
    pub fn file_id(&self) -> FileId {
        FileId::from(self.identifier)
    }

    /// EF part of the descriptor, if any
    pub const fn elementary(&self) -> Option<&ElementaryInfo> {
        match &self.kind {
            FileKind::Elementary(info) => Some(info),
            _ => None,
        }
    }

    /// MF/DF part of the descriptor, if any
    pub const fn directory(&self) -> Option<&DirectoryInfo> {
        match &self.kind {
            FileKind::Directory(info) => Some(info),
            _ => None,
        }
    }
}

const fn require(bytes: &[u8], needed: usize) -> Result<(), ParseError> {
    if bytes.len() < needed {
        Err(ParseError::Truncated {
            needed,
            actual: bytes.len(),
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // DF GSM: 2 DFs, 18 EFs, 4 codes, CHV1 initialised with 3 attempts,
    // UNBLOCK CHV1 initialised with 10, CHV2 not initialised with 3, UNBLOCK CHV2 with 10
    const DF_GSM: [u8; 25] = [
        0x00, 0x00, 0x1A, 0x2B, 0x7F, 0x20, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0F, 0x13, 0x02,
        0x12, 0x04, 0x00, 0x83, 0x8A, 0x03, 0x8A, 0x00, 0xAA, 0xBB,
    ];

    // EF IMSI: transparent, 9 bytes, READ CHV1, UPDATE ADM_4
    const EF_IMSI: [u8; 15] = [
        0x00, 0x00, 0x00, 0x09, 0x6F, 0x07, 0x04, 0x00, 0x14, 0xFF, 0x44, 0x01, 0x02, 0x00, 0x00,
    ];

    #[test]
    fn test_parse_directory() {
        let fd = FileDescriptor::parse(&DF_GSM).unwrap();
        assert_eq!(fd.size, 0x1A2B);
        assert_eq!(fd.file_id(), FileId::DF_GSM);
        assert_eq!(fd.file_type, FileType::Dedicated);
        assert_eq!(fd.length, 0x0F);

        let info = fd.directory().unwrap();
        assert_eq!(info.dedicated_files, 2);
        assert_eq!(info.elementary_files, 0x12);
        assert_eq!(info.secret_codes, 4);
        assert_eq!(
            info.chv1,
            ChvStatus {
                initialized: true,
                attempts_remaining: 3
            }
        );
        assert_eq!(info.unblock_chv1.attempts_remaining, 10);
        assert!(!info.chv2.initialized);
        assert_eq!(info.chv2.attempts_remaining, 3);
        assert!(info.unblock_chv2.initialized);
        assert_eq!(info.administrative.as_deref(), Some(&[0xAA, 0xBB][..]));
    }

    #[test]
    fn test_directory_without_administrative_tail() {
        let fd = FileDescriptor::parse(&DF_GSM[..23]).unwrap();
        assert_eq!(fd.directory().unwrap().administrative, None);
    }

    #[test]
    fn test_parse_transparent_ef() {
        let fd = FileDescriptor::parse(&EF_IMSI).unwrap();
        assert_eq!(fd.size, 9);
        assert_eq!(fd.file_type, FileType::Elementary);

        let info = fd.elementary().unwrap();
        assert_eq!(info.access.read, AccessCondition::Chv1);
        assert_eq!(info.access.update, AccessCondition::Adm4);
        assert_eq!(
            info.access.increase,
            IncreaseAccess::Condition(AccessCondition::Never)
        );
        assert_eq!(info.access.invalidate, AccessCondition::Adm4);
        assert_eq!(info.access.rehabilitate, AccessCondition::Adm4);
        assert_eq!(
            info.status,
            FileStatus {
                readable_when_invalidated: false,
                invalidated: false
            }
        );
        assert_eq!(info.structure, FileStructure::Transparent);
        assert_eq!(info.record_length, Some(0x00));
    }

    #[test]
    fn test_transparent_ef_keeps_record_length_byte() {
        let bytes = [
            0x00, 0x00, 0x00, 0x09, 0x6F, 0x07, 0x04, 0x00, 0x14, 0xFF, 0x44, 0x01, 0x02, 0x00,
            0x09,
        ];
        let fd = FileDescriptor::parse(&bytes).unwrap();
        let info = fd.elementary().unwrap();
        assert_eq!(info.structure, FileStructure::Transparent);
        assert_eq!(info.record_length, Some(0x09));
    }

    #[test]
    fn test_parse_cyclic_ef() {
        let mut bytes = EF_IMSI;
        bytes[7] = 0x40;
        bytes[11] = 0x04;
        bytes[13] = 0x03;
        bytes[14] = 0x03;
        let fd = FileDescriptor::parse(&bytes).unwrap();
        let info = fd.elementary().unwrap();
        assert_eq!(info.structure, FileStructure::Cyclic);
        assert_eq!(
            info.access.increase,
            IncreaseAccess::Cyclic { allowed: true }
        );
        assert!(info.status.readable_when_invalidated);
        assert!(info.status.invalidated);
        assert_eq!(info.record_length, Some(3));
        assert_eq!(info.record_count(fd.size), 3);
    }

    #[test]
    fn test_truncated_payloads() {
        assert_eq!(
            FileDescriptor::parse(&EF_IMSI[..14]),
            Err(ParseError::Truncated {
                needed: 15,
                actual: 14
            })
        );
        assert_eq!(
            FileDescriptor::parse(&DF_GSM[..21]),
            Err(ParseError::Truncated {
                needed: 22,
                actual: 21
            })
        );
        assert_eq!(
            FileDescriptor::parse(&[0x00; 5]),
            Err(ParseError::Truncated {
                needed: 13,
                actual: 5
            })
        );
        assert!(FileDescriptor::parse(&[]).is_err());
    }

    #[test]
    fn test_unknown_tags() {
        let mut bytes = EF_IMSI;
        bytes[6] = 0x07;
        assert_eq!(
            FileDescriptor::parse(&bytes),
            Err(ParseError::UnknownType(0x07))
        );

        let mut bytes = EF_IMSI;
        bytes[13] = 0x05;
        assert_eq!(
            FileDescriptor::parse(&bytes),
            Err(ParseError::UnknownStructure(0x05))
        );
    }

    #[test]
    fn test_unspecified_types_do_not_fail() {
        for tag in [0x00, 0x03] {
            let mut bytes = [0u8; 13];
            bytes[6] = tag;
            let fd = FileDescriptor::parse(&bytes).unwrap();
            assert_eq!(fd.kind, FileKind::Unspecified);
        }
        assert_eq!(FileType::Unlabelled.to_string(), "");
    }

    #[test]
    fn test_parse_is_deterministic() {
        assert_eq!(
            FileDescriptor::parse(&DF_GSM),
            FileDescriptor::parse(&DF_GSM)
        );
    }

    #[test]
    fn test_file_id() {
        assert_eq!(FileId::DF_GSM.to_bytes(), [0x7F, 0x20]);
        assert_eq!(FileId::from([0x6F, 0x07]), FileId::EF_IMSI);
        assert_eq!(FileId::EF_ICCID.to_string(), "2FE2");
    }
}
