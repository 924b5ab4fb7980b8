/// Class byte of every GSM 11.11 command
pub const CLA_GSM: u8 = 0xA0;

/// Instruction bytes of the GSM command set
pub mod ins {
    /// SELECT
    pub const SELECT: u8 = 0xA4;
    /// GET RESPONSE
    pub const GET_RESPONSE: u8 = 0xC0;
    /// READ BINARY
    pub const READ_BINARY: u8 = 0xB0;
    /// READ RECORD
    pub const READ_RECORD: u8 = 0xB2;
    /// UPDATE BINARY
    pub const UPDATE_BINARY: u8 = 0xD6;
    /// RUN GSM ALGORITHM (INTERNAL AUTHENTICATE)
    pub const INTERNAL_AUTHENTICATE: u8 = 0x88;
    /// VERIFY CHV
    pub const VERIFY_CHV: u8 = 0x20;
}

/// Fixed sizes of subscriber files and authentication values, in bytes
pub mod lengths {
    /// EF IMSI
    pub const IMSI: usize = 9;
    /// EF Kc (8 byte key and sequence number)
    pub const KC: usize = 9;
    /// EF LOCI
    pub const LOCI: usize = 11;
    /// EF HPLMN search period
    pub const HPLMN: usize = 1;
    /// EF ICCID
    pub const ICCID: usize = 10;
    /// EF SPN
    pub const SPN: usize = 17;
    /// EF ACC
    pub const ACC: usize = 2;
    /// EF FPLMN
    pub const FPLMN: usize = 12;
    /// One record of EF SMSP
    pub const SMSP: usize = 44;
    /// RAND challenge
    pub const RAND: usize = 16;
    /// SRES
    pub const SRES: usize = 4;
    /// Kc produced by the GSM algorithm
    pub const GSM_KC: usize = 8;
    /// CHV block sent with VERIFY CHV
    pub const CHV_BLOCK: usize = 8;
}

/// Largest chunk a single READ BINARY may request
pub const MAX_READ_CHUNK: usize = 255;
