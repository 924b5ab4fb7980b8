use std::fmt;

/// Decoded content of EF SPN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceProviderName {
    /// Display condition byte
    pub display_condition: u8,
    /// Provider name
    pub name: String,
}

impl ServiceProviderName {
    /// Decode EF SPN content, `None` when empty
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (&display_condition, encoded) = bytes.split_first()?;
        Some(Self {
            display_condition,
            name: decode_alpha(encoded),
        })
    }

    /// Registered PLMN name must be shown alongside the provider name
    pub const fn requires_plmn_display(&self) -> bool {
        self.display_condition & 0x01 != 0
    }
}

impl fmt::Display for ServiceProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Decode an alpha field: UCS2 when tagged `80`, GSM default alphabet otherwise
fn decode_alpha(bytes: &[u8]) -> String {
    if let Some((&0x80, ucs2)) = bytes.split_first() {
        let units = ucs2
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .take_while(|&unit| unit != 0xFFFF);
        return char::decode_utf16(units)
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
    }

    bytes
        .iter()
        .take_while(|&&b| b != 0xFF)
        .map(|&b| gsm_char(b))
        .collect()
}

/// GSM 03.38 default alphabet, where it differs from ASCII
const fn gsm_char(byte: u8) -> char {
    match byte {
        0x00 => '@',
        0x01 => '£',
        0x02 => '$',
        0x11 => '_',
        0x24 => '¤',
        0x40 => '¡',
        0x5B => 'Ä',
        0x5C => 'Ö',
        0x5E => 'Ü',
        0x5F => '§',
        0x60 => '¿',
        0x7B => 'ä',
        0x7C => 'ö',
        0x7E => 'ü',
        0x7F => 'à',
        0x20..=0x7F => byte as char,
        _ => '?',
    }
}
