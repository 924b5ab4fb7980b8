/// Decode swapped-nibble BCD: low nibble first, `F` is filler and ends the number
pub fn decode_bcd(bytes: &[u8]) -> String {
    let mut digits = String::with_capacity(bytes.len() * 2);
    for nibble in bytes.iter().flat_map(|b| [b & 0x0F, b >> 4]) {
        if nibble == 0x0F {
            break;
        }
        digits.push(nibble_char(nibble));
    }
    digits
}

/// Digits `A` to `E` are kept as lowercase hex
pub(crate) fn nibble_char(nibble: u8) -> char {
    char::from_digit(u32::from(nibble), 16).unwrap_or('?')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_bcd() {
        assert_eq!(decode_bcd(&[0x21, 0x43, 0x65]), "123456");
        assert_eq!(decode_bcd(&[0x21, 0xF3, 0x65]), "123");
        assert_eq!(decode_bcd(&[0xFF]), "");
        assert_eq!(decode_bcd(&[]), "");
        assert_eq!(decode_bcd(&[0xBA]), "ab");
    }
}
