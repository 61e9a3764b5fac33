/// XOR of every UTF-16 code unit in `body` (the text between `$` and `*`).
pub fn checksum(body: &str) -> u8 {
    let folded = body.encode_utf16().fold(0u16, |acc, unit| acc ^ unit);
    (folded & 0xFF) as u8
}

/// Checksum rendered the way it appears on the wire: two uppercase hex digits.
pub fn checksum_hex(body: &str) -> String {
    format!("{:02X}", checksum(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_sentences_match() {
        assert_eq!(
            checksum_hex("GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W"),
            "6A"
        );
        assert_eq!(checksum_hex("IIDPT,007.8,,"), "4D");
    }

    #[test]
    fn single_character_change_flips_checksum() {
        let original = checksum("IIMTW,21.5,C");
        let mutated = checksum("IIMTW,21.6,C");
        assert_ne!(original, mutated);
    }

    #[test]
    fn small_values_are_zero_padded() {
        assert_eq!(checksum_hex(""), "00");
        assert_eq!(checksum_hex("A@"), "01");
    }
}
