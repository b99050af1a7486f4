//! Token and output normalization.
//!
//! Vendors print the same values in different shapes: Cisco writes MAC
//! addresses as `aabb.ccdd.eeff`, RouterOS as `AA:BB:CC:DD:EE:FF`, and
//! some devices colour their output with ANSI escapes. Everything here is
//! pure and allocation-light.

use vte::{Parser, Perform};

use crate::error::ParseError;

/// Number of hex digits in a 48-bit MAC address.
const MAC_HEX_DIGITS: usize = 12;

/// Extract the six octets of a MAC address written in any separator style.
///
/// All non-hex characters are discarded. Exactly twelve hex digits must
/// remain, otherwise the input is rejected.
pub fn mac_octets(raw: &str) -> Result<[u8; 6], ParseError> {
    let digits: Vec<u8> = raw
        .chars()
        .filter_map(|c| c.to_digit(16))
        .map(|d| d as u8)
        .collect();

    if digits.len() != MAC_HEX_DIGITS {
        return Err(ParseError::MalformedMac {
            raw: raw.to_string(),
            digits: digits.len(),
        });
    }

    let mut octets = [0u8; 6];
    for (octet, pair) in octets.iter_mut().zip(digits.chunks_exact(2)) {
        *octet = (pair[0] << 4) | pair[1];
    }
    Ok(octets)
}

/// Normalize a MAC address to canonical `XX:XX:XX:XX:XX:XX` uppercase form.
///
/// ```
/// use netfacts::normalize::normalize_mac;
///
/// assert_eq!(normalize_mac("aabb.ccdd.eeff").unwrap(), "AA:BB:CC:DD:EE:FF");
/// assert_eq!(normalize_mac("00-11-22-33-44-55").unwrap(), "00:11:22:33:44:55");
/// assert!(normalize_mac("aabb.ccdd").is_err());
/// ```
pub fn normalize_mac(raw: &str) -> Result<String, ParseError> {
    mac_octets(raw).map(|octets| format_mac(&octets))
}

pub(crate) fn format_mac(octets: &[u8; 6]) -> String {
    octets
        .iter()
        .map(|o| format!("{o:02X}"))
        .collect::<Vec<_>>()
        .join(":")
}

/// Collects printable characters, dropping escape sequences and control bytes.
struct PlainText {
    text: String,
}

impl Perform for PlainText {
    fn print(&mut self, c: char) {
        self.text.push(c);
    }

    fn execute(&mut self, byte: u8) {
        // Only line feeds and tabs survive; \r and the rest are dropped.
        if byte == b'\n' || byte == b'\t' {
            self.text.push(byte as char);
        }
    }
}

/// Strip ANSI escape sequences and carriage returns from raw device output.
pub fn clean_output(raw: &[u8]) -> String {
    let mut parser = Parser::new();
    let mut plain = PlainText {
        text: String::with_capacity(raw.len()),
    };
    parser.advance(&mut plain, raw);
    plain.text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cisco_dotted_mac() {
        assert_eq!(normalize_mac("aabb.ccdd.eeff").unwrap(), "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn test_separator_styles() {
        for raw in [
            "AA:BB:CC:DD:EE:FF",
            "aa-bb-cc-dd-ee-ff",
            "aa bb cc dd ee ff",
            "AABBCCDDEEFF",
            "aAbB.cCdD.eEfF",
        ] {
            assert_eq!(normalize_mac(raw).unwrap(), "AA:BB:CC:DD:EE:FF", "input {raw}");
        }
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = normalize_mac("0011.2233.44ff").unwrap();
        assert_eq!(normalize_mac(&once).unwrap(), once);
    }

    #[test]
    fn test_short_mac_rejected() {
        let err = normalize_mac("aabb.ccdd.ee").unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedMac {
                raw: "aabb.ccdd.ee".to_string(),
                digits: 10
            }
        );
    }

    #[test]
    fn test_long_mac_rejected() {
        assert!(normalize_mac("aabb.ccdd.eeff.00").is_err());
    }

    #[test]
    fn test_non_mac_word_rejected() {
        // "Incomplete" contains three hex letters
        assert!(normalize_mac("Incomplete").is_err());
    }

    #[test]
    fn test_clean_output_strips_ansi() {
        assert_eq!(clean_output(b"\x1b[32mGreen text\x1b[0m"), "Green text");
    }

    #[test]
    fn test_clean_output_drops_carriage_returns() {
        assert_eq!(clean_output(b"line one\r\nline two\r\n"), "line one\nline two\n");
    }

    #[test]
    fn test_clean_output_keeps_tabs() {
        assert_eq!(clean_output(b"a\tb"), "a\tb");
    }
}
