//! Validation helpers for user-supplied address and network text.
//!
//! Each `validate_*` function returns the parsed value or an error whose
//! message says what is wrong; the `is_*` forms only answer yes or no.

use crate::error::{Error, Result};
use crate::models::{Address, Network, MAX_LENGTH};
use lazy_static::lazy_static;
use regex::Regex;
use std::str::FromStr;

lazy_static! {
    static ref EXPANDED_FORM: Regex =
        Regex::new(r"^[0-9a-fA-F]{4}(:[0-9a-fA-F]{4}){7}$").expect("Invalid Regex?");
}

/// Parse an address, rejecting any zone unless `allow_zone` is set.
pub fn validate_address(text: &str, allow_zone: bool) -> Result<Address> {
    if text.is_empty() {
        return Err(Error::parse(text, "address cannot be empty"));
    }
    if !allow_zone && text.contains('%') {
        return Err(Error::parse(text, "zone IDs are not allowed"));
    }
    Address::from_str(text)
}

pub fn is_valid_address(text: &str, allow_zone: bool) -> bool {
    validate_address(text, allow_zone).is_ok()
}

/// Parse a network in CIDR notation. Host bits are masked off.
pub fn validate_network(text: &str) -> Result<Network> {
    if text.is_empty() {
        return Err(Error::parse(text, "network cannot be empty"));
    }
    if !text.contains('/') {
        return Err(Error::parse(
            text,
            "network must include a prefix length (e.g. 2001:db8::/32)",
        ));
    }
    Network::from_text(text, false)
}

pub fn is_valid_network(text: &str) -> bool {
    validate_network(text).is_ok()
}

/// True if the text uses `::` zero compression.
pub fn is_compressed_format(text: &str) -> bool {
    text.contains("::")
}

/// True if the text is a valid address written as eight groups of four hex
/// digits. A zone suffix is ignored.
pub fn is_expanded_format(text: &str) -> bool {
    if !is_valid_address(text, true) {
        return false;
    }
    let bare = text.split('%').next().unwrap_or_default();
    EXPANDED_FORM.is_match(bare)
}

pub fn validate_prefix_length(len: u8) -> Result<u8> {
    if len > MAX_LENGTH {
        return Err(Error::range(format!(
            "prefix length must be between 0 and {MAX_LENGTH}, got {len}"
        )));
    }
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_address() {
        assert_eq!(
            validate_address("2001:db8::1", false).unwrap().to_string(),
            "2001:db8::1"
        );
        assert_eq!(
            validate_address("fe80::1%eth0", true).unwrap().zone(),
            Some("eth0")
        );
        assert!(validate_address("fe80::1%eth0", false).is_err());
        assert!(validate_address("", true).is_err());
        assert!(validate_address("fe80::1%", true).is_err());
        assert!(validate_address("192.168.1.1", true).is_err());
    }

    #[test]
    fn test_is_valid_address() {
        assert!(is_valid_address("::", false));
        assert!(is_valid_address("::1", false));
        assert!(is_valid_address("2001:0db8:0000:0000:0000:0000:0000:0001", false));
        assert!(!is_valid_address("2001:db8::1::2", true));
        assert!(!is_valid_address("2001:db8:::1", true));
        assert!(!is_valid_address("12345::1", true));
        assert!(!is_valid_address("1:2:3:4:5:6:7:8:9", true));
        assert!(!is_valid_address("not an address", true));
    }

    #[test]
    fn test_validate_network() {
        assert_eq!(
            validate_network("2001:db8::1/32").unwrap().to_string(),
            "2001:db8::/32"
        );
        assert!(matches!(
            validate_network("2001:db8::"),
            Err(Error::Parse { .. })
        ));
        assert!(matches!(
            validate_network("2001:db8::/129"),
            Err(Error::Range(_))
        ));
        assert!(!is_valid_network(""));
        assert!(!is_valid_network("2001:db8::/032"));
        assert!(is_valid_network("::/0"));
    }

    #[test]
    fn test_format_checks() {
        assert!(is_compressed_format("2001:db8::1"));
        assert!(!is_compressed_format("2001:db8:0:0:0:0:0:1"));

        assert!(is_expanded_format("2001:0db8:0000:0000:0000:0000:0000:0001"));
        assert!(is_expanded_format("FE80:0000:0000:0000:0000:0000:0000:0001%eth0"));
        assert!(!is_expanded_format("2001:db8:0:0:0:0:0:1"));
        assert!(!is_expanded_format("2001:db8::1"));
        assert!(!is_expanded_format("2001:0db8:0000:0000:0000:0000:0000:000g"));
    }

    #[test]
    fn test_validate_prefix_length() {
        assert_eq!(validate_prefix_length(0).unwrap(), 0);
        assert_eq!(validate_prefix_length(128).unwrap(), 128);
        assert!(matches!(validate_prefix_length(129), Err(Error::Range(_))));
    }
}
