//! Ethernet MAC addresses and EUI-64 interface identifiers.

use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

lazy_static! {
    static ref MAC_HEX: Regex = Regex::new(r"^[0-9a-fA-F]{12}$").expect("Invalid Regex?");
}

/// 48-bit Ethernet MAC address.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MacAddr([u8; 6]);

impl MacAddr {
    /// Creates a MAC address from 6 octets.
    pub const fn new(octets: [u8; 6]) -> Self {
        MacAddr(octets)
    }

    /// Returns the six bytes the MAC address consists of.
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Modified EUI-64 interface identifier: `ff:fe` inserted between the
    /// third and fourth octet, universal/local bit (0x02) of the first octet
    /// flipped.
    pub fn eui64(&self) -> u64 {
        let [a, b, c, d, e, f] = self.0;
        u64::from_be_bytes([a ^ 0x02, b, c, 0xff, 0xfe, d, e, f])
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl From<[u8; 6]> for MacAddr {
    fn from(octets: [u8; 6]) -> MacAddr {
        MacAddr(octets)
    }
}

impl FromStr for MacAddr {
    type Err = Error;

    /// Accepts `00:1a:2b:3c:4d:5e`, `00-1A-2B-3C-4D-5E`, `001a.2b3c.4d5e`
    /// and bare `001a2b3c4d5e`.
    fn from_str(s: &str) -> Result<Self> {
        let hex: String = s.chars().filter(|c| !matches!(c, ':' | '-' | '.')).collect();
        if !MAC_HEX.is_match(&hex) {
            return Err(Error::parse(
                s,
                "MAC address must be exactly 12 hex digits once separators are removed",
            ));
        }

        let mut octets = [0u8; 6];
        for (i, octet) in octets.iter_mut().enumerate() {
            let pair = hex.get(2 * i..2 * i + 2).unwrap_or_default();
            *octet = u8::from_str_radix(pair, 16).map_err(|e| Error::parse(s, e.to_string()))?;
        }
        Ok(MacAddr(octets))
    }
}
