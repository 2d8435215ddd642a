//! IPv6 address parsing, canonical formatting and classification.
//!
//! Provides [`Address`], a 128-bit value with an optional zone identifier
//! (`fe80::1%eth0`), and [`AddressType`] for classifying it.

use crate::error::{Error, Result};
use itertools::Itertools;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::Ipv6Addr;
use std::str::FromStr;

/// Maximum length for an IPv6 prefix (128 bits).
pub const MAX_LENGTH: u8 = 128;

/// Number of 16-bit groups in a fully expanded address.
const GROUPS: usize = 8;

pub(crate) const LINK_LOCAL_BASE: u128 = 0xfe80 << 112;
pub(crate) const UNIQUE_LOCAL_BASE: u128 = 0xfc00 << 112;
pub(crate) const MULTICAST_BASE: u128 = 0xff00 << 112;

/// Ranges reported as [`AddressType::Reserved`] once the special-purpose
/// categories have been ruled out.
const RESERVED_RANGES: &[(u128, u8)] = &[
    (0x0000 << 112, 8),        // ::/8, IETF reserved (v4-mapped, v4-compatible)
    (0x0100 << 112, 8),        // 100::/8, discard-only and IETF reserved
    (0x0200 << 112, 7),        // 200::/7
    (0x0400 << 112, 6),        // 400::/6
    (0x0800 << 112, 5),        // 800::/5
    (0x1000 << 112, 4),        // 1000::/4
    (0x2001_0db8 << 96, 32),   // 2001:db8::/32, documentation (RFC 3849)
    (0x4000 << 112, 3),        // 4000::/3
    (0x6000 << 112, 3),        // 6000::/3
    (0x8000 << 112, 3),        // 8000::/3
    (0xa000 << 112, 3),        // a000::/3
    (0xc000 << 112, 3),        // c000::/3
    (0xe000 << 112, 4),        // e000::/4
    (0xf000 << 112, 5),        // f000::/5
    (0xf800 << 112, 6),        // f800::/6
    (0xfe00 << 112, 9),        // fe00::/9
    (0xfec0 << 112, 10),       // fec0::/10, deprecated site-local (RFC 3879)
];

/// True if the top `len` bits of `value` equal those of `base`.
pub(crate) fn in_prefix(value: u128, base: u128, len: u8) -> bool {
    if len == 0 {
        true
    } else {
        (value ^ base) >> (MAX_LENGTH - len.min(MAX_LENGTH)) == 0
    }
}

/// Category of an IPv6 address.
///
/// Categories are mutually exclusive and are evaluated in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AddressType {
    /// `::`
    Unspecified,
    /// `::1`
    Loopback,
    /// `fe80::/10`
    LinkLocal,
    /// `fc00::/7`
    UniqueLocal,
    /// `ff00::/8`
    Multicast,
    /// IETF reserved, documentation and deprecated ranges.
    Reserved,
    /// Everything else.
    GlobalUnicast,
}

impl AddressType {
    /// Human readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::Unspecified => "Unspecified",
            AddressType::Loopback => "Loopback",
            AddressType::LinkLocal => "Link-Local",
            AddressType::UniqueLocal => "Unique Local (ULA)",
            AddressType::Multicast => "Multicast",
            AddressType::Reserved => "Reserved",
            AddressType::GlobalUnicast => "Global Unicast",
        }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// IPv6 address with an optional zone identifier.
///
/// Equality, ordering and hashing look at the numeric value only:
/// `fe80::1%eth0 == fe80::1%eth1`. Use [`Address::same_zone_and_value`] when
/// the zone matters.
#[derive(Debug, Clone)]
pub struct Address {
    value: u128,
    zone: Option<String>,
}

impl Address {
    /// The unspecified address `::`.
    pub const UNSPECIFIED: Address = Address {
        value: 0,
        zone: None,
    };

    /// Create an address from its numeric value, without a zone.
    pub const fn new(value: u128) -> Address {
        Address { value, zone: None }
    }

    /// The 128-bit numeric value.
    pub fn value(&self) -> u128 {
        self.value
    }

    /// The zone identifier, if any.
    pub fn zone(&self) -> Option<&str> {
        self.zone.as_deref()
    }

    /// Attach a zone identifier, replacing any existing one.
    pub fn with_zone(self, zone: &str) -> Result<Address> {
        let zone = check_zone(zone, zone)?;
        Ok(Address {
            value: self.value,
            zone: Some(zone),
        })
    }

    /// The same numeric value with the zone dropped.
    pub fn without_zone(&self) -> Address {
        Address::new(self.value)
    }

    /// Zone-aware comparison: both the value and the zone must match.
    pub fn same_zone_and_value(&self, other: &Address) -> bool {
        self.value == other.value && self.zone == other.zone
    }

    /// The eight 16-bit groups, most significant first.
    pub fn segments(&self) -> [u16; GROUPS] {
        let mut out = [0u16; GROUPS];
        for (i, group) in out.iter_mut().enumerate() {
            *group = (self.value >> (112 - 16 * i)) as u16;
        }
        out
    }

    /// RFC 5952 canonical text: lowercase, no leading zeros, the longest
    /// (leftmost on ties) run of two or more zero groups written as `::`.
    pub fn compressed(&self) -> String {
        let groups = self.segments();
        let hex = |gs: &[u16]| gs.iter().map(|g| format!("{g:x}")).join(":");

        let mut out = match longest_zero_run(&groups) {
            Some((start, len)) => {
                format!("{}::{}", hex(&groups[..start]), hex(&groups[start + len..]))
            }
            None => hex(&groups),
        };
        self.push_zone(&mut out);
        out
    }

    /// Eight groups of four lowercase hex digits, zone appended if present.
    pub fn exploded(&self) -> String {
        let mut out = self.segments().iter().map(|g| format!("{g:04x}")).join(":");
        self.push_zone(&mut out);
        out
    }

    /// 128 characters of `0`/`1`.
    pub fn to_binary(&self) -> String {
        format!("{:0128b}", self.value)
    }

    /// 32 lowercase hex characters.
    pub fn to_hex(&self) -> String {
        format!("{:032x}", self.value)
    }

    /// Nibble-reversed `ip6.arpa` name. The zone is not part of it.
    pub fn reverse_pointer(&self) -> String {
        format!("{}.ip6.arpa", self.to_hex().chars().rev().join("."))
    }

    /// Classify the address. Exactly one category applies.
    pub fn classify(&self) -> AddressType {
        let v = self.value;
        if v == 0 {
            AddressType::Unspecified
        } else if v == 1 {
            AddressType::Loopback
        } else if in_prefix(v, LINK_LOCAL_BASE, 10) {
            AddressType::LinkLocal
        } else if in_prefix(v, UNIQUE_LOCAL_BASE, 7) {
            AddressType::UniqueLocal
        } else if in_prefix(v, MULTICAST_BASE, 8) {
            AddressType::Multicast
        } else if RESERVED_RANGES
            .iter()
            .any(|&(base, len)| in_prefix(v, base, len))
        {
            AddressType::Reserved
        } else {
            AddressType::GlobalUnicast
        }
    }

    pub fn is_unspecified(&self) -> bool {
        self.classify() == AddressType::Unspecified
    }

    pub fn is_loopback(&self) -> bool {
        self.classify() == AddressType::Loopback
    }

    pub fn is_link_local(&self) -> bool {
        self.classify() == AddressType::LinkLocal
    }

    pub fn is_unique_local(&self) -> bool {
        self.classify() == AddressType::UniqueLocal
    }

    pub fn is_multicast(&self) -> bool {
        self.classify() == AddressType::Multicast
    }

    pub fn is_reserved(&self) -> bool {
        self.classify() == AddressType::Reserved
    }

    pub fn is_global_unicast(&self) -> bool {
        self.classify() == AddressType::GlobalUnicast
    }

    fn push_zone(&self, out: &mut String) {
        if let Some(zone) = &self.zone {
            out.push('%');
            out.push_str(zone);
        }
    }
}

/// Find the longest run of at least two zero groups, leftmost on ties.
fn longest_zero_run(groups: &[u16; GROUPS]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    let mut i = 0;
    while i < GROUPS {
        if groups[i] != 0 {
            i += 1;
            continue;
        }
        let start = i;
        while i < GROUPS && groups[i] == 0 {
            i += 1;
        }
        let len = i - start;
        if len >= 2 && best.map_or(true, |(_, best_len)| len > best_len) {
            best = Some((start, len));
        }
    }
    best
}

fn check_zone(input: &str, zone: &str) -> Result<String> {
    if zone.is_empty() {
        Err(Error::parse(input, "zone identifier after '%' is empty"))
    } else if zone.contains('%') || zone.contains('/') {
        Err(Error::parse(input, "zone identifier may not contain '%' or '/'"))
    } else {
        Ok(zone.to_string())
    }
}

fn parse_group(input: &str, group: &str) -> Result<u16> {
    if group.is_empty() {
        return Err(Error::parse(input, "empty group"));
    }
    if group.len() > 4 {
        return Err(Error::parse(
            input,
            format!("group '{group}' has more than 4 hex digits"),
        ));
    }
    if !group.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::parse(
            input,
            format!("group '{group}' is not hexadecimal"),
        ));
    }
    u16::from_str_radix(group, 16)
        .map_err(|e| Error::parse(input, format!("group '{group}': {e}")))
}

fn parse_group_list(input: &str, text: &str) -> Result<Vec<u16>> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let groups = text
        .split(':')
        .map(|g| parse_group(input, g))
        .collect::<Result<Vec<u16>>>()?;
    if groups.len() > GROUPS {
        return Err(Error::parse(input, "more than 8 groups"));
    }
    Ok(groups)
}

/// Parse the address part (no zone) into its numeric value.
fn parse_value(input: &str, text: &str) -> Result<u128> {
    if text.is_empty() {
        return Err(Error::parse(input, "empty address"));
    }
    if text.contains('.') {
        return Err(Error::parse(
            input,
            "dotted IPv4 notation is not supported",
        ));
    }
    if text.contains(":::") {
        return Err(Error::parse(input, "too many consecutive colons"));
    }

    let groups = match text.split_once("::") {
        None => {
            let groups = parse_group_list(input, text)?;
            if groups.len() != GROUPS {
                return Err(Error::parse(
                    input,
                    format!("expected 8 groups, found {}", groups.len()),
                ));
            }
            groups
        }
        Some((head, tail)) => {
            if tail.contains("::") {
                return Err(Error::parse(input, "more than one '::'"));
            }
            let head = parse_group_list(input, head)?;
            let tail = parse_group_list(input, tail)?;
            let explicit = head.len() + tail.len();
            if explicit >= GROUPS {
                return Err(Error::parse(
                    input,
                    "more than 8 groups once '::' is expanded",
                ));
            }
            let mut groups = head;
            groups.resize(GROUPS - tail.len(), 0);
            groups.extend(tail);
            groups
        }
    };

    Ok(groups
        .iter()
        .fold(0u128, |acc, &g| (acc << 16) | u128::from(g)))
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(text: &str) -> Result<Address> {
        let (addr, zone) = match text.split_once('%') {
            Some((addr, zone)) => (addr, Some(check_zone(text, zone)?)),
            None => (text, None),
        };
        let value = parse_value(text, addr)?;
        Ok(Address { value, zone })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.compressed())
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Address) -> bool {
        self.value == other.value
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl PartialOrd for Address {
    fn partial_cmp(&self, other: &Address) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Address {
    fn cmp(&self, other: &Address) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl From<u128> for Address {
    fn from(value: u128) -> Address {
        Address::new(value)
    }
}

impl From<Ipv6Addr> for Address {
    fn from(addr: Ipv6Addr) -> Address {
        Address::new(u128::from(addr))
    }
}

impl From<&Address> for Ipv6Addr {
    fn from(addr: &Address) -> Ipv6Addr {
        Ipv6Addr::from(addr.value)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.compressed())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Address::from_str(&s).map_err(de::Error::custom)
    }
}
