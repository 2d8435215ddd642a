//! IPv6 CIDR networks and 128-bit prefix utilities.
//!
//! Provides [`Network`] for representing a CIDR block, [`AddressCount`] for
//! exact block sizes, and free functions for mask calculations.

use super::address::{Address, MAX_LENGTH};
use crate::error::{Error, Result};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decimal form of 2^128, the size of `::/0`.
const FULL_SPACE_COUNT: &str = "340282366920938463463374607431768211456";

/// Mask for a prefix length already known to be in range.
fn mask(len: u8) -> u128 {
    match len {
        0 => 0,
        len if len >= MAX_LENGTH => u128::MAX,
        len => u128::MAX << (MAX_LENGTH - len),
    }
}

fn check_len(len: u8) -> Result<u8> {
    if len > MAX_LENGTH {
        Err(Error::range(format!(
            "prefix length {len} exceeds {MAX_LENGTH}"
        )))
    } else {
        Ok(len)
    }
}

/// Convert a prefix length to a 128-bit network mask.
///
/// # Examples
/// ```
/// use ipv6_plan::models::prefix_mask;
/// assert_eq!(prefix_mask(16).unwrap(), 0xffff_u128 << 112);
/// ```
pub fn prefix_mask(len: u8) -> Result<u128> {
    Ok(mask(check_len(len)?))
}

/// The netmask for a prefix length, as an address (`/32` gives `ffff:ffff::`).
pub fn netmask_for_prefix(len: u8) -> Result<Address> {
    prefix_mask(len).map(Address::new)
}

/// Get the network (lowest) address for a value and prefix length.
pub fn network_addr(value: u128, len: u8) -> Result<u128> {
    Ok(value & mask(check_len(len)?))
}

/// Get the last (highest) address of the block holding `value`.
pub fn last_addr(value: u128, len: u8) -> Result<u128> {
    Ok(value | !mask(check_len(len)?))
}

/// Exact number of addresses in a block, `2^(128 - prefix)`.
///
/// Stored as the exponent so that `::/0` (2^128 addresses, one more than
/// `u128::MAX`) stays exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AddressCount {
    host_bits: u8,
}

impl AddressCount {
    /// Size of a block with the given prefix length.
    pub fn from_prefix(len: u8) -> Result<AddressCount> {
        Ok(AddressCount {
            host_bits: MAX_LENGTH - check_len(len)?,
        })
    }

    /// The exponent: number of host bits.
    pub fn host_bits(&self) -> u8 {
        self.host_bits
    }

    /// The count as `u128`; `None` only for the whole address space.
    pub fn to_u128(&self) -> Option<u128> {
        1u128.checked_shl(u32::from(self.host_bits))
    }
}

impl fmt::Display for AddressCount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.to_u128() {
            Some(n) => write!(f, "{n}"),
            None => f.write_str(FULL_SPACE_COUNT),
        }
    }
}

impl Serialize for AddressCount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// IPv6 network in CIDR notation. Host bits of `base` are always zero.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Network {
    base: u128,
    prefix: u8,
}

impl Network {
    /// Build a network from an address and prefix length.
    ///
    /// With `strict` set, any host bit in `address` is an error; otherwise the
    /// address is masked down to its network address. A zone is dropped.
    pub fn new(address: &Address, prefix: u8, strict: bool) -> Result<Network> {
        Network::from_value(address.value(), prefix, strict)
    }

    /// Same as [`Network::new`] from a numeric value.
    pub fn from_value(value: u128, prefix: u8, strict: bool) -> Result<Network> {
        let base = network_addr(value, prefix)?;
        if base != value {
            if strict {
                return Err(Error::semantic(format!(
                    "{}/{prefix} has host bits set",
                    Address::new(value)
                )));
            }
            log::debug!(
                "Masked {}/{prefix} down to {}/{prefix}",
                Address::new(value),
                Address::new(base)
            );
        }
        Ok(Network { base, prefix })
    }

    /// Parse `address/prefix` text (e.g. "2001:db8::/32").
    pub fn from_text(text: &str, strict: bool) -> Result<Network> {
        let (addr_text, len_text) = text
            .split_once('/')
            .ok_or_else(|| Error::parse(text, "missing '/' before the prefix length"))?;
        let address = Address::from_str(addr_text)?;
        let prefix = parse_prefix_len(text, len_text)?;
        Network::new(&address, prefix, strict)
    }

    /// Network address as a number.
    pub fn base(&self) -> u128 {
        self.base
    }

    /// Prefix length (0-128).
    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Highest address in the block as a number.
    pub fn last(&self) -> u128 {
        self.base | !mask(self.prefix)
    }

    /// Lowest (network) address.
    pub fn network_address(&self) -> Address {
        Address::new(self.base)
    }

    /// Highest address.
    pub fn last_address(&self) -> Address {
        Address::new(self.last())
    }

    pub fn netmask(&self) -> Address {
        Address::new(mask(self.prefix))
    }

    pub fn hostmask(&self) -> Address {
        Address::new(!mask(self.prefix))
    }

    /// Number of addresses in the block.
    pub fn address_count(&self) -> AddressCount {
        AddressCount {
            host_bits: MAX_LENGTH - self.prefix,
        }
    }

    /// Check whether an address lies in the block. The zone is ignored.
    pub fn contains(&self, address: &Address) -> bool {
        self.contains_value(address.value())
    }

    pub fn contains_value(&self, value: u128) -> bool {
        self.base <= value && value <= self.last()
    }

    /// Parse `text` as an address and check it; unparseable text is `false`.
    pub fn contains_text(&self, text: &str) -> bool {
        match Address::from_str(text) {
            Ok(address) => self.contains(&address),
            Err(e) => {
                log::debug!("contains_text({text}): {e}");
                false
            }
        }
    }

    /// True if `other` is entirely inside this block.
    pub fn contains_network(&self, other: &Network) -> bool {
        self.prefix <= other.prefix && self.contains_value(other.base)
    }

    /// True if the two blocks share at least one address.
    pub fn overlaps(&self, other: &Network) -> bool {
        self.base <= other.last() && other.base <= self.last()
    }

    /// Parse `text` as a network (non-strict) and check overlap;
    /// unparseable text is `false`.
    pub fn overlaps_text(&self, text: &str) -> bool {
        match Network::from_text(text, false) {
            Ok(other) => self.overlaps(&other),
            Err(e) => {
                log::debug!("overlaps_text({text}): {e}");
                false
            }
        }
    }

    /// Split into `2^prefix_delta` equal children, in ascending order.
    pub fn subnets(&self, prefix_delta: u8) -> Result<Subnets> {
        let new_prefix = u16::from(self.prefix) + u16::from(prefix_delta);
        if new_prefix > u16::from(MAX_LENGTH) {
            return Err(Error::semantic(format!(
                "cannot split {self} by {prefix_delta} bits: /{new_prefix} exceeds /{MAX_LENGTH}"
            )));
        }
        Ok(Subnets {
            next: Some(self.base),
            last: self.last(),
            prefix: new_prefix as u8,
        })
    }

    /// The enclosing block `prefix_delta` bits shorter.
    pub fn supernet(&self, prefix_delta: u8) -> Result<Network> {
        if prefix_delta > self.prefix {
            return Err(Error::semantic(format!(
                "cannot widen {self} by {prefix_delta} bits: prefix would be negative"
            )));
        }
        let prefix = self.prefix - prefix_delta;
        Ok(Network {
            base: self.base & mask(prefix),
            prefix,
        })
    }

    /// Every address in the block. Refused for blocks wider than /64.
    pub fn hosts(&self) -> Result<Hosts> {
        if self.prefix < 64 {
            return Err(Error::semantic(format!(
                "{self} is too large to enumerate hosts (prefix < /64)"
            )));
        }
        Ok(Hosts {
            next: Some(self.base),
            last: self.last(),
        })
    }

    /// Merge with the other half of the common parent block, if `other` is it.
    pub(crate) fn merge_sibling(&self, other: &Network) -> Option<Network> {
        if self.prefix != other.prefix || self.prefix == 0 || self.base == other.base {
            return None;
        }
        let parent = mask(self.prefix - 1);
        if self.base & parent == other.base & parent {
            Some(Network {
                base: self.base & parent,
                prefix: self.prefix - 1,
            })
        } else {
            None
        }
    }
}

fn parse_prefix_len(input: &str, text: &str) -> Result<u8> {
    if text.is_empty() {
        return Err(Error::parse(input, "missing prefix length after '/'"));
    }
    if !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::parse(
            input,
            format!("prefix length '{text}' is not a decimal number"),
        ));
    }
    if text.len() > 1 && text.starts_with('0') {
        return Err(Error::parse(
            input,
            format!("prefix length '{text}' has leading zeros"),
        ));
    }
    match text.parse::<u8>() {
        Ok(len) => check_len(len),
        Err(_) => Err(Error::range(format!(
            "prefix length {text} exceeds {MAX_LENGTH}"
        ))),
    }
}

/// Lazy iterator over equal-size child blocks, see [`Network::subnets`].
#[derive(Debug, Clone)]
pub struct Subnets {
    next: Option<u128>,
    last: u128,
    prefix: u8,
}

impl Subnets {
    /// Prefix length of the produced blocks.
    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Blocks left to produce; `None` if the count does not fit a `u128`.
    pub fn remaining(&self) -> Option<u128> {
        let Some(base) = self.next else {
            return Some(0);
        };
        let host_bits = MAX_LENGTH - self.prefix;
        if host_bits == MAX_LENGTH {
            return Some(1);
        }
        ((self.last - base) >> host_bits).checked_add(1)
    }
}

impl Iterator for Subnets {
    type Item = Network;

    fn next(&mut self) -> Option<Network> {
        let base = self.next?;
        let child_last = base | !mask(self.prefix);
        self.next = if child_last >= self.last {
            None
        } else {
            Some(child_last + 1)
        };
        Some(Network {
            base,
            prefix: self.prefix,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining().and_then(|n| usize::try_from(n).ok()) {
            Some(n) => (n, Some(n)),
            None => (usize::MAX, None),
        }
    }
}

/// Lazy iterator over every address of a block, see [`Network::hosts`].
#[derive(Debug, Clone)]
pub struct Hosts {
    next: Option<u128>,
    last: u128,
}

impl Iterator for Hosts {
    type Item = Address;

    fn next(&mut self) -> Option<Address> {
        let next = self.next?;
        self.next = if next == self.last {
            None
        } else {
            Some(next + 1)
        };
        Some(Address::new(next))
    }
}

impl FromStr for Network {
    type Err = Error;

    /// Strict parse: host bits must be zero.
    fn from_str(s: &str) -> Result<Network> {
        Network::from_text(s, true)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.network_address(), self.prefix)
    }
}

impl Serialize for Network {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Network {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Network, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Network::from_text(&s, true).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net(s: &str) -> Network {
        Network::from_text(s, true).unwrap()
    }

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    #[test]
    fn test_prefix_mask() {
        assert_eq!(prefix_mask(0).unwrap(), 0);
        assert_eq!(prefix_mask(1).unwrap(), 1u128 << 127);
        assert_eq!(prefix_mask(64).unwrap(), (u64::MAX as u128) << 64);
        assert_eq!(prefix_mask(128).unwrap(), u128::MAX);
        assert!(matches!(prefix_mask(129), Err(Error::Range(_))));
        assert_eq!(
            netmask_for_prefix(32).unwrap().to_string(),
            "ffff:ffff::"
        );
        assert_eq!(netmask_for_prefix(0).unwrap().to_string(), "::");
    }

    #[test]
    fn test_network_and_last_addr() {
        let v = addr("2001:db8:1:2:3:4:5:6").value();
        assert_eq!(
            Address::new(network_addr(v, 48).unwrap()).to_string(),
            "2001:db8:1::"
        );
        assert_eq!(
            Address::new(last_addr(v, 48).unwrap()).to_string(),
            "2001:db8:1:ffff:ffff:ffff:ffff:ffff"
        );
        assert_eq!(network_addr(v, 128).unwrap(), v);
        assert_eq!(last_addr(v, 0).unwrap(), u128::MAX);
        assert!(network_addr(v, 129).is_err());
    }

    #[test]
    fn test_from_text() {
        let n = net("2001:db8::/32");
        assert_eq!(n.prefix(), 32);
        assert_eq!(n.to_string(), "2001:db8::/32");
        assert_eq!(net("::/0").to_string(), "::/0");
        assert_eq!(net("::1/128").to_string(), "::1/128");

        let masked = Network::from_text("2001:db8::1/32", false).unwrap();
        assert_eq!(masked, n);
        assert!(matches!(
            Network::from_text("2001:db8::1/32", true),
            Err(Error::Semantic(_))
        ));
    }

    #[test]
    fn test_from_text_rejects() {
        assert!(matches!(
            Network::from_text("2001:db8::", true),
            Err(Error::Parse { .. })
        ));
        assert!(matches!(
            Network::from_text("2001:db8::/", true),
            Err(Error::Parse { .. })
        ));
        assert!(matches!(
            Network::from_text("2001:db8::/abc", true),
            Err(Error::Parse { .. })
        ));
        assert!(matches!(
            Network::from_text("2001:db8::/032", true),
            Err(Error::Parse { .. })
        ));
        assert!(matches!(
            Network::from_text("2001:db8::/-1", true),
            Err(Error::Parse { .. })
        ));
        assert!(matches!(
            Network::from_text("2001:db8::/32/1", true),
            Err(Error::Parse { .. })
        ));
        assert!(matches!(
            Network::from_text("2001:db8::/129", true),
            Err(Error::Range(_))
        ));
        assert!(matches!(
            Network::from_text("2001:db8::/99999", true),
            Err(Error::Range(_))
        ));
        assert!(matches!(
            Network::from_text("invalid/32", true),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn test_zone_is_dropped() {
        let n = Network::from_text("fe80::%eth0/64", true).unwrap();
        assert_eq!(n.to_string(), "fe80::/64");
    }

    #[test]
    fn test_views() {
        let n = net("fd00::/24");
        assert_eq!(n.netmask().to_string(), "ffff:ff00::");
        assert_eq!(
            n.hostmask().to_string(),
            "::ff:ffff:ffff:ffff:ffff:ffff:ffff"
        );
        assert_eq!(n.network_address().to_string(), "fd00::");
        assert_eq!(
            n.last_address().to_string(),
            "fd00:ff:ffff:ffff:ffff:ffff:ffff:ffff"
        );
    }

    #[test]
    fn test_address_count() {
        assert_eq!(net("::/0").address_count().to_string(), FULL_SPACE_COUNT);
        assert_eq!(net("::/0").address_count().to_u128(), None);
        assert_eq!(net("::/1").address_count().to_u128(), Some(1u128 << 127));
        assert_eq!(
            net("2001:db8::/64").address_count().to_string(),
            "18446744073709551616"
        );
        assert_eq!(net("fd00::/96").address_count().to_u128(), Some(4_294_967_296));
        assert_eq!(net("::1/128").address_count().to_u128(), Some(1));
        assert!(net("::/0").address_count() > net("::/1").address_count());
        assert_eq!(AddressCount::from_prefix(100).unwrap().host_bits(), 28);
        assert!(AddressCount::from_prefix(129).is_err());
    }

    #[test]
    fn test_contains() {
        let n = net("2001:db8::/32");
        assert!(n.contains(&addr("2001:db8::1")));
        assert!(n.contains(&addr("2001:db8:ffff:ffff:ffff:ffff:ffff:ffff")));
        assert!(!n.contains(&addr("2001:db9::1")));
        assert!(!n.contains_value(n.base() - 1));
        assert!(!n.contains_value(n.last() + 1));

        let ll = net("fe80::/10");
        assert!(ll.contains_text("fe80::1%eth0"));
        assert!(!n.contains_text("invalid"));

        let all = net("::/0");
        assert!(all.contains_value(0));
        assert!(all.contains_value(u128::MAX));
    }

    #[test]
    fn test_contains_network() {
        let n = net("2001:db8::/32");
        assert!(n.contains_network(&net("2001:db8:1::/48")));
        assert!(n.contains_network(&n));
        assert!(!net("2001:db8:1::/48").contains_network(&n));
        assert!(!n.contains_network(&net("2001:db9::/48")));
    }

    #[test]
    fn test_overlaps() {
        let n = net("2001:db8::/32");
        assert!(n.overlaps(&net("2001:db8:1::/48")));
        assert!(net("2001:db8:1::/48").overlaps(&n));
        assert!(n.overlaps(&n));
        assert!(!n.overlaps(&net("2001:db9::/32")));
        assert!(n.overlaps_text("2001:db8::1/64"));
        assert!(!n.overlaps_text("invalid"));
    }

    #[test]
    fn test_subnets() {
        let n = net("2001:db8::/32");
        let subs: Vec<Network> = n.subnets(2).unwrap().collect();
        assert_eq!(subs.len(), 4);
        assert_eq!(subs[0], net("2001:db8::/34"));
        assert_eq!(subs[1], net("2001:db8:4000::/34"));
        assert_eq!(subs[3], net("2001:db8:c000::/34"));
        assert_eq!(subs[3].last(), n.last());

        let same: Vec<Network> = n.subnets(0).unwrap().collect();
        assert_eq!(same, vec![n]);

        let tail: Vec<Network> = net("::/127").subnets(1).unwrap().collect();
        assert_eq!(tail, vec![net("::/128"), net("::1/128")]);

        let top: Vec<Network> = net("ffff::/16").subnets(1).unwrap().collect();
        assert_eq!(top.len(), 2);
        assert_eq!(top[1].last(), u128::MAX);

        assert!(matches!(
            net("2001:db8::/127").subnets(2),
            Err(Error::Semantic(_))
        ));
    }

    #[test]
    fn test_subnets_size_hint() {
        let subs = net("2001:db8::/32").subnets(8).unwrap();
        assert_eq!(subs.prefix(), 40);
        assert_eq!(subs.remaining(), Some(256));
        assert_eq!(subs.size_hint(), (256, Some(256)));

        let mut wide = net("::/0").subnets(128).unwrap();
        assert_eq!(wide.remaining(), None);
        assert_eq!(wide.size_hint(), (usize::MAX, None));
        assert_eq!(wide.next(), Some(net("::/128")));
        assert_eq!(wide.remaining(), Some(u128::MAX));

        assert_eq!(net("::/0").subnets(0).unwrap().remaining(), Some(1));
    }

    #[test]
    fn test_supernet() {
        let n = net("2001:db8::/32");
        assert_eq!(n.supernet(8).unwrap(), net("2001:d00::/24"));
        assert_eq!(n.supernet(1).unwrap(), net("2001:db8::/31"));
        assert_eq!(n.supernet(32).unwrap(), net("::/0"));
        assert_eq!(n.supernet(0).unwrap(), n);
        assert!(matches!(n.supernet(33), Err(Error::Semantic(_))));
    }

    #[test]
    fn test_hosts() {
        let hosts: Vec<String> = net("20f6:1b85:cc34::/126")
            .hosts()
            .unwrap()
            .map(|a| a.to_string())
            .collect();
        assert_eq!(
            hosts,
            vec![
                "20f6:1b85:cc34::",
                "20f6:1b85:cc34::1",
                "20f6:1b85:cc34::2",
                "20f6:1b85:cc34::3"
            ]
        );
        assert_eq!(net("ffff::ffff/128").hosts().unwrap().count(), 1);
        assert!(net("2001:db8::/63").hosts().is_err());
    }

    #[test]
    fn test_merge_sibling() {
        let a = net("2001:db8::/33");
        let b = net("2001:db8:8000::/33");
        assert_eq!(a.merge_sibling(&b), Some(net("2001:db8::/32")));
        assert_eq!(b.merge_sibling(&a), Some(net("2001:db8::/32")));
        assert_eq!(a.merge_sibling(&a), None);
        // adjacent but different parents
        let c = net("2001:db8:8000::/33");
        let d = net("2001:db9::/33");
        assert_eq!(c.merge_sibling(&d), None);
        assert_eq!(net("::/0").merge_sibling(&net("::/0")), None);
    }

    #[test]
    fn test_ord() {
        assert!(net("2001:db8::/32") < net("2001:db8::/48"));
        assert!(net("2001:db8::/48") < net("2001:db8:1::/48"));
    }

    #[test]
    fn test_serde() {
        let n = net("2001:db8::/32");
        assert_eq!(serde_json::to_string(&n).unwrap(), "\"2001:db8::/32\"");
        let back: Network = serde_json::from_str("\"2001:DB8::/32\"").unwrap();
        assert_eq!(back, n);
        assert!(serde_json::from_str::<Network>("\"2001:db8::1/32\"").is_err());
    }
}
