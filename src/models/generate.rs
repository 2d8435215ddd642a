//! Address generation: EUI-64 and random link-local addresses, unique local
//! addresses (ULA) and random addresses inside a prefix.
//!
//! Random fields come from the operating system CSPRNG ([`OsRng`]). The
//! `*_with` variants take any [`RngCore`] so callers can supply their own
//! source.

use super::address::{Address, LINK_LOCAL_BASE};
use super::mac::MacAddr;
use super::network::Network;
use crate::error::{Error, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use std::str::FromStr;

/// High byte of a locally assigned ULA (`fd00::/8`).
const ULA_LOCAL_BYTE: u128 = 0xfd;

/// Prefix length assumed by [`random_in_prefix`] when none is given.
const DEFAULT_RANDOM_PREFIX: u8 = 64;

/// Network [`random_in_prefix`] draws from without a prefix, as a `/64`.
const DEFAULT_RANDOM_NETWORK: &str = "2001:db8::";

/// Parse a fixed-width hex identifier after removing `:` and `-` separators.
fn parse_hex_field(text: &str, digits: usize, what: &str) -> Result<u64> {
    let cleaned: String = text.chars().filter(|c| !matches!(c, ':' | '-')).collect();
    if !cleaned.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::parse(text, format!("{what} is not hexadecimal")));
    }
    if cleaned.len() != digits {
        return Err(Error::range(format!(
            "{what} must be {} bits ({digits} hex characters), got {} characters",
            digits * 4,
            cleaned.len()
        )));
    }
    u64::from_str_radix(&cleaned, 16).map_err(|e| Error::parse(text, e.to_string()))
}

fn random_u128<R: RngCore + ?Sized>(rng: &mut R) -> u128 {
    (u128::from(rng.next_u64()) << 64) | u128::from(rng.next_u64())
}

fn link_local(interface_id: u64) -> Address {
    Address::new(LINK_LOCAL_BASE | u128::from(interface_id))
}

/// `fe80::/64` address whose interface identifier is the EUI-64 of `mac`.
///
/// # Examples
/// ```
/// use ipv6_plan::models::mac_to_link_local;
/// let addr = mac_to_link_local("00:1a:2b:3c:4d:5e").unwrap();
/// assert_eq!(addr.to_string(), "fe80::21a:2bff:fe3c:4d5e");
/// ```
pub fn mac_to_link_local(mac: &str) -> Result<Address> {
    let mac = MacAddr::from_str(mac)?;
    let addr = link_local(mac.eui64());
    log::debug!("mac_to_link_local({mac}) = {addr}");
    Ok(addr)
}

/// `fe80::/64` address with the given 64-bit interface identifier
/// (16 hex characters), or a random one.
pub fn generate_link_local(interface_id: Option<&str>) -> Result<Address> {
    generate_link_local_with(&mut OsRng, interface_id)
}

pub fn generate_link_local_with<R: RngCore + ?Sized>(
    rng: &mut R,
    interface_id: Option<&str>,
) -> Result<Address> {
    let iid = match interface_id {
        Some(text) => parse_hex_field(text, 16, "interface ID")?,
        None => rng.next_u64(),
    };
    Ok(link_local(iid))
}

/// Locally assigned unique local address: `fd` + 40-bit global ID +
/// 16-bit subnet ID + 64-bit interface ID.
///
/// Omitted fields are random. Supplied fields must be exactly 10, 4 and 16
/// hex characters.
pub fn generate_unique_local(
    global_id: Option<&str>,
    subnet_id: Option<&str>,
    interface_id: Option<&str>,
) -> Result<Address> {
    generate_unique_local_with(&mut OsRng, global_id, subnet_id, interface_id)
}

pub fn generate_unique_local_with<R: RngCore + ?Sized>(
    rng: &mut R,
    global_id: Option<&str>,
    subnet_id: Option<&str>,
    interface_id: Option<&str>,
) -> Result<Address> {
    let global = match global_id {
        Some(text) => parse_hex_field(text, 10, "global ID")?,
        None => rng.next_u64() & 0xff_ffff_ffff,
    };
    let subnet = match subnet_id {
        Some(text) => parse_hex_field(text, 4, "subnet ID")?,
        None => rng.next_u64() & 0xffff,
    };
    let iid = match interface_id {
        Some(text) => parse_hex_field(text, 16, "interface ID")?,
        None => rng.next_u64(),
    };

    let value = (ULA_LOCAL_BYTE << 120)
        | (u128::from(global) << 80)
        | (u128::from(subnet) << 64)
        | u128::from(iid);
    Ok(Address::new(value))
}

/// Random address inside `network`: network bits kept, host bits random.
pub fn random_in_network(network: &Network) -> Address {
    random_in_network_with(&mut OsRng, network)
}

pub fn random_in_network_with<R: RngCore + ?Sized>(rng: &mut R, network: &Network) -> Address {
    let host = random_u128(rng) & network.hostmask().value();
    Address::new(network.base() | host)
}

/// Random address inside a prefix given as text. A bare address is taken
/// as a `/64`; host bits in the text are ignored. Without a prefix the
/// address comes from `2001:db8::/64`.
pub fn random_in_prefix(prefix: Option<&str>) -> Result<Address> {
    let prefix = prefix.unwrap_or(DEFAULT_RANDOM_NETWORK);
    let network = if prefix.contains('/') {
        Network::from_text(prefix, false)?
    } else {
        Network::new(&Address::from_str(prefix)?, DEFAULT_RANDOM_PREFIX, false)?
    };
    Ok(random_in_network(&network))
}
