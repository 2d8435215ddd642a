//! Read-only summary views of a network block and of a single address.

use super::{Address, AddressCount, AddressType, Network};
use serde::Serialize;

/// Derived facts about a [`Network`], computed fresh on every call.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SubnetInfo {
    /// The block in CIDR notation.
    pub network: Network,
    /// Lowest address of the block.
    pub network_address: Address,
    /// First usable address (IPv6 has no reserved network address).
    pub first_address: Address,
    /// Highest address of the block.
    pub last_address: Address,
    /// Prefix length (0-128).
    pub prefix_length: u8,
    /// Exact number of addresses, up to 2^128.
    pub address_count: AddressCount,
    /// Network mask.
    pub netmask: Address,
}

impl From<&Network> for SubnetInfo {
    fn from(network: &Network) -> SubnetInfo {
        SubnetInfo {
            network: *network,
            network_address: network.network_address(),
            first_address: network.network_address(),
            last_address: network.last_address(),
            prefix_length: network.prefix(),
            address_count: network.address_count(),
            netmask: network.netmask(),
        }
    }
}

impl Network {
    /// Summary view of this block.
    pub fn info(&self) -> SubnetInfo {
        SubnetInfo::from(self)
    }
}

/// Every textual form of an [`Address`] plus its category.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AddressInfo {
    pub compressed: String,
    pub exploded: String,
    pub binary: String,
    pub hex: String,
    pub address_type: AddressType,
    pub zone: Option<String>,
    pub reverse_pointer: String,
}

impl From<&Address> for AddressInfo {
    fn from(address: &Address) -> AddressInfo {
        AddressInfo {
            compressed: address.compressed(),
            exploded: address.exploded(),
            binary: address.to_binary(),
            hex: address.to_hex(),
            address_type: address.classify(),
            zone: address.zone().map(str::to_string),
            reverse_pointer: address.reverse_pointer(),
        }
    }
}

impl Address {
    pub fn info(&self) -> AddressInfo {
        AddressInfo::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info() {
        let info = Network::from_text("2001:db8::/32", true).unwrap().info();
        assert_eq!(info.network.to_string(), "2001:db8::/32");
        assert_eq!(info.network_address.to_string(), "2001:db8::");
        assert_eq!(info.first_address, info.network_address);
        assert_eq!(
            info.last_address.to_string(),
            "2001:db8:ffff:ffff:ffff:ffff:ffff:ffff"
        );
        assert_eq!(info.prefix_length, 32);
        assert_eq!(info.address_count.host_bits(), 96);
        assert_eq!(info.netmask.to_string(), "ffff:ffff::");
    }

    #[test]
    fn test_info_json() {
        let info = Network::from_text("fd00::/126", true).unwrap().info();
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["network"], "fd00::/126");
        assert_eq!(json["last_address"], "fd00::3");
        assert_eq!(json["prefix_length"], 126);
        assert_eq!(json["address_count"], "4");
        assert_eq!(json["netmask"], "ffff:ffff:ffff:ffff:ffff:ffff:ffff:fffc");
    }

    #[test]
    fn test_address_info() {
        let info = "fe80::1%eth0".parse::<Address>().unwrap().info();
        assert_eq!(info.compressed, "fe80::1%eth0");
        assert_eq!(info.exploded, "fe80:0000:0000:0000:0000:0000:0000:0001%eth0");
        assert_eq!(info.hex, "fe800000000000000000000000000001");
        assert_eq!(info.binary.len(), 128);
        assert_eq!(info.address_type, AddressType::LinkLocal);
        assert_eq!(info.zone.as_deref(), Some("eth0"));
        assert!(info.reverse_pointer.starts_with("1.0.0.0."));
        assert!(info.reverse_pointer.ends_with(".0.8.e.f.ip6.arpa"));
    }
}
