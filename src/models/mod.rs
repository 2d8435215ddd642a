//! Domain models for IPv6 planning.
//!
//! This module contains the core data structures used throughout the crate:
//! - [`Address`] - 128-bit address with optional zone identifier
//! - [`Network`] - address block in CIDR notation, with [`AddressCount`] for its size
//! - [`SubnetInfo`] and [`AddressInfo`] - flat, serializable summaries
//! - [`MacAddr`] - 48-bit MAC address used for EUI-64 derivation

mod address;
mod generate;
mod mac;
mod network;
mod subnet;

// Re-export public types
pub use address::{Address, AddressType, MAX_LENGTH};
pub use generate::{
    generate_link_local, generate_link_local_with, generate_unique_local,
    generate_unique_local_with, mac_to_link_local, random_in_network, random_in_network_with,
    random_in_prefix,
};
pub use mac::MacAddr;
pub use network::{
    last_addr, netmask_for_prefix, network_addr, prefix_mask, AddressCount, Hosts, Network,
    Subnets,
};
pub use subnet::{AddressInfo, SubnetInfo};
