// cargo watch -x 'fmt' -x 'test'

//! IPv6 address and network planning.
//!
//! - [`models`] - addresses, networks, MAC/EUI-64 and address generation
//! - [`processing`] - dividing, summarizing, allocating and validating
//! - [`output`] - text, CSV and JSON rendering
//! - [`config`] - settings read from the environment

pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod processing;

pub use config::{Config, OutputFormat};
pub use error::{Error, Result};
pub use models::{Address, AddressType, MacAddr, Network, SubnetInfo};
pub use processing::{
    collapse, divide_by_prefix, divide_into_subnets, recommend_allocation, summarize,
    supernet_to_prefix, AllocationPlan,
};

/// Parse networks from text, one per item, with the given strictness.
///
/// Stops at the first item that fails to parse.
pub fn parse_networks<S: AsRef<str>>(texts: &[S], strict: bool) -> Result<Vec<Network>> {
    texts
        .iter()
        .map(|t| Network::from_text(t.as_ref().trim(), strict))
        .collect()
}

/// Parse `NAME=COUNT` allocation requests.
pub fn parse_named_counts<S: AsRef<str>>(texts: &[S]) -> Result<Vec<(String, usize)>> {
    texts
        .iter()
        .map(|t| {
            let t = t.as_ref();
            let (name, count) = t
                .split_once('=')
                .ok_or_else(|| Error::parse(t, "expected NAME=COUNT"))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(Error::parse(t, "consumer name is empty"));
            }
            let count = count
                .trim()
                .parse::<usize>()
                .map_err(|e| Error::parse(t, format!("count: {e}")))?;
            Ok((name.to_string(), count))
        })
        .collect()
}
