//! Dividing a network into equal child blocks, and widening it.

use crate::error::{Error, Result};
use crate::models::{Network, MAX_LENGTH};

/// Largest number of blocks a planner call will materialize.
/// Wider splits should stream [`Network::subnets`] instead.
pub const MAX_MATERIALIZED_BLOCKS: u128 = 1 << 20;

/// Number of prefix bits needed to hold `count` children: `ceil(log2(count))`.
pub(crate) fn ceil_log2(count: usize) -> u8 {
    if count <= 1 {
        0
    } else {
        (usize::BITS - (count - 1).leading_zeros()) as u8
    }
}

/// Divide `network` into `count` equal subnets.
///
/// The block is split into the next power of two at or above `count` and the
/// first `count` children are returned in address order. The rest are left
/// unused.
///
/// # Arguments
/// * `network` - The block to divide
/// * `count` - How many subnets are wanted, at least 1
///
/// # Returns
/// * `Ok(Vec<Network>)` - `count` equal blocks, ascending
/// * `Err(Error::Range)` - `count` is zero
/// * `Err(Error::Semantic)` - the child prefix would exceed /128, or `count`
///   is more than [`MAX_MATERIALIZED_BLOCKS`]
pub fn divide_into_subnets(network: &Network, count: usize) -> Result<Vec<Network>> {
    if count < 1 {
        return Err(Error::range("subnet count must be at least 1"));
    }
    let bits = ceil_log2(count);
    log::debug!(
        "divide_into_subnets({network}, {count}): +{bits} bits, /{}",
        u16::from(network.prefix()) + u16::from(bits)
    );
    let subnets = network.subnets(bits)?;
    if count as u128 > MAX_MATERIALIZED_BLOCKS {
        return Err(Error::semantic(format!(
            "dividing {network} into {count} blocks is more than {MAX_MATERIALIZED_BLOCKS}"
        )));
    }
    Ok(subnets.take(count).collect())
}

/// Split `network` into every child block of length `new_prefix`.
///
/// # Arguments
/// * `network` - The block to split
/// * `new_prefix` - Child prefix length, longer than the current one
///
/// # Returns
/// * `Ok(Vec<Network>)` - all `2^(new_prefix - prefix)` children, ascending
/// * `Err(Error::Range)` - `new_prefix` exceeds 128
/// * `Err(Error::Semantic)` - `new_prefix` is not longer than the current
///   prefix, or the split would produce more than [`MAX_MATERIALIZED_BLOCKS`]
pub fn divide_by_prefix(network: &Network, new_prefix: u8) -> Result<Vec<Network>> {
    if new_prefix > MAX_LENGTH {
        return Err(Error::range(format!(
            "prefix length {new_prefix} exceeds {MAX_LENGTH}"
        )));
    }
    if new_prefix <= network.prefix() {
        return Err(Error::semantic(format!(
            "new prefix /{new_prefix} must be longer than /{} of {network}",
            network.prefix()
        )));
    }

    let delta = new_prefix - network.prefix();
    let subnets = network.subnets(delta)?;
    match subnets.remaining() {
        Some(n) if n <= MAX_MATERIALIZED_BLOCKS => {
            log::debug!("divide_by_prefix({network}, /{new_prefix}): {n} blocks");
            Ok(subnets.collect())
        }
        _ => Err(Error::semantic(format!(
            "splitting {network} into /{new_prefix} gives 2^{delta} blocks, more than {MAX_MATERIALIZED_BLOCKS}"
        ))),
    }
}

/// The enclosing block of length `new_prefix`, which must be shorter than
/// the current prefix.
pub fn supernet_to_prefix(network: &Network, new_prefix: u8) -> Result<Network> {
    if new_prefix >= network.prefix() {
        return Err(Error::semantic(format!(
            "new prefix /{new_prefix} must be shorter than /{} of {network}",
            network.prefix()
        )));
    }
    network.supernet(network.prefix() - new_prefix)
}
