//! Allocation of equal-size blocks from one parent network to named consumers.

use super::divide::{ceil_log2, MAX_MATERIALIZED_BLOCKS};
use crate::error::{Error, Result};
use crate::models::Network;
use serde::Serialize;
use std::collections::btree_map::{self, BTreeMap};

/// Blocks assigned to each consumer, all children of one parent.
///
/// Consumers are kept in ascending name order, which is also the order
/// blocks were handed out in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationPlan {
    parent: Network,
    child_prefix: u8,
    allocations: BTreeMap<String, Vec<Network>>,
    next_free: Option<Network>,
}

impl AllocationPlan {
    pub fn parent(&self) -> &Network {
        &self.parent
    }

    /// Prefix length shared by every allocated block.
    pub fn child_prefix(&self) -> u8 {
        self.child_prefix
    }

    /// Blocks assigned to `name`, if it was requested.
    pub fn get(&self, name: &str) -> Option<&[Network]> {
        self.allocations.get(name).map(Vec::as_slice)
    }

    /// Consumers and their blocks in ascending name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<Network>> {
        self.allocations.iter()
    }

    pub fn len(&self) -> usize {
        self.allocations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }

    /// Total number of blocks handed out.
    pub fn total_blocks(&self) -> usize {
        self.allocations.values().map(Vec::len).sum()
    }

    /// First child block left unallocated, `None` when every child is used.
    pub fn next_free(&self) -> Option<&Network> {
        self.next_free.as_ref()
    }
}

impl<'a> IntoIterator for &'a AllocationPlan {
    type Item = (&'a String, &'a Vec<Network>);
    type IntoIter = btree_map::Iter<'a, String, Vec<Network>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Allocate contiguous blocks of `parent` to named consumers.
///
/// The parent is split into the smallest power of two of equal children that
/// holds the sum of all counts. Consumers are served in ascending name order,
/// each taking the next `count` unclaimed children.
///
/// # Arguments
/// * `parent` - The block to allocate from
/// * `named_counts` - `(name, number of blocks)` pairs; names must be unique
///
/// # Returns
/// * `Ok(AllocationPlan)` - blocks per consumer
/// * `Err(Error::Semantic)` - duplicate names, nothing requested, more than
///   [`MAX_MATERIALIZED_BLOCKS`] requested, or the children would be longer
///   than /128
pub fn recommend_allocation<I, N>(parent: &Network, named_counts: I) -> Result<AllocationPlan>
where
    I: IntoIterator<Item = (N, usize)>,
    N: Into<String>,
{
    let mut requests: BTreeMap<String, usize> = BTreeMap::new();
    for (name, count) in named_counts {
        let name = name.into();
        if requests.contains_key(&name) {
            return Err(Error::semantic(format!(
                "consumer '{name}' is requested more than once"
            )));
        }
        requests.insert(name, count);
    }

    let total = requests
        .values()
        .try_fold(0usize, |acc, &count| acc.checked_add(count))
        .ok_or_else(|| Error::semantic("total requested blocks overflow"))?;
    if total == 0 {
        return Err(Error::semantic("no blocks requested"));
    }
    if total as u128 > MAX_MATERIALIZED_BLOCKS {
        return Err(Error::semantic(format!(
            "{total} blocks requested, more than {MAX_MATERIALIZED_BLOCKS}"
        )));
    }

    let bits = ceil_log2(total);
    let mut children = parent.subnets(bits).map_err(|_| {
        Error::semantic(format!(
            "{parent} cannot hold {total} blocks: /{} exceeds /128",
            u16::from(parent.prefix()) + u16::from(bits)
        ))
    })?;
    let available = children.remaining();
    let child_prefix = children.prefix();
    log::debug!(
        "recommend_allocation({parent}): {total} blocks of /{child_prefix} for {} consumers",
        requests.len()
    );

    let mut allocations = BTreeMap::new();
    let mut used: usize = 0;
    for (name, count) in requests {
        used += count;
        if let Some(available) = available {
            if used as u128 > available {
                return Err(Error::semantic(format!(
                    "'{name}' needs {count} blocks but only {} of {available} remain",
                    available - (used - count) as u128
                )));
            }
        }
        let blocks: Vec<Network> = children.by_ref().take(count).collect();
        log::debug!(
            "'{name}': {count} blocks from {}",
            blocks
                .first()
                .map_or_else(|| "-".to_string(), |n| n.to_string())
        );
        allocations.insert(name, blocks);
    }

    Ok(AllocationPlan {
        parent: *parent,
        child_prefix,
        allocations,
        next_free: children.next(),
    })
}
