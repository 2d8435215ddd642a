//! Collapsing and summarizing sets of networks.
//!
//! [`collapse`] merges blocks into the smallest set that covers exactly the
//! same addresses. [`summarize`] goes one step further and returns a single
//! block covering all of them, which may include addresses none of the inputs
//! hold when the inputs are not contiguous.

use crate::models::Network;

/// Collapse `networks` into the minimal set of blocks covering the same range.
///
/// Contained blocks are dropped and sibling blocks (the two halves of a common
/// parent) are merged, repeating until a pass changes nothing.
///
/// # Arguments
/// * `networks` - Blocks in any order, duplicates allowed
///
/// # Returns
/// Disjoint, non-adjacent-sibling blocks in ascending address order.
pub fn collapse(networks: &[Network]) -> Vec<Network> {
    let mut blocks = networks.to_vec();
    let mut round = 0;
    loop {
        // Sorted by base, then the wider block first for equal bases
        blocks.sort_by_key(|n| (n.base(), n.prefix()));
        blocks.dedup();

        let mut changed = false;
        let mut result: Vec<Network> = Vec::with_capacity(blocks.len());
        let mut iter = blocks.into_iter().peekable();

        while let Some(mut current) = iter.next() {
            while let Some(next) = iter.peek() {
                if current.contains_network(next) {
                    iter.next();
                    changed = true;
                } else if let Some(parent) = current.merge_sibling(next) {
                    iter.next();
                    current = parent;
                    changed = true;
                } else {
                    break;
                }
            }
            result.push(current);
        }

        round += 1;
        log::trace!("collapse round {round}: {} blocks", result.len());
        if !changed {
            return result;
        }
        blocks = result;
    }
}

/// The smallest single CIDR block covering every network in `networks`.
///
/// If the collapsed set is one block that block is returned. Otherwise the
/// result is the block sharing the longest common prefix of the lowest base
/// and the highest last address.
///
/// # Returns
/// * `Some(Network)` - the covering block
/// * `None` - `networks` is empty
pub fn summarize(networks: &[Network]) -> Option<Network> {
    let collapsed = collapse(networks);
    match collapsed.as_slice() {
        [] => None,
        [single] => Some(*single),
        blocks => {
            let min_base = blocks.iter().map(Network::base).min()?;
            let max_last = blocks.iter().map(Network::last).max()?;
            let prefix = (min_base ^ max_last).leading_zeros() as u8;
            let cover = Network::from_value(min_base, prefix, false).ok()?;
            log::debug!(
                "summarize: {} blocks not contiguous, covering with {cover}",
                blocks.len()
            );
            Some(cover)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nets(list: &[&str]) -> Vec<Network> {
        list.iter()
            .map(|s| Network::from_text(s, true).unwrap())
            .collect()
    }

    fn texts(nets: &[Network]) -> Vec<String> {
        nets.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_collapse_siblings() {
        let input = nets(&["2001:db8:0:1::/64", "2001:db8::/64"]);
        assert_eq!(texts(&collapse(&input)), vec!["2001:db8::/63"]);
    }

    #[test]
    fn test_collapse_cascades() {
        let input = nets(&[
            "2001:db8:0:3::/64",
            "2001:db8::/64",
            "2001:db8:0:2::/64",
            "2001:db8:0:1::/64",
        ]);
        assert_eq!(texts(&collapse(&input)), vec!["2001:db8::/62"]);
    }

    #[test]
    fn test_collapse_contained_and_duplicates() {
        let input = nets(&[
            "2001:db8::/48",
            "2001:db8:0:5::/64",
            "2001:db8::/48",
            "2001:db9::/48",
        ]);
        assert_eq!(
            texts(&collapse(&input)),
            vec!["2001:db8::/48", "2001:db9::/48"]
        );
    }

    #[test]
    fn test_collapse_adjacent_not_siblings() {
        // adjacent but the halves of different parents
        let input = nets(&["2001:db8:0:1::/64", "2001:db8:0:2::/64"]);
        assert_eq!(
            texts(&collapse(&input)),
            vec!["2001:db8:0:1::/64", "2001:db8:0:2::/64"]
        );
    }

    #[test]
    fn test_collapse_empty() {
        assert!(collapse(&[]).is_empty());
    }

    #[test]
    fn test_summarize_contiguous() {
        let input = nets(&["2001:db8::/34", "2001:db8:4000::/34"]);
        assert_eq!(summarize(&input).unwrap().to_string(), "2001:db8::/33");
    }

    #[test]
    fn test_summarize_single() {
        let input = nets(&["2001:db8::/48"]);
        assert_eq!(summarize(&input).unwrap().to_string(), "2001:db8::/48");
    }

    #[test]
    fn test_summarize_with_gap() {
        let input = nets(&["2001:db8::/64", "2001:db8:0:3::/64"]);
        assert_eq!(summarize(&input).unwrap().to_string(), "2001:db8::/62");

        let input = nets(&["2001:db8::/48", "2001:db9:ffff::/48"]);
        assert_eq!(summarize(&input).unwrap().to_string(), "2001:db8::/31");
    }

    #[test]
    fn test_summarize_whole_space() {
        let input = nets(&["::/128", "ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff/128"]);
        assert_eq!(summarize(&input).unwrap().to_string(), "::/0");
    }

    #[test]
    fn test_summarize_covers_inputs() {
        let input = nets(&["2001:db8:1::/48", "2001:db8:7:8000::/49", "2001:db8:2::1/128"]);
        let cover = summarize(&input).unwrap();
        for n in &input {
            assert!(cover.contains_network(n), "{cover} should contain {n}");
        }
        assert_eq!(cover.to_string(), "2001:db8::/45");
    }

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize(&[]), None);
    }
}
