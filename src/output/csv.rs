//! CSV output formatting for networks, allocations and addresses.
//!
//! Fields are quoted and right-aligned so the columns line up in a terminal
//! and still load into a spreadsheet.

use crate::models::{AddressInfo, Network};
use crate::processing::AllocationPlan;
use std::fmt::Write;

use super::terminal::format_field;

/// One row per network, with its range and size.
pub fn subnet_rows(networks: &[Network], limit: Option<usize>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#""cnt","network","first_address","last_address","prefix","address_count""#
    );
    let shown = limit.unwrap_or(networks.len()).min(networks.len());
    if shown < networks.len() {
        log::warn!(
            "CSV listing truncated to {shown} of {} networks",
            networks.len()
        );
    }
    for (i, network) in networks.iter().take(shown).enumerate() {
        let info = network.info();
        let _ = writeln!(
            out,
            "{cnt},{network},{first},{last},{prefix},{count}",
            cnt = format_field(i + 1, 6),
            network = format_field(info.network, 24),
            first = format_field(info.first_address, 24),
            last = format_field(info.last_address, 42),
            prefix = format_field(info.prefix_length, 5),
            count = format_field(info.address_count, 12),
        );
    }
    out
}

/// One row per allocated block, consumers in allocation order.
pub fn allocation_rows(plan: &AllocationPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, r#""name","cnt","network""#);
    for (name, blocks) in plan {
        for (i, network) in blocks.iter().enumerate() {
            let _ = writeln!(
                out,
                "{name},{cnt},{network}",
                name = format_field(name, 16),
                cnt = format_field(i + 1, 6),
                network = format_field(network, 24),
            );
        }
    }
    out
}

/// Header and a single row with every form of one address.
pub fn address_row(info: &AddressInfo) -> String {
    format!(
        "{}\n{},{},{},{},{}\n",
        r#""compressed","exploded","hex","type","reverse_pointer""#,
        format_field(&info.compressed, 24),
        format_field(&info.exploded, 41),
        format_field(&info.hex, 34),
        format_field(info.address_type, 20),
        format_field(&info.reverse_pointer, 74),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Address;
    use crate::processing::{divide_into_subnets, recommend_allocation};

    fn net(s: &str) -> Network {
        Network::from_text(s, true).unwrap()
    }

    #[test]
    fn test_subnet_rows() {
        let networks = divide_into_subnets(&net("2001:db8::/32"), 2).unwrap();
        let csv = subnet_rows(&networks, None);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with(r#""cnt","network""#));
        assert!(lines[1].contains(r#""2001:db8::/33""#));
        assert!(lines[2].contains(r#""2001:db8:8000::/33""#));
        assert!(lines[2].contains(r#""2001:db8:ffff:ffff:ffff:ffff:ffff:ffff""#));
        assert!(lines[2].contains(r#""39614081257132168796771975168""#));
        assert_eq!(lines[1].split(',').count(), 6);
    }

    #[test]
    fn test_subnet_rows_limit() {
        let networks = divide_into_subnets(&net("2001:db8::/32"), 8).unwrap();
        assert_eq!(subnet_rows(&networks, Some(3)).lines().count(), 4);
        assert_eq!(subnet_rows(&networks, Some(100)).lines().count(), 9);
    }

    #[test]
    fn test_allocation_rows() {
        let plan =
            recommend_allocation(&net("2001:db8::/48"), [("web", 2), ("db", 1)]).unwrap();
        let csv = allocation_rows(&plan);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains(r#""db""#));
        assert!(lines[1].contains(r#""2001:db8::/50""#));
        assert!(lines[3].contains(r#""web""#));
        assert!(lines[3].contains(r#""2001:db8:0:8000::/50""#));
    }

    #[test]
    fn test_address_row() {
        let info = "2001:db8::1".parse::<Address>().unwrap().info();
        let csv = address_row(&info);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains(r#""2001:db8::1""#));
        assert!(lines[1].contains(r#""Reserved""#));
    }
}
