//! Terminal output utilities.
//!
//! Renders addresses, networks and allocation plans as coloured text. Every
//! function returns the text; printing is left to the caller.

use crate::models::{AddressInfo, Network, SubnetInfo};
use crate::processing::AllocationPlan;
use colored::Colorize;
use std::fmt::Write;

/// Width of the label column in key/value listings.
const LABEL_WIDTH: usize = 18;

/// Format a value as a quoted, right-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
///
/// # Returns
/// A quoted, right-aligned string
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let quoted = format!("\"{}\"", value.to_string());
    format!("{quoted:>width$}")
}

/// One-line error report for stderr.
pub fn render_error(error: &dyn std::error::Error) -> String {
    format!("{} {error}", "error:".red().bold())
}

fn push_pair(out: &mut String, label: &str, value: impl std::fmt::Display) {
    let label = format!("{label}:");
    let _ = writeln!(out, "{:<LABEL_WIDTH$} {value}", label.bold());
}

/// Key/value block describing one network.
pub fn render_subnet_info(info: &SubnetInfo) -> String {
    let mut out = String::new();
    push_pair(&mut out, "Network", info.network.to_string().green());
    push_pair(&mut out, "Network address", &info.network_address);
    push_pair(&mut out, "First address", &info.first_address);
    push_pair(&mut out, "Last address", &info.last_address);
    push_pair(&mut out, "Prefix length", info.prefix_length);
    push_pair(&mut out, "Address count", &info.address_count);
    push_pair(&mut out, "Netmask", &info.netmask);
    out
}

/// Key/value block with every form of one address.
pub fn render_address_info(info: &AddressInfo) -> String {
    let mut out = String::new();
    push_pair(&mut out, "Compressed", info.compressed.green());
    push_pair(&mut out, "Exploded", &info.exploded);
    push_pair(&mut out, "Binary", &info.binary);
    push_pair(&mut out, "Hex", &info.hex);
    push_pair(&mut out, "Type", info.address_type);
    if let Some(zone) = &info.zone {
        push_pair(&mut out, "Zone", zone);
    }
    push_pair(&mut out, "Reverse pointer", &info.reverse_pointer);
    out
}

/// Numbered list of networks under a title, cut off after `limit` entries.
pub fn render_networks(title: &str, networks: &[Network], limit: Option<usize>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", title.bold(), networks.len());
    let shown = limit.unwrap_or(networks.len()).min(networks.len());
    for (i, network) in networks.iter().take(shown).enumerate() {
        let _ = writeln!(out, "{:>6}  {network}", i + 1);
    }
    push_truncated(&mut out, networks.len() - shown);
    out
}

/// Allocation per consumer, in the order blocks were handed out.
pub fn render_allocation(plan: &AllocationPlan, limit: Option<usize>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} into /{} blocks",
        "Allocation of".bold(),
        plan.parent().to_string().green(),
        plan.child_prefix()
    );
    for (name, blocks) in plan {
        let _ = writeln!(out, "{} ({})", name.cyan(), blocks.len());
        let shown = limit.unwrap_or(blocks.len()).min(blocks.len());
        for network in blocks.iter().take(shown) {
            let _ = writeln!(out, "        {network}");
        }
        push_truncated(&mut out, blocks.len() - shown);
    }
    match plan.next_free() {
        Some(next) => push_pair(&mut out, "Next free", next),
        None => push_pair(&mut out, "Next free", "none".yellow()),
    }
    out
}

fn push_truncated(out: &mut String, hidden: usize) {
    if hidden > 0 {
        log::warn!("listing truncated, {hidden} entries not shown");
        let _ = writeln!(
            out,
            "{} {hidden} more not shown",
            "NOTE".on_red()
        );
    }
}
