//! Output formatting for planning results.
//!
//! This module renders results in the three supported formats:
//! - [`terminal`] - Text output with colors
//! - [`csv`] - CSV rows
//! - [`json`] - Pretty-printed JSON

pub mod csv;
pub mod json;
pub mod terminal;

pub use csv::{address_row, allocation_rows, subnet_rows};
pub use json::to_json;
pub use terminal::{
    format_field, render_address_info, render_allocation, render_error, render_networks,
    render_subnet_info,
};
