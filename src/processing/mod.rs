//! Subnet planning logic.
//!
//! This module contains the planning operations built on the models:
//! - [`divide`] - Splitting a network into equal subnets, and widening it
//! - [`summarize`] - Collapsing and summarizing sets of networks
//! - [`allocation`] - Handing out blocks to named consumers
//! - [`validate`] - Checking user-supplied address and network text

pub mod allocation;
pub mod divide;
pub mod summarize;
pub mod validate;

// Re-export public functions
pub use allocation::{recommend_allocation, AllocationPlan};
pub use divide::{
    divide_by_prefix, divide_into_subnets, supernet_to_prefix, MAX_MATERIALIZED_BLOCKS,
};
pub use summarize::{collapse, summarize};
pub use validate::{
    is_compressed_format, is_expanded_format, is_valid_address, is_valid_network,
    validate_address, validate_network, validate_prefix_length,
};
