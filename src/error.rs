//! Error types for address and network operations.

use thiserror::Error;

/// Result type for ipv6-plan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by parsing, formatting and planning operations.
///
/// Every failure is terminal for the single operation that produced it.
/// Nothing is retried and no default value is substituted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed textual address, network, MAC or identifier.
    #[error("invalid input '{input}': {reason}")]
    Parse { input: String, reason: String },

    /// A numeric value or prefix length outside its legal domain.
    #[error("out of range: {0}")]
    Range(String),

    /// Structurally valid input that breaks a rule of the requested operation.
    #[error("{0}")]
    Semantic(String),
}

impl Error {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        Error::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn range(msg: impl Into<String>) -> Self {
        Error::Range(msg.into())
    }

    pub(crate) fn semantic(msg: impl Into<String>) -> Self {
        Error::Semantic(msg.into())
    }
}
