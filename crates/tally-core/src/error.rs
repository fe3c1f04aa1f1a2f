//! Error types for tally-core.

use thiserror::Error;

/// Result type for allocation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort an allocation run.
///
/// Recoverable conditions (a non-numeric pledge amount, a degenerate
/// scaling round, an unbalanced final total) are not errors; they are
/// logged and surfaced through the allocation report instead.
#[derive(Debug, Error)]
pub enum Error {
    /// A verified ballot carried a pledge payload that could not be parsed.
    #[error("malformed pledge payload in ballot {ballot}: {source}")]
    MalformedPledgePayload {
        /// Zero-based position of the ballot in the input.
        ballot: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Allocation parameters are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The reviewer could not acknowledge a cut round.
    #[error("cut review failed: {0}")]
    Review(String),
}
