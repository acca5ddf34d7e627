//! Error types for the suggestion engine.

use thiserror::Error;

/// Unified error type for suggestion operations.
#[derive(Debug, Error)]
pub enum SuggestError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Link graph lookup failed
    #[error("Link graph error: {0}")]
    Graph(String),

    /// Parent category lookup failed
    #[error("Category lookup error: {0}")]
    Category(String),

    /// Topic resolution failed
    #[error("Topic lookup error: {0}")]
    TopicLookup(String),

    /// Relatedness scoring failed for a pair of topics
    #[error("Relatedness error for ({seed}, {candidate}): {reason}")]
    Relatedness {
        seed: u32,
        candidate: u32,
        reason: String,
    },

    /// Graph snapshot could not be read or is inconsistent
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
