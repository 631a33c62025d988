//! Rule error types.

use thiserror::Error;

/// Errors from rule loading and decoding.
///
/// All of these are startup-fatal: the engine must not start evaluating
/// events without a valid rule set.
#[derive(Debug, Error)]
pub enum RuleError {
    /// Backing store unreachable or query failed.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// A stored rule could not be decoded into a usable definition.
    #[error("malformed rule '{rule}': {reason}")]
    Malformed { rule: String, reason: String },

    /// The loaded set violates an invariant (e.g. duplicate names).
    #[error("validation error: {0}")]
    Validation(String),
}

/// Result alias for rule operations.
pub type Result<T> = std::result::Result<T, RuleError>;
