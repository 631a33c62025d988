//! Alert store error types.

use thiserror::Error;

/// Errors from alert persistence.
///
/// A failed write is recoverable per alert: the engine logs it and moves on
/// to the next draft or event, never halting the loop.
#[derive(Debug, Error)]
pub enum AlertError {
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// A stored row could not be decoded back into an [`crate::Alert`].
    #[error("malformed alert row: {0}")]
    Malformed(String),
}
