//! Queue error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("event parse error: {0}")]
    Parse(String),

    #[error("provider error: {0}")]
    Provider(String),
}

impl From<redis::RedisError> for QueueError {
    fn from(e: redis::RedisError) -> Self {
        if e.is_connection_refusal() || e.is_connection_dropped() || e.is_timeout() {
            QueueError::Connection(e.to_string())
        } else {
            QueueError::Provider(e.to_string())
        }
    }
}
