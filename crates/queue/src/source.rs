//! Event source trait and types.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::QueueError;

/// Health status of an event source connection.
#[derive(Debug, Clone, Serialize)]
pub struct SourceHealth {
    /// Whether the source is reachable.
    pub connected: bool,
    /// Approximate number of events waiting in the feed.
    pub approximate_depth: Option<u64>,
    /// Source provider name (e.g., "redis", "memory").
    pub provider: String,
}

impl fmt::Display for SourceHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SourceHealth {{ connected: {}, depth: {:?}, provider: {} }}",
            self.connected, self.approximate_depth, self.provider
        )
    }
}

/// Trait for event feed backends.
///
/// The feed is a durable, ordered queue of serialized events; the engine
/// consumes from its head. The pop is destructive: once an event is handed
/// out it is gone from the feed, so a crash between pop and alert write
/// loses that event. A durable pipeline would need acknowledge-after-write
/// semantics instead.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Pop the next raw payload from the head of the feed.
    ///
    /// Non-blocking: returns `Ok(None)` immediately when the feed is empty
    /// rather than waiting for an event to arrive.
    async fn pop(&self) -> Result<Option<String>, QueueError>;

    /// Check feed connectivity and return health status.
    async fn health_check(&self) -> Result<SourceHealth, QueueError>;
}
