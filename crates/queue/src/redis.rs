//! Redis list event source.
//!
//! The event feed is a Redis list: producers `RPUSH` serialized events onto
//! the tail, the engine `LPOP`s from the head. `LPOP` on an empty list
//! returns nil, which maps onto the non-blocking `Ok(None)` contract of
//! [`EventSource::pop`].

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{debug, info};

use crate::error::QueueError;
use crate::source::{EventSource, SourceHealth};

/// Redis-backed event source.
pub struct RedisEventSource {
    manager: ConnectionManager,
    events_key: String,
}

impl RedisEventSource {
    /// Connect to Redis and build an event source over the given list key.
    ///
    /// Uses a `ConnectionManager` so transient disconnects are retried
    /// transparently on the next command.
    pub async fn connect(url: &str, events_key: &str) -> Result<Self, QueueError> {
        let client = redis::Client::open(url)
            .map_err(|e| QueueError::Connection(format!("invalid Redis URL: {}", e)))?;
        let manager = client.get_connection_manager().await?;

        info!(events_key = %events_key, "Redis event source connected");

        Ok(Self {
            manager,
            events_key: events_key.to_string(),
        })
    }

    /// Push a serialized event onto the tail of the feed.
    ///
    /// Used by the `send-test-event` utility; the engine itself never writes
    /// to the feed.
    pub async fn push(&self, payload: &str) -> Result<(), QueueError> {
        let mut conn = self.manager.clone();
        let _: i64 = conn.rpush(&self.events_key, payload).await?;
        Ok(())
    }
}

#[async_trait]
impl EventSource for RedisEventSource {
    async fn pop(&self) -> Result<Option<String>, QueueError> {
        let mut conn = self.manager.clone();
        let payload: Option<String> = conn.lpop(&self.events_key, None).await?;
        if payload.is_some() {
            debug!(events_key = %self.events_key, "popped event payload");
        }
        Ok(payload)
    }

    async fn health_check(&self) -> Result<SourceHealth, QueueError> {
        let mut conn = self.manager.clone();
        let depth: u64 = conn.llen(&self.events_key).await?;
        Ok(SourceHealth {
            connected: true,
            approximate_depth: Some(depth),
            provider: "redis".to_string(),
        })
    }
}
