//! In-memory event source for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::QueueError;
use crate::source::{EventSource, SourceHealth};

/// FIFO in-memory event source.
///
/// Substitutes for the Redis backend in tests: events pushed with
/// [`push`](InMemoryEventSource::push) come back out of [`EventSource::pop`]
/// in insertion order, and an empty queue pops `None`.
#[derive(Default)]
pub struct InMemoryEventSource {
    queue: Mutex<VecDeque<String>>,
}

impl InMemoryEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw payload to the tail of the feed.
    pub fn push(&self, payload: impl Into<String>) {
        self.queue
            .lock()
            .expect("queue lock poisoned")
            .push_back(payload.into());
    }

    /// Number of payloads currently queued.
    pub fn len(&self) -> usize {
        self.queue.lock().expect("queue lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl EventSource for InMemoryEventSource {
    async fn pop(&self) -> Result<Option<String>, QueueError> {
        Ok(self.queue.lock().expect("queue lock poisoned").pop_front())
    }

    async fn health_check(&self) -> Result<SourceHealth, QueueError> {
        Ok(SourceHealth {
            connected: true,
            approximate_depth: Some(self.len() as u64),
            provider: "memory".to_string(),
        })
    }
}
