//! Event feed consumption.
//!
//! This crate provides:
//! - The [`EventSource`] trait: non-blocking pop over serialized event payloads
//! - A Redis list backend (`LPOP` over UTF-8 JSON payloads)
//! - An in-memory backend for tests
//! - Payload decoding into [`vigil_core::Event`]

pub mod error;
pub mod memory;
pub mod parser;
pub mod redis;
pub mod source;

pub use error::QueueError;
pub use memory::InMemoryEventSource;
pub use parser::parse_event;
pub use self::redis::RedisEventSource;
pub use source::{EventSource, SourceHealth};
