//! Alert persistence.
//!
//! This crate provides:
//! - The [`Alert`] record and its [`AlertStatus`] lifecycle flag
//! - The [`AlertSink`] trait: record one draft as a durable alert
//! - A Postgres store with the read-only projections operator tooling
//!   queries (recent listing, counts since a timestamp)
//! - An in-memory store for tests, with write-failure injection

pub mod error;
pub mod memory;
pub mod model;
pub mod postgres;
pub mod sink;

pub use error::AlertError;
pub use memory::InMemoryAlertStore;
pub use model::{Alert, AlertStatus};
pub use postgres::PgAlertStore;
pub use sink::AlertSink;
