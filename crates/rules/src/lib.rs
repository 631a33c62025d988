//! Detection rule engine.
//!
//! This crate provides:
//! - The rule schema: a tagged [`RuleKind`] sum type over detection
//!   algorithms, decoded two-pass from raw storage records
//! - The [`RuleRepository`] trait with Postgres and in-memory backends
//! - The pure [`evaluate`](matcher::evaluate) function turning
//!   (event, rule set) into alert drafts

pub mod error;
pub mod matcher;
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod schema;

pub use error::RuleError;
pub use matcher::{evaluate, AlertDraft};
pub use memory::InMemoryRuleRepository;
pub use postgres::PgRuleRepository;
pub use repository::RuleRepository;
pub use schema::{ActionMatch, Rule, RuleKind, RuleRecord, Severity};
