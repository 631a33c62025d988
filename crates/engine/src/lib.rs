//! Alert engine loop.
//!
//! Orchestrates the four collaborators — rule repository, event source,
//! rule matcher, alert sink — in a continuous single-worker cycle:
//! pop one event, decode it, match it against the startup rule snapshot,
//! record each resulting alert, repeat.

pub mod db;
pub mod engine;

pub use engine::{Engine, EngineConfig};
