//! Alert sink trait.

use async_trait::async_trait;

use vigil_rules::AlertDraft;

use crate::error::AlertError;
use crate::model::Alert;

/// Trait for alert storage backends.
///
/// `record` must be safe to call repeatedly: logically identical drafts are
/// NOT deduplicated — every call inserts a fresh alert with its own id.
/// That preserves the original always-insert semantics; introducing a dedup
/// key would be a deliberate behavior change.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Persist one draft, assigning its durable identifier.
    async fn record(&self, draft: AlertDraft) -> Result<Alert, AlertError>;
}
