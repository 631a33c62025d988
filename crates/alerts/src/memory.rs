//! In-memory alert store for tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use vigil_rules::AlertDraft;

use crate::error::AlertError;
use crate::model::{Alert, AlertStatus};
use crate::sink::AlertSink;

/// Alert store over a `Vec`, mirroring the Postgres store's contract.
///
/// Supports write-failure injection so tests can exercise the per-alert
/// recoverable error path of the engine loop.
#[derive(Default)]
pub struct InMemoryAlertStore {
    alerts: Mutex<Vec<Alert>>,
    fail_next: AtomicBool,
}

impl InMemoryAlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `record` call fail with a storage error.
    pub fn fail_next_record(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Snapshot of everything recorded so far, in insertion order.
    pub fn all(&self) -> Vec<Alert> {
        self.alerts.lock().expect("alerts lock poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.alerts.lock().expect("alerts lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Most recent alerts by event timestamp, optionally filtered by status.
    pub fn recent(&self, limit: usize, status: Option<AlertStatus>) -> Vec<Alert> {
        let mut alerts: Vec<Alert> = self
            .alerts
            .lock()
            .expect("alerts lock poisoned")
            .iter()
            .filter(|a| status.map_or(true, |s| a.status == s))
            .cloned()
            .collect();
        alerts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        alerts.truncate(limit);
        alerts
    }

    /// Number of alerts with `timestamp >= since`.
    pub fn count_since(&self, since: &str) -> u64 {
        self.alerts
            .lock()
            .expect("alerts lock poisoned")
            .iter()
            .filter(|a| a.timestamp.as_str() >= since)
            .count() as u64
    }
}

#[async_trait]
impl AlertSink for InMemoryAlertStore {
    async fn record(&self, draft: AlertDraft) -> Result<Alert, AlertError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(AlertError::Malformed(
                "injected write failure".to_string(),
            ));
        }

        let alert = Alert::from_draft(draft);
        self.alerts
            .lock()
            .expect("alerts lock poisoned")
            .push(alert.clone());
        Ok(alert)
    }
}
