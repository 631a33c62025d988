//! The persisted alert record and its lifecycle status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vigil_rules::{AlertDraft, Severity};

/// Lifecycle flag on a persisted alert.
///
/// The engine only ever writes `open`; transitions to `acknowledged` or
/// `closed` belong to external operator tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Open,
    Acknowledged,
    Closed,
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertStatus::Open => write!(f, "open"),
            AlertStatus::Acknowledged => write!(f, "acknowledged"),
            AlertStatus::Closed => write!(f, "closed"),
        }
    }
}

impl FromStr for AlertStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(AlertStatus::Open),
            "acknowledged" => Ok(AlertStatus::Acknowledged),
            "closed" => Ok(AlertStatus::Closed),
            other => Err(format!("unknown alert status: '{}'", other)),
        }
    }
}

/// One persisted alert: a specific event satisfied a specific rule.
///
/// Created exactly once per (event, matching rule) pair and immutable as far
/// as this engine is concerned — there is no update or delete path here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    /// Durable identifier assigned at record time.
    pub id: Uuid,
    /// Event time (verbatim) or evaluation wall-clock fallback.
    pub timestamp: String,
    pub username: Option<String>,
    pub source_ip: Option<String>,
    pub action: Option<String>,
    pub severity: Severity,
    pub message: String,
    /// Which rule produced this alert.
    pub rule_name: String,
    pub status: AlertStatus,
}

impl Alert {
    /// Materialize a draft: assign a fresh id and the initial `open` status.
    pub fn from_draft(draft: AlertDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: draft.timestamp,
            username: draft.username,
            source_ip: draft.source_ip,
            action: draft.action,
            severity: draft.severity,
            message: draft.message,
            rule_name: draft.rule_name,
            status: AlertStatus::Open,
        }
    }
}
