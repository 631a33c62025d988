//! Postgres alert store.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::debug;
use uuid::Uuid;

use vigil_rules::AlertDraft;

use crate::error::AlertError;
use crate::model::{Alert, AlertStatus};
use crate::sink::AlertSink;

/// Alert store backed by the `alerts` table.
///
/// Besides the [`AlertSink`] write path, exposes the read-only projections
/// external collaborators (dashboard, reporting) query: a bounded
/// most-recent-first listing and aggregate counts since a timestamp. Both
/// ride on the `timestamp` and `status` indexes.
pub struct PgAlertStore {
    pool: PgPool,
}

impl PgAlertStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Most recent alerts by event timestamp, optionally filtered by status.
    pub async fn recent(
        &self,
        limit: i64,
        status: Option<AlertStatus>,
    ) -> Result<Vec<Alert>, AlertError> {
        let rows = match status {
            Some(status) => {
                sqlx::query(
                    "SELECT id, timestamp, username, source_ip, action, severity, message, rule_name, status \
                     FROM alerts \
                     WHERE status = $1 \
                     ORDER BY timestamp DESC \
                     LIMIT $2",
                )
                .bind(status.to_string())
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT id, timestamp, username, source_ip, action, severity, message, rule_name, status \
                     FROM alerts \
                     ORDER BY timestamp DESC \
                     LIMIT $1",
                )
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(row_to_alert).collect()
    }

    /// Number of alerts with `timestamp >= since` (ISO-8601 string compare).
    pub async fn count_since(&self, since: &str) -> Result<u64, AlertError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM alerts WHERE timestamp >= $1")
            .bind(since)
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

#[async_trait]
impl AlertSink for PgAlertStore {
    async fn record(&self, draft: AlertDraft) -> Result<Alert, AlertError> {
        let alert = Alert::from_draft(draft);

        sqlx::query(
            "INSERT INTO alerts (id, timestamp, username, source_ip, action, severity, message, rule_name, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(alert.id)
        .bind(&alert.timestamp)
        .bind(&alert.username)
        .bind(&alert.source_ip)
        .bind(&alert.action)
        .bind(alert.severity.to_string())
        .bind(&alert.message)
        .bind(&alert.rule_name)
        .bind(alert.status.to_string())
        .execute(&self.pool)
        .await?;

        debug!(alert_id = %alert.id, rule = %alert.rule_name, "alert persisted");
        Ok(alert)
    }
}

fn row_to_alert(row: PgRow) -> Result<Alert, AlertError> {
    let id: Uuid = row.try_get("id")?;
    let severity: String = row.try_get("severity")?;
    let status: String = row.try_get("status")?;

    Ok(Alert {
        id,
        timestamp: row.try_get("timestamp")?,
        username: row.try_get("username")?,
        source_ip: row.try_get("source_ip")?,
        action: row.try_get("action")?,
        severity: severity.parse().map_err(AlertError::Malformed)?,
        message: row.try_get("message")?,
        rule_name: row.try_get("rule_name")?,
        status: status.parse().map_err(AlertError::Malformed)?,
    })
}
