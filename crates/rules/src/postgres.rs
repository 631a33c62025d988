//! Postgres rule repository.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::error::Result;
use crate::repository::{ensure_unique_names, RuleRepository};
use crate::schema::{Rule, RuleRecord};

/// Rule repository backed by the `alert_rules` table.
pub struct PgRuleRepository {
    pool: PgPool,
}

impl PgRuleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RuleRepository for PgRuleRepository {
    async fn load_active_rules(&self) -> Result<Vec<Rule>> {
        let records: Vec<RuleRecord> = sqlx::query_as(
            "SELECT name, rule_type, field, value, severity, enabled \
             FROM alert_rules \
             WHERE enabled = TRUE \
             ORDER BY created_at, name",
        )
        .fetch_all(&self.pool)
        .await?;

        let rules = records
            .into_iter()
            .map(Rule::try_from)
            .collect::<Result<Vec<_>>>()?;

        ensure_unique_names(&rules)?;

        for rule in &rules {
            debug!(rule = %rule.name, severity = %rule.severity, "loaded rule");
        }
        info!(count = rules.len(), "active rules loaded");

        Ok(rules)
    }
}
