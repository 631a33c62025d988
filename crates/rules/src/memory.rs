//! In-memory rule repository for tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::repository::{ensure_unique_names, RuleRepository};
use crate::schema::Rule;

/// Rule repository over a fixed in-memory set.
///
/// Applies the same contract as the Postgres backend: only enabled rules
/// are returned, in insertion order, and duplicate enabled names fail
/// validation.
pub struct InMemoryRuleRepository {
    rules: Vec<Rule>,
}

impl InMemoryRuleRepository {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }
}

#[async_trait]
impl RuleRepository for InMemoryRuleRepository {
    async fn load_active_rules(&self) -> Result<Vec<Rule>> {
        let active: Vec<Rule> = self.rules.iter().filter(|r| r.enabled).cloned().collect();
        ensure_unique_names(&active)?;
        Ok(active)
    }
}
