//! Rule repository trait and load-time validation.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::{Result, RuleError};
use crate::schema::Rule;

/// Trait for rule storage backends.
///
/// Called once at engine startup; the returned rules are an immutable
/// snapshot for the rest of the run. There is no live-reload path — rule
/// changes in the backing store require a restart.
#[async_trait]
pub trait RuleRepository: Send + Sync {
    /// Load the enabled rules in deterministic load order.
    ///
    /// Any failure here is startup-fatal: the engine must not run with an
    /// empty or partial rule set silently.
    async fn load_active_rules(&self) -> Result<Vec<Rule>>;
}

/// Enforce the rule-name uniqueness invariant over a loaded set.
///
/// Name is the lookup key and the alert provenance field, so a duplicate
/// within the enabled set is a validation error, not a last-one-wins merge.
pub fn ensure_unique_names(rules: &[Rule]) -> Result<()> {
    let mut seen = HashSet::new();
    for rule in rules {
        if !seen.insert(rule.name.as_str()) {
            return Err(RuleError::Validation(format!(
                "duplicate enabled rule name: '{}'",
                rule.name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ActionMatch, RuleKind, Severity};
    use serde_json::json;

    fn named_rule(name: &str) -> Rule {
        Rule {
            name: name.to_string(),
            kind: RuleKind::ActionMatch(ActionMatch {
                field: "action".to_string(),
                value: json!("login_failure"),
            }),
            severity: Severity::Critical,
            enabled: true,
        }
    }

    #[test]
    fn unique_names_pass_validation() {
        let rules = vec![named_rule("a"), named_rule("b")];
        assert!(ensure_unique_names(&rules).is_ok());
    }

    #[test]
    fn duplicate_names_fail_validation() {
        let rules = vec![named_rule("a"), named_rule("b"), named_rule("a")];
        let err = ensure_unique_names(&rules).unwrap_err();
        assert!(matches!(err, RuleError::Validation(_)));
        assert!(err.to_string().contains("'a'"));
    }

    #[test]
    fn empty_set_is_valid() {
        assert!(ensure_unique_names(&[]).is_ok());
    }
}
