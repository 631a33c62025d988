//! Rule schema: severity labels, the tagged rule kind, and two-pass
//! decoding from raw storage records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RuleError;

// ── Severity ────────────────────────────────────────────────────────

/// Operational priority attached to alerts produced by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Low => write!(f, "LOW"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::High => write!(f, "HIGH"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "INFO" => Ok(Severity::Info),
            "LOW" => Ok(Severity::Low),
            "MEDIUM" => Ok(Severity::Medium),
            "HIGH" => Ok(Severity::High),
            "CRITICAL" => Ok(Severity::Critical),
            other => Err(format!("unknown severity: '{}'", other)),
        }
    }
}

// ── Rule kind ───────────────────────────────────────────────────────

/// Parameters for the `action_match` detection algorithm: strict equality
/// between one event attribute and an expected value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionMatch {
    /// Event attribute to inspect.
    pub field: String,
    /// Expected value; comparison is type-sensitive JSON equality.
    pub value: Value,
}

/// Detection algorithm selected by a rule's `type` discriminator.
///
/// Adding a detection algorithm means adding a variant here and a matcher
/// arm — the engine loop is untouched. Discriminators this build does not
/// know decode to [`RuleKind::Unrecognized`] and are skipped at evaluation
/// time, so newer rule types can be deployed ahead of older engines without
/// crashing them. The cost is that a misconfigured `type` is silently inert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum RuleKind {
    ActionMatch(ActionMatch),
    /// A discriminator this engine build does not implement.
    Unrecognized(String),
}

// ── Rule ────────────────────────────────────────────────────────────

/// One fully decoded detection rule.
///
/// Definitions are immutable for the lifetime of an engine run; changes in
/// the backing store require a restart to take effect.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rule {
    /// Unique within the enabled set; doubles as alert provenance.
    pub name: String,
    pub kind: RuleKind,
    /// Default severity attached to produced alerts.
    pub severity: Severity,
    pub enabled: bool,
}

// ── Raw storage record ──────────────────────────────────────────────

/// Raw rule row as persisted, before kind dispatch.
///
/// Decoding is two-pass: the repository fetches `RuleRecord`s, then
/// [`Rule::try_from`] dispatches on `rule_type` into the typed [`RuleKind`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RuleRecord {
    pub name: String,
    pub rule_type: String,
    pub field: Option<String>,
    pub value: Option<Value>,
    pub severity: Option<String>,
    pub enabled: bool,
}

impl TryFrom<RuleRecord> for Rule {
    type Error = RuleError;

    fn try_from(record: RuleRecord) -> std::result::Result<Self, Self::Error> {
        let severity = match record.severity.as_deref() {
            // Absent severity defaults to CRITICAL.
            None => Severity::Critical,
            Some(s) => s.parse().map_err(|reason| RuleError::Malformed {
                rule: record.name.clone(),
                reason,
            })?,
        };

        let kind = match record.rule_type.as_str() {
            "action_match" => {
                let field = record.field.ok_or_else(|| RuleError::Malformed {
                    rule: record.name.clone(),
                    reason: "action_match rule is missing 'field'".to_string(),
                })?;
                let value = record.value.ok_or_else(|| RuleError::Malformed {
                    rule: record.name.clone(),
                    reason: "action_match rule is missing 'value'".to_string(),
                })?;
                RuleKind::ActionMatch(ActionMatch { field, value })
            }
            other => RuleKind::Unrecognized(other.to_string()),
        };

        Ok(Rule {
            name: record.name,
            kind,
            severity,
            enabled: record.enabled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(rule_type: &str) -> RuleRecord {
        RuleRecord {
            name: "Failed logins rule".to_string(),
            rule_type: rule_type.to_string(),
            field: Some("action".to_string()),
            value: Some(json!("login_failure")),
            severity: Some("CRITICAL".to_string()),
            enabled: true,
        }
    }

    #[test]
    fn decodes_action_match_rule() {
        let rule = Rule::try_from(record("action_match")).unwrap();
        assert_eq!(rule.name, "Failed logins rule");
        assert_eq!(rule.severity, Severity::Critical);
        assert!(rule.enabled);
        assert_eq!(
            rule.kind,
            RuleKind::ActionMatch(ActionMatch {
                field: "action".to_string(),
                value: json!("login_failure"),
            })
        );
    }

    #[test]
    fn unknown_rule_type_decodes_as_unrecognized() {
        let rule = Rule::try_from(record("threshold")).unwrap();
        assert_eq!(rule.kind, RuleKind::Unrecognized("threshold".to_string()));
    }

    #[test]
    fn action_match_without_field_is_malformed() {
        let mut rec = record("action_match");
        rec.field = None;
        let err = Rule::try_from(rec).unwrap_err();
        assert!(matches!(err, RuleError::Malformed { .. }));
        assert!(err.to_string().contains("missing 'field'"));
    }

    #[test]
    fn action_match_without_value_is_malformed() {
        let mut rec = record("action_match");
        rec.value = None;
        let err = Rule::try_from(rec).unwrap_err();
        assert!(err.to_string().contains("missing 'value'"));
    }

    #[test]
    fn missing_severity_defaults_to_critical() {
        let mut rec = record("action_match");
        rec.severity = None;
        let rule = Rule::try_from(rec).unwrap();
        assert_eq!(rule.severity, Severity::Critical);
    }

    #[test]
    fn unknown_severity_is_malformed() {
        let mut rec = record("action_match");
        rec.severity = Some("URGENT".to_string());
        let err = Rule::try_from(rec).unwrap_err();
        assert!(matches!(err, RuleError::Malformed { .. }));
        assert!(err.to_string().contains("unknown severity"));
    }

    #[test]
    fn severity_display_and_parse_agree() {
        for severity in [
            Severity::Info,
            Severity::Low,
            Severity::Medium,
            Severity::High,
            Severity::Critical,
        ] {
            let label = severity.to_string();
            assert_eq!(label.parse::<Severity>().unwrap(), severity);
        }
    }

    #[test]
    fn severity_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&Severity::Critical).unwrap(),
            r#""CRITICAL""#
        );
    }
}
