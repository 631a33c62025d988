//! Pure rule matching: (event, rule set) → alert drafts.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use vigil_core::Event;

use crate::schema::{Rule, RuleKind, Severity};

/// An alert produced by matching, before it is persisted.
///
/// The sink assigns the durable identifier and the initial lifecycle status
/// when it records the draft.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertDraft {
    /// The event's own time, copied verbatim; wall-clock fallback otherwise.
    pub timestamp: String,
    pub username: Option<String>,
    pub source_ip: Option<String>,
    pub action: Option<String>,
    pub severity: Severity,
    pub message: String,
    /// Which rule produced this draft.
    pub rule_name: String,
}

/// Evaluate one event against the loaded rule set.
///
/// Pure and deterministic given a fixed `now`: no I/O, no clock reads.
/// Every rule is checked against the event in load order with no
/// short-circuiting — one draft per matching rule, zero or more in total.
/// Rules of unrecognized kind are skipped.
pub fn evaluate(event: &Event, rules: &[Rule], now: DateTime<Utc>) -> Vec<AlertDraft> {
    let mut drafts = Vec::new();

    for rule in rules {
        match &rule.kind {
            RuleKind::ActionMatch(params) => {
                if event.get(&params.field) == Some(&params.value) {
                    drafts.push(draft_for(event, rule, now));
                }
            }
            RuleKind::Unrecognized(rule_type) => {
                debug!(rule = %rule.name, rule_type = %rule_type, "skipping rule of unrecognized type");
            }
        }
    }

    drafts
}

/// Build the draft for one (event, matching rule) pair.
///
/// Timestamp derivation: the event's `@timestamp`, else its `timestamp`,
/// else `now` — first non-absent value wins, copied verbatim when present.
fn draft_for(event: &Event, rule: &Rule, now: DateTime<Utc>) -> AlertDraft {
    let timestamp = event
        .occurred_at()
        .map(str::to_owned)
        .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Micros, true));

    let username = event.get_str("username").map(str::to_owned);
    let source_ip = event.get_str("source_ip").map(str::to_owned);

    let message = format!(
        "Rule '{}' matched for user {} from {}",
        rule.name,
        username.as_deref().unwrap_or("unknown"),
        source_ip.as_deref().unwrap_or("unknown"),
    );

    AlertDraft {
        timestamp,
        username,
        source_ip,
        action: event.get_str("action").map(str::to_owned),
        severity: rule.severity,
        message,
        rule_name: rule.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ActionMatch;
    use chrono::TimeZone;
    use serde_json::json;

    fn failed_logins_rule() -> Rule {
        Rule {
            name: "Failed logins rule".to_string(),
            kind: RuleKind::ActionMatch(ActionMatch {
                field: "action".to_string(),
                value: json!("login_failure"),
            }),
            severity: Severity::Critical,
            enabled: true,
        }
    }

    fn event(value: serde_json::Value) -> Event {
        Event::new(value.as_object().expect("object").clone())
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 24, 9, 30, 0).unwrap()
    }

    #[test]
    fn matching_event_produces_one_draft() {
        let rules = vec![failed_logins_rule()];
        let ev = event(json!({
            "action": "login_failure",
            "username": "alice",
            "source_ip": "192.168.1.10",
            "timestamp": "2025-12-23T18:15:00Z"
        }));

        let drafts = evaluate(&ev, &rules, fixed_now());
        assert_eq!(drafts.len(), 1);

        let draft = &drafts[0];
        assert_eq!(draft.rule_name, "Failed logins rule");
        assert_eq!(draft.severity, Severity::Critical);
        assert_eq!(draft.timestamp, "2025-12-23T18:15:00Z");
        assert_eq!(draft.username.as_deref(), Some("alice"));
        assert_eq!(draft.source_ip.as_deref(), Some("192.168.1.10"));
        assert_eq!(draft.action.as_deref(), Some("login_failure"));
        assert_eq!(
            draft.message,
            "Rule 'Failed logins rule' matched for user alice from 192.168.1.10"
        );
    }

    #[test]
    fn non_matching_event_produces_nothing() {
        let rules = vec![failed_logins_rule()];
        let ev = event(json!({"action": "login_success", "username": "alice"}));
        assert!(evaluate(&ev, &rules, fixed_now()).is_empty());
    }

    #[test]
    fn absent_field_does_not_match() {
        let rules = vec![failed_logins_rule()];
        let ev = event(json!({"username": "alice"}));
        assert!(evaluate(&ev, &rules, fixed_now()).is_empty());
    }

    #[test]
    fn equality_is_type_sensitive() {
        let rules = vec![Rule {
            name: "Numeric code rule".to_string(),
            kind: RuleKind::ActionMatch(ActionMatch {
                field: "code".to_string(),
                value: json!(1),
            }),
            severity: Severity::High,
            enabled: true,
        }];

        // String "1" must not match number 1.
        let ev = event(json!({"code": "1"}));
        assert!(evaluate(&ev, &rules, fixed_now()).is_empty());

        let ev = event(json!({"code": 1}));
        assert_eq!(evaluate(&ev, &rules, fixed_now()).len(), 1);
    }

    #[test]
    fn every_rule_is_checked_without_short_circuit() {
        let mut second = failed_logins_rule();
        second.name = "Failed logins (audit copy)".to_string();
        second.severity = Severity::Medium;
        let rules = vec![failed_logins_rule(), second];

        let ev = event(json!({"action": "login_failure"}));
        let drafts = evaluate(&ev, &rules, fixed_now());
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].rule_name, "Failed logins rule");
        assert_eq!(drafts[1].rule_name, "Failed logins (audit copy)");
        assert_eq!(drafts[1].severity, Severity::Medium);
    }

    #[test]
    fn unrecognized_rule_kinds_are_skipped() {
        let rules = vec![
            Rule {
                name: "Future rule".to_string(),
                kind: RuleKind::Unrecognized("threshold".to_string()),
                severity: Severity::Critical,
                enabled: true,
            },
            failed_logins_rule(),
        ];

        let ev = event(json!({"action": "login_failure"}));
        let drafts = evaluate(&ev, &rules, fixed_now());
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].rule_name, "Failed logins rule");
    }

    #[test]
    fn timestamp_prefers_at_timestamp_over_timestamp() {
        let rules = vec![failed_logins_rule()];
        let ev = event(json!({
            "action": "login_failure",
            "@timestamp": "2025-12-23T18:15:00Z",
            "timestamp": "2025-12-23T19:00:00Z"
        }));
        let drafts = evaluate(&ev, &rules, fixed_now());
        assert_eq!(drafts[0].timestamp, "2025-12-23T18:15:00Z");
    }

    #[test]
    fn timestamp_falls_back_to_now_when_event_has_none() {
        let rules = vec![failed_logins_rule()];
        let ev = event(json!({"action": "login_failure"}));

        let drafts = evaluate(&ev, &rules, fixed_now());
        assert_eq!(
            drafts[0].timestamp,
            fixed_now().to_rfc3339_opts(SecondsFormat::Micros, true)
        );

        // Deterministic given a fixed now.
        let again = evaluate(&ev, &rules, fixed_now());
        assert_eq!(again[0].timestamp, drafts[0].timestamp);
    }

    #[test]
    fn message_substitutes_unknown_for_absent_fields() {
        let rules = vec![failed_logins_rule()];
        let ev = event(json!({"action": "login_failure"}));
        let drafts = evaluate(&ev, &rules, fixed_now());
        assert_eq!(
            drafts[0].message,
            "Rule 'Failed logins rule' matched for user unknown from unknown"
        );
        assert_eq!(drafts[0].username, None);
        assert_eq!(drafts[0].source_ip, None);
    }

    #[test]
    fn empty_rule_set_produces_nothing() {
        let ev = event(json!({"action": "login_failure"}));
        assert!(evaluate(&ev, &[], fixed_now()).is_empty());
    }
}
