//! Decode raw queue payloads into [`Event`]s.

use serde_json::Value;

use vigil_core::Event;

use crate::error::QueueError;

/// Decode one UTF-8 payload into an [`Event`].
///
/// Accepts any JSON object; no schema is enforced beyond that. A payload
/// that is not valid JSON, or that decodes to something other than an
/// object, is permanently malformed — the caller drops it without retry.
pub fn parse_event(payload: &str) -> Result<Event, QueueError> {
    let json: Value = serde_json::from_str(payload)
        .map_err(|e| QueueError::Parse(format!("invalid JSON: {}", e)))?;

    match json {
        Value::Object(fields) => Ok(Event::new(fields)),
        other => Err(QueueError::Parse(format!(
            "payload is not a JSON object (got {})",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_login_event() {
        let event = parse_event(
            r#"{
                "timestamp": "2025-12-23T18:15:00Z",
                "username": "alice",
                "source_ip": "192.168.1.10",
                "action": "login_failure"
            }"#,
        )
        .unwrap();

        assert_eq!(event.get_str("action"), Some("login_failure"));
        assert_eq!(event.get_str("username"), Some("alice"));
        assert_eq!(event.get_str("source_ip"), Some("192.168.1.10"));
        assert_eq!(event.occurred_at(), Some("2025-12-23T18:15:00Z"));
    }

    #[test]
    fn preserves_unknown_fields() {
        let event = parse_event(r#"{"action":"login_failure","attempts":3,"mfa":false}"#).unwrap();
        assert_eq!(event.get("attempts"), Some(&serde_json::json!(3)));
        assert_eq!(event.get("mfa"), Some(&serde_json::json!(false)));
    }

    #[test]
    fn rejects_invalid_json() {
        let err = parse_event("not json at all").unwrap_err();
        assert!(matches!(err, QueueError::Parse(_)));
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn rejects_non_object_payloads() {
        for payload in [r#""just a string""#, "[1,2,3]", "42", "null"] {
            let err = parse_event(payload).unwrap_err();
            assert!(matches!(err, QueueError::Parse(_)), "payload: {}", payload);
        }
    }

    #[test]
    fn empty_object_is_a_valid_event() {
        let event = parse_event("{}").unwrap();
        assert_eq!(event.get("action"), None);
        assert_eq!(event.occurred_at(), None);
    }
}
