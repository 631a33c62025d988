use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys probed for the event's own occurrence time, in preference order.
///
/// `@timestamp` carries the real event time when the feed sets it; plain
/// `timestamp` is the producer-side fallback.
const TIMESTAMP_KEYS: &[&str] = &["@timestamp", "timestamp"];

/// One security event decoded from a queue payload.
///
/// Events are schemaless: a flat map of arbitrary JSON attributes. Well-known
/// keys (`username`, `source_ip`, `action`, `@timestamp`/`timestamp`) are
/// read through typed accessors; anything else rides along untouched.
/// A missing field is absent, never an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl Event {
    /// Build an event from an already-decoded JSON object.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Raw value of an attribute, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// String value of an attribute; non-string values read as absent.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// The event's own occurrence time, if it carries one.
    ///
    /// Probes `@timestamp` then `timestamp`; the first key holding a
    /// non-empty string wins. Non-string timestamp values are treated as
    /// absent — callers fall back to wall-clock time.
    pub fn occurred_at(&self) -> Option<&str> {
        TIMESTAMP_KEYS
            .iter()
            .find_map(|k| self.get_str(k).filter(|s| !s.is_empty()))
    }

    /// All attributes of the event.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}
