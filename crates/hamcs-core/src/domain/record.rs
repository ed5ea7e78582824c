//! Decision record: an open-ended JSON object submitted by a caller.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key that carries the decision text used for similarity matching.
pub const DECISION_FIELD: &str = "decision";

/// Key under which a record may carry the context it was decided in.
pub const CONTEXT_FIELD: &str = "context";

/// A stored submission describing a choice.
///
/// The record is whatever object the caller sent. Only `decision` has meaning
/// to the store; everything else rides along untouched, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionRecord {
    fields: Map<String, Value>,
}

impl DecisionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a record holding only a decision text.
    pub fn with_decision(decision: impl Into<String>) -> Self {
        let mut record = Self::new();
        record.insert(DECISION_FIELD, Value::String(decision.into()));
        record
    }

    /// Decision text, if the field is present and is a string.
    pub fn decision(&self) -> Option<&str> {
        self.fields.get(DECISION_FIELD).and_then(Value::as_str)
    }

    /// Context object recorded alongside the decision, if any.
    pub fn context(&self) -> Option<&Map<String, Value>> {
        self.fields.get(CONTEXT_FIELD).and_then(Value::as_object)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(key.into(), value)
    }

    /// Inserts only when the key is absent.
    pub fn insert_default(&mut self, key: impl Into<String>, value: Value) {
        self.fields.entry(key.into()).or_insert(value);
    }
}

impl From<Map<String, Value>> for DecisionRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decision_reads_string_field() {
        let record = DecisionRecord::with_decision("Take Job A");
        assert_eq!(record.decision(), Some("Take Job A"));
    }

    #[test]
    fn decision_is_none_for_non_string_values() {
        let record: DecisionRecord = serde_json::from_value(json!({ "decision": 42 })).unwrap();
        assert_eq!(record.decision(), None);

        let record: DecisionRecord = serde_json::from_value(json!({ "title": "x" })).unwrap();
        assert_eq!(record.decision(), None);
    }

    #[test]
    fn serializes_as_plain_object_in_insertion_order() {
        let mut record = DecisionRecord::with_decision("Move to Y");
        record.insert("category", json!("career"));
        record.insert("context", json!({ "salary": 100 }));

        let s = serde_json::to_string(&record).unwrap();
        assert_eq!(
            s,
            r#"{"decision":"Move to Y","category":"career","context":{"salary":100}}"#
        );
    }

    #[test]
    fn insert_default_keeps_existing_value() {
        let mut record = DecisionRecord::with_decision("x");
        record.insert("category", json!("finance"));
        record.insert_default("category", json!("general"));
        record.insert_default("pinned", json!(false));

        assert_eq!(record.get("category"), Some(&json!("finance")));
        assert_eq!(record.get("pinned"), Some(&json!(false)));
    }

    #[test]
    fn context_only_returns_objects() {
        let record: DecisionRecord =
            serde_json::from_value(json!({ "decision": "x", "context": "free text" })).unwrap();
        assert!(record.context().is_none());

        let record: DecisionRecord =
            serde_json::from_value(json!({ "decision": "x", "context": { "city": "X" } }))
                .unwrap();
        assert_eq!(record.context().unwrap().get("city"), Some(&json!("X")));
    }
}
