//! Context snapshots and the change report built from two of them.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A flat snapshot of situational facts at a point in time.
///
/// Iteration follows insertion order, so reports built from it are stable.
pub type ContextMapping = Map<String, Value>;

/// What to do with a key the past context has but the present one lacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsentKeyPolicy {
    /// Count the key as changed.
    #[default]
    Changed,

    /// Fail with `DiffError::MissingKey`.
    Strict,
}

/// The result of comparing a past context against the present one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextChange {
    /// The decision that was made in the past context.
    pub past_decision: String,

    pub past: ContextMapping,

    /// Keys of `past` whose value differs now, in `past` order.
    pub changed_keys: Vec<String>,
}

impl ContextChange {
    pub fn is_unchanged(&self) -> bool {
        self.changed_keys.is_empty()
    }
}

impl fmt::Display for ContextChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let past = Value::Object(self.past.clone());
        write!(
            f,
            "Earlier decision \"{}\" was based on {}. ",
            self.past_decision, past
        )?;
        if self.is_unchanged() {
            write!(f, "Nothing in that context has changed since.")
        } else {
            let keys = Value::from(self.changed_keys.clone());
            write!(f, "Now, changes in {keys} make the situation different.")
        }
    }
}
