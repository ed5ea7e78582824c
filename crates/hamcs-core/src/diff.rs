//! Context diff: which facts changed between the situation a decision was made
//! in and the situation now.
//!
//! Everything here is pure. Identical inputs give identical output because
//! `ContextMapping` iterates in insertion order.

use crate::domain::{AbsentKeyPolicy, ContextChange, ContextMapping, DiffError};

/// Keys of `past` whose value differs in `present`, in `past` order. A key
/// missing from `present` counts as changed.
///
/// Keys that only exist in `present` are not reported.
pub fn changed_keys(past: &ContextMapping, present: &ContextMapping) -> Vec<String> {
    past.iter()
        .filter(|(key, past_value)| present.get(key.as_str()) != Some(*past_value))
        .map(|(key, _)| key.clone())
        .collect()
}

/// Like [`changed_keys`], with the absent-key handling chosen by `policy`.
pub fn compare_contexts(
    past: &ContextMapping,
    present: &ContextMapping,
    policy: AbsentKeyPolicy,
) -> Result<Vec<String>, DiffError> {
    if policy == AbsentKeyPolicy::Strict
        && let Some(key) = past.keys().find(|key| !present.contains_key(key.as_str()))
    {
        return Err(DiffError::MissingKey(key.clone()));
    }
    Ok(changed_keys(past, present))
}

/// Build the change report for a past decision.
pub fn context_change(
    past_decision: &str,
    past: &ContextMapping,
    present: &ContextMapping,
    policy: AbsentKeyPolicy,
) -> Result<ContextChange, DiffError> {
    let changed_keys = compare_contexts(past, present, policy)?;
    Ok(ContextChange {
        past_decision: past_decision.to_string(),
        past: past.clone(),
        changed_keys,
    })
}

/// Suggestion sentence for a past decision whose context may have moved on.
///
/// Keys missing from `present` count as changed.
pub fn describe_change(
    past_decision: &str,
    past: &ContextMapping,
    present: &ContextMapping,
) -> String {
    ContextChange {
        past_decision: past_decision.to_string(),
        past: past.clone(),
        changed_keys: changed_keys(past, present),
    }
    .to_string()
}
