//! InMemoryDecisionStore - プロセス内の決定ストア
//!
//! # 実装詳細
//! - `Vec<DecisionRecord>` を到着順で保持（索引なし）
//! - tokio の Mutex で save / update / 走査を直列化
//! - 再起動すると中身は消える

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::{DECISION_FIELD, DecisionRecord, StoreError};
use crate::ports::{DecisionStore, MissingFieldPolicy, RecordUpdate};

/// Store state guarded by the mutex.
struct InMemoryStoreState {
    /// Records in arrival order.
    records: Vec<DecisionRecord>,

    missing_field_policy: MissingFieldPolicy,
}

impl InMemoryStoreState {
    fn new(missing_field_policy: MissingFieldPolicy) -> Self {
        Self {
            records: Vec::new(),
            missing_field_policy,
        }
    }

    /// Map a caller-supplied position to an index into `records`.
    fn index(&self, position: i64) -> Result<usize, StoreError> {
        let len = self.records.len();
        usize::try_from(position)
            .ok()
            .filter(|&i| i < len)
            .ok_or(StoreError::IndexOutOfRange { position, len })
    }

    /// Linear scan; the first match in arrival order wins.
    fn find_similar(&self, query: &str) -> Result<&DecisionRecord, StoreError> {
        let query = query.to_lowercase();
        for (position, record) in self.records.iter().enumerate() {
            let Some(decision) = record.decision() else {
                match self.missing_field_policy {
                    MissingFieldPolicy::FailFast => {
                        return Err(StoreError::MissingField {
                            position,
                            field: DECISION_FIELD,
                        });
                    }
                    MissingFieldPolicy::Skip => {
                        debug!(position, "skipping record without decision text");
                        continue;
                    }
                }
            };
            if query.contains(&decision.to_lowercase()) {
                debug!(position, "similar decision found");
                return Ok(record);
            }
        }
        Err(StoreError::NotFound)
    }
}

/// In-memory decision store.
///
/// Cheap to clone; clones share the same records.
#[derive(Clone)]
pub struct InMemoryDecisionStore {
    state: Arc<Mutex<InMemoryStoreState>>,
}

impl InMemoryDecisionStore {
    /// Empty store that fails fast on records without decision text.
    pub fn new() -> Self {
        Self::with_policy(MissingFieldPolicy::default())
    }

    pub fn with_policy(missing_field_policy: MissingFieldPolicy) -> Self {
        Self {
            state: Arc::new(Mutex::new(InMemoryStoreState::new(missing_field_policy))),
        }
    }
}

impl Default for InMemoryDecisionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DecisionStore for InMemoryDecisionStore {
    async fn save(&self, record: DecisionRecord) -> Result<usize, StoreError> {
        let mut state = self.state.lock().await;
        let position = state.records.len();
        state.records.push(record);
        debug!(position, "decision saved");
        Ok(position)
    }

    async fn find_similar(&self, query: &str) -> Result<DecisionRecord, StoreError> {
        let state = self.state.lock().await;
        state.find_similar(query).cloned()
    }

    async fn update(&self, position: i64, record: DecisionRecord) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let index = state.index(position)?;
        state.records[index] = record;
        debug!(position, "decision updated");
        Ok(())
    }

    async fn update_with(
        &self,
        position: i64,
        f: RecordUpdate,
    ) -> Result<DecisionRecord, StoreError> {
        let mut state = self.state.lock().await;
        let index = state.index(position)?;
        let record = f(&state.records[index]);
        state.records[index] = record.clone();
        debug!(position, "decision updated in place");
        Ok(record)
    }

    async fn get(&self, position: i64) -> Result<DecisionRecord, StoreError> {
        let state = self.state.lock().await;
        let index = state.index(position)?;
        Ok(state.records[index].clone())
    }

    async fn list(&self) -> Vec<DecisionRecord> {
        let state = self.state.lock().await;
        state.records.clone()
    }

    async fn len(&self) -> usize {
        let state = self.state.lock().await;
        state.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn record(v: serde_json::Value) -> DecisionRecord {
        serde_json::from_value(v).unwrap()
    }

    async fn store_with(decisions: &[&str]) -> InMemoryDecisionStore {
        let store = InMemoryDecisionStore::new();
        for d in decisions {
            store.save(DecisionRecord::with_decision(*d)).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn save_appends_in_arrival_order() {
        let store = InMemoryDecisionStore::new();
        assert!(store.is_empty().await);

        let p0 = store.save(DecisionRecord::with_decision("first")).await.unwrap();
        let p1 = store.save(DecisionRecord::with_decision("second")).await.unwrap();
        let p2 = store.save(DecisionRecord::with_decision("first")).await.unwrap();

        assert_eq!((p0, p1, p2), (0, 1, 2));
        assert_eq!(store.len().await, 3);

        let decisions: Vec<_> = store
            .list()
            .await
            .iter()
            .map(|r| r.decision().unwrap().to_string())
            .collect();
        assert_eq!(decisions, vec!["first", "second", "first"]);
    }

    #[tokio::test]
    async fn find_similar_on_empty_store_is_not_found() {
        let store = InMemoryDecisionStore::new();
        assert_eq!(
            store.find_similar("anything at all").await,
            Err(StoreError::NotFound)
        );
        assert_eq!(store.find_similar("").await, Err(StoreError::NotFound));
    }

    #[rstest]
    #[case::exact("Take Job A")]
    #[case::embedded("Should I take Job A now?")]
    #[case::upper("SHOULD I TAKE JOB A?")]
    #[case::lower("take job a")]
    #[tokio::test]
    async fn find_similar_matches_case_insensitive_substring(#[case] query: &str) {
        let store = store_with(&["Buy a car", "Take Job A"]).await;
        let found = store.find_similar(query).await.unwrap();
        assert_eq!(found.decision(), Some("Take Job A"));
    }

    #[rstest]
    #[case::partial_decision("Take Job")]
    #[case::unrelated("Should I move to Berlin?")]
    #[tokio::test]
    async fn find_similar_requires_whole_decision_in_query(#[case] query: &str) {
        let store = store_with(&["Take Job A"]).await;
        assert_eq!(store.find_similar(query).await, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn find_similar_returns_first_match() {
        let store = InMemoryDecisionStore::new();
        store
            .save(record(json!({ "decision": "job", "n": 1 })))
            .await
            .unwrap();
        store
            .save(record(json!({ "decision": "Take Job A", "n": 2 })))
            .await
            .unwrap();

        let found = store.find_similar("take job a?").await.unwrap();
        assert_eq!(found.get("n"), Some(&json!(1)));
    }

    #[tokio::test]
    async fn find_similar_fails_fast_on_missing_decision() {
        let store = InMemoryDecisionStore::new();
        store
            .save(record(json!({ "title": "no decision here" })))
            .await
            .unwrap();
        store
            .save(DecisionRecord::with_decision("Take Job A"))
            .await
            .unwrap();

        assert_eq!(
            store.find_similar("Take Job A").await,
            Err(StoreError::MissingField {
                position: 0,
                field: "decision"
            })
        );
    }

    #[tokio::test]
    async fn find_similar_stops_before_reaching_malformed_record() {
        let store = InMemoryDecisionStore::new();
        store
            .save(DecisionRecord::with_decision("Take Job A"))
            .await
            .unwrap();
        store.save(record(json!({ "decision": null }))).await.unwrap();

        let found = store.find_similar("take job a").await.unwrap();
        assert_eq!(found.decision(), Some("Take Job A"));
    }

    #[tokio::test]
    async fn find_similar_can_skip_malformed_records() {
        let store = InMemoryDecisionStore::with_policy(MissingFieldPolicy::Skip);
        store.save(record(json!({ "decision": 7 }))).await.unwrap();
        store.save(record(json!({}))).await.unwrap();
        store
            .save(DecisionRecord::with_decision("Take Job A"))
            .await
            .unwrap();

        let found = store.find_similar("take job a").await.unwrap();
        assert_eq!(found.decision(), Some("Take Job A"));
        assert_eq!(
            store.find_similar("nothing").await,
            Err(StoreError::NotFound)
        );
    }

    #[tokio::test]
    async fn update_replaces_only_the_target_position() {
        let store = store_with(&["a", "b", "c"]).await;

        store
            .update(1, DecisionRecord::with_decision("B"))
            .await
            .unwrap();

        let decisions: Vec<_> = store
            .list()
            .await
            .iter()
            .map(|r| r.decision().unwrap().to_string())
            .collect();
        assert_eq!(decisions, vec!["a", "B", "c"]);
        assert_eq!(store.len().await, 3);
    }

    #[rstest]
    #[case::negative(-1)]
    #[case::at_len(3)]
    #[case::past_len(100)]
    #[case::min(i64::MIN)]
    #[tokio::test]
    async fn update_out_of_range_leaves_store_unchanged(#[case] position: i64) {
        let store = store_with(&["a", "b", "c"]).await;
        let before = store.list().await;

        let result = store
            .update(position, DecisionRecord::with_decision("x"))
            .await;

        assert_eq!(
            result,
            Err(StoreError::IndexOutOfRange { position, len: 3 })
        );
        assert_eq!(store.list().await, before);
    }

    #[tokio::test]
    async fn update_on_empty_store_is_out_of_range() {
        let store = InMemoryDecisionStore::new();
        assert_eq!(
            store.update(0, DecisionRecord::with_decision("x")).await,
            Err(StoreError::IndexOutOfRange {
                position: 0,
                len: 0
            })
        );
    }

    #[tokio::test]
    async fn update_with_sees_the_current_record() {
        let store = store_with(&["a", "b"]).await;

        let updated = store
            .update_with(
                1,
                Box::new(|current: &DecisionRecord| {
                    let mut next = current.clone();
                    next.insert("pinned", json!(true));
                    next
                }),
            )
            .await
            .unwrap();

        assert_eq!(updated.decision(), Some("b"));
        assert_eq!(updated.get("pinned"), Some(&json!(true)));
        assert_eq!(store.get(1).await.unwrap(), updated);
        assert_eq!(store.get(0).await.unwrap().decision(), Some("a"));
    }

    #[rstest]
    #[case::negative(-1)]
    #[case::at_len(2)]
    #[tokio::test]
    async fn update_with_out_of_range_does_not_call_closure(#[case] position: i64) {
        let store = store_with(&["a", "b"]).await;
        let before = store.list().await;

        let result = store
            .update_with(
                position,
                Box::new(|_: &DecisionRecord| -> DecisionRecord {
                    panic!("closure must not run for an invalid position")
                }),
            )
            .await;

        assert_eq!(
            result,
            Err(StoreError::IndexOutOfRange { position, len: 2 })
        );
        assert_eq!(store.list().await, before);
    }

    #[tokio::test]
    async fn concurrent_update_with_loses_no_writes() {
        let store = Arc::new(InMemoryDecisionStore::new());
        store
            .save(record(json!({ "decision": "a", "edits": 0 })))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..50 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .update_with(
                        0,
                        Box::new(|current: &DecisionRecord| {
                            let edits = current.get("edits").and_then(|v| v.as_u64()).unwrap();
                            let mut next = current.clone();
                            next.insert("edits", json!(edits + 1));
                            next
                        }),
                    )
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.get(0).await.unwrap().get("edits"), Some(&json!(50)));
    }

    #[tokio::test]
    async fn get_returns_record_at_position() {
        let store = store_with(&["a", "b"]).await;
        assert_eq!(store.get(1).await.unwrap().decision(), Some("b"));
        assert!(matches!(
            store.get(2).await,
            Err(StoreError::IndexOutOfRange { .. })
        ));
    }

    #[tokio::test]
    async fn clones_share_records() {
        let store = InMemoryDecisionStore::new();
        let other = store.clone();
        store.save(DecisionRecord::with_decision("a")).await.unwrap();
        assert_eq!(other.len().await, 1);
    }

    #[tokio::test]
    async fn concurrent_saves_are_not_lost() {
        let store = Arc::new(InMemoryDecisionStore::new());
        let mut handles = Vec::new();
        for i in 0..50 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .save(DecisionRecord::with_decision(format!("decision {i}")))
                    .await
                    .unwrap()
            }));
        }

        let mut positions = Vec::new();
        for handle in handles {
            positions.push(handle.await.unwrap());
        }
        positions.sort_unstable();

        assert_eq!(store.len().await, 50);
        assert_eq!(positions, (0..50).collect::<Vec<_>>());
    }
}
