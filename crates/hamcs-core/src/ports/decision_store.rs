//! DecisionStore port - 決定レコードの保存先
//!
//! HTTP 層はこの trait だけに依存する。プロセスごとに一つ作り、
//! `Arc<dyn DecisionStore>` として渡す（グローバル変数は使わない）。
//!
//! # 実装
//! - **InMemoryDecisionStore**: 到着順の Vec（永続化なし）

use async_trait::async_trait;

use crate::domain::{DecisionRecord, StoreError};

/// Builds the replacement for a record from its current value.
pub type RecordUpdate = Box<dyn FnOnce(&DecisionRecord) -> DecisionRecord + Send>;

/// How a similarity scan treats a record without a string `decision` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingFieldPolicy {
    /// Stop the scan with `StoreError::MissingField`.
    #[default]
    FailFast,

    /// Ignore the record and keep scanning.
    Skip,
}

/// Ordered collection of decision records.
///
/// Order equals arrival order. A zero-based position identifies a record for
/// `get` and `update`; records are never removed, so positions stay valid for
/// the life of the store.
#[async_trait]
pub trait DecisionStore: Send + Sync {
    /// Append a record. Returns the position it was stored at.
    async fn save(&self, record: DecisionRecord) -> Result<usize, StoreError>;

    /// First record (arrival order) whose decision text is a case-insensitive
    /// substring of `query`.
    async fn find_similar(&self, query: &str) -> Result<DecisionRecord, StoreError>;

    /// Replace the record at `position`. Out-of-range positions (negative
    /// included) leave the store untouched.
    async fn update(&self, position: i64, record: DecisionRecord) -> Result<(), StoreError>;

    /// Replace the record at `position` with `f(current)`. The read and the
    /// write happen under one lock, so no other update lands in between.
    /// Returns the new record.
    async fn update_with(
        &self,
        position: i64,
        f: RecordUpdate,
    ) -> Result<DecisionRecord, StoreError>;

    async fn get(&self, position: i64) -> Result<DecisionRecord, StoreError>;

    /// Snapshot of every record in arrival order.
    async fn list(&self) -> Vec<DecisionRecord>;

    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
