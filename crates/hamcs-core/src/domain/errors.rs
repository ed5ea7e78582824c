//! Errors - ストアと差分ユーティリティのエラー型
//!
//! どのエラーもローカルで回復可能。呼び出し側（HTTP 層）が安全なレスポンスに変換する。

use thiserror::Error;

/// Errors raised by a [`DecisionStore`](crate::ports::DecisionStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No stored decision matched the query (or the store is empty).
    #[error("no similar decision found")]
    NotFound,

    /// Position outside `[0, len)`.
    #[error("position {position} is out of range (len={len})")]
    IndexOutOfRange { position: i64, len: usize },

    /// A record lacks a string field that matching depends on.
    #[error("record at position {position} has no string `{field}` field")]
    MissingField {
        position: usize,
        field: &'static str,
    },
}

/// Errors raised by the context diff utility in strict mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    #[error("key `{0}` is missing from the present context")]
    MissingKey(String),
}
