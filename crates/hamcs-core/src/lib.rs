//! hamcs-core
//!
//! Decision memory for the HAMCS backend.
//!
//! # モジュール構成
//! - **domain**: DecisionRecord, ContextMapping, ContextChange, errors
//! - **ports**: DecisionStore trait, Clock
//! - **impls**: InMemoryDecisionStore
//! - **diff**: 過去と現在のコンテキスト比較（純粋関数）
//!
//! The store and the diff utility do not depend on each other; the HTTP layer
//! composes them.

pub mod diff;
pub mod domain;
pub mod impls;
pub mod ports;

pub use diff::{changed_keys, compare_contexts, context_change, describe_change};
pub use domain::{
    AbsentKeyPolicy, ContextChange, ContextMapping, DecisionRecord, DiffError, StoreError,
};
pub use impls::InMemoryDecisionStore;
pub use ports::{DecisionStore, MissingFieldPolicy, RecordUpdate};
