//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryDecisionStore**: プロセス内の決定ストア

pub mod inmem_store;

pub use self::inmem_store::InMemoryDecisionStore;
