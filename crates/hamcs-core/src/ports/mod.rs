//! Ports - 抽象化レイヤー
//!
//! HTTP 層から見えるインターフェースを定義し、実装の詳細を隠蔽する。

pub mod clock;
pub mod decision_store;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::decision_store::{DecisionStore, MissingFieldPolicy, RecordUpdate};
