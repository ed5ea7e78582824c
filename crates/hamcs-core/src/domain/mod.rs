//! Domain model (records, context snapshots, errors).

pub mod context;
pub mod errors;
pub mod record;

pub use self::context::{AbsentKeyPolicy, ContextChange, ContextMapping};
pub use self::errors::{DiffError, StoreError};
pub use self::record::{CONTEXT_FIELD, DECISION_FIELD, DecisionRecord};
