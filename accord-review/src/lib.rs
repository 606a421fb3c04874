//! Review workflow for detected inconsistencies.
//!
//! One [`ReviewSession`] per uploaded batch: detect, surface pending
//! records for human decisions, refuse to apply until every record is
//! resolved, then stamp the dataset.

pub mod audit;
pub mod mutate;
pub mod workflow;

pub use audit::AuditLog;
pub use workflow::{BatchState, ReviewSession};
