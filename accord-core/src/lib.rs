//! Core types, errors, and configuration for the Accord coherence engine.
//!
//! Accord scans satisfaction-survey responses for semantic inconsistencies
//! between the numeric rating and the free-text comment, and tracks the
//! human review decisions that resolve them.

pub mod config;
pub mod errors;
pub mod types;

pub use config::AccordConfig;
pub use types::{
    DecisionStatus, InconsistencyKind, InconsistencyRecord, RatingValue, SurveyRow,
    ValidationDecision, ValidationSummary,
};
