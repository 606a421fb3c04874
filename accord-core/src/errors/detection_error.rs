//! Detection errors.

/// Errors that can occur while classifying ratings against comments.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    /// The ingestion layer handed over a rating label outside the closed
    /// enum. This is an upstream normalization bug and is never swallowed.
    #[error("Unknown rating label: {value:?}")]
    UnknownRating { value: String },

    #[error("Invalid lexicon: {0}")]
    InvalidLexicon(String),

    #[error("Pattern compilation failed: {0}")]
    PatternCompilationFailed(String),
}
