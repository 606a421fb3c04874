//! Top-level engine error, aggregating subsystem errors via `From`.

use super::{ConfigError, DetectionError, ReviewError, StorageError};

/// Errors from a full detect → review → apply run.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Detection error: {0}")]
    Detection(#[from] DetectionError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Review error: {0}")]
    Review(#[from] ReviewError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
