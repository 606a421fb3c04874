//! Error handling for Accord.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod detection_error;
pub mod engine_error;
pub mod review_error;
pub mod storage_error;

pub use config_error::ConfigError;
pub use detection_error::DetectionError;
pub use engine_error::EngineError;
pub use review_error::ReviewError;
pub use storage_error::StorageError;
