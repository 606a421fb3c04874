//! Engine configuration with layered resolution.

mod accord_config;

pub use accord_config::{AccordConfig, DetectionConfig, ReviewConfig, StorageConfig};
