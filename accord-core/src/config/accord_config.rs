//! Top-level Accord configuration with 3-layer resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Detection thresholds and lexicon source.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DetectionConfig {
    /// Minimum weak positive-lexicon hits for the negative-rating scan.
    pub min_positive_matches: Option<u32>,
    /// Minimum strong positive-lexicon hits (short-circuits the weak
    /// threshold).
    pub min_strong_matches: Option<u32>,
    /// Optional TOML lexicon file overriding the compiled tables.
    pub lexicon_path: Option<String>,
}

/// Durable store location and retention.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database path. Defaults to `accord.db` in the project root.
    pub db_path: Option<String>,
    /// Decisions older than this many days are eligible for purging.
    pub retention_days: Option<u32>,
}

/// Review defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReviewConfig {
    /// Validator identity stamped when the caller supplies none.
    pub default_validator: Option<String>,
}

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`ACCORD_*`)
/// 2. Project config (`accord.toml` in project root)
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AccordConfig {
    pub detection: DetectionConfig,
    pub storage: StorageConfig,
    pub review: ReviewConfig,
}

impl AccordConfig {
    /// Load configuration with 3-layer resolution.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join("accord.toml");
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);
        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &AccordConfig) -> Result<(), ConfigError> {
        if let Some(n) = config.detection.min_positive_matches {
            if n == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "detection.min_positive_matches".to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
        }
        if let Some(n) = config.detection.min_strong_matches {
            if n == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "detection.min_strong_matches".to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
        }
        if let Some(days) = config.storage.retention_days {
            if days == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "storage.retention_days".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Effective weak-hit threshold.
    pub fn min_positive_matches(&self) -> u32 {
        self.detection.min_positive_matches.unwrap_or(2)
    }

    /// Effective strong-hit threshold.
    pub fn min_strong_matches(&self) -> u32 {
        self.detection.min_strong_matches.unwrap_or(1)
    }

    /// Effective database path.
    pub fn db_path(&self) -> &str {
        self.storage.db_path.as_deref().unwrap_or("accord.db")
    }

    /// Effective validator identity.
    pub fn default_validator(&self) -> &str {
        self.review.default_validator.as_deref().unwrap_or("reviewer")
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut AccordConfig, path: &Path) -> Result<(), ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
                path: path.display().to_string(),
            })?;

        let file_config: AccordConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base`
    /// values only when `other` has a `Some` value.
    fn merge(base: &mut AccordConfig, other: &AccordConfig) {
        if other.detection.min_positive_matches.is_some() {
            base.detection.min_positive_matches = other.detection.min_positive_matches;
        }
        if other.detection.min_strong_matches.is_some() {
            base.detection.min_strong_matches = other.detection.min_strong_matches;
        }
        if other.detection.lexicon_path.is_some() {
            base.detection.lexicon_path = other.detection.lexicon_path.clone();
        }
        if other.storage.db_path.is_some() {
            base.storage.db_path = other.storage.db_path.clone();
        }
        if other.storage.retention_days.is_some() {
            base.storage.retention_days = other.storage.retention_days;
        }
        if other.review.default_validator.is_some() {
            base.review.default_validator = other.review.default_validator.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `ACCORD_DETECTION_MIN_POSITIVE_MATCHES`, `ACCORD_DB_PATH`, etc.
    fn apply_env_overrides(config: &mut AccordConfig) {
        if let Ok(val) = std::env::var("ACCORD_DETECTION_MIN_POSITIVE_MATCHES") {
            if let Ok(v) = val.parse::<u32>() {
                config.detection.min_positive_matches = Some(v);
            }
        }
        if let Ok(val) = std::env::var("ACCORD_DETECTION_MIN_STRONG_MATCHES") {
            if let Ok(v) = val.parse::<u32>() {
                config.detection.min_strong_matches = Some(v);
            }
        }
        if let Ok(val) = std::env::var("ACCORD_LEXICON_PATH") {
            config.detection.lexicon_path = Some(val);
        }
        if let Ok(val) = std::env::var("ACCORD_DB_PATH") {
            config.storage.db_path = Some(val);
        }
        if let Ok(val) = std::env::var("ACCORD_RETENTION_DAYS") {
            if let Ok(v) = val.parse::<u32>() {
                config.storage.retention_days = Some(v);
            }
        }
        if let Ok(val) = std::env::var("ACCORD_DEFAULT_VALIDATOR") {
            config.review.default_validator = Some(val);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
