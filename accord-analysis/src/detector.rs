//! Batch detection over a joined survey dataset.

use tracing::{debug, info};

use accord_core::errors::DetectionError;
use accord_core::types::{InconsistencyRecord, SurveyRow};
use accord_core::AccordConfig;

use crate::classifier::Classifier;
use crate::lexicon::LexiconTables;

/// Runs the classifier over every rated row of a batch.
pub struct InconsistencyDetector {
    classifier: Classifier,
}

impl InconsistencyDetector {
    /// Detector with the built-in lexicon and default thresholds.
    pub fn new() -> Result<Self, DetectionError> {
        Ok(Self {
            classifier: Classifier::new()?,
        })
    }

    /// Detector configured from an `AccordConfig` (custom lexicon file
    /// and thresholds).
    pub fn from_config(config: &AccordConfig) -> Result<Self, DetectionError> {
        let tables = match &config.detection.lexicon_path {
            Some(path) => LexiconTables::load_from_file(std::path::Path::new(path))?,
            None => LexiconTables::builtin(),
        };
        Ok(Self {
            classifier: Classifier::with_tables(
                tables,
                config.min_positive_matches(),
                config.min_strong_matches(),
            )?,
        })
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Scan a dataset and return every detected inconsistency.
    ///
    /// Rows without a comment never classify. Records whose suggested
    /// rating equals the original are filtered inside the classifier and
    /// never surface here.
    pub fn scan(&self, rows: &[SurveyRow]) -> Vec<InconsistencyRecord> {
        let mut records = Vec::new();
        for row in rows {
            let Some(classification) =
                self.classifier.classify(row.rating, row.comment.as_deref())
            else {
                continue;
            };
            debug!(
                case_id = %row.case_id,
                kind = classification.kind.as_str(),
                original = row.rating.as_str(),
                suggested = classification.suggested_rating.as_str(),
                "inconsistency detected"
            );
            records.push(InconsistencyRecord {
                case_id: row.case_id.clone(),
                rater: row.rater.clone(),
                rating: row.rating,
                comment: row.comment.clone().unwrap_or_default(),
                kind: classification.kind,
                signals: classification.signals,
                suggested_rating: classification.suggested_rating,
            });
        }
        info!(
            rows = rows.len(),
            detected = records.len(),
            "inconsistency scan complete"
        );
        records
    }
}
