//! Value types shared across the engine.

use serde::{Deserialize, Serialize};

use crate::errors::DetectionError;

/// The four ordered satisfaction levels.
///
/// Ordering matters: the correction policy for mixed comments steps a
/// rating down exactly one notch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RatingValue {
    VeryUnsatisfied,
    Unsatisfied,
    Satisfied,
    VerySatisfied,
}

impl RatingValue {
    /// Parse a normalized rating label. Returns `None` for anything
    /// outside the closed enum; callers treat that as an upstream
    /// normalization bug, not a skippable row.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "very_unsatisfied" => Some(Self::VeryUnsatisfied),
            "unsatisfied" => Some(Self::Unsatisfied),
            "satisfied" => Some(Self::Satisfied),
            "very_satisfied" => Some(Self::VerySatisfied),
            _ => None,
        }
    }

    /// Ingestion-facing parse: an unknown label is an error, never a
    /// skippable row.
    pub fn parse(s: &str) -> Result<Self, DetectionError> {
        Self::parse_str(s).ok_or_else(|| DetectionError::UnknownRating {
            value: s.to_string(),
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryUnsatisfied => "very_unsatisfied",
            Self::Unsatisfied => "unsatisfied",
            Self::Satisfied => "satisfied",
            Self::VerySatisfied => "very_satisfied",
        }
    }

    /// Ratings eligible for the negative-rating/positive-comment scan.
    pub fn is_negative(&self) -> bool {
        matches!(self, Self::VeryUnsatisfied | Self::Unsatisfied)
    }

    /// Ratings eligible for the positive-rating/negative-comment scan.
    pub fn is_positive(&self) -> bool {
        matches!(self, Self::Satisfied | Self::VerySatisfied)
    }

    /// One-notch decrease, saturating at the bottom of the scale.
    pub fn one_notch_down(&self) -> Self {
        match self {
            Self::VerySatisfied => Self::Satisfied,
            Self::Satisfied => Self::Unsatisfied,
            Self::Unsatisfied | Self::VeryUnsatisfied => Self::VeryUnsatisfied,
        }
    }
}

/// The direction and flavor of a detected inconsistency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InconsistencyKind {
    /// Unsatisfied/VeryUnsatisfied rating paired with a praising comment.
    NegativeRatingPositiveComment,
    /// Satisfied/VerySatisfied rating paired with a purely negative comment.
    PositiveRatingNegativeComment,
    /// Satisfied/VerySatisfied rating paired with a comment that mixes
    /// praise and complaint through a contrast marker.
    PositiveRatingMixedComment,
}

impl InconsistencyKind {
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "negative_rating_positive_comment" => Some(Self::NegativeRatingPositiveComment),
            "positive_rating_negative_comment" => Some(Self::PositiveRatingNegativeComment),
            "positive_rating_mixed_comment" => Some(Self::PositiveRatingMixedComment),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NegativeRatingPositiveComment => "negative_rating_positive_comment",
            Self::PositiveRatingNegativeComment => "positive_rating_negative_comment",
            Self::PositiveRatingMixedComment => "positive_rating_mixed_comment",
        }
    }
}

/// One row of the joined survey dataset, as handed over by the
/// ingestion layer, plus the traceability columns the engine stamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyRow {
    /// Case identifier, unique within one batch.
    pub case_id: String,
    /// Collaborator who handled the case.
    pub rater: String,
    /// Site the case belongs to.
    pub site: String,
    pub rating: RatingValue,
    pub comment: Option<String>,
    pub created_at: Option<i64>,
    pub closed_at: Option<i64>,

    /// Rating as it arrived from ingestion. Set once on first apply and
    /// never overwritten, so repeated applies stay idempotent.
    #[serde(default)]
    pub original_rating: Option<RatingValue>,
    /// True once a review decision (validated or ignored) was applied.
    #[serde(default)]
    pub validation_applied: bool,
    #[serde(default)]
    pub validation_reason: String,
    #[serde(default)]
    pub validation_decided_at: Option<i64>,
}

impl SurveyRow {
    /// Row with only the ingestion columns populated.
    pub fn new(
        case_id: impl Into<String>,
        rater: impl Into<String>,
        site: impl Into<String>,
        rating: RatingValue,
        comment: Option<String>,
    ) -> Self {
        Self {
            case_id: case_id.into(),
            rater: rater.into(),
            site: site.into(),
            rating,
            comment,
            created_at: None,
            closed_at: None,
            original_rating: None,
            validation_applied: false,
            validation_reason: String::new(),
            validation_decided_at: None,
        }
    }
}

/// A detected rating/comment inconsistency, ephemeral per detection run.
///
/// Invariant: `suggested_rating != rating`. Records where the policy
/// suggests no change are discarded at detection time and never surfaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InconsistencyRecord {
    pub case_id: String,
    pub rater: String,
    pub rating: RatingValue,
    pub comment: String,
    pub kind: InconsistencyKind,
    /// Lexicon tokens, contrast markers, and sentinel names of the
    /// contextual signals that fired, in match order.
    pub signals: Vec<String>,
    pub suggested_rating: RatingValue,
}

/// Lifecycle state of a review decision.
///
/// `Pending` rows are seeded by detection; a human moves them to one of
/// the terminal states. Terminal states may be rewritten to the other
/// terminal state on re-review, but never back to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    Pending,
    Validated,
    Ignored,
}

impl DecisionStatus {
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "validated" => Some(Self::Validated),
            "ignored" => Some(Self::Ignored),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Validated => "validated",
            Self::Ignored => "ignored",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// A durable review decision row, keyed by case id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationDecision {
    pub case_id: String,
    pub rater: String,
    pub original_rating: RatingValue,
    pub comment: String,
    pub kind: InconsistencyKind,
    pub signals: Vec<String>,
    pub suggested_rating: RatingValue,
    /// Rating chosen by the reviewer. For `Ignored` decisions this
    /// equals `original_rating`.
    pub validated_rating: Option<RatingValue>,
    pub status: DecisionStatus,
    pub reason: String,
    pub validator: String,
    pub decided_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Per-status counts over a decision set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total: u32,
    pub validated: u32,
    pub ignored: u32,
    pub pending: u32,
    /// (validated + ignored) / total as a percentage, one decimal place.
    /// 0.0 when there are no decisions.
    pub completion_rate: f64,
}

impl ValidationSummary {
    pub fn from_counts(validated: u32, ignored: u32, pending: u32) -> Self {
        let total = validated + ignored + pending;
        let completion_rate = if total > 0 {
            let raw = f64::from(validated + ignored) / f64::from(total) * 100.0;
            (raw * 10.0).round() / 10.0
        } else {
            0.0
        };
        Self {
            total,
            validated,
            ignored,
            pending,
            completion_rate,
        }
    }

    /// True when every detected inconsistency has a terminal decision.
    pub fn is_complete(&self) -> bool {
        self.pending == 0
    }
}
