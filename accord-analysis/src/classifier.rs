//! The rating/comment classifier.
//!
//! `classify` is pure and deterministic: same rating and comment always
//! produce the same output, with no I/O and no shared state.

use accord_core::errors::DetectionError;
use accord_core::types::{InconsistencyKind, RatingValue};

use crate::context::{
    ContextScanners, ProblemContext, SIGNAL_EXCESSIVE_DELAY, SIGNAL_PROBLEM_UNRESOLVED,
};
use crate::lexicon::{LexiconTables, TokenScanner};

/// A positive classification: the rating and comment disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub kind: InconsistencyKind,
    /// Matched lexicon tokens and sentinel signal names, in match order.
    pub signals: Vec<String>,
    /// Always differs from the rating that was classified; pairings
    /// where the policy suggests no change produce no classification.
    pub suggested_rating: RatingValue,
}

/// Compiled classifier over one set of lexicon tables.
pub struct Classifier {
    positive: TokenScanner,
    strong_positive: TokenScanner,
    negative: TokenScanner,
    contrast: TokenScanner,
    nuanced: TokenScanner,
    context: ContextScanners,
    min_positive_matches: usize,
    min_strong_matches: usize,
}

impl Classifier {
    /// Compile the built-in lexicon with default thresholds.
    pub fn new() -> Result<Self, DetectionError> {
        Self::with_tables(LexiconTables::builtin(), 2, 1)
    }

    /// Compile custom tables and thresholds.
    pub fn with_tables(
        tables: LexiconTables,
        min_positive_matches: u32,
        min_strong_matches: u32,
    ) -> Result<Self, DetectionError> {
        Ok(Self {
            positive: TokenScanner::compile(&tables.positive)?,
            strong_positive: TokenScanner::compile(&tables.strong_positive)?,
            negative: TokenScanner::compile(&tables.negative)?,
            contrast: TokenScanner::compile(&tables.contrast)?,
            nuanced: TokenScanner::compile(&tables.nuanced)?,
            context: ContextScanners::compile()?,
            min_positive_matches: min_positive_matches as usize,
            min_strong_matches: min_strong_matches as usize,
        })
    }

    /// Classify one rating/comment pairing.
    ///
    /// Missing, empty, or whitespace-only comments are normal inputs and
    /// yield no classification, never an error.
    pub fn classify(
        &self,
        rating: RatingValue,
        comment: Option<&str>,
    ) -> Option<Classification> {
        let text = comment?.trim();
        if text.is_empty() {
            return None;
        }
        let lower = text.to_lowercase();

        if rating.is_negative() {
            self.classify_negative_rating(rating, &lower)
        } else {
            self.classify_positive_rating(rating, &lower)
        }
    }

    /// Negative rating scanned for praise. Dual threshold: several weak
    /// hits, or a single strong one, so one incidental positive word
    /// does not flag the row but a short enthusiastic comment still does.
    fn classify_negative_rating(
        &self,
        rating: RatingValue,
        lower: &str,
    ) -> Option<Classification> {
        let weak = self.positive.matches(lower);
        let strong = self.strong_positive.matches(lower);

        if weak.len() < self.min_positive_matches && strong.len() < self.min_strong_matches {
            return None;
        }

        let kind = InconsistencyKind::NegativeRatingPositiveComment;
        let suggested = suggested_correction(rating, kind)?;

        let mut signals = weak;
        for token in strong {
            if !signals.contains(&token) {
                signals.push(token);
            }
        }
        Some(Classification {
            kind,
            signals,
            suggested_rating: suggested,
        })
    }

    /// Positive rating scanned for complaint. Combines direct lexicon
    /// hits, the problem-in-context check, temporal-wait patterns,
    /// contrast markers, and nuanced unmet-expectation phrases.
    fn classify_positive_rating(
        &self,
        rating: RatingValue,
        lower: &str,
    ) -> Option<Classification> {
        let mut negative = self.negative.matches(lower);

        match self.context.problem_signal(lower) {
            Some(ProblemContext::Negative) => {
                negative.push(SIGNAL_PROBLEM_UNRESOLVED.to_string());
            }
            Some(ProblemContext::Suppressed) | None => {}
        }
        if self.context.excessive_delay(lower) {
            negative.push(SIGNAL_EXCESSIVE_DELAY.to_string());
        }

        let contrast = self.contrast.matches(lower);
        let nuanced = self.nuanced.matches(lower);

        let has_negative = !negative.is_empty();
        let has_contrast = !contrast.is_empty();
        let has_nuanced = !nuanced.is_empty();
        let has_positive = self.positive.is_match(lower);

        let triggered = has_negative
            || (has_positive && has_contrast)
            || (has_contrast && has_nuanced);
        if !triggered {
            return None;
        }

        // A contrast marker means the complaint coexists with praise:
        // mixed, not purely negative.
        let kind = if has_contrast {
            InconsistencyKind::PositiveRatingMixedComment
        } else {
            InconsistencyKind::PositiveRatingNegativeComment
        };
        let suggested = suggested_correction(rating, kind)?;

        let mut signals = negative;
        for token in contrast.into_iter().chain(nuanced) {
            if !signals.contains(&token) {
                signals.push(token);
            }
        }
        Some(Classification {
            kind,
            signals,
            suggested_rating: suggested,
        })
    }
}

/// The correction policy. Returns `None` when the suggestion would equal
/// the original rating; such pairings are discarded at detection time.
///
/// The asymmetry between the two directions is deliberate and preserved
/// as-is: praise under a negative rating jumps straight to `Satisfied`,
/// a purely negative comment under a positive rating drops to
/// `Unsatisfied` (never `VeryUnsatisfied`, to avoid over-correcting from
/// a single comment), and a mixed comment steps down one notch.
pub fn suggested_correction(
    rating: RatingValue,
    kind: InconsistencyKind,
) -> Option<RatingValue> {
    let suggested = match kind {
        InconsistencyKind::NegativeRatingPositiveComment => match rating {
            RatingValue::VeryUnsatisfied | RatingValue::Unsatisfied => RatingValue::Satisfied,
            other => other,
        },
        InconsistencyKind::PositiveRatingNegativeComment => match rating {
            RatingValue::Satisfied | RatingValue::VerySatisfied => RatingValue::Unsatisfied,
            other => other,
        },
        InconsistencyKind::PositiveRatingMixedComment => {
            if rating.is_positive() {
                rating.one_notch_down()
            } else {
                rating
            }
        }
    };
    (suggested != rating).then_some(suggested)
}
