//! Context-sensitive scanners for signals a flat lexicon cannot decide.
//!
//! "problem"/"issue" is only negative evidence when it is not wrapped in
//! resolution language; temporal-wait expressions are negative evidence
//! on their own.

use regex::{Regex, RegexSet};

use accord_core::errors::DetectionError;

/// Sentinel signal name recorded when a problem mention counts as negative.
pub const SIGNAL_PROBLEM_UNRESOLVED: &str = "problem-unresolved";
/// Sentinel signal name recorded when a temporal-wait pattern matches.
pub const SIGNAL_EXCESSIVE_DELAY: &str = "excessive-delay";

/// How a "problem"/"issue" mention reads in context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemContext {
    /// Resolution language nearby; the mention is not negative evidence.
    Suppressed,
    /// Severity language nearby, or a bare unqualified mention. Bare
    /// mentions default to negative: false negatives are cheaper than
    /// flooding reviewers with resolved-problem comments.
    Negative,
}

/// Compiled contextual pattern sets. Pattern lists are data; extend the
/// tables below rather than the scan logic.
pub struct ContextScanners {
    problem_positive: RegexSet,
    problem_negative: RegexSet,
    problem_bare: Regex,
    temporal: RegexSet,
}

impl ContextScanners {
    pub fn compile() -> Result<Self, DetectionError> {
        Ok(Self {
            problem_positive: compile_set("problem_positive", PROBLEM_POSITIVE_PATTERNS)?,
            problem_negative: compile_set("problem_negative", PROBLEM_NEGATIVE_PATTERNS)?,
            problem_bare: Regex::new(PROBLEM_BARE_PATTERN).map_err(|e| {
                DetectionError::PatternCompilationFailed(format!("problem_bare: {e}"))
            })?,
            temporal: compile_set("temporal", TEMPORAL_WAIT_PATTERNS)?,
        })
    }

    /// Classify a problem/issue mention in `text` (lowercased).
    /// Returns `None` when no mention is present.
    pub fn problem_signal(&self, text: &str) -> Option<ProblemContext> {
        // Resolution context wins over everything else.
        if self.problem_positive.is_match(text) {
            return Some(ProblemContext::Suppressed);
        }
        if self.problem_negative.is_match(text) {
            return Some(ProblemContext::Negative);
        }
        if self.problem_bare.is_match(text) {
            return Some(ProblemContext::Negative);
        }
        None
    }

    /// True when the comment mentions an excessive wait.
    pub fn excessive_delay(&self, text: &str) -> bool {
        self.temporal.is_match(text)
    }
}

fn compile_set(name: &str, patterns: &[&str]) -> Result<RegexSet, DetectionError> {
    RegexSet::new(patterns)
        .map_err(|e| DetectionError::PatternCompilationFailed(format!("{name}: {e}")))
}

/// Resolution contexts: the problem was handled, so the mention is praise.
const PROBLEM_POSITIVE_PATTERNS: &[&str] = &[
    r"(?:resolved|solved|fixed|sorted|settled)\W+(?:\w+\W+){0,2}(?:problem|issue)s?",
    r"(?:problem|issue)s?\W+(?:\w+\W+){0,2}(?:resolved|solved|fixed|sorted|settled)",
    r"\bno (?:problem|issue)s?\b",
    r"\bwithout (?:any )?(?:problem|issue)s?\b",
    r"\bzero (?:problem|issue)s?\b",
    r"(?:problem|issue)[ -]free",
    r"solution\W+(?:\w+\W+){0,2}(?:problem|issue)s?",
];

/// Explicit severity contexts: the problem persists or blocks.
const PROBLEM_NEGATIVE_PATTERNS: &[&str] = &[
    r"\b(?:big|major|serious|severe|huge|blocking|critical) (?:problem|issue)s?\b",
    r"(?:problem|issue)s? (?:not|never|still not) (?:resolved|solved|fixed)",
    r"\bunresolved (?:problem|issue)s?\b",
    r"(?:problem|issue)s? remains?\b",
];

/// An unqualified mention; defaults to negative.
const PROBLEM_BARE_PATTERN: &str = r"\b(?:problem|issue)s?\b";

/// Excessive-wait expressions, including the abbreviated forms seen in
/// raw exports ("18 mn d attente").
const TEMPORAL_WAIT_PATTERNS: &[&str] = &[
    r"\d+\s*min(?:ute)?s?\s+(?:of\s+)?wait(?:ing)?",
    r"wait(?:ed)?\s+(?:for\s+)?(?:over\s+)?\d+\s*min(?:ute)?s?",
    r"\d+\s*min(?:ute)?s?\s+(?:to|before|for)\b",
    r"on hold\s+(?:for\s+)?\d+\s*min(?:ute)?s?",
    r"\d+\s*mi?n\s+d['\u{2019}e\s]*(?:attente|echange)",
];
