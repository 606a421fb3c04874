//! Lexicon tables as data — extensible without touching control flow.
//!
//! The five tables can be overridden from a TOML file; any table left
//! empty in the file keeps its compiled default.

use aho_corasick::AhoCorasick;
use serde::{Deserialize, Serialize};

use accord_core::errors::DetectionError;

/// The word tables driving classification.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LexiconTables {
    /// Praise tokens counted toward the weak-hit threshold.
    pub positive: Vec<String>,
    /// Emphatic praise tokens; a single hit is enough to trigger.
    /// Entries should also appear in `positive`.
    pub strong_positive: Vec<String>,
    /// Direct complaint tokens and soft negative phrases.
    pub negative: Vec<String>,
    /// Contrast markers. Not negative on their own; they reclassify a
    /// comment as mixed when praise or a nuanced phrase co-occurs.
    pub contrast: Vec<String>,
    /// Fixed idioms expressing unmet expectations.
    pub nuanced: Vec<String>,
}

impl LexiconTables {
    /// The compiled default tables.
    pub fn builtin() -> Self {
        Self {
            positive: to_owned(&[
                "thank you",
                "thanks",
                "perfect",
                "great",
                "efficient",
                "quick",
                "fast",
                "solution",
                "clear",
                "precise",
                "excellent",
                "super",
                "wonderful",
                "brilliant",
                "impeccable",
                "outstanding",
                "fantastic",
                "remarkable",
                "well received",
                "professional",
                "competent",
                "friendly",
                "courteous",
                "helpful",
            ]),
            strong_positive: to_owned(&[
                "perfect",
                "excellent",
                "wonderful",
                "impeccable",
                "outstanding",
                "fantastic",
            ]),
            negative: to_owned(&[
                "catastrophic",
                "horrible",
                "awful",
                "terrible",
                "inadmissible",
                "scandalous",
                "unacceptable",
                "disappointing",
                "disappointed",
                "frustrating",
                "annoyed",
                "irritated",
                "furious",
                "incompetent",
                "deplorable",
                "disastrous",
                "unsatisfied",
                "dissatisfied",
                "unhappy",
                "error",
                "bad",
                "useless",
                "inefficient",
                "slow",
                "too long",
                "very long",
                "long wait",
                "long delay",
                "not good",
                "not resolved",
                "unresolved",
                "not satisfied",
                "not happy",
                "failure",
                "fault",
                "lacking",
                "insufficient",
                "incomplete",
                "inadequate",
                "blocking",
                "lost business",
                "waste of time",
            ]),
            contrast: to_owned(&[
                "but",
                "however",
                "though",
                "nevertheless",
                "nonetheless",
                "unfortunately",
                "shame",
                "regret",
                "even if",
                "although",
                "despite",
                "yet",
                "only",
                "just",
                "except",
                "or",
            ]),
            nuanced: to_owned(&[
                "expected better",
                "expected more",
                "hoped for better",
                "not perfect",
                "wasn't perfect",
                "was not perfect",
                "could be better",
                "could have been better",
            ]),
        }
    }

    /// Load tables from a TOML string, keeping the compiled default for
    /// any table the file leaves empty.
    pub fn load_from_str(toml_str: &str) -> Result<Self, DetectionError> {
        let overrides: LexiconTables = toml::from_str(toml_str)
            .map_err(|e| DetectionError::InvalidLexicon(format!("TOML parse error: {e}")))?;

        let mut tables = Self::builtin();
        if !overrides.positive.is_empty() {
            tables.positive = overrides.positive;
        }
        if !overrides.strong_positive.is_empty() {
            tables.strong_positive = overrides.strong_positive;
        }
        if !overrides.negative.is_empty() {
            tables.negative = overrides.negative;
        }
        if !overrides.contrast.is_empty() {
            tables.contrast = overrides.contrast;
        }
        if !overrides.nuanced.is_empty() {
            tables.nuanced = overrides.nuanced;
        }
        tables.check()?;
        Ok(tables)
    }

    /// Load tables from a file path.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self, DetectionError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DetectionError::InvalidLexicon(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::load_from_str(&content)
    }

    fn check(&self) -> Result<(), DetectionError> {
        for (name, table) in [
            ("positive", &self.positive),
            ("strong_positive", &self.strong_positive),
            ("negative", &self.negative),
            ("contrast", &self.contrast),
            ("nuanced", &self.nuanced),
        ] {
            if table.iter().any(|t| t.trim().is_empty()) {
                return Err(DetectionError::InvalidLexicon(format!(
                    "table '{name}' contains a blank token"
                )));
            }
        }
        Ok(())
    }
}

fn to_owned(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

/// A compiled token scanner: Aho-Corasick over one table, with word
/// boundaries enforced at both ends of each match.
pub(crate) struct TokenScanner {
    automaton: AhoCorasick,
    tokens: Vec<String>,
}

impl TokenScanner {
    pub(crate) fn compile(tokens: &[String]) -> Result<Self, DetectionError> {
        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let automaton = AhoCorasick::new(&lowered).map_err(|e| {
            DetectionError::PatternCompilationFailed(format!("lexicon automaton: {e}"))
        })?;
        Ok(Self {
            automaton,
            tokens: lowered,
        })
    }

    /// All distinct tokens found in `text` (already lowercased), in
    /// first-match order. Matches inside larger words are discarded.
    pub(crate) fn matches(&self, text: &str) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        for m in self.automaton.find_overlapping_iter(text) {
            if !on_word_boundary(text, m.start(), m.end()) {
                continue;
            }
            let token = &self.tokens[m.pattern().as_usize()];
            if !found.iter().any(|t| t == token) {
                found.push(token.clone());
            }
        }
        found
    }

    pub(crate) fn is_match(&self, text: &str) -> bool {
        self.automaton
            .find_overlapping_iter(text)
            .any(|m| on_word_boundary(text, m.start(), m.end()))
    }
}

fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_alphanumeric());
    let after_ok = text[end..]
        .chars()
        .next()
        .map_or(true, |c| !c.is_alphanumeric());
    before_ok && after_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scanner_respects_word_boundaries() {
        let scanner = TokenScanner::compile(&to_owned(&["but", "bad"])).unwrap();
        assert_eq!(scanner.matches("nice button, no complaints"), Vec::<String>::new());
        assert_eq!(scanner.matches("good but slow"), vec!["but".to_string()]);
        assert!(!scanner.is_match("badge received"));
    }

    #[test]
    fn scanner_dedupes_repeated_tokens() {
        let scanner = TokenScanner::compile(&to_owned(&["great"])).unwrap();
        assert_eq!(
            scanner.matches("great service, great followup"),
            vec!["great".to_string()]
        );
    }

    #[test]
    fn toml_override_replaces_only_named_tables() {
        let tables = LexiconTables::load_from_str(
            r#"
positive = ["splendid"]
"#,
        )
        .unwrap();
        assert_eq!(tables.positive, vec!["splendid".to_string()]);
        assert!(!tables.negative.is_empty());
        assert!(!tables.contrast.is_empty());
    }

    #[test]
    fn blank_token_rejected() {
        let err = LexiconTables::load_from_str(
            r#"
negative = ["bad", "  "]
"#,
        );
        assert!(err.is_err());
    }
}
