//! The ten-rule naming evaluator
//!
//! Every rule is evaluated unconditionally, in `RuleName::ALL` order, once the
//! identifier has passed the exemption check. Rules see only the bare identifier
//! string and its word list; they never depend on other identifiers.

use super::convention::{classify, is_lower, is_numeric, is_upper, ConventionLabel};
use super::segment::segment;
use crate::domain::violations::{NamingError, NamingResult, RuleName, ViolationReport};
use crate::lexicon::{EnglishSegmenter, FrequencySegmenter, Lexicon, WordListLexicon};
use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// Identifiers shorter than this many characters are too short
pub const MIN_IDENTIFIER_LENGTH: usize = 8;
/// Identifiers longer than this many characters are too long
pub const MAX_IDENTIFIER_LENGTH: usize = 20;
/// Fewest words a well-formed identifier has
pub const MIN_WORDS: usize = 2;
/// Most words a well-formed identifier has
pub const MAX_WORDS: usize = 4;

/// Conventional short names immune to every rule
pub const EXEMPT_IDENTIFIERS: [&str; 17] = [
    "c", "d", "e", "g", "i", "in", "inOut", "j", "k", "m", "n", "o", "out", "t", "x", "y", "z",
];

/// English number names for the numeric-name rule
pub const NUMBER_WORDS: [&str; 33] = [
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen", "nineteen",
    "twenty", "thirty", "forty", "fourty", "fifty", "sixty", "seventy", "eighty", "ninety",
    "hundred", "thousand", "million", "billion", "trillion",
];

lazy_static! {
    static ref EXEMPTIONS: HashSet<&'static str> = EXEMPT_IDENTIFIERS.into_iter().collect();
    static ref NUMBER_WORD_TABLE: HashSet<&'static str> = NUMBER_WORDS.into_iter().collect();
}

/// Whether an identifier is immune to all rules
pub fn is_exempt(identifier: &str) -> bool {
    EXEMPTIONS.contains(identifier)
}

/// Full breakdown of one identifier's evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentifierAnalysis {
    pub identifier: String,
    pub exempt: bool,
    pub words: Vec<String>,
    pub labels: Vec<ConventionLabel>,
    pub violations: ViolationReport,
}

/// Applies the fixed rule set to identifiers
///
/// Holds only shared, read-only collaborators, so one evaluator can serve any
/// number of threads.
#[derive(Clone)]
pub struct RuleEvaluator {
    lexicon: Arc<dyn Lexicon>,
    segmenter: Arc<dyn EnglishSegmenter>,
}

impl std::fmt::Debug for RuleEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEvaluator").finish_non_exhaustive()
    }
}

impl RuleEvaluator {
    pub fn new(lexicon: Arc<dyn Lexicon>, segmenter: Arc<dyn EnglishSegmenter>) -> Self {
        Self { lexicon, segmenter }
    }

    /// Evaluator backed by the embedded word list
    pub fn with_defaults() -> Self {
        Self::new(
            Arc::new(WordListLexicon::embedded()),
            Arc::new(FrequencySegmenter::embedded()),
        )
    }

    /// Ordered list of rules the identifier violates
    pub fn evaluate(&self, identifier: &str) -> NamingResult<ViolationReport> {
        self.analyze(identifier).map(|analysis| analysis.violations)
    }

    /// Evaluate and keep the intermediate word list and labels
    pub fn analyze(&self, identifier: &str) -> NamingResult<IdentifierAnalysis> {
        if identifier.is_empty() {
            return Err(NamingError::invalid_input("identifier must not be empty"));
        }

        if is_exempt(identifier) {
            return Ok(IdentifierAnalysis {
                identifier: identifier.to_string(),
                exempt: true,
                words: Vec::new(),
                labels: Vec::new(),
                violations: ViolationReport::new(),
            });
        }

        let words = segment(identifier);
        let labels: Vec<ConventionLabel> = words.iter().map(|w| classify(w)).collect();
        let violations = self.apply_rules(identifier, &words, &labels);

        tracing::trace!(identifier, ?words, violations = violations.len(), "evaluated identifier");

        Ok(IdentifierAnalysis {
            identifier: identifier.to_string(),
            exempt: false,
            words,
            labels,
            violations,
        })
    }

    fn apply_rules(
        &self,
        identifier: &str,
        words: &[String],
        labels: &[ConventionLabel],
    ) -> ViolationReport {
        let length = identifier.chars().count();

        RuleName::ALL
            .into_iter()
            .filter(|rule| match rule {
                RuleName::CapitalisationAnomaly => self.capitalisation_anomaly(identifier, words),
                RuleName::ConsecutiveUnderscores => has_consecutive_underscores(identifier),
                RuleName::DictionaryWords => self.has_non_dictionary_word(words),
                RuleName::ExcessiveWords => words.len() > MAX_WORDS,
                RuleName::ExternalUnderscores => has_external_underscores(identifier),
                RuleName::LongIdentifierName => length > MAX_IDENTIFIER_LENGTH,
                RuleName::NamingConventionAnomaly => naming_convention_anomaly(labels),
                RuleName::NumberOfWords => words.len() < MIN_WORDS || words.len() > MAX_WORDS,
                RuleName::NumericIdentifierName => is_numeric_name(words),
                RuleName::ShortIdentifierName => length < MIN_IDENTIFIER_LENGTH,
            })
            .collect()
    }

    fn capitalisation_anomaly(&self, identifier: &str, words: &[String]) -> bool {
        if identifier.contains('_') {
            return words.iter().any(|word| has_inconsistent_casing(word));
        }

        if !(is_upper(identifier) || is_lower(identifier)) {
            return false;
        }

        let chunks = self.segmenter.split(identifier);
        chunks.len() > 1 && chunks[1..].iter().any(|chunk| !is_numeric(chunk))
    }

    fn has_non_dictionary_word(&self, words: &[String]) -> bool {
        words.iter().any(|word| !self.lexicon.contains(&word.to_lowercase()))
    }
}

/// A word of two or more characters that is neither all-caps nor capitalised-then-lower
fn has_inconsistent_casing(word: &str) -> bool {
    let mut chars = word.chars();
    if chars.next().is_none() || chars.as_str().is_empty() {
        return false;
    }
    !is_upper(word) && !is_lower(chars.as_str())
}

fn has_consecutive_underscores(identifier: &str) -> bool {
    identifier.as_bytes().windows(2).any(|pair| pair == b"__")
}

fn has_external_underscores(identifier: &str) -> bool {
    identifier.starts_with('_') || identifier.ends_with('_')
}

/// Later words may only switch to NUMERIC, or from LOWER to CAMEL (lowerCamelCase)
fn naming_convention_anomaly(labels: &[ConventionLabel]) -> bool {
    let Some((&first, rest)) = labels.split_first() else {
        return false;
    };

    rest.iter().any(|&label| {
        label != first
            && label != ConventionLabel::Numeric
            && !(first == ConventionLabel::Lower && label == ConventionLabel::Camel)
    })
}

fn is_numeric_name(words: &[String]) -> bool {
    if words.is_empty() {
        return false;
    }

    words.iter().all(|w| is_numeric(w))
        || words.iter().all(|w| NUMBER_WORD_TABLE.contains(w.to_lowercase().as_str()))
}
