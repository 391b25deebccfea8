//! Core domain models for naming-rule violations
//!
//! Architecture: Rich Domain Models - rules know their own names and descriptions
//! - RuleName is the closed set of naming rules in evaluation order
//! - ViolationReport is the ordered outcome of evaluating one identifier
//! - NamingError is the single error taxonomy shared by every layer

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed battery of naming rules, declared in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuleName {
    #[serde(rename = "Capitalisation Anomaly")]
    CapitalisationAnomaly,
    #[serde(rename = "Consecutive Underscores")]
    ConsecutiveUnderscores,
    #[serde(rename = "Dictionary Words")]
    DictionaryWords,
    #[serde(rename = "Excessive Words")]
    ExcessiveWords,
    #[serde(rename = "External Underscores")]
    ExternalUnderscores,
    #[serde(rename = "Long Identifier Name")]
    LongIdentifierName,
    #[serde(rename = "Naming Convention Anomaly")]
    NamingConventionAnomaly,
    #[serde(rename = "Number of Words")]
    NumberOfWords,
    #[serde(rename = "Numeric Identifier Name")]
    NumericIdentifierName,
    #[serde(rename = "Short Identifier Name")]
    ShortIdentifierName,
}

impl RuleName {
    /// Every rule, in the order the evaluator applies them
    pub const ALL: [RuleName; 10] = [
        Self::CapitalisationAnomaly,
        Self::ConsecutiveUnderscores,
        Self::DictionaryWords,
        Self::ExcessiveWords,
        Self::ExternalUnderscores,
        Self::LongIdentifierName,
        Self::NamingConventionAnomaly,
        Self::NumberOfWords,
        Self::NumericIdentifierName,
        Self::ShortIdentifierName,
    ];

    /// Human-readable rule name as it appears in reports
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CapitalisationAnomaly => "Capitalisation Anomaly",
            Self::ConsecutiveUnderscores => "Consecutive Underscores",
            Self::DictionaryWords => "Dictionary Words",
            Self::ExcessiveWords => "Excessive Words",
            Self::ExternalUnderscores => "External Underscores",
            Self::LongIdentifierName => "Long Identifier Name",
            Self::NamingConventionAnomaly => "Naming Convention Anomaly",
            Self::NumberOfWords => "Number of Words",
            Self::NumericIdentifierName => "Numeric Identifier Name",
            Self::ShortIdentifierName => "Short Identifier Name",
        }
    }

    /// Stable machine identifier used on the command line
    pub fn id(self) -> &'static str {
        match self {
            Self::CapitalisationAnomaly => "capitalisation_anomaly",
            Self::ConsecutiveUnderscores => "consecutive_underscores",
            Self::DictionaryWords => "dictionary_words",
            Self::ExcessiveWords => "excessive_words",
            Self::ExternalUnderscores => "external_underscores",
            Self::LongIdentifierName => "long_identifier_name",
            Self::NamingConventionAnomaly => "naming_convention_anomaly",
            Self::NumberOfWords => "number_of_words",
            Self::NumericIdentifierName => "numeric_identifier_name",
            Self::ShortIdentifierName => "short_identifier_name",
        }
    }

    /// What the rule checks
    pub fn description(self) -> &'static str {
        match self {
            Self::CapitalisationAnomaly => {
                "Single-case identifiers that hide several English words (e.g. 'totalcount'), \
                 or underscore-separated words with inconsistent internal casing"
            }
            Self::ConsecutiveUnderscores => "Two or more adjacent underscores anywhere in the name",
            Self::DictionaryWords => "Every word of the name must be an English dictionary word",
            Self::ExcessiveWords => "More than 4 words",
            Self::ExternalUnderscores => "Leading or trailing underscores",
            Self::LongIdentifierName => "More than 20 characters",
            Self::NamingConventionAnomaly => {
                "Words after the first follow a different casing convention than the first word \
                 (lowerCamelCase is tolerated)"
            }
            Self::NumberOfWords => "Fewer than 2 or more than 4 words",
            Self::NumericIdentifierName => {
                "Names made only of digits or only of English number words"
            }
            Self::ShortIdentifierName => "Fewer than 8 characters",
        }
    }

    /// Look a rule up by id or display name (case-insensitive)
    pub fn parse(name: &str) -> Option<Self> {
        let wanted = name.trim();
        Self::ALL.into_iter().find(|rule| {
            rule.id().eq_ignore_ascii_case(wanted) || rule.as_str().eq_ignore_ascii_case(wanted)
        })
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered list of rules one identifier violates; empty means compliant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViolationReport {
    rules: Vec<RuleName>,
}

impl ViolationReport {
    /// Create an empty (compliant) report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violated rule; a rule is recorded at most once
    pub fn push(&mut self, rule: RuleName) {
        if !self.rules.contains(&rule) {
            self.rules.push(rule);
        }
    }

    /// Whether the identifier complies with every rule
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn contains(&self, rule: RuleName) -> bool {
        self.rules.contains(&rule)
    }

    pub fn rules(&self) -> &[RuleName] {
        &self.rules
    }

    pub fn iter(&self) -> impl Iterator<Item = RuleName> + '_ {
        self.rules.iter().copied()
    }

    /// Render as `Violates: A, B`, or `None` for a compliant identifier
    pub fn format_violates(&self) -> Option<String> {
        if self.rules.is_empty() {
            return None;
        }
        let names: Vec<&str> = self.rules.iter().map(|r| r.as_str()).collect();
        Some(format!("Violates: {}", names.join(", ")))
    }
}

impl FromIterator<RuleName> for ViolationReport {
    fn from_iter<I: IntoIterator<Item = RuleName>>(iter: I) -> Self {
        let mut report = Self::new();
        for rule in iter {
            report.push(rule);
        }
        report
    }
}

/// Error types that can occur while linting identifiers
#[derive(Debug, thiserror::Error)]
pub enum NamingError {
    /// Configuration file could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File could not be read or written
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Path or identifier pattern failed to compile
    #[error("Pattern error: {message}")]
    Pattern { message: String },

    /// Identifier extraction failed for a specific file
    #[error("Extraction error in {file}: {message}")]
    Extraction { file: String, message: String },

    /// Word list could not be loaded
    #[error("Lexicon error: {message}")]
    Lexicon { message: String },

    /// Caller handed the engine input it does not accept (e.g. an empty identifier)
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Lint run failed as a whole
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Hosted repository could not be listed or downloaded
    #[error("Remote repository error: {message}")]
    Remote { message: String },
}

impl NamingError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    pub fn pattern(message: impl Into<String>) -> Self {
        Self::Pattern { message: message.into() }
    }

    pub fn extraction(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction { file: file.into(), message: message.into() }
    }

    pub fn lexicon(message: impl Into<String>) -> Self {
        Self::Lexicon { message: message.into() }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput { message: message.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote { message: message.into() }
    }
}

/// Result type for identifier-lint operations
pub type NamingResult<T> = Result<T, NamingError>;
