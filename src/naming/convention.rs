//! Per-word casing classification
//!
//! Casing predicates follow Unicode case properties: a string is "upper" when it has
//! at least one cased character and no lowercase one, "lower" symmetrically. Digits,
//! punctuation and characters from uncased scripts are neutral.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Casing category of a single word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConventionLabel {
    Upper,
    Lower,
    Camel,
    Numeric,
    Invalid,
}

impl ConventionLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upper => "UPPER",
            Self::Lower => "LOWER",
            Self::Camel => "CAMEL",
            Self::Numeric => "NUMERIC",
            Self::Invalid => "INVALID",
        }
    }
}

impl fmt::Display for ConventionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label a word by its casing pattern; first matching check wins
pub fn classify(word: &str) -> ConventionLabel {
    if is_upper(word) {
        return ConventionLabel::Upper;
    }
    if is_lower(word) {
        return ConventionLabel::Lower;
    }
    if is_numeric(word) {
        return ConventionLabel::Numeric;
    }

    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() && is_lower(chars.as_str()) => ConventionLabel::Camel,
        _ => ConventionLabel::Invalid,
    }
}

/// At least one cased character and none of them lowercase
pub fn is_upper(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        cased |= c.is_uppercase();
    }
    cased
}

/// At least one cased character and none of them uppercase
pub fn is_lower(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_uppercase() {
            return false;
        }
        cased |= c.is_lowercase();
    }
    cased
}

/// Non-empty and made only of numeric characters
pub fn is_numeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(char::is_numeric)
}

/// Contains both an uppercase and a lowercase character
pub fn is_mixed_case(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && text.chars().any(char::is_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ABC", ConventionLabel::Upper)]
    #[case("abc", ConventionLabel::Lower)]
    #[case("Abc", ConventionLabel::Camel)]
    #[case("123", ConventionLabel::Numeric)]
    #[case("aB", ConventionLabel::Invalid)]
    #[case("A", ConventionLabel::Upper)]
    #[case("a", ConventionLabel::Lower)]
    #[case("HTTP2", ConventionLabel::Upper)]
    #[case("utf8", ConventionLabel::Lower)]
    #[case("Abc1", ConventionLabel::Camel)]
    #[case("ABc", ConventionLabel::Invalid)]
    #[case("$", ConventionLabel::Invalid)]
    fn test_classify(#[case] word: &str, #[case] expected: ConventionLabel) {
        assert_eq!(classify(word), expected);
    }

    #[test]
    fn test_unicode_casing() {
        assert_eq!(classify("ÉTÉ"), ConventionLabel::Upper);
        assert_eq!(classify("straße"), ConventionLabel::Lower);
        assert_eq!(classify("Ωmega"), ConventionLabel::Camel);
        // uncased scripts carry no casing information
        assert_eq!(classify("変数"), ConventionLabel::Invalid);
        assert_eq!(classify("٣٤"), ConventionLabel::Numeric);
    }

    #[test]
    fn test_case_predicates_need_a_cased_character() {
        assert!(!is_upper("123"));
        assert!(!is_lower("123"));
        assert!(is_upper("X1"));
        assert!(is_lower("x1"));
        assert!(!is_numeric(""));
        assert!(is_mixed_case("fooBar"));
        assert!(!is_mixed_case("FOO_1"));
    }
}
