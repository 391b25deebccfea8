//! Structural word segmentation of identifiers
//!
//! Splits on underscores when present, otherwise on camel-case boundaries. Same-case
//! runs stay whole here; hidden word boundaries in names like `userid` are the
//! business of the capitalisation rule, which uses a lexical segmenter instead.

use super::convention::is_mixed_case;

/// Decompose an identifier into its ordered constituent words
///
/// Only an identifier made entirely of underscores yields an empty list.
pub fn segment(identifier: &str) -> Vec<String> {
    if identifier.contains('_') {
        return identifier
            .split('_')
            .filter(|word| !word.is_empty())
            .map(str::to_string)
            .collect();
    }

    if !is_mixed_case(identifier) {
        return vec![identifier.to_string()];
    }

    split_camel_case(identifier)
}

/// Start a new word at every uppercase character that does not already begin one
fn split_camel_case(identifier: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();

    for c in identifier.chars() {
        if c.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}
