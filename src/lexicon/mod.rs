//! English lexicon and lexical segmentation
//!
//! Architecture: Anti-Corruption Layer - the rule engine only sees two narrow traits
//! - `Lexicon` answers dictionary membership for lowercase words
//! - `EnglishSegmenter` guesses English word boundaries in same-case text
//! - Both are built once, never mutated, and shared across evaluation threads

pub mod segmenter;

use crate::config::LexiconConfig;
use crate::domain::violations::{NamingError, NamingResult};
use crate::naming::convention::is_numeric;
use lazy_static::lazy_static;
use std::collections::HashSet;
use std::fs;

pub use segmenter::FrequencySegmenter;

/// US English word list compiled into the binary, most frequent first
///
/// Every entry is a dictionary word; the order only matters to segmentation.
const EMBEDDED_WORD_LIST: &str = include_str!("../../data/english_words.txt");

lazy_static! {
    /// Embedded words in rank order, duplicates included
    static ref EMBEDDED_WORDS: Vec<&'static str> = ranked_words(EMBEDDED_WORD_LIST).collect();
}

/// Dictionary membership test
///
/// `contains` is an exact, case-sensitive lookup; callers pass lowercase words.
pub trait Lexicon: Send + Sync {
    fn contains(&self, word: &str) -> bool;
}

/// Best-effort split of text into probable English words, regardless of case
pub trait EnglishSegmenter: Send + Sync {
    fn split(&self, text: &str) -> Vec<String>;
}

/// Iterate the words of a word-list file: whitespace separated, `#` starts a comment line
pub fn ranked_words(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .flat_map(str::split_whitespace)
}

/// Embedded ranked words, most frequent first
pub fn embedded_words() -> &'static [&'static str] {
    &EMBEDDED_WORDS
}

/// Project vocabulary from configuration: `extra_words`, then every word-list file in order
pub fn project_words(config: &LexiconConfig) -> NamingResult<Vec<String>> {
    let mut words: Vec<String> = config.extra_words.clone();

    for path in &config.word_lists {
        let content = fs::read_to_string(path).map_err(|e| {
            NamingError::lexicon(format!("Failed to read word list '{}': {}", path.display(), e))
        })?;
        let before = words.len();
        words.extend(ranked_words(&content).map(str::to_string));
        tracing::debug!("Loaded {} words from {}", words.len() - before, path.display());
    }

    Ok(words)
}

/// Immutable hash-set lexicon
///
/// Purely numeric tokens are accepted as words: numerals are valid dictionary entries.
#[derive(Debug, Clone, Default)]
pub struct WordListLexicon {
    words: HashSet<String>,
}

impl WordListLexicon {
    /// Lexicon over the embedded English word list
    pub fn embedded() -> Self {
        Self::from_words(embedded_words().iter().copied())
    }

    /// Lexicon over an explicit set of words
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::default().with_words(words)
    }

    /// Build the lexicon described by configuration: embedded list plus project words
    pub fn from_config(config: &LexiconConfig) -> NamingResult<Self> {
        let lexicon = Self::embedded().with_words(project_words(config)?);
        tracing::debug!("Lexicon ready with {} words", lexicon.len());
        Ok(lexicon)
    }

    /// Add words, normalising them to lowercase
    pub fn with_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words.extend(
            words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty()),
        );
        self
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Lexicon for WordListLexicon {
    fn contains(&self, word: &str) -> bool {
        is_numeric(word) || self.words.contains(word)
    }
}
