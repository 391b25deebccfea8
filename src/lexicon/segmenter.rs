//! Zipf-cost English word segmentation
//!
//! Each known word costs `ln((rank + 1) * ln(N))`, so frequent words are cheap and
//! unknown chunks are infinitely expensive. Digit runs cost as much as the rarest
//! word. A dynamic program picks the cheapest segmentation; ties prefer shorter
//! trailing chunks.

use super::{embedded_words, project_words, EnglishSegmenter};
use crate::config::LexiconConfig;
use crate::domain::violations::NamingResult;
use std::collections::HashMap;

/// Segmenter over a frequency-ranked word list
#[derive(Debug, Clone)]
pub struct FrequencySegmenter {
    costs: HashMap<String, f64>,
    numeral_cost: f64,
    max_word_len: usize,
}

impl FrequencySegmenter {
    /// Segmenter over the embedded word list
    pub fn embedded() -> Self {
        Self::from_ranked(embedded_words().iter().copied())
    }

    /// Embedded list followed by the project vocabulary
    ///
    /// Project words rank after every embedded word, so they only win where no
    /// English split exists.
    pub fn from_config(config: &LexiconConfig) -> NamingResult<Self> {
        let extra = project_words(config)?;
        let segmenter = Self::from_ranked(
            embedded_words()
                .iter()
                .copied()
                .chain(extra.iter().map(String::as_str)),
        );
        tracing::debug!("Segmenter ready with {} project words", extra.len());
        Ok(segmenter)
    }

    /// Build from words ordered most-frequent first; a repeated word keeps its best rank
    pub fn from_ranked<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = words.into_iter().map(|w| w.as_ref().to_lowercase()).collect();
        let log_n = (words.len().max(2) as f64).ln();
        let numeral_cost = ((words.len() + 1) as f64 * log_n).ln();

        let mut costs = HashMap::with_capacity(words.len());
        let mut max_word_len = 1;
        for (rank, word) in words.into_iter().enumerate() {
            max_word_len = max_word_len.max(word.chars().count());
            costs.entry(word).or_insert_with(|| ((rank + 1) as f64 * log_n).ln());
        }

        Self {
            costs,
            numeral_cost,
            max_word_len,
        }
    }

    fn word_cost(&self, chunk: &[char]) -> f64 {
        if chunk.iter().all(|c| c.is_numeric()) {
            return self.numeral_cost;
        }
        let key: String = chunk.iter().collect::<String>().to_lowercase();
        self.costs.get(&key).copied().unwrap_or(f64::INFINITY)
    }

    /// Cheapest (cost, length) of a final chunk ending at `end`
    fn best_match(&self, chars: &[char], costs: &[f64], end: usize) -> (f64, usize) {
        let mut best = (f64::INFINITY, 1);
        let longest = end.min(self.max_word_len.max(digit_run_len(chars, end)));

        for len in 1..=longest {
            let candidate = costs[end - len] + self.word_cost(&chars[end - len..end]);
            if candidate < best.0 {
                best = (candidate, len);
            }
        }

        best
    }

    fn split_run(&self, run: &str) -> Vec<String> {
        let chars: Vec<char> = run.chars().collect();

        let mut costs = Vec::with_capacity(chars.len() + 1);
        costs.push(0.0);
        for end in 1..=chars.len() {
            let (cost, _) = self.best_match(&chars, &costs, end);
            costs.push(cost);
        }

        let mut out: Vec<String> = Vec::new();
        let mut end = chars.len();
        while end > 0 {
            let (_, len) = self.best_match(&chars, &costs, end);
            let token: String = chars[end - len..end].iter().collect();

            // re-attach split "'s" and keep digit runs together
            let merge = token != "'"
                && out.last().is_some_and(|last: &String| {
                    last == "'s"
                        || (chars[end - 1].is_numeric()
                            && last.chars().next().is_some_and(char::is_numeric))
                });

            match out.last_mut() {
                Some(last) if merge => last.insert_str(0, &token),
                _ => out.push(token),
            }
            end -= len;
        }

        out.reverse();
        out
    }
}

/// Length of the run of numeric characters ending at `end`
fn digit_run_len(chars: &[char], end: usize) -> usize {
    chars[..end].iter().rev().take_while(|c| c.is_numeric()).count()
}

impl EnglishSegmenter for FrequencySegmenter {
    fn split(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|run| !run.is_empty())
            .flat_map(|run| self.split_run(run))
            .collect()
    }
}
