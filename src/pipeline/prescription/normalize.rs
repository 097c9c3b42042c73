//! OCR text normalization into candidate drug-name tokens.
//!
//! Lowercases, folds common OCR digit/letter confusions (`0→o`, `1→l`,
//! `5→s`) and extracts word-like tokens. The substitution is applied
//! everywhere, so "500mg" becomes "soomg": recall over precision.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::tables::{OCR_SUBSTITUTIONS, STOP_WORDS};

/// A letter, then letters/digits/hyphens, ending in a letter or digit.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-z][a-z0-9\-]*[a-z0-9]\b").expect("valid regex"));

static PAREN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]+)\)").expect("valid regex"));

static DEFAULT_NORMALIZER: LazyLock<Normalizer> = LazyLock::new(Normalizer::default);

/// Minimum token length kept by the tokenizer.
const MIN_TOKEN_LEN: usize = 3;

/// Tokenizer configured with a stop-word list and OCR substitution table.
#[derive(Debug, Clone)]
pub struct Normalizer {
    stop_words: HashSet<String>,
    substitutions: Vec<(char, char)>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(STOP_WORDS, OCR_SUBSTITUTIONS)
    }
}

impl Normalizer {
    pub fn new(stop_words: &[&str], substitutions: &[(char, char)]) -> Self {
        Self {
            stop_words: stop_words.iter().map(|w| w.to_lowercase()).collect(),
            substitutions: substitutions.to_vec(),
        }
    }

    /// Lowercase and apply the OCR substitution table.
    pub fn fold(&self, text: &str) -> String {
        text.to_lowercase()
            .chars()
            .map(|c| {
                self.substitutions
                    .iter()
                    .find(|(from, _)| *from == c)
                    .map_or(c, |(_, to)| *to)
            })
            .collect()
    }

    /// Split text into filtered candidate tokens.
    ///
    /// Tokens found inside parentheses are appended after the full scan,
    /// so a parenthesized alias appears twice. Callers treat the result as
    /// a sequence, not a set.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let folded = self.fold(text);

        let mut words: Vec<&str> = TOKEN_RE.find_iter(&folded).map(|m| m.as_str()).collect();
        for caps in PAREN_RE.captures_iter(&folded) {
            if let Some(inner) = caps.get(1) {
                words.extend(TOKEN_RE.find_iter(inner.as_str()).map(|m| m.as_str()));
            }
        }

        words
            .into_iter()
            .filter(|w| w.len() >= MIN_TOKEN_LEN && !self.stop_words.contains(*w))
            .map(str::to_string)
            .collect()
    }
}

/// Tokenize with the default tables.
pub fn normalize(text: &str) -> Vec<String> {
    DEFAULT_NORMALIZER.tokenize(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_filters_stop_words() {
        let tokens = normalize("Take Amoxicillin with water");
        assert_eq!(tokens, vec!["amoxicillin"]);
    }

    #[test]
    fn folds_ocr_digit_confusions() {
        // "5" → "s", "1" → "l", "0" → "o"
        assert_eq!(normalize("Metformin 500mg"), vec!["metformin", "soomg"]);
        assert_eq!(normalize("Ce1ecoxib"), vec!["celecoxib"]);
    }

    #[test]
    fn drops_short_tokens() {
        assert!(normalize("mg po iv").is_empty());
    }

    #[test]
    fn rejects_tokens_ending_in_hyphen() {
        let tokens = normalize("co- amoxiclav-k");
        assert_eq!(tokens, vec!["amoxiclav-k"]);
    }

    #[test]
    fn rejects_tokens_starting_with_digit() {
        // "3o" after folding "30" starts with a digit
        assert!(normalize("30 20").is_empty());
    }

    #[test]
    fn appends_parenthesized_tokens() {
        let tokens = normalize("Tylenol (acetaminophen)");
        assert_eq!(tokens, vec!["tylenol", "acetaminophen", "acetaminophen"]);
    }

    #[test]
    fn custom_tables_are_respected() {
        let normalizer = Normalizer::new(&["aspirin"], &[]);
        // Without substitutions "100mg" starts with a digit and is rejected
        assert!(normalizer.tokenize("Aspirin 100mg").is_empty());
        assert_eq!(normalizer.tokenize("the 500"), vec!["the"]);
    }

    #[test]
    fn empty_text_yields_no_tokens() {
        assert!(normalize("").is_empty());
        assert!(normalize("   \n  ").is_empty());
    }
}
