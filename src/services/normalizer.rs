// Paragraph Normalizer
// Lower-casing, punctuation/digit stripping, stopword removal and lemmatization

use regex::Regex;
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;

use super::lexicon::{is_stopword, Lemmatizer};

fn digit_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\w*\d\w*").expect("digit word regex"))
}

/// Turns a paragraph into the token sequence fed to the embedding aggregator.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    lemmatizer: &'static Lemmatizer,
}

impl Normalizer {
    pub fn new() -> Self {
        Self {
            lemmatizer: Lemmatizer::shared(),
        }
    }

    /// Normalize a paragraph into tokens. May return an empty sequence.
    pub fn normalize(&self, paragraph: &str) -> Vec<String> {
        let lowered = paragraph.to_lowercase();
        let stripped: String = lowered.chars().filter(|c| !c.is_ascii_punctuation()).collect();
        let without_digits = digit_word_re().replace_all(&stripped, "");

        without_digits
            .unicode_words()
            .filter(|w| !is_stopword(w))
            .map(|w| self.lemmatizer.lemmatize(w))
            .collect()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Shorthand for `Normalizer::new().normalize(paragraph)`
pub fn normalize(paragraph: &str) -> Vec<String> {
    Normalizer::new().normalize(paragraph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_normalization() {
        let tokens = normalize("We collect your Personal Data, and share it with Partners!");
        assert_eq!(tokens, vec!["collect", "personal", "data", "share", "partner"]);
    }

    #[test]
    fn test_digit_tokens_are_fully_dropped() {
        let tokens = normalize("Effective policy2024 from 2024 onwards, version 3b.");
        assert_eq!(tokens, vec!["effective", "onwards", "version"]);
    }

    #[test]
    fn test_punctuation_removed_before_tokenizing() {
        // apostrophes and hyphens are removed, joining the pieces
        let tokens = normalize("Opt-out isn't available.");
        assert_eq!(tokens, vec!["optout", "isnt", "available"]);
    }

    #[test]
    fn test_only_stopwords_yields_empty() {
        assert!(normalize("It is what it is, and they were there.").is_empty());
        assert!(normalize("!!! 123 ...").is_empty());
        assert!(normalize("").is_empty());
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let text = "Third parties, including others, may receive cookies and addresses \
                    of our users' devices; analyses of 3rd-party services follow.";
        let once = normalize(text);
        let twice = normalize(&once.join(" "));
        assert_eq!(once, twice);
    }
}
