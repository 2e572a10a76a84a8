// Text utils

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

// English stop words, curated from the common list of function words.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "all", "just", "being", "over", "both", "through", "yourselves", "its", "before", "herself",
    "had", "should", "to", "only", "under", "ours", "has", "do", "them", "his", "very", "they",
    "not", "during", "now", "him", "nor", "did", "this", "she", "each", "further", "where", "few",
    "because", "doing", "some", "are", "our", "ourselves", "out", "what", "for", "while", "does",
    "above", "between", "t", "be", "we", "who", "were", "here", "hers", "by", "on", "about", "of",
    "against", "s", "or", "own", "into", "yourself", "down", "your", "from", "her", "their",
    "there", "been", "whom", "too", "themselves", "was", "until", "more", "himself", "that", "but",
    "don", "with", "than", "those", "he", "me", "myself", "these", "up", "will", "below", "can",
    "theirs", "my", "and", "then", "is", "am", "it", "an", "as", "itself", "at", "have", "in",
    "any", "if", "again", "no", "when", "same", "how", "other", "which", "you", "after", "most",
    "such", "why", "a", "off", "i", "yours", "so", "the", "having", "once",
];

/// Everything that is not an ASCII letter or a plain space.
static NON_WORD_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z ]").expect("static pattern is valid"));

/// Turns free review text into lower-case word tokens without stop words.
///
/// Non-letters are deleted rather than replaced with a space, so `can't` becomes
/// `cant` and `word.Next` fuses into `wordnext`. Downstream counts depend on
/// this behaviour.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stop_words: HashSet<String>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Tokenizer::new(std::iter::empty::<&str>())
    }
}

impl Tokenizer {
    /// Builds a tokenizer with the English list plus `extra_stop_words`.
    pub fn new<I, S>(extra_stop_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stop_words = ENGLISH_STOP_WORDS
            .iter()
            .map(|w| w.to_string())
            .chain(
                extra_stop_words
                    .into_iter()
                    .map(|w| w.as_ref().to_lowercase()),
            )
            .collect();
        Tokenizer { stop_words }
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(&word.to_lowercase())
    }

    /// Tokens of `text` in their original order. `None` yields no tokens.
    pub fn clean(&self, text: Option<&str>) -> Vec<String> {
        let Some(text) = text else {
            return Vec::new();
        };
        let stripped = NON_WORD_CHARS.replace_all(text, "").to_lowercase();
        stripped
            .split(' ')
            .filter(|token| !token.is_empty() && !self.stop_words.contains(*token))
            .map(str::to_string)
            .collect()
    }
}
