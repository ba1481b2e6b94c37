// Shared tokenization for the vectorizer and the keyword extractors.
//
// Tokens are lowercase runs of two or more Unicode word characters, the
// same rule the clustering matrix and the keyword candidates both rely on.
// Accented words ("schrödinger", "café") stay whole.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use stop_words::{get, LANGUAGE};

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid token regex"));

/// Split text into lowercase tokens, keeping stop-words.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// English stop-word set, from the `stop-words` crate.
#[derive(Debug, Clone)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    pub fn english() -> Self {
        Self::from_words(get(LANGUAGE::English))
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(|w| w.into().to_lowercase()).collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// The words as a list, for APIs that want a slice.
    pub fn to_vec(&self) -> Vec<String> {
        let mut words: Vec<String> = self.words.iter().cloned().collect();
        words.sort();
        words
    }

    /// Tokenize and drop stop-words in one pass.
    pub fn content_tokens(&self, text: &str) -> Vec<String> {
        tokenize(text)
            .into_iter()
            .filter(|t| !self.contains(t))
            .collect()
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::english()
    }
}
