// Keyword extractor trait: the seam between the pipeline and the ranking backends.
//
// The pipeline only sees this trait. Which implementation backs it
// (embedding similarity or plain TF-IDF) is decided once at startup from
// the detected capabilities, then passed in.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A ranked keyword phrase and its relevance score.
///
/// The score range depends on the extractor; only the ordering matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub phrase: String,
    pub score: f64,
}

impl Keyword {
    pub fn new(phrase: impl Into<String>, score: f64) -> Self {
        Self {
            phrase: phrase.into(),
            score,
        }
    }
}

/// Trait for extracting ranked keywords from a text corpus.
pub trait KeywordExtractor {
    /// Short name for logs and reports.
    fn name(&self) -> &'static str;

    /// Return up to `top_n` keywords, highest score first.
    ///
    /// Empty or stop-word-only text yields an empty list, not an error.
    fn extract(&self, text: &str, top_n: usize) -> Result<Vec<Keyword>>;
}
