// Embedding-similarity keyword extraction.
//
// Candidate phrases are the unique 1- and 2-word n-grams of the corpus after
// stop-word removal. The corpus and every candidate are embedded with the
// same sentence model, and candidates are ranked by cosine similarity to the
// corpus vector: phrases that "mean" what the whole text means come first.

use std::collections::HashSet;

use anyhow::Result;
use tracing::{debug, info};

use super::embeddings::{cosine_similarity, Embedder};
use super::tokenize::StopWords;
use super::traits::{Keyword, KeywordExtractor};

/// Keyword extractor backed by a sentence embedder.
pub struct EmbeddingKeywordExtractor<E: Embedder> {
    embedder: E,
    stop_words: StopWords,
    /// Shortest and longest candidate phrase, in words
    pub ngram_range: (usize, usize),
}

impl<E: Embedder> EmbeddingKeywordExtractor<E> {
    pub fn new(embedder: E) -> Self {
        Self {
            embedder,
            stop_words: StopWords::english(),
            ngram_range: (1, 2),
        }
    }

    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = stop_words;
        self
    }
}

/// Unique n-grams of `tokens` with lengths in `min..=max`, in order of
/// first occurrence.
pub fn candidate_phrases(tokens: &[String], min: usize, max: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut phrases = Vec::new();

    for n in min.max(1)..=max {
        for window in tokens.windows(n) {
            let phrase = window.join(" ");
            if seen.insert(phrase.clone()) {
                phrases.push(phrase);
            }
        }
    }

    phrases
}

impl<E: Embedder> KeywordExtractor for EmbeddingKeywordExtractor<E> {
    fn name(&self) -> &'static str {
        "embedding similarity"
    }

    fn extract(&self, text: &str, top_n: usize) -> Result<Vec<Keyword>> {
        let tokens = self.stop_words.content_tokens(text);
        if tokens.is_empty() || top_n == 0 {
            return Ok(Vec::new());
        }

        let (min, max) = self.ngram_range;
        let candidates = candidate_phrases(&tokens, min, max);
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        debug!(candidates = candidates.len(), "Embedding keyword candidates");

        let doc_embedding = self
            .embedder
            .embed_batch(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("Embedder returned no vector for the corpus"))?;

        let candidate_embeddings = self.embedder.embed_batch(&candidates)?;
        if candidate_embeddings.len() != candidates.len() {
            anyhow::bail!(
                "Embedder returned {} vectors for {} candidates",
                candidate_embeddings.len(),
                candidates.len()
            );
        }

        let mut ranked: Vec<Keyword> = candidates
            .into_iter()
            .zip(&candidate_embeddings)
            .map(|(phrase, emb)| Keyword::new(phrase, cosine_similarity(&doc_embedding, emb)))
            .collect();

        // Stable sort: equal scores keep first-occurrence order
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(top_n);

        if let Some(top) = ranked.first() {
            info!(
                keywords = ranked.len(),
                top_keyword = %top.phrase,
                top_score = top.score,
                "Extracted keywords by embedding similarity"
            );
        }

        Ok(ranked)
    }
}
