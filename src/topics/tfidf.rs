// TF-IDF keyword extraction, the basic fallback.
//
// Used when the sentence embedding model isn't installed. Uses the
// `keyword_extraction` crate to rank single words: the corpus is split into
// sentences and each sentence is treated as a separate document for IDF,
// so words that appear everywhere get downweighted while words that are
// distinctive to part of the text are boosted.

use anyhow::Result;
use keyword_extraction::tf_idf::{TfIdf, TfIdfParams};
use tracing::info;

use super::tokenize::StopWords;
use super::traits::{Keyword, KeywordExtractor};

/// TF-IDF keyword extractor. Zero model files, runs anywhere.
pub struct TfIdfKeywordExtractor {
    stop_words: Vec<String>,
}

impl Default for TfIdfKeywordExtractor {
    fn default() -> Self {
        Self {
            stop_words: StopWords::english().to_vec(),
        }
    }
}

/// Split a corpus into sentence-sized documents.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split(['.', '!', '?', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl KeywordExtractor for TfIdfKeywordExtractor {
    fn name(&self) -> &'static str {
        "tf-idf"
    }

    fn extract(&self, text: &str, top_n: usize) -> Result<Vec<Keyword>> {
        let sentences = split_sentences(text);
        if sentences.is_empty() || top_n == 0 {
            return Ok(Vec::new());
        }

        // The library handles tokenization, stop word removal, and scoring.
        let params = TfIdfParams::UnprocessedDocuments(&sentences, &self.stop_words, None);
        let tfidf = TfIdf::new(params);

        let mut ranked: Vec<Keyword> = tfidf
            .get_ranked_word_scores(top_n)
            .into_iter()
            .map(|(word, score)| Keyword::new(word, f64::from(score)))
            .collect();
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        if let Some(top) = ranked.first() {
            info!(
                keywords = ranked.len(),
                top_keyword = %top.phrase,
                top_score = top.score,
                "Extracted TF-IDF keywords"
            );
        }

        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sentences() {
        let s = split_sentences("First one. Second!\nThird?  ");
        assert_eq!(s, vec!["First one", "Second", "Third"]);
    }

    #[test]
    fn test_extract_basic() {
        let extractor = TfIdfKeywordExtractor::default();
        let text = "Transformer models dominate language modeling. \
                    Protein folding benefits from attention mechanisms. \
                    Graph neural networks model molecules. \
                    Transformer attention scales quadratically with sequence length. \
                    Reinforcement learning trains agents in simulated environments.";
        let keywords = extractor.extract(text, 10).unwrap();

        assert!(!keywords.is_empty());
        assert!(keywords.len() <= 10);
        for pair in keywords.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_extract_empty_is_empty() {
        let extractor = TfIdfKeywordExtractor::default();
        assert!(extractor.extract("", 10).unwrap().is_empty());
        assert!(extractor.extract(" . ! ", 10).unwrap().is_empty());
    }
}
