// TF-IDF term-document matrix for clustering.
//
// Each abstract is one document. Terms are counted after stop-word removal,
// terms that appear in too many documents are pruned, and each row is
// weighted by smoothed IDF and L2-normalised so that k-means works on
// comparable unit-length vectors.
//
// The vocabulary is kept in lexicographic order; a term's index in that
// order is what downstream tie-breaking refers to.

use std::collections::{BTreeMap, HashMap};

use anyhow::Result;
use ndarray::{Array2, Axis};
use tracing::debug;

use super::tokenize::StopWords;

/// Default document-frequency ceiling: terms in more than 80% of documents
/// carry no signal for telling clusters apart.
pub const DEFAULT_MAX_DF: f64 = 0.8;

/// Builds a dense TF-IDF matrix from a set of documents.
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    /// Drop terms whose document frequency exceeds `max_df * n_documents`.
    pub max_df: f64,
    stop_words: StopWords,
}

impl Default for TfIdfVectorizer {
    fn default() -> Self {
        Self {
            max_df: DEFAULT_MAX_DF,
            stop_words: StopWords::english(),
        }
    }
}

/// A dense TF-IDF matrix: one row per document, one column per term.
#[derive(Debug, Clone, PartialEq)]
pub struct TfIdfMatrix {
    /// Terms in lexicographic order
    pub vocabulary: Vec<String>,
    /// `weights[[d, t]]` is the weight of term `t` in document `d`
    pub weights: Array2<f64>,
}

impl TfIdfMatrix {
    pub fn n_documents(&self) -> usize {
        self.weights.nrows()
    }

    pub fn n_terms(&self) -> usize {
        self.vocabulary.len()
    }
}

impl TfIdfVectorizer {
    pub fn new(max_df: f64, stop_words: StopWords) -> Self {
        Self { max_df, stop_words }
    }

    /// Learn the vocabulary and IDF weights from `documents` and return
    /// their TF-IDF matrix.
    pub fn fit_transform(&self, documents: &[String]) -> Result<TfIdfMatrix> {
        if documents.is_empty() {
            anyhow::bail!("No documents to vectorize");
        }

        let counts: Vec<HashMap<String, u32>> = documents
            .iter()
            .map(|doc| {
                let mut tf = HashMap::new();
                for token in self.stop_words.content_tokens(doc) {
                    *tf.entry(token).or_insert(0) += 1;
                }
                tf
            })
            .collect();

        // Document frequency per term; BTreeMap keeps the vocabulary sorted
        let mut df: BTreeMap<&str, u32> = BTreeMap::new();
        for tf in &counts {
            for term in tf.keys() {
                *df.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let n = documents.len() as f64;
        let max_doc_count = self.max_df * n;

        let kept: Vec<(&str, u32)> = df
            .into_iter()
            .filter(|&(_, count)| f64::from(count) <= max_doc_count)
            .collect();

        if kept.is_empty() {
            anyhow::bail!(
                "After pruning, no terms remain ({} documents, max_df {}); try more or longer abstracts",
                documents.len(),
                self.max_df
            );
        }

        let vocabulary: Vec<String> = kept.iter().map(|(t, _)| t.to_string()).collect();
        let index: HashMap<&str, usize> = kept
            .iter()
            .enumerate()
            .map(|(i, (t, _))| (*t, i))
            .collect();
        // Smoothed IDF, as if one extra document contained every term once
        let idf: Vec<f64> = kept
            .iter()
            .map(|&(_, count)| ((1.0 + n) / (1.0 + f64::from(count))).ln() + 1.0)
            .collect();

        let mut weights = Array2::<f64>::zeros((counts.len(), vocabulary.len()));
        for (d, tf) in counts.iter().enumerate() {
            for (term, &count) in tf {
                if let Some(&col) = index.get(term.as_str()) {
                    weights[[d, col]] = f64::from(count) * idf[col];
                }
            }
        }
        for mut row in weights.axis_iter_mut(Axis(0)) {
            let norm = row.dot(&row).sqrt();
            // All-zero rows stay zero
            if norm > 0.0 {
                row /= norm;
            }
        }

        debug!(
            documents = weights.nrows(),
            terms = vocabulary.len(),
            "Built TF-IDF matrix"
        );

        Ok(TfIdfMatrix {
            vocabulary,
            weights,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_vocabulary_is_sorted_and_stop_words_removed() {
        let v = TfIdfVectorizer::default();
        let m = v
            .fit_transform(&docs(&[
                "the zebra and the apple",
                "mango with the kiwi",
                "banana",
            ]))
            .unwrap();
        assert_eq!(m.vocabulary, vec!["apple", "banana", "kiwi", "mango", "zebra"]);
        assert_eq!(m.n_documents(), 3);
    }

    #[test]
    fn test_max_df_prunes_ubiquitous_terms() {
        let v = TfIdfVectorizer::default();
        let m = v
            .fit_transform(&docs(&[
                "learning graphs",
                "learning proteins",
                "learning robots",
                "learning markets",
                "learning",
            ]))
            .unwrap();
        assert!(!m.vocabulary.contains(&"learning".to_string()));
        assert_eq!(m.n_terms(), 4);
    }

    #[test]
    fn test_rows_are_unit_length() {
        let v = TfIdfVectorizer::default();
        let m = v
            .fit_transform(&docs(&["alpha beta beta", "gamma delta", "alpha gamma"]))
            .unwrap();
        for row in m.weights.rows() {
            let norm: f64 = row.dot(&row).sqrt();
            assert!((norm - 1.0).abs() < 1e-9, "norm was {norm}");
        }
    }

    #[test]
    fn test_rarer_terms_weigh_more() {
        let v = TfIdfVectorizer::new(1.0, StopWords::from_words(Vec::<String>::new()));
        let m = v
            .fit_transform(&docs(&["common rare", "common other", "common thing"]))
            .unwrap();
        let common = m.vocabulary.iter().position(|t| t == "common").unwrap();
        let rare = m.vocabulary.iter().position(|t| t == "rare").unwrap();
        assert!(m.weights[[0, rare]] > m.weights[[0, common]]);
    }

    #[test]
    fn test_everything_pruned_is_an_error() {
        let v = TfIdfVectorizer::default();
        assert!(v.fit_transform(&docs(&["only one document"])).is_err());
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let v = TfIdfVectorizer::default();
        assert!(v.fit_transform(&[]).is_err());
    }
}
