// Unit tests for clustering and keyword extraction.
//
// Tests the clustering contract (cluster count, terms per cluster,
// determinism, too-few-documents failure) and the extractor edge cases,
// all without model files or network access.

use gapfinder::topics::cluster::{DocumentClusterer, TOP_TERMS_PER_CLUSTER};
use gapfinder::topics::embeddings::Embedder;
use gapfinder::topics::keybert::EmbeddingKeywordExtractor;
use gapfinder::topics::tfidf::TfIdfKeywordExtractor;
use gapfinder::topics::traits::KeywordExtractor;
use gapfinder::suggest::{suggest_from_clusters, GapSuggestion};
use gapfinder::topics::vectorizer::TfIdfVectorizer;

fn abstracts() -> Vec<String> {
    [
        "Transformer language models scale with data and parameters for text generation",
        "Attention mechanisms in transformer architectures improve machine translation quality",
        "Pretrained language models transfer well to downstream text classification tasks",
        "Protein structure prediction with deep networks reaches experimental accuracy",
        "Folding simulations reveal protein dynamics and binding pocket flexibility",
        "Enzyme design uses protein sequence embeddings and structure constraints",
        "Reinforcement learning agents master board games through self play",
        "Policy gradient methods train robotic manipulation controllers in simulation",
        "Reward shaping accelerates exploration for reinforcement learning agents",
        "Graph neural networks predict molecular properties from atom bonds",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

// ============================================================
// DocumentClusterer: contract
// ============================================================

#[test]
fn cluster_returns_exactly_k_clusters() {
    let docs = abstracts();
    for k in 1..=5 {
        let clustering = DocumentClusterer::new(k).cluster(&docs).unwrap();
        assert_eq!(clustering.clusters.len(), k, "k = {k}");
        assert_eq!(clustering.assignments.len(), docs.len());
        assert!(clustering.assignments.iter().all(|&a| a < k));
    }
}

#[test]
fn each_cluster_has_five_top_terms() {
    let clustering = DocumentClusterer::new(3).cluster(&abstracts()).unwrap();
    for cluster in &clustering.clusters {
        assert_eq!(cluster.top_terms.len(), TOP_TERMS_PER_CLUSTER);
    }
}

#[test]
fn top_terms_capped_by_small_vocabulary() {
    let docs: Vec<String> = ["apple", "banana", "cherry"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let clustering = DocumentClusterer::new(3).cluster(&docs).unwrap();
    assert_eq!(clustering.clusters.len(), 3);
    for cluster in &clustering.clusters {
        assert_eq!(cluster.top_terms.len(), 3);
    }
}

#[test]
fn cluster_sizes_sum_to_document_count() {
    let docs = abstracts();
    let clustering = DocumentClusterer::new(4).cluster(&docs).unwrap();
    let total: usize = clustering.clusters.iter().map(|c| c.size).sum();
    assert_eq!(total, docs.len());
    assert_eq!(clustering.document_count(), docs.len());
}

#[test]
fn clustering_is_deterministic() {
    let docs = abstracts();
    let first = DocumentClusterer::new(4).cluster(&docs).unwrap();
    for _ in 0..5 {
        let again = DocumentClusterer::new(4).cluster(&docs).unwrap();
        assert_eq!(again, first);
    }
}

#[test]
fn cluster_indices_are_sequential() {
    let clustering = DocumentClusterer::new(5).cluster(&abstracts()).unwrap();
    let indices: Vec<usize> = clustering.clusters.iter().map(|c| c.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
}

#[test]
fn fewer_documents_than_clusters_fails() {
    let docs: Vec<String> = abstracts().into_iter().take(3).collect();
    let err = DocumentClusterer::new(5).cluster(&docs).unwrap_err();
    assert!(err.to_string().contains("Cannot cluster 3 documents into 5"), "{err}");
}

#[test]
fn zero_clusters_fails() {
    assert!(DocumentClusterer::new(0).cluster(&abstracts()).is_err());
}

#[test]
fn one_document_per_cluster_separates_everything() {
    let docs: Vec<String> = ["quantum computing qubits", "medieval poetry sonnets"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let clustering = DocumentClusterer::new(2).cluster(&docs).unwrap();
    assert_ne!(clustering.assignments[0], clustering.assignments[1]);
}

#[test]
fn top_terms_never_include_stop_words_or_ubiquitous_terms() {
    let mut docs = abstracts();
    for d in &mut docs {
        d.push_str(" study");
    }
    let clustering = DocumentClusterer::new(3).cluster(&docs).unwrap();
    for cluster in &clustering.clusters {
        assert!(!cluster.top_terms.contains(&"study".to_string()));
        assert!(!cluster.top_terms.contains(&"the".to_string()));
    }
}

// ============================================================
// Duplicate abstracts
// ============================================================

fn corpus_with_duplicates() -> Vec<String> {
    let repeated = "Protein folding simulation reveals protein dynamics";
    let mut docs: Vec<String> = std::iter::repeat_n(repeated.to_string(), 4).collect();
    docs.push("Reinforcement learning agents play board games".to_string());
    docs.push("Graph networks predict molecular properties".to_string());
    docs.push("Language models translate low resource languages".to_string());
    docs
}

#[test]
fn duplicates_never_leave_a_cluster_empty() {
    let docs = corpus_with_duplicates();
    let clustering = DocumentClusterer::new(5).cluster(&docs).unwrap();

    assert_eq!(clustering.clusters.len(), 5);
    for cluster in &clustering.clusters {
        assert!(cluster.size > 0, "cluster {} is empty", cluster.index);
    }
    let total: usize = clustering.clusters.iter().map(|c| c.size).sum();
    assert_eq!(total, docs.len());
}

#[test]
fn duplicates_do_not_make_the_dominant_theme_a_gap() {
    let clustering = DocumentClusterer::new(5).cluster(&corpus_with_duplicates()).unwrap();
    let Some(GapSuggestion::Cluster { index, .. }) = suggest_from_clusters(&clustering) else {
        panic!("expected a cluster suggestion");
    };
    let chosen = &clustering.clusters[index];
    let smallest = clustering.clusters.iter().map(|c| c.size).min().unwrap();
    assert!(chosen.size > 0);
    assert_eq!(chosen.size, smallest);
}

// ============================================================
// Non-ASCII text
// ============================================================

#[test]
fn accented_terms_survive_into_clusters() {
    let docs: Vec<String> = [
        "Schrödinger equation solvers for quantum chemistry",
        "Schrödinger bridges in diffusion models",
        "Café culture and urban sociology",
        "Naïve Bayes baselines for spam filtering",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let matrix = TfIdfVectorizer::default().fit_transform(&docs).unwrap();
    assert!(matrix.vocabulary.contains(&"schrödinger".to_string()));
    assert!(matrix.vocabulary.contains(&"café".to_string()));
    assert!(!matrix.vocabulary.contains(&"schr".to_string()));
    assert!(!matrix.vocabulary.contains(&"caf".to_string()));

    let clustering = DocumentClusterer::new(2).cluster(&docs).unwrap();
    for cluster in &clustering.clusters {
        for term in &cluster.top_terms {
            assert!(
                docs.iter().any(|d| d.to_lowercase().contains(term.as_str())),
                "{term:?} is not drawn from the corpus"
            );
        }
    }
}

#[test]
fn embedding_candidates_keep_accented_words() {
    let extractor = EmbeddingKeywordExtractor::new(ShapeEmbedder);
    let keywords = extractor.extract("Schrödinger equation and naïve Bayes", 20).unwrap();
    let phrases: Vec<&str> = keywords.iter().map(|k| k.phrase.as_str()).collect();
    assert!(phrases.contains(&"schrödinger"), "{phrases:?}");
    assert!(phrases.contains(&"naïve"), "{phrases:?}");
    for phrase in &phrases {
        assert!(!["schr", "dinger", "na", "ve"].contains(phrase), "{phrases:?}");
    }
}

// ============================================================
// TfIdfVectorizer: vocabulary ordering
// ============================================================

#[test]
fn vectorizer_vocabulary_sorted() {
    let m = TfIdfVectorizer::default().fit_transform(&abstracts()).unwrap();
    let mut sorted = m.vocabulary.clone();
    sorted.sort();
    assert_eq!(m.vocabulary, sorted);
}

// ============================================================
// Keyword extractors: edge cases
// ============================================================

/// Deterministic embedder: counts of vowels and consonants.
struct ShapeEmbedder;

impl Embedder for ShapeEmbedder {
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f64>>> {
        Ok(texts
            .iter()
            .map(|t| {
                let vowels = t.chars().filter(|c| "aeiou".contains(*c)).count() as f64;
                let other = t.chars().filter(|c| c.is_alphabetic()).count() as f64 - vowels;
                vec![vowels, other, 1.0]
            })
            .collect())
    }
}

#[test]
fn embedding_extractor_empty_text_is_empty() {
    let extractor = EmbeddingKeywordExtractor::new(ShapeEmbedder);
    assert!(extractor.extract("", 10).unwrap().is_empty());
}

#[test]
fn embedding_extractor_phrases_are_one_or_two_words() {
    let extractor = EmbeddingKeywordExtractor::new(ShapeEmbedder);
    let corpus = abstracts().join(" ");
    let keywords = extractor.extract(&corpus, 15).unwrap();
    assert_eq!(keywords.len(), 15);
    for kw in &keywords {
        let words = kw.phrase.split(' ').count();
        assert!((1..=2).contains(&words), "{:?}", kw.phrase);
    }
}

#[test]
fn embedding_extractor_top_n_zero() {
    let extractor = EmbeddingKeywordExtractor::new(ShapeEmbedder);
    assert!(extractor.extract("graph networks", 0).unwrap().is_empty());
}

#[test]
fn tfidf_extractor_returns_at_most_top_n() {
    let extractor = TfIdfKeywordExtractor::default();
    let corpus = abstracts().join(". ");
    let keywords = extractor.extract(&corpus, 12).unwrap();
    assert!(!keywords.is_empty());
    assert!(keywords.len() <= 12);
}
