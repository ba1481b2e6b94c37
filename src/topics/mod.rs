// Topic extraction: keywords by embedding similarity (or TF-IDF), and
// TF-IDF + k-means clustering of the abstracts.

pub mod cluster;
pub mod download;
pub mod embeddings;
pub mod keybert;
pub mod tfidf;
pub mod tokenize;
pub mod traits;
pub mod vectorizer;
