// Document clustering: TF-IDF vectors partitioned with seeded k-means.
//
// The clusterer vectorizes the abstracts, runs linfa's k-means (k-means++
// init) from a fixed RNG seed, and labels each cluster by the terms with the
// highest mean weight among its members. Same input and seed always produce
// the same assignments.
//
// Duplicate abstracts can leave a cluster with no members. Such a cluster
// takes over the point farthest from its own centroid, so every cluster
// reported has at least one abstract.

use std::cmp::Ordering;

use anyhow::Result;
use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use linfa_clustering::KMeans;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::vectorizer::{TfIdfMatrix, TfIdfVectorizer};

/// Default number of clusters.
pub const DEFAULT_CLUSTERS: usize = 5;
/// Terms reported per cluster.
pub const TOP_TERMS_PER_CLUSTER: usize = 5;
/// Fixed seed for reproducible clusterings.
pub const DEFAULT_SEED: u64 = 42;
/// Lloyd iterations per run.
const MAX_ITERATIONS: u64 = 300;
/// Convergence tolerance on centroid movement.
const TOLERANCE: f64 = 1e-4;
/// Independent k-means++ restarts; the lowest-inertia run wins.
const N_RUNS: usize = 10;

/// One cluster of documents, labelled by its strongest terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Zero-based cluster index
    pub index: usize,
    /// Highest-weighted centroid terms, strongest first
    pub top_terms: Vec<String>,
    /// Number of documents assigned to this cluster
    pub size: usize,
}

/// The result of clustering a document set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clustering {
    /// Exactly k clusters, in index order
    pub clusters: Vec<Cluster>,
    /// Cluster index for each input document, in input order
    pub assignments: Vec<usize>,
}

impl Clustering {
    pub fn document_count(&self) -> usize {
        self.assignments.len()
    }
}

/// Indices of the `n` largest weights, strongest first; equal weights
/// keep ascending index order.
pub fn top_indices(weights: &[f64], n: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by(|&a, &b| {
        weights[b]
            .partial_cmp(&weights[a])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });
    order.truncate(n);
    order
}

/// TF-IDF + k-means document clusterer.
#[derive(Debug, Clone)]
pub struct DocumentClusterer {
    pub k: usize,
    pub seed: u64,
    pub top_terms: usize,
    pub vectorizer: TfIdfVectorizer,
}

impl Default for DocumentClusterer {
    fn default() -> Self {
        Self::new(DEFAULT_CLUSTERS)
    }
}

impl DocumentClusterer {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            seed: DEFAULT_SEED,
            top_terms: TOP_TERMS_PER_CLUSTER,
            vectorizer: TfIdfVectorizer::default(),
        }
    }

    /// Cluster `documents` into `k` groups.
    ///
    /// Fails when there are fewer documents than clusters; callers that want
    /// a softer outcome should check first.
    pub fn cluster(&self, documents: &[String]) -> Result<Clustering> {
        if self.k == 0 {
            anyhow::bail!("Cluster count must be at least 1");
        }
        if documents.len() < self.k {
            anyhow::bail!(
                "Cannot cluster {} documents into {} clusters; need at least as many documents as clusters",
                documents.len(),
                self.k
            );
        }

        let matrix = self.vectorizer.fit_transform(documents)?;

        let dataset = DatasetBase::from(matrix.weights.clone());
        let model = KMeans::params_with_rng(self.k, StdRng::seed_from_u64(self.seed))
            .max_n_iterations(MAX_ITERATIONS)
            .tolerance(TOLERANCE)
            .n_runs(N_RUNS)
            .fit(&dataset)
            .map_err(|e| anyhow::anyhow!("K-means fit failed: {e}"))?;

        let labels: Array1<usize> = model.predict(&matrix.weights);
        let mut assignments = labels.to_vec();
        let moved = fill_empty_clusters(&matrix.weights, model.centroids(), &mut assignments);
        if moved > 0 {
            debug!(moved = moved, "Reassigned abstracts to empty clusters");
        }

        let clustering = self.label(&matrix, assignments);

        info!(
            documents = documents.len(),
            clusters = clustering.clusters.len(),
            terms = matrix.n_terms(),
            "Clustered abstracts"
        );

        Ok(clustering)
    }

    fn label(&self, matrix: &TfIdfMatrix, assignments: Vec<usize>) -> Clustering {
        let clusters = (0..self.k)
            .map(|index| {
                let members: Vec<usize> = assignments
                    .iter()
                    .enumerate()
                    .filter(|&(_, &a)| a == index)
                    .map(|(d, _)| d)
                    .collect();
                let centroid = matrix
                    .weights
                    .select(Axis(0), &members)
                    .mean_axis(Axis(0))
                    .map(|c| c.to_vec())
                    .unwrap_or_default();

                Cluster {
                    index,
                    top_terms: top_indices(&centroid, self.top_terms)
                        .into_iter()
                        .map(|t| matrix.vocabulary[t].clone())
                        .collect(),
                    size: members.len(),
                }
            })
            .collect();

        Clustering {
            clusters,
            assignments,
        }
    }
}

/// Give every empty cluster one member: the point farthest from its current
/// centroid, taken only from clusters that have more than one member. Ties
/// go to the lowest point index. Returns how many points moved.
///
/// With at least as many points as clusters there is always a donor, so
/// afterwards no cluster is empty.
fn fill_empty_clusters(
    points: &Array2<f64>,
    centroids: &Array2<f64>,
    assignments: &mut [usize],
) -> usize {
    let k = centroids.nrows();
    let mut sizes = vec![0usize; k];
    for &a in assignments.iter() {
        sizes[a] += 1;
    }

    let distances: Vec<f64> = points
        .rows()
        .into_iter()
        .zip(assignments.iter())
        .map(|(p, &a)| squared_distance(p, centroids.row(a)))
        .collect();

    let mut moved = 0;
    for empty in 0..k {
        if sizes[empty] > 0 {
            continue;
        }
        let donor = (0..assignments.len())
            .filter(|&i| sizes[assignments[i]] > 1)
            .fold(None, |best: Option<usize>, i| match best {
                Some(b) if distances[b] >= distances[i] => Some(b),
                _ => Some(i),
            });
        let Some(point) = donor else {
            break;
        };
        sizes[assignments[point]] -= 1;
        sizes[empty] = 1;
        assignments[point] = empty;
        moved += 1;
    }

    moved
}

fn squared_distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}
