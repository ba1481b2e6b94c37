// One analysis over a set of abstracts.
//
// Keyword extraction runs on the concatenated corpus; clustering runs on
// the individual abstracts. The two are independent. Conditions like "no
// abstracts" or "too few keywords" are reported as warnings on the result
// rather than errors, so the caller can show them and stop cleanly.

use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::suggest::{GapSuggester, GapSuggestion, SuggestStrategy, MIN_KEYWORDS};
use crate::topics::cluster::{Clustering, DocumentClusterer, DEFAULT_CLUSTERS};
use crate::topics::traits::{Keyword, KeywordExtractor};

/// Default number of keywords to extract.
pub const DEFAULT_TOP_N: usize = 10;

/// Tunables for a single analysis.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisOptions {
    pub top_n: usize,
    pub clusters: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            clusters: DEFAULT_CLUSTERS,
        }
    }
}

/// Non-fatal conditions that cut an analysis short.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisWarning {
    NoAbstracts,
    NoKeywords,
    TooFewDocuments { documents: usize, clusters: usize },
    InsufficientKeywords { found: usize },
    ClusteringFailed { reason: String },
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisWarning::NoAbstracts => write!(f, "No abstracts found."),
            AnalysisWarning::NoKeywords => write!(f, "No keywords could be extracted."),
            AnalysisWarning::TooFewDocuments {
                documents,
                clusters,
            } => write!(
                f,
                "Only {documents} abstracts, too few for {clusters} clusters; skipping clustering."
            ),
            AnalysisWarning::InsufficientKeywords { found } => write!(
                f,
                "Only {found} keywords (need {MIN_KEYWORDS}); not enough to infer a gap. Try a longer abstract."
            ),
            AnalysisWarning::ClusteringFailed { reason } => {
                write!(f, "Clustering skipped: {reason}")
            }
        }
    }
}

/// Everything one analysis produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub document_count: usize,
    pub keywords: Vec<Keyword>,
    pub clustering: Option<Clustering>,
    pub suggestions: Vec<GapSuggestion>,
    pub warnings: Vec<AnalysisWarning>,
}

impl Analysis {
    fn empty(document_count: usize, warning: AnalysisWarning) -> Self {
        Self {
            document_count,
            keywords: Vec::new(),
            clustering: None,
            suggestions: Vec::new(),
            warnings: vec![warning],
        }
    }
}

/// Run the analysis over `documents`.
///
/// Errors only come from the keyword extractor failing outright; empty
/// inputs and clustering problems become warnings.
pub fn analyze(
    documents: &[String],
    extractor: &dyn KeywordExtractor,
    suggester: &GapSuggester,
    options: AnalysisOptions,
) -> Result<Analysis> {
    if documents.is_empty() {
        warn!("No abstracts to analyze");
        return Ok(Analysis::empty(0, AnalysisWarning::NoAbstracts));
    }

    let corpus = documents.join(" ");
    let keywords = extractor.extract(&corpus, options.top_n)?;

    info!(
        documents = documents.len(),
        keywords = keywords.len(),
        extractor = extractor.name(),
        "Extracted keywords"
    );

    let mut warnings = Vec::new();

    if keywords.is_empty() {
        warnings.push(AnalysisWarning::NoKeywords);
    }

    let clustering = if suggester.strategy == SuggestStrategy::Full {
        if documents.len() < options.clusters || options.clusters == 0 {
            warnings.push(AnalysisWarning::TooFewDocuments {
                documents: documents.len(),
                clusters: options.clusters,
            });
            None
        } else {
            match DocumentClusterer::new(options.clusters).cluster(documents) {
                Ok(clustering) => Some(clustering),
                Err(e) => {
                    warn!(error = %e, "Clustering failed");
                    warnings.push(AnalysisWarning::ClusteringFailed {
                        reason: e.to_string(),
                    });
                    None
                }
            }
        }
    } else {
        None
    };

    let suggestions = if keywords.is_empty() {
        Vec::new()
    } else {
        suggester.suggest(&keywords, clustering.as_ref())
    };

    if suggestions.contains(&GapSuggestion::InsufficientData) {
        warnings.push(AnalysisWarning::InsufficientKeywords {
            found: keywords.len(),
        });
    }

    Ok(Analysis {
        document_count: documents.len(),
        keywords,
        clustering,
        suggestions,
        warnings,
    })
}
