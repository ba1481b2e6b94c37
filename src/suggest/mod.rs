// Research gap suggestions.
//
// The suggestion is a template, not an inference: the strongest keyword is
// the first in the ranked list and the weakest is the last. The full
// strategy adds a sentence about the smallest cluster of abstracts.

use serde::{Deserialize, Serialize};

use crate::topics::cluster::Clustering;
use crate::topics::traits::Keyword;

/// Fewest keywords needed before a gap is suggested.
pub const MIN_KEYWORDS: usize = 3;

/// Which suggestions to produce, decided once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuggestStrategy {
    /// Keyword-based suggestion plus a cluster-based one when clusters exist
    Full,
    /// Keyword-based suggestion only
    Basic,
}

/// One suggested research gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GapSuggestion {
    /// Names the strongest and weakest keyword phrases.
    Keywords {
        strong: String,
        weak: String,
        text: String,
    },
    /// Names one cluster's terms.
    Cluster {
        index: usize,
        terms: Vec<String>,
        text: String,
    },
    /// Too few keywords to say anything.
    InsufficientData,
}

impl GapSuggestion {
    /// The sentence shown to the user, if there is one.
    pub fn text(&self) -> Option<&str> {
        match self {
            GapSuggestion::Keywords { text, .. } | GapSuggestion::Cluster { text, .. } => {
                Some(text)
            }
            GapSuggestion::InsufficientData => None,
        }
    }
}

/// Keyword-based gap sentence.
///
/// Needs at least three keywords. The weak phrase is the last one in the
/// list that differs from the strong phrase, so two distinct phrases are
/// named whenever the list has two.
pub fn suggest_from_keywords(keywords: &[Keyword]) -> GapSuggestion {
    if keywords.len() < MIN_KEYWORDS {
        return GapSuggestion::InsufficientData;
    }

    let strong = &keywords[0].phrase;
    let weak = keywords
        .iter()
        .rev()
        .map(|k| &k.phrase)
        .find(|p| *p != strong)
        .unwrap_or(&keywords[keywords.len() - 1].phrase);

    GapSuggestion::Keywords {
        strong: strong.clone(),
        weak: weak.clone(),
        text: keyword_gap_text(strong, weak),
    }
}

/// The keyword gap sentence. Callers that highlight terms (terminal colors,
/// markdown bold) pass the already-decorated phrases.
pub fn keyword_gap_text(strong: &str, weak: &str) -> String {
    format!(
        "While {strong} is well-represented, {weak} appears underexplored. \
         Consider exploring the relationship between {strong} and {weak} \
         as a novel direction in your field."
    )
}

/// Cluster-based gap sentence: the cluster with the fewest abstracts.
///
/// Ties go to the lowest cluster index. Clusters without abstracts are
/// ignored. Returns `None` when there are no populated clusters.
pub fn suggest_from_clusters(clustering: &Clustering) -> Option<GapSuggestion> {
    let smallest = clustering
        .clusters
        .iter()
        .filter(|c| c.size > 0)
        .min_by(|a, b| a.size.cmp(&b.size).then(a.index.cmp(&b.index)))?;

    if smallest.top_terms.is_empty() {
        return None;
    }

    let terms = smallest.top_terms.join(", ");
    Some(GapSuggestion::Cluster {
        index: smallest.index,
        terms: smallest.top_terms.clone(),
        text: format!(
            "Cluster {} ({terms}) covers only {} of {} abstracts; these themes look underexplored.",
            smallest.index + 1,
            smallest.size,
            clustering.document_count()
        ),
    })
}

/// Produces gap suggestions according to a fixed strategy.
#[derive(Debug, Clone, Copy)]
pub struct GapSuggester {
    pub strategy: SuggestStrategy,
}

impl GapSuggester {
    pub fn new(strategy: SuggestStrategy) -> Self {
        Self { strategy }
    }

    /// The keyword suggestion comes first; the full strategy appends a
    /// cluster suggestion when a clustering is available.
    pub fn suggest(
        &self,
        keywords: &[Keyword],
        clustering: Option<&Clustering>,
    ) -> Vec<GapSuggestion> {
        let mut suggestions = vec![suggest_from_keywords(keywords)];

        if self.strategy == SuggestStrategy::Full {
            if let Some(cluster_gap) = clustering.and_then(suggest_from_clusters) {
                suggestions.push(cluster_gap);
            }
        }

        suggestions
    }
}
