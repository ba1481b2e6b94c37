// HTTP client for the Semantic Scholar paper search API.
//
// Issues a single `paper/search` query asking only for titles and abstracts.
// There is no pagination and no retry: a failed request is reported to the
// user verbatim and they can simply run the command again.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

/// Default Semantic Scholar Graph API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.semanticscholar.org/graph/v1";

/// Fields requested from the search endpoint.
const SEARCH_FIELDS: &str = "title,abstract";

/// A single paper from the search response.
///
/// Semantic Scholar returns `null` for abstracts it cannot redistribute,
/// so both fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct Paper {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "abstract", default)]
    pub abstract_text: Option<String>,
}

impl Paper {
    /// The abstract, if present and not blank.
    pub fn abstract_text(&self) -> Option<&str> {
        self.abstract_text
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }
}

/// Response from the `paper/search` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub data: Vec<Paper>,
}

/// Client for the Semantic Scholar search API.
pub struct PaperSearchClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl PaperSearchClient {
    /// Create a new client pointing at the given base URL.
    ///
    /// Pass a different URL for testing against a mock server.
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("gapfinder/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Search for papers matching `query`, returning at most `limit` results.
    ///
    /// A non-success status is a hard failure that carries the raw body.
    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<Paper>> {
        let url = format!("{}/paper/search", self.base_url);

        debug!(query = query, limit = limit, "Paper search request");

        let mut request = self.client.get(&url).query(&[
            ("query", query),
            ("limit", &limit.to_string()),
            ("fields", SEARCH_FIELDS),
        ]);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request
            .send()
            .await
            .context("Semantic Scholar API request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Semantic Scholar API returned {}: {}", status, body);
        }

        let parsed = response
            .json::<SearchResponse>()
            .await
            .context("Failed to parse Semantic Scholar response")?;

        info!(
            returned = parsed.data.len(),
            total = parsed.total.unwrap_or(0),
            "Paper search complete"
        );

        Ok(parsed.data)
    }
}

/// Pull the non-blank abstracts out of a list of papers, in order.
pub fn collect_abstracts(papers: &[Paper]) -> Vec<String> {
    papers
        .iter()
        .filter_map(|p| p.abstract_text().map(str::to_string))
        .collect()
}
