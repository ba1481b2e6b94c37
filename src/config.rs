use std::env;
use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::papers::client::DEFAULT_API_URL;
use crate::topics::download;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Semantic Scholar Graph API base URL
    pub api_url: String,
    /// Optional API key, sent as `x-api-key` for higher rate limits
    pub api_key: Option<String>,
    /// Directory containing the sentence embedding model files
    pub model_dir: PathBuf,
    /// Whether cluster-level topic modeling is enabled (GAPFINDER_TOPIC_MODELING)
    pub topic_modeling: bool,
    /// Where reports and CSV exports go when no explicit path is given
    pub output_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every value has a default, so this only fails on malformed input.
    pub fn load() -> Result<Self> {
        let topic_modeling = match env::var("GAPFINDER_TOPIC_MODELING") {
            Ok(v) => parse_flag(&v)?,
            Err(_) => true,
        };

        let model_dir = env::var("GAPFINDER_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| download::default_model_dir());

        Ok(Self {
            api_url: env::var("SEMANTIC_SCHOLAR_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            api_key: env::var("SEMANTIC_SCHOLAR_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            model_dir,
            topic_modeling,
            output_dir: env::var("GAPFINDER_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("output")),
        })
    }
}

/// Parse a boolean-ish environment value.
fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!(
            "GAPFINDER_TOPIC_MODELING must be true/false (or 1/0), got {other:?}"
        ),
    }
}

/// What this installation can do, decided once at startup.
///
/// The rest of the program reads these flags instead of probing for model
/// files or settings at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// The sentence embedding model is installed, so keywords can be ranked
    /// by embedding similarity rather than plain TF-IDF.
    pub embeddings: bool,
    /// Cluster-level topic modeling is enabled.
    pub topic_modeling: bool,
}

impl Capabilities {
    pub fn detect(config: &Config) -> Self {
        let caps = Self {
            embeddings: download::embedding_files_present(&config.model_dir),
            topic_modeling: config.topic_modeling,
        };
        info!(
            embeddings = caps.embeddings,
            topic_modeling = caps.topic_modeling,
            "Detected capabilities"
        );
        caps
    }
}
