use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::{info, warn};

use gapfinder::config::{Capabilities, Config};
use gapfinder::output::{export, markdown, terminal};
use gapfinder::papers::{client, upload};
use gapfinder::pipeline::analyze::{self, AnalysisOptions, AnalysisWarning};
use gapfinder::suggest::{GapSuggester, SuggestStrategy};
use gapfinder::topics::traits::KeywordExtractor;
use gapfinder::topics::{cluster, download, embeddings, keybert, tfidf};

/// gapfinder: research gap analysis from paper abstracts.
///
/// Collects abstracts for a topic, extracts the dominant keywords and
/// themes, and points at what looks underexplored.
#[derive(Parser)]
#[command(name = "gapfinder", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search Semantic Scholar for a topic and analyze the abstracts
    Search {
        /// The research topic to search for
        query: String,

        /// Max papers to fetch (default: 20)
        #[arg(long, default_value = "20")]
        limit: u32,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Analyze abstracts from a CSV file with an "abstract" column
    File {
        /// Path to the CSV file
        path: PathBuf,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Analyze a single pasted abstract or topic description
    Text {
        /// The abstract text
        text: String,

        /// Number of keywords to extract (default: 10)
        #[arg(long, default_value_t = analyze::DEFAULT_TOP_N)]
        top_n: usize,

        /// Write the keywords to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Download the sentence embedding model (~90 MB)
    DownloadModel,

    /// Show configuration and which capabilities are available
    Status,
}

#[derive(Args)]
struct AnalysisArgs {
    /// Number of topic clusters (default: 5)
    #[arg(long, default_value_t = cluster::DEFAULT_CLUSTERS)]
    clusters: usize,

    /// Number of keywords to extract (default: 10)
    #[arg(long, default_value_t = analyze::DEFAULT_TOP_N)]
    top_n: usize,

    /// Write the keywords to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Markdown report path (default: <output dir>/gapfinder-report.md)
    #[arg(long)]
    report: Option<PathBuf>,

    /// Skip clustering and only suggest gaps from keywords
    #[arg(long)]
    basic: bool,
}

impl AnalysisArgs {
    fn options(&self) -> AnalysisOptions {
        AnalysisOptions {
            top_n: self.top_n,
            clusters: self.clusters,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("gapfinder=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            query,
            limit,
            analysis,
        } => {
            let config = Config::load()?;
            let caps = Capabilities::detect(&config);
            let extractor = create_extractor(&config, &caps);
            let suggester = create_suggester(&caps, analysis.basic);

            println!("Searching Semantic Scholar for \"{query}\"...");

            let search = client::PaperSearchClient::new(&config.api_url, config.api_key.clone())?;
            let papers = search.search(&query, limit).await?;
            terminal::display_papers(&papers, 10);

            let abstracts = client::collect_abstracts(&papers);
            run_analysis(
                &abstracts,
                &format!("Semantic Scholar search: {query}"),
                extractor.as_ref(),
                &suggester,
                &analysis,
                &config,
            )?;
        }

        Commands::File { path, analysis } => {
            let config = Config::load()?;

            // Validate the upload before loading any models
            let abstracts = upload::read_abstracts(&path)?;
            println!(
                "Loaded {} abstracts from {}",
                abstracts.len(),
                path.display()
            );

            let caps = Capabilities::detect(&config);
            let extractor = create_extractor(&config, &caps);
            let suggester = create_suggester(&caps, analysis.basic);

            run_analysis(
                &abstracts,
                &format!("Uploaded file: {}", path.display()),
                extractor.as_ref(),
                &suggester,
                &analysis,
                &config,
            )?;
        }

        Commands::Text { text, top_n, csv } => {
            let config = Config::load()?;
            let caps = Capabilities::detect(&config);
            let extractor = create_extractor(&config, &caps);
            // A single abstract cannot be clustered
            let suggester = GapSuggester::new(SuggestStrategy::Basic);

            println!("Extracting key terms...");

            let documents: Vec<String> = if text.trim().is_empty() {
                Vec::new()
            } else {
                vec![text]
            };
            let options = AnalysisOptions {
                top_n,
                ..AnalysisOptions::default()
            };
            let result = analyze::analyze(&documents, extractor.as_ref(), &suggester, options)?;
            terminal::display_analysis(&result);

            if let Some(path) = csv {
                export_csv(&path, &result)?;
            }
        }

        Commands::DownloadModel => {
            let config = Config::load()?;
            let model_dir = &config.model_dir;

            println!("Downloading ONNX models...");
            println!("  Destination: {}", model_dir.display());

            download::download_model(model_dir).await?;

            println!("\n{}", "Model downloaded successfully.".bold());
            println!("Keywords will now be ranked by embedding similarity.");
        }

        Commands::Status => {
            let config = Config::load()?;
            let caps = Capabilities::detect(&config);

            println!("\n{}", "=== gapfinder status ===".bold());
            println!("  API endpoint:     {}", config.api_url);
            println!(
                "  API key:          {}",
                if config.api_key.is_some() {
                    "set".green()
                } else {
                    "not set (shared rate limit)".dimmed()
                }
            );
            println!("  Model directory:  {}", config.model_dir.display());
            println!(
                "  Keyword ranking:  {}",
                if caps.embeddings {
                    "embedding similarity".green()
                } else {
                    "tf-idf (run `gapfinder download-model` for embeddings)".yellow()
                }
            );
            println!(
                "  Topic modeling:   {}",
                if caps.topic_modeling {
                    "enabled".green()
                } else {
                    "disabled".yellow()
                }
            );
            println!("  Output directory: {}", config.output_dir.display());
        }
    }

    Ok(())
}

/// Build the keyword extractor once, from the detected capabilities.
///
/// Falls back to TF-IDF if the embedding model is missing or fails to load.
fn create_extractor(config: &Config, caps: &Capabilities) -> Box<dyn KeywordExtractor> {
    if caps.embeddings {
        let embed_dir = download::embedding_model_dir(&config.model_dir);
        match embeddings::SentenceEmbedder::load(&embed_dir) {
            Ok(embedder) => {
                info!("Using embedding-similarity keyword extractor");
                return Box::new(keybert::EmbeddingKeywordExtractor::new(embedder));
            }
            Err(e) => {
                warn!("Failed to load embedding model, falling back to TF-IDF: {e}");
            }
        }
    }
    info!("Using TF-IDF keyword extractor");
    Box::new(tfidf::TfIdfKeywordExtractor::default())
}

/// Choose the suggestion strategy once, from capabilities and the CLI flag.
fn create_suggester(caps: &Capabilities, force_basic: bool) -> GapSuggester {
    if caps.topic_modeling && !force_basic {
        GapSuggester::new(SuggestStrategy::Full)
    } else {
        GapSuggester::new(SuggestStrategy::Basic)
    }
}

/// Analyze, display, and write the report (and CSV if requested).
fn run_analysis(
    abstracts: &[String],
    source: &str,
    extractor: &dyn KeywordExtractor,
    suggester: &GapSuggester,
    args: &AnalysisArgs,
    config: &Config,
) -> Result<()> {
    println!("Analyzing {} abstracts...", abstracts.len());

    let result = analyze::analyze(abstracts, extractor, suggester, args.options())?;
    terminal::display_analysis(&result);

    if result.warnings.contains(&AnalysisWarning::NoAbstracts) {
        return Ok(());
    }

    if let Some(path) = &args.csv {
        export_csv(path, &result)?;
    }

    let report_path = args
        .report
        .clone()
        .unwrap_or_else(|| config.output_dir.join("gapfinder-report.md"));
    let written = markdown::generate_report(&result, source, extractor.name(), &report_path)?;
    println!(
        "\n{}",
        format!("Markdown report saved to: {written}").bold()
    );

    Ok(())
}

fn export_csv(path: &Path, result: &analyze::Analysis) -> Result<()> {
    export::export_keywords(path, &result.keywords)?;
    println!(
        "{}",
        format!(
            "Keyword CSV saved to: {} ({} rows)",
            path.display(),
            result.keywords.len()
        )
        .bold()
    );
    Ok(())
}
