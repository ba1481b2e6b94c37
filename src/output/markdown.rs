// Markdown report generation.
//
// Writes a self-contained report with the keyword table, the clusters,
// the suggested gaps, and any warnings. Plain markdown renders on GitHub
// and converts to PDF with any off-the-shelf tool.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use crate::pipeline::analyze::Analysis;
use crate::suggest::{keyword_gap_text, GapSuggestion};

/// Render an analysis as a markdown document.
///
/// `source` describes where the abstracts came from (query, file name, ...).
pub fn render_report(analysis: &Analysis, source: &str, extractor: &str) -> String {
    let mut md = String::from("# Research Gap Report\n\n");

    md.push_str(&format!("- **Source:** {}\n", escape_cell(source)));
    md.push_str(&format!(
        "- **Abstracts analyzed:** {}\n",
        analysis.document_count
    ));
    md.push_str(&format!("- **Keyword extractor:** {extractor}\n"));
    md.push_str(&format!(
        "- **Generated:** {}\n\n",
        Utc::now().format("%Y-%m-%d %H:%M UTC")
    ));

    md.push_str("## Top Keywords\n\n");
    if analysis.keywords.is_empty() {
        md.push_str("_No keywords extracted._\n\n");
    } else {
        md.push_str("| # | Keyword | Score |\n|---|---------|-------|\n");
        for (i, kw) in analysis.keywords.iter().enumerate() {
            md.push_str(&format!(
                "| {} | {} | {:.4} |\n",
                i + 1,
                escape_cell(&kw.phrase),
                kw.score
            ));
        }
        md.push('\n');
    }

    if let Some(clustering) = &analysis.clustering {
        md.push_str("## Topic Clusters\n\n");
        md.push_str("| Cluster | Abstracts | Top terms |\n|---------|-----------|-----------|\n");
        for cluster in &clustering.clusters {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                cluster.index + 1,
                cluster.size,
                escape_cell(&cluster.top_terms.join(", "))
            ));
        }
        md.push('\n');
    }

    md.push_str("## Suggested Research Gaps\n\n");
    let gaps: Vec<String> = analysis
        .suggestions
        .iter()
        .filter_map(|suggestion| match suggestion {
            GapSuggestion::Keywords { strong, weak, .. } => Some(keyword_gap_text(
                &format!("**{strong}**"),
                &format!("**{weak}**"),
            )),
            GapSuggestion::Cluster { text, .. } => Some(text.clone()),
            GapSuggestion::InsufficientData => None,
        })
        .collect();
    if gaps.is_empty() {
        md.push_str(
            "- Not enough keywords to infer a gap. Try a longer abstract or a broader query.\n",
        );
    }
    for gap in gaps {
        md.push_str(&format!("- {gap}\n"));
    }

    if !analysis.warnings.is_empty() {
        md.push_str("\n## Warnings\n\n");
        for warning in &analysis.warnings {
            md.push_str(&format!("- {warning}\n"));
        }
    }

    md
}

/// Write the report to `path`, creating parent directories as needed.
/// Returns the path as a display string.
pub fn generate_report(
    analysis: &Analysis,
    source: &str,
    extractor: &str,
    path: &Path,
) -> Result<String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let md = render_report(analysis, source, extractor);
    std::fs::write(path, md)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    info!(path = %path.display(), "Wrote markdown report");
    Ok(path.display().to_string())
}

/// Keep table cells on one line and stop pipes from splitting columns.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::analyze::AnalysisWarning;
    use crate::topics::traits::Keyword;

    fn analysis() -> Analysis {
        Analysis {
            document_count: 3,
            keywords: vec![
                Keyword::new("transformers", 0.61),
                Keyword::new("attention", 0.52),
                Keyword::new("pruning", 0.20),
            ],
            clustering: None,
            suggestions: vec![crate::suggest::suggest_from_keywords(&[
                Keyword::new("transformers", 0.61),
                Keyword::new("attention", 0.52),
                Keyword::new("pruning", 0.20),
            ])],
            warnings: vec![],
        }
    }

    #[test]
    fn test_report_contains_keywords_and_gap() {
        let md = render_report(&analysis(), "transformer models", "tf-idf");
        assert!(md.contains("| 1 | transformers | 0.6100 |"));
        assert!(md.contains("**pruning** appears underexplored"));
        assert!(md.contains(
            "between **transformers** and **pruning** as a novel direction in your field."
        ));
        assert!(md.contains("transformer models"));
        assert!(!md.contains("## Warnings"));
    }

    #[test]
    fn test_report_lists_warnings() {
        let mut a = analysis();
        a.warnings.push(AnalysisWarning::NoKeywords);
        let md = render_report(&a, "q", "tf-idf");
        assert!(md.contains("## Warnings"));
        assert!(md.contains("No keywords could be extracted."));
    }

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("a|b\nc"), "a\\|b c");
    }
}
