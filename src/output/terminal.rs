// Colored terminal output for analyses.
//
// Handles all terminal-specific formatting: colors, bars, tables. The
// main.rs command handlers delegate here.

use colored::Colorize;

use crate::papers::client::Paper;
use crate::pipeline::analyze::{Analysis, AnalysisWarning};
use crate::suggest::{keyword_gap_text, GapSuggestion};
use crate::topics::cluster::Clustering;
use crate::topics::traits::Keyword;

/// Width of the keyword cloud bars, in characters.
const CLOUD_WIDTH: usize = 30;

/// Show the titles of the fetched papers.
pub fn display_papers(papers: &[Paper], shown: usize) {
    let with_abstract = papers.iter().filter(|p| p.abstract_text().is_some()).count();
    println!(
        "\n{}",
        format!(
            "=== Papers ({} fetched, {} with abstracts) ===",
            papers.len(),
            with_abstract
        )
        .bold()
    );

    for (i, paper) in papers.iter().take(shown).enumerate() {
        let title = paper.title.as_deref().unwrap_or("(untitled)");
        let marker = if paper.abstract_text().is_some() {
            " ".normal()
        } else {
            "-".dimmed()
        };
        println!("  {:>3}. {} {}", i + 1, marker, super::truncate_chars(title, 90));
    }
    if papers.len() > shown {
        println!("  {}", format!("... and {} more", papers.len() - shown).dimmed());
    }
}

/// Display the ranked keyword list.
pub fn display_keywords(keywords: &[Keyword]) {
    println!("\n{}", "=== Top Keywords ===".bold());
    println!();
    for (i, kw) in keywords.iter().enumerate() {
        println!(
            "  {:>2}. {:<40} {}",
            i + 1,
            kw.phrase.bold(),
            format!("({:.2})", kw.score).dimmed()
        );
    }
}

/// Display the keywords as a horizontal bar chart scaled to the top score.
pub fn display_keyword_cloud(keywords: &[Keyword]) {
    let Some(max) = keywords.iter().map(|k| k.score).reduce(f64::max) else {
        return;
    };

    println!("\n{}", "=== Keyword Cloud ===".bold());
    println!();

    for kw in keywords {
        let filled = cloud_bar_len(kw.score, max, CLOUD_WIDTH);
        let bar = "#".repeat(filled);
        let share = if max > 0.0 { kw.score / max } else { 0.0 };
        let colored_bar = if share >= 0.75 {
            bar.bright_green()
        } else if share >= 0.5 {
            bar.bright_yellow()
        } else {
            bar.bright_blue()
        };
        println!("  {:>30} {}", kw.phrase, colored_bar);
    }
}

/// Bar length for a score relative to the maximum. Non-positive scores
/// still get one cell so every keyword is visible.
pub fn cloud_bar_len(score: f64, max: f64, width: usize) -> usize {
    if max <= 0.0 || score <= 0.0 {
        return 1;
    }
    ((score / max) * width as f64).round().clamp(1.0, width as f64) as usize
}

/// Display the clusters and their top terms.
pub fn display_clusters(clustering: &Clustering) {
    println!(
        "\n{}",
        format!(
            "=== Topic Clusters ({} abstracts) ===",
            clustering.document_count()
        )
        .bold()
    );
    println!();

    for cluster in &clustering.clusters {
        println!(
            "  Cluster {:>2} {}  {}",
            cluster.index + 1,
            format!("[{} abstracts]", cluster.size).dimmed(),
            cluster.top_terms.join(", ")
        );
    }
}

/// Display the gap suggestions.
pub fn display_suggestions(suggestions: &[GapSuggestion]) {
    if suggestions.is_empty() {
        return;
    }

    println!("\n{}", "=== Suggested Research Gaps ===".bold());
    println!();

    for suggestion in suggestions {
        match suggestion {
            GapSuggestion::Keywords { strong, weak, .. } => println!(
                "  - {}",
                keyword_gap_text(
                    &strong.green().bold().to_string(),
                    &weak.yellow().bold().to_string()
                )
            ),
            GapSuggestion::Cluster { text, .. } => println!("  - {text}"),
            GapSuggestion::InsufficientData => println!(
                "  - {}",
                "Not enough keywords to infer a gap. Try a longer abstract.".dimmed()
            ),
        }
    }
}

/// Display warnings in yellow.
pub fn display_warnings(warnings: &[AnalysisWarning]) {
    for warning in warnings {
        println!("{} {}", "Warning:".yellow(), warning);
    }
}

/// Display everything an analysis produced.
pub fn display_analysis(analysis: &Analysis) {
    if !analysis.keywords.is_empty() {
        display_keywords(&analysis.keywords);
        display_keyword_cloud(&analysis.keywords);
    }
    if let Some(clustering) = &analysis.clustering {
        display_clusters(clustering);
    }
    display_suggestions(&analysis.suggestions);
    if !analysis.warnings.is_empty() {
        println!();
        display_warnings(&analysis.warnings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cloud_bar_len_scales_to_width() {
        assert_eq!(cloud_bar_len(1.0, 1.0, 30), 30);
        assert_eq!(cloud_bar_len(0.5, 1.0, 30), 15);
    }

    #[test]
    fn test_cloud_bar_len_minimum_one() {
        assert_eq!(cloud_bar_len(0.001, 1.0, 30), 1);
        assert_eq!(cloud_bar_len(-0.2, 1.0, 30), 1);
        assert_eq!(cloud_bar_len(0.3, 0.0, 30), 1);
    }
}
