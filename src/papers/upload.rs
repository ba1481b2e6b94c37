// CSV upload of abstracts.
//
// The file must have a header row containing a column named exactly
// `abstract`. A missing column is an error raised before any row is read,
// so nothing downstream ever sees a partial corpus.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

/// Name of the required column.
pub const ABSTRACT_COLUMN: &str = "abstract";

/// Read abstracts from a CSV file on disk.
pub fn read_abstracts(path: &Path) -> Result<Vec<String>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let abstracts = read_abstracts_from(file)
        .with_context(|| format!("Failed to read abstracts from {}", path.display()))?;

    info!(
        path = %path.display(),
        abstracts = abstracts.len(),
        "Loaded uploaded abstracts"
    );
    Ok(abstracts)
}

/// Read abstracts from any CSV source. Blank cells are skipped.
pub fn read_abstracts_from<R: Read>(source: R) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(source);

    let headers = reader.headers().context("CSV has no header row")?.clone();
    let column = headers
        .iter()
        .position(|h| h == ABSTRACT_COLUMN)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Uploaded CSV must contain an \"{}\" column (found: {})",
                ABSTRACT_COLUMN,
                headers.iter().collect::<Vec<_>>().join(", ")
            )
        })?;

    let mut abstracts = Vec::new();
    for (row, record) in reader.records().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let record = record.with_context(|| format!("Malformed CSV row {}", row + 2))?;
        if let Some(text) = record.get(column).map(str::trim) {
            if !text.is_empty() {
                abstracts.push(text.to_string());
            }
        }
    }

    Ok(abstracts)
}
