// Keyword CSV export and re-import.
//
// Two columns, `Keyword` and `Score`. Scores are written with the shortest
// representation that parses back to the same f64, so an exported file
// reads back to identical keywords.

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::topics::traits::Keyword;

#[derive(Debug, Serialize, Deserialize)]
struct KeywordRow {
    #[serde(rename = "Keyword")]
    keyword: String,
    #[serde(rename = "Score")]
    score: f64,
}

/// Write keywords as CSV to any writer.
pub fn write_keywords<W: Write>(writer: W, keywords: &[Keyword]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if keywords.is_empty() {
        // serde only emits headers alongside the first record
        wtr.write_record(["Keyword", "Score"])
            .context("Failed to write CSV header")?;
    }
    for kw in keywords {
        wtr.serialize(KeywordRow {
            keyword: kw.phrase.clone(),
            score: kw.score,
        })
        .context("Failed to write CSV row")?;
    }
    wtr.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Read keywords back from CSV.
pub fn read_keywords<R: Read>(reader: R) -> Result<Vec<Keyword>> {
    let mut rdr = csv::Reader::from_reader(reader);
    rdr.deserialize::<KeywordRow>()
        .map(|row| {
            let row = row.context("Malformed keyword CSV row")?;
            Ok(Keyword::new(row.keyword, row.score))
        })
        .collect()
}

/// Write keywords to a CSV file, creating parent directories as needed.
pub fn export_keywords(path: &Path, keywords: &[Keyword]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_keywords(file, keywords)?;

    info!(path = %path.display(), rows = keywords.len(), "Exported keyword CSV");
    Ok(())
}
