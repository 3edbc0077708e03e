use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use super::RowBatch;

/// Parse a single part file. First row is the header; an empty cell is a
/// NULL, not an empty string.
pub fn load_part(path: &Path) -> Result<RowBatch> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    let columns: Vec<String> = reader
        .headers()
        .with_context(|| format!("reading header of {}", path.display()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("reading {}", path.display()))?;
        rows.push(
            record
                .iter()
                .map(|cell| {
                    if cell.is_empty() {
                        None
                    } else {
                        Some(cell.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(RowBatch { columns, rows })
}

/// Load every selected part file into one batch. The first file fixes the
/// column set; a later file whose header disagrees fails the run rather
/// than silently misaligning columns. Namespace prefixes are stripped from
/// the combined header at the end, and an empty selection yields an empty
/// batch.
#[instrument(level = "debug", skip(paths), fields(files = paths.len()))]
pub fn load_batch(paths: &[PathBuf]) -> Result<RowBatch> {
    let mut batch = RowBatch::empty();
    for path in paths {
        let part = load_part(path)?;
        debug!(file = %path.display(), rows = part.rows.len(), "loaded part file");
        if batch.columns.is_empty() {
            batch = part;
        } else if part.columns != batch.columns {
            bail!(
                "{} header does not match the first part file",
                path.display()
            );
        } else {
            batch.rows.extend(part.rows);
        }
    }
    batch.strip_column_prefixes();
    Ok(batch)
}
