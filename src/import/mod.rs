use chrono::NaiveDate;
use std::path::Path;
use thiserror::Error;
use tracing::{info, instrument};

use crate::batch::load::load_batch;
use crate::config::DbConfig;
use crate::dataset::Dataset;
use crate::db;
use crate::discover;

/// How a run ended when nothing went wrong. Schedulers branch on this
/// instead of scraping log text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportOutcome {
    Imported { table: String, rows: u64 },
    NothingToImport { table: String },
}

/// Everything that can sink a run, tagged by stage so callers can tell a
/// rejected identifier from a database failure.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("table {name} is not in the import allow-list")]
    InvalidDataset { name: String },

    #[error("part file discovery failed: {reason}")]
    Discover { reason: String },

    #[error("could not load part files: {reason}")]
    Parse { reason: String },

    #[error("row batch for {table} has no id column")]
    MissingIdColumn { table: String },

    #[error("upsert into {table} failed: {reason}")]
    Write { table: String, reason: String },
}

pub type ImportResult<T> = std::result::Result<T, ImportError>;

/// Run the whole import for one dataset and one extract date: discover the
/// part files, normalize them into a batch, and upsert the batch. The
/// identifier is checked against the allow-list before any file or
/// database access; an empty match set short-circuits before a connection
/// is ever opened.
#[instrument(level = "info", skip(data_root, db_config), fields(date = %date.format("%Y%m%d")))]
pub async fn run(
    table: &str,
    date: NaiveDate,
    data_root: &Path,
    db_config: &DbConfig,
) -> ImportResult<ImportOutcome> {
    let dataset = Dataset::from_str(table).ok_or_else(|| ImportError::InvalidDataset {
        name: table.to_string(),
    })?;
    let table = dataset.table_name();

    let files =
        discover::part_files(data_root, dataset, date).map_err(|e| ImportError::Discover {
            reason: format!("{e:#}"),
        })?;
    if files.is_empty() {
        return Ok(ImportOutcome::NothingToImport { table });
    }

    let batch = load_batch(&files).map_err(|e| ImportError::Parse {
        reason: format!("{e:#}"),
    })?;
    if batch.is_empty() {
        return Ok(ImportOutcome::NothingToImport { table });
    }
    if !batch.has_column("id") {
        return Err(ImportError::MissingIdColumn { table });
    }

    let mut client = db::connect(db_config).await.map_err(|e| ImportError::Write {
        table: table.clone(),
        reason: format!("{e:#}"),
    })?;
    let rows = db::upsert_batch(&mut client, &table, &batch)
        .await
        .map_err(|e| ImportError::Write {
            table: table.clone(),
            reason: format!("{e:#}"),
        })?;

    info!(%table, rows, files = files.len(), "batch committed");
    Ok(ImportOutcome::Imported { table, rows })
}
