use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use cd2import::config::DbConfig;
use cd2import::discover;
use cd2import::import::{self, ImportError, ImportOutcome};

/// Import one day of CanvasData 2 CSV part files into PostgreSQL.
#[derive(Parser, Debug)]
#[command(version, about = "Imports CanvasData 2 csv files to PostgreSQL")]
struct Args {
    /// Dataset to import: users, courses, enrollments, pseudonyms,
    /// enrollment_terms or course_sections
    #[arg(long)]
    table: String,

    /// Extract date as YYYYMMDD; defaults to yesterday
    #[arg(long)]
    date: Option<String>,

    /// Directory holding one subdirectory of part files per dataset
    #[arg(long, default_value = "canvasdata")]
    data_root: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();

    // ─── 2) resolve the extract date ─────────────────────────────────
    let date = match &args.date {
        Some(raw) => match NaiveDate::parse_from_str(raw, "%Y%m%d") {
            Ok(date) => date,
            Err(e) => {
                error!("invalid --date {raw}: {e}");
                return ExitCode::from(2);
            }
        },
        None => discover::yesterday(),
    };

    // ─── 3) run the import and report the outcome ────────────────────
    let db_config = DbConfig::from_env();
    match import::run(&args.table, date, &args.data_root, &db_config).await {
        Ok(ImportOutcome::Imported { table, rows }) => {
            info!(%table, rows, "successfully imported data");
            ExitCode::SUCCESS
        }
        Ok(ImportOutcome::NothingToImport { table }) => {
            warn!(%table, "no data found to import");
            ExitCode::SUCCESS
        }
        Err(e @ ImportError::InvalidDataset { .. }) => {
            error!("{e}");
            ExitCode::from(2)
        }
        Err(e) => {
            error!("error importing data: {e}");
            ExitCode::FAILURE
        }
    }
}
