use anyhow::{Context, Result};
use std::fmt;
use tokio_postgres::{Client, NoTls};
use tracing::{debug, error, instrument};

use crate::batch::RowBatch;
use crate::config::DbConfig;

/// Connect to PostgreSQL and park the connection driver on the runtime.
pub async fn connect(config: &DbConfig) -> Result<Client> {
    let (client, connection) = tokio_postgres::connect(&config.url(), NoTls)
        .await
        .context("could not connect to PostgreSQL")?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            error!("PostgreSQL connection error: {e}");
        }
    });

    Ok(client)
}

/// A PostgreSQL identifier, printed with quotes so column names coming out
/// of CSV headers cannot clash with keywords.
struct Ident<'a>(&'a str);

impl fmt::Display for Ident<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0.replace('"', "\"\""))
    }
}

/// Escape and quote one cell as a SQL literal. Cells travel as quoted
/// strings and PostgreSQL coerces each one to the destination column's
/// type; a NULL cell renders as bare `NULL`.
fn pg_literal(cell: &Option<String>) -> String {
    match cell {
        Some(s) => format!("'{}'", s.replace('\'', "''")),
        None => "NULL".to_string(),
    }
}

/// Build the single multi-row upsert statement for a batch: one
/// `INSERT ... VALUES` naming every column, with `ON CONFLICT (id)`
/// updating every non-id column from `EXCLUDED`. When `id` is the only
/// column there is nothing to update, so conflicts become `DO NOTHING`.
pub fn upsert_sql(table: &str, batch: &RowBatch) -> String {
    let columns = batch
        .columns
        .iter()
        .map(|c| Ident(c).to_string())
        .collect::<Vec<_>>()
        .join(", ");

    let values = batch
        .rows
        .iter()
        .map(|row| {
            let cells = row.iter().map(pg_literal).collect::<Vec<_>>().join(", ");
            format!("({cells})")
        })
        .collect::<Vec<_>>()
        .join(",\n");

    let updates = batch
        .columns
        .iter()
        .filter(|c| c.as_str() != "id")
        .map(|c| format!("{ident} = EXCLUDED.{ident}", ident = Ident(c)))
        .collect::<Vec<_>>()
        .join(", ");
    let conflict = if updates.is_empty() {
        "DO NOTHING".to_string()
    } else {
        format!("DO UPDATE SET {updates}")
    };

    format!(
        "INSERT INTO {table} ({columns})\nVALUES {values}\nON CONFLICT ({id}) {conflict}",
        table = Ident(table),
        id = Ident("id"),
    )
}

/// Execute the batch upsert as one statement inside one transaction:
/// either every row lands or none do. Returns the number of rows written.
#[instrument(level = "debug", skip(client, batch), fields(rows = batch.rows.len()))]
pub async fn upsert_batch(client: &mut Client, table: &str, batch: &RowBatch) -> Result<u64> {
    let sql = upsert_sql(table, batch);
    debug!(table, bytes = sql.len(), "upsert statement built");

    let transaction = client
        .transaction()
        .await
        .context("opening upsert transaction")?;
    let affected = transaction
        .execute(sql.as_str(), &[])
        .await
        .with_context(|| format!("upserting into {table}"))?;
    transaction.commit().await.context("committing upsert")?;

    Ok(affected)
}
