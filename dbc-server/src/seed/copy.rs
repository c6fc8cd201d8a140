//! Copy-mode seeding from the normalized files

use std::path::Path;

use dbc_core::{TableSpec, SEED_ORDER};
use sqlx::PgPool;
use tokio::io::AsyncReadExt;

use super::{SeedError, SeedReport};

const READ_BUF: usize = 64 * 1024;

fn copy_statement(spec: &TableSpec) -> String {
    format!(
        "COPY {} ({}) FROM STDIN WITH (FORMAT csv, HEADER true, NULL '')",
        spec.table,
        spec.output_headers().join(", ")
    )
}

fn truncate_statement() -> String {
    let tables: Vec<&str> = SEED_ORDER.iter().rev().map(|s| s.table).collect();
    format!("TRUNCATE TABLE {}", tables.join(", "))
}

/// Truncate every table and stream the normalized files from `data_dir`.
///
/// Runs in one transaction; a failing file leaves the previous data intact.
pub async fn seed_from_normalized(pool: &PgPool, data_dir: &Path) -> Result<SeedReport, SeedError> {
    // Check up front so a missing file does not cost a truncate.
    for spec in SEED_ORDER {
        let path = data_dir.join(spec.normalized_file);
        if !path.exists() {
            return Err(SeedError::MissingFile(path));
        }
    }

    let mut tx = pool.begin().await.map_err(SeedError::database("all tables"))?;
    sqlx::query(&truncate_statement())
        .execute(&mut *tx)
        .await
        .map_err(SeedError::database("all tables"))?;

    let mut report = SeedReport::default();
    for spec in SEED_ORDER {
        let path = data_dir.join(spec.normalized_file);
        tracing::info!(table = spec.table, file = %path.display(), "copying");

        let mut file = tokio::fs::File::open(&path)
            .await
            .map_err(|source| SeedError::Io {
                path: path.clone(),
                source,
            })?;

        let mut copy = tx
            .copy_in_raw(&copy_statement(&spec))
            .await
            .map_err(SeedError::database(spec.table))?;

        let mut buf = vec![0u8; READ_BUF];
        loop {
            let n = file.read(&mut buf).await.map_err(|source| SeedError::Io {
                path: path.clone(),
                source,
            })?;
            if n == 0 {
                break;
            }
            copy.send(&buf[..n])
                .await
                .map_err(SeedError::database(spec.table))?;
        }

        let rows = copy.finish().await.map_err(SeedError::database(spec.table))?;
        tracing::info!(table = spec.table, rows, "copied");
        report.record(spec.table, rows);
    }

    tx.commit().await.map_err(SeedError::database("all tables"))?;
    Ok(report)
}
