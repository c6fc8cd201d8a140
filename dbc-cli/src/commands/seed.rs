//! Database seeding

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dbc_server::db::migrations;
use dbc_server::seed::{seed_from_normalized, seed_from_raw, InsertOptions};

use crate::config::DbcConfig;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedMode {
    /// Truncate, then COPY the normalized files
    Copy,
    /// Parse the raw exports and insert in chunks
    Insert,
}

#[derive(Parser, Debug)]
pub struct SeedArgs {
    /// Loading strategy
    #[arg(long, value_enum, default_value = "copy")]
    pub mode: SeedMode,

    /// Normalized files for copy mode (default: SEED_DATA_DIR or [seed] data_dir)
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Raw exports for insert mode (default: [seed] raw_dir)
    #[arg(long = "raw-dir", value_name = "DIR")]
    pub raw_dir: Option<PathBuf>,

    /// Rows per INSERT in insert mode
    #[arg(long, value_name = "N")]
    pub chunk_size: Option<usize>,

    /// Create missing tables first
    #[arg(long)]
    pub migrate: bool,

    /// Database URL (overrides ZERO_UPSTREAM_DB / DATABASE_URL / config)
    #[arg(long)]
    pub database_url: Option<String>,
}

pub async fn run_seed(args: SeedArgs, config: &DbcConfig) -> Result<()> {
    let pool = super::connect(config, args.database_url.as_deref()).await?;

    if args.migrate {
        migrations::run(&pool)
            .await
            .context("Failed to run migrations")?;
    }

    let report = match args.mode {
        SeedMode::Copy => {
            let dir = args.data_dir.unwrap_or_else(|| config.seed.data_dir.clone());
            tracing::info!(data_dir = %dir.display(), "seeding from normalized files");
            seed_from_normalized(&pool, &dir)
                .await
                .context("Seeding failed")?
        }
        SeedMode::Insert => {
            let dir = args.raw_dir.unwrap_or_else(|| config.seed.raw_dir.clone());
            let options = InsertOptions {
                chunk_size: args.chunk_size.unwrap_or(config.seed.chunk_size),
            };
            tracing::info!(raw_dir = %dir.display(), chunk_size = options.chunk_size, "seeding from raw exports");
            seed_from_raw(&pool, &dir, options)
                .await
                .context("Seeding failed")?
        }
    };

    for (table, rows) in &report.tables {
        println!("{table}: {rows} rows");
    }
    println!("total: {} rows", report.total());
    Ok(())
}
