//! Raw export to normalized CSV

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dbc_core::{transform_all, TransformPaths};

use crate::config::DbcConfig;

#[derive(Parser, Debug)]
pub struct TransformArgs {
    /// Directory holding the raw upper-case exports (default: [seed] raw_dir)
    #[arg(long = "raw-dir", value_name = "DIR")]
    pub raw_dir: Option<PathBuf>,

    /// Output directory for normalized files (default: SEED_DATA_DIR or [seed] data_dir)
    #[arg(long = "out", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
}

pub fn run_transform(args: TransformArgs, config: &DbcConfig) -> Result<()> {
    let paths = TransformPaths {
        raw_dir: args.raw_dir.unwrap_or_else(|| config.seed.raw_dir.clone()),
        out_dir: args.out_dir.unwrap_or_else(|| config.seed.data_dir.clone()),
    };

    tracing::info!(
        "transforming {} -> {}",
        paths.raw_dir.display(),
        paths.out_dir.display()
    );

    let report = transform_all(&paths).context("Transform failed")?;
    for (file, rows) in &report.files {
        println!("{file}: {rows} rows");
    }
    Ok(())
}
