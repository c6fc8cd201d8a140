//! Schema creation

use anyhow::{Context, Result};
use clap::Parser;
use dbc_server::db::migrations;

use crate::config::DbcConfig;

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides ZERO_UPSTREAM_DB / DATABASE_URL / config)
    #[arg(long)]
    pub database_url: Option<String>,
}

/// Create all tables and indexes if they do not exist
pub async fn run_migrate(args: MigrateArgs, config: &DbcConfig) -> Result<()> {
    let pool = super::connect(config, args.database_url.as_deref()).await?;
    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;
    Ok(())
}
