//! Command implementations for the dbc CLI

pub mod migrate;
pub mod seed;
pub mod serve;
pub mod transform;

pub use migrate::run_migrate;
pub use seed::run_seed;
pub use serve::run_serve;
pub use transform::run_transform;

use anyhow::{Context, Result};
use dbc_server::db::pool::create_pool_with_options;
use dbc_server::db::PgPool;

use crate::config::DbcConfig;

/// Resolve the database URL and open a pool. Fails before any work starts
/// when no URL is configured.
pub async fn connect(config: &DbcConfig, flag: Option<&str>) -> Result<PgPool> {
    let url = config.database_url(flag)?;
    create_pool_with_options(&url, config.database.max_connections)
        .await
        .context("Failed to create database pool")
}
