//! HTTP server command
//!
//! Runs the query API, optionally serving the built frontend.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use dbc_server::db::migrations;
use dbc_server::http::{run_server, ServerConfig};

use crate::config::DbcConfig;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: [server] bind or 127.0.0.1:3030)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Directory with the built frontend (index.html is the SPA fallback)
    #[arg(long, value_name = "DIR")]
    pub static_dir: Option<PathBuf>,

    /// Year whose figures are shown as provisional
    #[arg(long, value_name = "YEAR")]
    pub provisional_year: Option<i32>,

    /// Create missing tables before serving
    #[arg(long)]
    pub migrate: bool,

    /// Database URL (overrides ZERO_UPSTREAM_DB / DATABASE_URL / config)
    #[arg(long)]
    pub database_url: Option<String>,
}

impl ServeArgs {
    fn server_config(&self, config: &DbcConfig) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind.unwrap_or(config.server.bind),
            cors_permissive: self.cors_permissive || config.server.cors_permissive,
            static_dir: self
                .static_dir
                .clone()
                .or_else(|| config.server.static_dir.clone()),
            provisional_year: self
                .provisional_year
                .unwrap_or(config.server.provisional_year),
        }
    }
}

/// Run the HTTP server (blocks until shutdown)
pub async fn run_serve(args: ServeArgs, config: &DbcConfig) -> Result<()> {
    let server_config = args.server_config(config);
    let pool = super::connect(config, args.database_url.as_deref()).await?;

    if args.migrate {
        migrations::run(&pool)
            .await
            .context("Failed to run migrations")?;
    }

    tracing::info!(
        provisional_year = server_config.provisional_year,
        "Starting dbc server on {}",
        server_config.bind_addr
    );

    run_server(pool, server_config)
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> ServeArgs {
        let mut full = vec!["serve"];
        full.extend_from_slice(argv);
        ServeArgs::parse_from(full)
    }

    #[test]
    fn flags_override_config() {
        let mut config = DbcConfig::default();
        config.server.provisional_year = 2026;
        config.server.static_dir = Some(PathBuf::from("dist"));

        let server = args(&["--bind", "0.0.0.0:9000", "--provisional-year", "2024"])
            .server_config(&config);
        assert_eq!(server.bind_addr.port(), 9000);
        assert_eq!(server.provisional_year, 2024);
        assert_eq!(server.static_dir, Some(PathBuf::from("dist")));
    }

    #[test]
    fn config_fills_missing_flags() {
        let mut config = DbcConfig::default();
        config.server.cors_permissive = true;

        let server = args(&[]).server_config(&config);
        assert_eq!(server.bind_addr.port(), 3030);
        assert!(server.cors_permissive);
        assert_eq!(server.provisional_year, 2025);
    }
}
