//! Configuration: optional `dbc.toml`, environment, then command-line flags
//!
//! Precedence is flag > environment > file > built-in default.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use dbc_core::DEFAULT_PROVISIONAL_YEAR;
use dbc_server::db::pool::DEFAULT_MAX_CONNECTIONS;
use dbc_server::seed::DEFAULT_CHUNK_SIZE;
use serde::Deserialize;

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "dbc.toml";

/// Database URL variables, in order of preference
pub const DATABASE_URL_VARS: [&str; 2] = ["ZERO_UPSTREAM_DB", "DATABASE_URL"];

pub const SEED_DATA_DIR_VAR: &str = "SEED_DATA_DIR";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DbcConfig {
    pub database: DatabaseConfig,
    pub server: ServerSection,
    pub seed: SeedSection,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub bind: SocketAddr,
    pub cors_permissive: bool,
    pub static_dir: Option<PathBuf>,
    pub provisional_year: i32,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3030)),
            cors_permissive: false,
            static_dir: None,
            provisional_year: DEFAULT_PROVISIONAL_YEAR,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SeedSection {
    pub data_dir: PathBuf,
    pub raw_dir: PathBuf,
    pub chunk_size: usize,
}

impl Default for SeedSection {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            raw_dir: PathBuf::from("./data-raw"),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl DbcConfig {
    /// Load an explicit config file, or `dbc.toml` if it exists.
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file just means built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) if !path.exists() => bail!("Config not found at {}", path.display()),
            Some(path) => Some(path.to_path_buf()),
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
        };

        let mut config = match &path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                tracing::debug!(config = %path.display(), "config loaded");
                Self::parse(&content)
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))?
            }
            None => Self::default(),
        };

        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("invalid TOML")
    }

    /// Overlay environment variables onto file values.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = DATABASE_URL_VARS.iter().find_map(|name| non_empty(var(name))) {
            self.database.url = Some(url);
        }
        if let Some(dir) = non_empty(var(SEED_DATA_DIR_VAR)) {
            self.seed.data_dir = PathBuf::from(dir);
        }
    }

    /// The database URL, with a flag taking precedence. Fails when none is set.
    pub fn database_url(&self, flag: Option<&str>) -> Result<String> {
        if let Some(url) = flag.filter(|u| !u.trim().is_empty()) {
            return Ok(url.to_string());
        }
        match &self.database.url {
            Some(url) => Ok(url.clone()),
            None => bail!(
                "No database configured. Set --database-url, {} or {}, or [database] url in {}",
                DATABASE_URL_VARS[0],
                DATABASE_URL_VARS[1],
                DEFAULT_CONFIG_FILE
            ),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_without_file() {
        let config = DbcConfig::default();
        assert_eq!(config.server.bind.port(), 3030);
        assert_eq!(config.server.provisional_year, 2025);
        assert_eq!(config.seed.data_dir, PathBuf::from("./data"));
        assert_eq!(config.seed.chunk_size, 1000);
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn parses_partial_file() {
        let config = DbcConfig::parse(
            r#"
            [database]
            url = "postgres://file/dbc"

            [server]
            bind = "0.0.0.0:8080"
            provisional_year = 2026
            "#,
        )
        .unwrap();

        assert_eq!(config.database.url.as_deref(), Some("postgres://file/dbc"));
        assert_eq!(config.server.bind.port(), 8080);
        assert_eq!(config.server.provisional_year, 2026);
        assert!(!config.server.cors_permissive);
        assert_eq!(config.seed, SeedSection::default());
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(DbcConfig::parse("[server]\nport = 1\n").is_err());
    }

    #[test]
    fn zero_upstream_db_wins_over_database_url() {
        let mut config = DbcConfig::parse("[database]\nurl = \"postgres://file\"\n").unwrap();
        config.apply_env(env(&[
            ("DATABASE_URL", "postgres://plain"),
            ("ZERO_UPSTREAM_DB", "postgres://zero"),
        ]));
        assert_eq!(config.database_url(None).unwrap(), "postgres://zero");
    }

    #[test]
    fn env_overrides_file_and_flag_overrides_env() {
        let mut config = DbcConfig::parse("[database]\nurl = \"postgres://file\"\n").unwrap();
        assert_eq!(config.database_url(None).unwrap(), "postgres://file");

        config.apply_env(env(&[("DATABASE_URL", "postgres://env")]));
        assert_eq!(config.database_url(None).unwrap(), "postgres://env");
        assert_eq!(
            config.database_url(Some("postgres://flag")).unwrap(),
            "postgres://flag"
        );
    }

    #[test]
    fn blank_env_is_ignored() {
        let mut config = DbcConfig::default();
        config.apply_env(env(&[("DATABASE_URL", "  "), ("SEED_DATA_DIR", "")]));
        assert!(config.database.url.is_none());
        assert_eq!(config.seed.data_dir, PathBuf::from("./data"));
    }

    #[test]
    fn seed_data_dir_from_env() {
        let mut config = DbcConfig::default();
        config.apply_env(env(&[("SEED_DATA_DIR", "/srv/dbc")]));
        assert_eq!(config.seed.data_dir, PathBuf::from("/srv/dbc"));
    }

    #[test]
    fn missing_url_fails_with_hint() {
        let err = DbcConfig::default().database_url(None).unwrap_err();
        assert!(err.to_string().contains("ZERO_UPSTREAM_DB"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DbcConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config not found"));
    }
}
