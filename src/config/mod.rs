//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `VERITY_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{DEFAULT_COLLECTION_NAME, DEFAULT_SYNC_CHUNK_SIZE, DEFAULT_SYNC_WINDOW};
use crate::embedding::{NliConfig, SentenceEmbedderConfig};
use crate::sync::SyncConfig;

/// Service configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `VERITY_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Logical collection name. Default: `news_facts`.
    pub collection: String,

    /// SQLite database written by the scraper.
    pub records_db: PathBuf,

    /// Sentence embedder directory. Stub embedder when unset.
    pub embedder_path: Option<PathBuf>,

    /// NLI cross-encoder directory. Stub classifier when unset.
    pub nli_path: Option<PathBuf>,

    /// Most recent records considered per sync. Default: `5000`.
    pub sync_window: usize,

    /// Entries per committed chunk. Default: `500`.
    pub sync_chunk_size: usize,

    /// Period of background syncs. `None` means startup sync only.
    pub sync_interval: Option<Duration>,
}

/// Default Qdrant URL used when `VERITY_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

/// Default record database used when `VERITY_RECORDS_DB` is not set.
pub const DEFAULT_RECORDS_DB: &str = "./Database/news_articles.db";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            collection: DEFAULT_COLLECTION_NAME.to_string(),
            records_db: PathBuf::from(DEFAULT_RECORDS_DB),
            embedder_path: None,
            nli_path: None,
            sync_window: DEFAULT_SYNC_WINDOW,
            sync_chunk_size: DEFAULT_SYNC_CHUNK_SIZE,
            sync_interval: None,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "VERITY_PORT";
    const ENV_BIND_ADDR: &'static str = "VERITY_BIND_ADDR";
    const ENV_QDRANT_URL: &'static str = "VERITY_QDRANT_URL";
    const ENV_COLLECTION: &'static str = "VERITY_COLLECTION";
    const ENV_RECORDS_DB: &'static str = "VERITY_RECORDS_DB";
    const ENV_EMBEDDER_PATH: &'static str = SentenceEmbedderConfig::ENV_MODEL_DIR;
    const ENV_NLI_PATH: &'static str = NliConfig::ENV_MODEL_DIR;
    const ENV_SYNC_WINDOW: &'static str = "VERITY_SYNC_WINDOW";
    const ENV_SYNC_CHUNK_SIZE: &'static str = "VERITY_SYNC_CHUNK_SIZE";
    const ENV_SYNC_INTERVAL_SECS: &'static str = "VERITY_SYNC_INTERVAL_SECS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let qdrant_url = Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url);
        let collection = Self::parse_string_from_env(Self::ENV_COLLECTION, defaults.collection);
        let records_db = Self::parse_path_from_env(Self::ENV_RECORDS_DB, defaults.records_db);
        let embedder_path = Self::parse_optional_path_from_env(Self::ENV_EMBEDDER_PATH);
        let nli_path = Self::parse_optional_path_from_env(Self::ENV_NLI_PATH);
        let sync_window = Self::parse_usize_from_env(Self::ENV_SYNC_WINDOW)?
            .unwrap_or(defaults.sync_window);
        let sync_chunk_size = Self::parse_usize_from_env(Self::ENV_SYNC_CHUNK_SIZE)?
            .unwrap_or(defaults.sync_chunk_size);
        let sync_interval = Self::parse_usize_from_env(Self::ENV_SYNC_INTERVAL_SECS)?
            .filter(|&secs| secs > 0)
            .map(|secs| Duration::from_secs(secs as u64));

        Ok(Self {
            port,
            bind_addr,
            qdrant_url,
            collection,
            records_db,
            embedder_path,
            nli_path,
            sync_window,
            sync_chunk_size,
            sync_interval,
        })
    }

    /// Validates paths and basic invariants (does not create anything).
    ///
    /// A missing record database is allowed: sync treats it as an
    /// unavailable source.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collection.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_COLLECTION,
                reason: "collection name is empty".to_string(),
            });
        }

        if self.sync_chunk_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_SYNC_CHUNK_SIZE,
                reason: "must be at least 1".to_string(),
            });
        }

        if self.records_db.exists() && !self.records_db.is_file() {
            return Err(ConfigError::NotAFile {
                path: self.records_db.clone(),
            });
        }

        for path in [&self.embedder_path, &self.nli_path].into_iter().flatten() {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig::new(self.sync_window, self.sync_chunk_size)
    }

    pub fn embedder_config(&self) -> SentenceEmbedderConfig {
        match &self.embedder_path {
            Some(path) => SentenceEmbedderConfig::new(path),
            None => SentenceEmbedderConfig::stub(),
        }
    }

    pub fn nli_config(&self) -> NliConfig {
        match &self.nli_path {
            Some(path) => NliConfig::new(path),
            None => NliConfig::stub(),
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_usize_from_env(var_name: &'static str) -> Result<Option<usize>, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map(Some)
                .map_err(|e| ConfigError::InvalidNumber {
                    name: var_name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(None),
        }
    }
}
