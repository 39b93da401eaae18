//! Configuration loading and management

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use uuid::Uuid;

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "CONTACT_BOOK_CONFIG";
/// Config file used when `CONTACT_BOOK_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "contact-book.yaml";

const BIND_ENV: &str = "CONTACT_BOOK_BIND";
const DATABASE_URL_ENV: &str = "CONTACT_BOOK_DATABASE_URL";
const LOG_ENV: &str = "CONTACT_BOOK_LOG";

/// Which `ContactStore` backs the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

/// A bearer token and the user it authenticates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    pub token: String,
    pub user_id: Uuid,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Socket address to listen on
    pub bind: String,

    /// Prefix for every resource route (e.g. "/api")
    pub base_path: String,

    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,

    pub storage: StorageBackend,

    /// Required when `storage` is `postgres`
    pub database_url: Option<String>,

    pub tokens: Vec<TokenConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
            base_path: "/api".to_string(),
            log_filter: "info,contact_book=debug".to_string(),
            storage: StorageBackend::Memory,
            database_url: None,
            tokens: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Read `path` if it exists, otherwise start from defaults
    ///
    /// Environment overrides are applied and the result validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::from_yaml_file(path)?
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Overlay `CONTACT_BOOK_BIND`, `CONTACT_BOOK_DATABASE_URL` and `CONTACT_BOOK_LOG`
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(bind) = lookup(BIND_ENV) {
            self.bind = bind;
        }
        if let Some(url) = lookup(DATABASE_URL_ENV) {
            self.database_url = Some(url);
        }
        if let Some(filter) = lookup(LOG_ENV) {
            self.log_filter = filter;
        }
    }

    /// Reject configurations the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if !self.base_path.starts_with('/') {
            bail!("base_path must start with '/', got {:?}", self.base_path);
        }

        let mut seen = HashSet::new();
        for entry in &self.tokens {
            if entry.token.trim().is_empty() {
                bail!("token for user {} is empty", entry.user_id);
            }
            if !seen.insert(entry.token.as_str()) {
                bail!("token configured more than once");
            }
        }

        if self.storage == StorageBackend::Postgres && self.database_url.is_none() {
            bail!("storage 'postgres' requires database_url");
        }

        Ok(())
    }
}
