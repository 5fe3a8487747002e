use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::domain::{DomainError, DEFAULT_PAGE_SIZE};
use crate::infrastructure::document_store::DEFAULT_TABLE;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub store: StoreConfig,
    pub paging: PagingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub table: String,
    /// Per-operation deadline; `None` waits on the backing store indefinitely.
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    pub default_page_size: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/chat_service".to_string(),
            max_connections: 5,
            acquire_timeout_seconds: 5,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            timeout_seconds: Some(30),
        }
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl StoreConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl AppConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DomainError> {
        serde_yaml::from_str(yaml)
            .map_err(|e| DomainError::invalid_argument(format!("invalid config: {e}")))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            DomainError::invalid_argument(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Loads `path` when it exists (defaults otherwise), then applies
    /// `DATABASE_URL` and `DOCUMENT_STORE_TIMEOUT_SECONDS` from the
    /// environment or a `.env` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        dotenvy::dotenv().ok();

        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), DomainError> {
        if let Some(url) = var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(timeout) = var("DOCUMENT_STORE_TIMEOUT_SECONDS") {
            let seconds = timeout.parse::<u64>().map_err(|e| {
                DomainError::invalid_argument(format!(
                    "DOCUMENT_STORE_TIMEOUT_SECONDS={timeout:?}: {e}"
                ))
            })?;
            // 0 disables the deadline
            self.store.timeout_seconds = (seconds > 0).then_some(seconds);
        }
        Ok(())
    }
}
