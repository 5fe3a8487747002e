use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::domain::DomainError;
use crate::infrastructure::config::{AppConfig, DatabaseConfig};
use crate::infrastructure::document_store::PostgresDocumentStore;

/// Builds a lazily connecting pool; nothing is dialed until first use.
pub fn create_pool(config: &DatabaseConfig) -> Result<PgPool, DomainError> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
        .connect_lazy(&config.url)
        .map_err(|e| DomainError::storage(e.to_string()))
}

pub fn postgres_store(pool: PgPool, config: &AppConfig) -> Result<PostgresDocumentStore, DomainError> {
    PostgresDocumentStore::new(pool).with_table(config.store.table.as_str())
}
