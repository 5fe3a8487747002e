pub mod config;
pub mod database;
pub mod document_store;

pub use config::{AppConfig, DatabaseConfig, PagingConfig, StoreConfig};
pub use database::{create_pool, postgres_store};
pub use document_store::{InMemoryDocumentStore, PostgresDocumentStore};
