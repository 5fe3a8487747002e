mod in_memory;
mod postgres;

pub use in_memory::InMemoryDocumentStore;
pub use postgres::{PostgresDocumentStore, DEFAULT_TABLE};
