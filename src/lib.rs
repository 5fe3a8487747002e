pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::DocumentService;
pub use domain::{
    ports::DocumentStore, Document, DocumentChanges, DocumentId, DomainError, Page, PageRequest,
    Sort, SortDirection, SortField,
};
pub use infrastructure::{AppConfig, InMemoryDocumentStore, PostgresDocumentStore};
