//! Application layer - Use cases and orchestration.
//!
//! Services depend on the domain's `DocumentStore` port rather than on a
//! concrete backing store.

pub mod services;

pub use services::DocumentService;
