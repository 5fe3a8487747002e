mod document_store;

pub(crate) use document_store::check_assigned_id;
pub use document_store::DocumentStore;
