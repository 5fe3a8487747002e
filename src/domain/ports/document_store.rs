use async_trait::async_trait;

use crate::domain::{errors::DomainError, Document, DocumentId, Page, PageRequest};

/// Persistence contract for [`Document`]s.
///
/// Lookups report a missing row as `Ok(None)` / `Ok(false)`, never as an
/// error. Backing store failures surface as [`DomainError::Storage`].
/// Additional read operations belong here as further methods.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a new document (`id == None`) and assigns its id, or
    /// replaces the stored state of an existing one. Saving an id with no
    /// row fails with [`DomainError::NotFound`].
    async fn save(&self, doc: Document) -> Result<Document, DomainError>;

    async fn find_by_id(&self, id: DocumentId) -> Result<Option<Document>, DomainError>;

    async fn find_all(&self, page: &PageRequest) -> Result<Page<Document>, DomainError>;

    /// Deleting an id with no row is a no-op.
    async fn delete_by_id(&self, id: DocumentId) -> Result<(), DomainError>;

    async fn exists_by_id(&self, id: DocumentId) -> Result<bool, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}

/// Rejects caller-supplied ids the store could never have assigned.
pub(crate) fn check_assigned_id(doc: &Document) -> Result<(), DomainError> {
    match doc.id {
        Some(id) if id.get() <= 0 => Err(DomainError::invalid_argument(format!(
            "document id must be positive, got {id}"
        ))),
        _ => Ok(()),
    }
}
