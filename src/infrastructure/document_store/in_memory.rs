use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::RwLock;
use tracing::debug;

use crate::domain::{
    ports::{check_assigned_id, DocumentStore},
    Document, DocumentId, DomainError, Page, PageRequest, Sort, SortDirection, SortField,
};

struct Inner {
    documents: BTreeMap<DocumentId, Document>,
    last_id: i64,
}

/// Process-local document store. Ids start at 1 and are never reused.
pub struct InMemoryDocumentStore {
    inner: RwLock<Inner>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                documents: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

fn compare(a: &Document, b: &Document, sort: Option<Sort>) -> Ordering {
    let Some(sort) = sort else {
        return a.id.cmp(&b.id);
    };

    let ordering = match sort.field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Title => a.title.cmp(&b.title),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    };
    let ordering = match sort.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    };

    ordering.then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn save(&self, mut doc: Document) -> Result<Document, DomainError> {
        check_assigned_id(&doc)?;

        let mut inner = self
            .inner
            .write()
            .map_err(|e| DomainError::storage(e.to_string()))?;

        match doc.id {
            Some(id) => {
                let slot = inner
                    .documents
                    .get_mut(&id)
                    .ok_or_else(|| DomainError::not_found(format!("document {id}")))?;
                *slot = doc.clone();
                debug!(id = %id, "document updated");
            }
            None => {
                let next = inner
                    .last_id
                    .checked_add(1)
                    .ok_or_else(|| DomainError::internal("document id space exhausted"))?;
                inner.last_id = next;

                let id = DocumentId(next);
                doc.id = Some(id);
                inner.documents.insert(id, doc.clone());
                debug!(id = %id, "document inserted");
            }
        }

        Ok(doc)
    }

    async fn find_by_id(&self, id: DocumentId) -> Result<Option<Document>, DomainError> {
        let inner = self
            .inner
            .read()
            .map_err(|e| DomainError::storage(e.to_string()))?;

        Ok(inner.documents.get(&id).cloned())
    }

    async fn find_all(&self, page: &PageRequest) -> Result<Page<Document>, DomainError> {
        page.validate()?;

        let inner = self
            .inner
            .read()
            .map_err(|e| DomainError::storage(e.to_string()))?;

        let mut documents: Vec<&Document> = inner.documents.values().collect();
        if page.sort.is_some() {
            documents.sort_by(|a, b| compare(a, b, page.sort));
        }

        let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
        let items = documents
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok(Page::new(items, inner.documents.len() as u64, page))
    }

    async fn delete_by_id(&self, id: DocumentId) -> Result<(), DomainError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|e| DomainError::storage(e.to_string()))?;

        if inner.documents.remove(&id).is_some() {
            debug!(id = %id, "document deleted");
        }
        Ok(())
    }

    async fn exists_by_id(&self, id: DocumentId) -> Result<bool, DomainError> {
        let inner = self
            .inner
            .read()
            .map_err(|e| DomainError::storage(e.to_string()))?;

        Ok(inner.documents.contains_key(&id))
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let inner = self
            .inner
            .read()
            .map_err(|e| DomainError::storage(e.to_string()))?;

        Ok(inner.documents.len() as u64)
    }
}
