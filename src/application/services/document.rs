use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{instrument, warn};

use crate::domain::{
    ports::DocumentStore, Document, DocumentChanges, DocumentId, DomainError, Page, PageRequest,
};
use crate::infrastructure::AppConfig;

pub struct DocumentService {
    store: Arc<dyn DocumentStore>,
    timeout: Option<Duration>,
    default_page_size: u64,
}

impl DocumentService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            timeout: None,
            default_page_size: crate::domain::DEFAULT_PAGE_SIZE,
        }
    }

    pub fn from_config(store: Arc<dyn DocumentStore>, config: &AppConfig) -> Self {
        Self {
            store,
            timeout: config.store.timeout(),
            default_page_size: config.paging.default_page_size,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn run<T>(
        &self,
        op: &'static str,
        fut: impl Future<Output = Result<T, DomainError>>,
    ) -> Result<T, DomainError> {
        let Some(timeout) = self.timeout else {
            return fut.await;
        };

        match tokio::time::timeout(timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(op, timeout_ms = timeout.as_millis() as u64, "document store timed out");
                Err(DomainError::timeout(format!(
                    "{op} did not complete within {timeout:?}"
                )))
            }
        }
    }

    #[instrument(skip(self, metadata))]
    pub async fn create(
        &self,
        title: &str,
        metadata: serde_json::Value,
    ) -> Result<Document, DomainError> {
        let doc = Document::new(title).with_metadata(metadata);
        self.run("save", self.store.save(doc)).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: DocumentId) -> Result<Option<Document>, DomainError> {
        self.run("find_by_id", self.store.find_by_id(id)).await
    }

    /// Lists documents; `None` requests the first page at the default size.
    #[instrument(skip(self))]
    pub async fn list(&self, page: Option<PageRequest>) -> Result<Page<Document>, DomainError> {
        let page = page.unwrap_or_else(|| PageRequest::first(self.default_page_size));
        self.run("find_all", self.store.find_all(&page)).await
    }

    /// Applies `changes` to a stored document. Fails with `NotFound` when
    /// no document has `id`.
    #[instrument(skip(self, changes))]
    pub async fn update(
        &self,
        id: DocumentId,
        changes: DocumentChanges,
    ) -> Result<Document, DomainError> {
        let mut doc = self
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("document {id}")))?;

        if !changes.apply(&mut doc) {
            return Ok(doc);
        }
        doc.touch();

        self.run("save", self.store.save(doc)).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: DocumentId) -> Result<(), DomainError> {
        self.run("delete_by_id", self.store.delete_by_id(id)).await
    }

    #[instrument(skip(self))]
    pub async fn exists(&self, id: DocumentId) -> Result<bool, DomainError> {
        self.run("exists_by_id", self.store.exists_by_id(id)).await
    }

    #[instrument(skip(self))]
    pub async fn count(&self) -> Result<u64, DomainError> {
        self.run("count", self.store.count()).await
    }
}
