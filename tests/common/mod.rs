#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Once};

use chat_service::{Document, DocumentId, DocumentStore, DomainError, PageRequest};

static TRACING: Once = Once::new();

pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "chat_service=debug".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

/// save, find, delete, find again, count. Expects an empty store.
pub async fn lifecycle(store: Arc<dyn DocumentStore>) -> anyhow::Result<()> {
    let saved = store.save(Document::new("A")).await?;
    assert_eq!(saved.id, Some(DocumentId(1)));
    assert_eq!(saved.title, "A");

    assert_eq!(store.find_by_id(DocumentId(1)).await?, Some(saved));

    store.delete_by_id(DocumentId(1)).await?;
    assert_eq!(store.find_by_id(DocumentId(1)).await?, None);
    assert_eq!(store.count().await?, 0);
    Ok(())
}

pub async fn round_trip(store: Arc<dyn DocumentStore>) -> anyhow::Result<()> {
    let doc = Document::new("Business hours").with_metadata(serde_json::json!({
        "category": "General",
        "tags": ["hours", "support"],
        "usage_count": 12,
    }));

    let saved = store.save(doc.clone()).await?;
    let id = saved.id.expect("id assigned on save");

    assert_eq!(Document { id: None, ..saved.clone() }, doc);
    assert_eq!(store.find_by_id(id).await?, Some(saved));
    Ok(())
}

pub async fn delete_is_idempotent(store: Arc<dyn DocumentStore>) -> anyhow::Result<()> {
    for id in [DocumentId(1), DocumentId(-5), DocumentId(i64::MAX)] {
        store.delete_by_id(id).await?;
        store.delete_by_id(id).await?;
        assert_eq!(store.find_by_id(id).await?, None);
        assert!(!store.exists_by_id(id).await?);
    }
    Ok(())
}

pub async fn count_tracks_saves(store: Arc<dyn DocumentStore>) -> anyhow::Result<()> {
    let before = store.count().await?;
    for i in 0..7 {
        store.save(Document::new(format!("doc {i}"))).await?;
    }
    assert_eq!(store.count().await?, before + 7);
    Ok(())
}

pub async fn exists_follows_lifecycle(store: Arc<dyn DocumentStore>) -> anyhow::Result<()> {
    let id = store.save(Document::new("A")).await?.id.expect("id");
    assert!(store.exists_by_id(id).await?);

    store.delete_by_id(id).await?;
    assert!(!store.exists_by_id(id).await?);
    Ok(())
}

/// Walks every page and checks each document shows up exactly once.
pub async fn pages_cover_everything(store: Arc<dyn DocumentStore>) -> anyhow::Result<()> {
    let mut expected = HashSet::new();
    for i in 0..23 {
        let doc = store.save(Document::new(format!("doc {}", i % 4))).await?;
        expected.insert(doc.id.expect("id"));
    }

    let mut seen = Vec::new();
    let mut request = Some(PageRequest::first(5));
    while let Some(page_request) = request {
        let page = store.find_all(&page_request).await?;
        assert!(page.len() <= 5);
        assert_eq!(page.total, 23);
        seen.extend(page.items.iter().filter_map(|d| d.id));
        request = page.next_page();
    }

    assert_eq!(seen.len(), expected.len());
    assert_eq!(seen.iter().copied().collect::<HashSet<_>>(), expected);
    assert!(seen.windows(2).all(|w| w[0] < w[1]));
    Ok(())
}

pub async fn rejects_bad_paging(store: Arc<dyn DocumentStore>) -> anyhow::Result<()> {
    for request in [PageRequest::first(0), PageRequest::first(1001)] {
        let err = store.find_all(&request).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)), "{err}");
    }
    Ok(())
}

pub async fn save_unknown_id_fails(store: Arc<dyn DocumentStore>) -> anyhow::Result<()> {
    let mut doc = Document::new("ghost");
    doc.id = Some(DocumentId(999));

    let err = store.save(doc).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)), "{err}");
    assert!(!store.exists_by_id(DocumentId(999)).await?);
    Ok(())
}
