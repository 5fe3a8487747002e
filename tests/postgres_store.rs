//! Runs the store contract against a live database. The database-backed
//! tests are ignored by default; run them with
//! `DATABASE_URL=postgres://... cargo test -- --ignored`.

mod common;

use std::sync::Arc;

use chat_service::infrastructure::{create_pool, DatabaseConfig};
use chat_service::{DocumentId, DocumentStore, PostgresDocumentStore};
use sqlx::PgPool;

struct TestTable {
    pool: PgPool,
    store: Arc<PostgresDocumentStore>,
}

impl TestTable {
    async fn create(name: &str) -> anyhow::Result<Self> {
        common::init_tracing();

        let url = std::env::var("DATABASE_URL")?;
        let pool = create_pool(&DatabaseConfig {
            url,
            ..Default::default()
        })?;

        let table = format!("documents_test_{name}_{}", std::process::id());
        let store = PostgresDocumentStore::new(pool.clone()).with_table(table)?;
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", store.table()))
            .execute(&pool)
            .await?;
        store.ensure_table().await?;

        Ok(Self {
            pool,
            store: Arc::new(store),
        })
    }

    fn store(&self) -> Arc<dyn DocumentStore> {
        self.store.clone()
    }

    async fn drop_table(self) -> anyhow::Result<()> {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", self.store.table()))
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[tokio::test]
async fn test_unreachable_database_is_storage_error() {
    let pool = create_pool(&DatabaseConfig {
        url: "postgres://nobody@127.0.0.1:1/none".to_string(),
        max_connections: 1,
        acquire_timeout_seconds: 1,
    })
    .unwrap();
    let store = PostgresDocumentStore::new(pool);

    let err = store.find_by_id(DocumentId(1)).await.unwrap_err();
    assert!(err.is_storage(), "{err}");

    let err = store.count().await.unwrap_err();
    assert!(err.is_storage(), "{err}");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_lifecycle() {
    let table = TestTable::create("lifecycle").await.unwrap();
    common::lifecycle(table.store()).await.unwrap();
    table.drop_table().await.unwrap();
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_round_trip() {
    let table = TestTable::create("round_trip").await.unwrap();
    common::round_trip(table.store()).await.unwrap();
    table.drop_table().await.unwrap();
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_delete_is_idempotent() {
    let table = TestTable::create("delete").await.unwrap();
    common::delete_is_idempotent(table.store()).await.unwrap();
    table.drop_table().await.unwrap();
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_count_and_exists() {
    let table = TestTable::create("count").await.unwrap();
    common::count_tracks_saves(table.store()).await.unwrap();
    common::exists_follows_lifecycle(table.store()).await.unwrap();
    table.drop_table().await.unwrap();
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_paging() {
    let table = TestTable::create("paging").await.unwrap();
    common::pages_cover_everything(table.store()).await.unwrap();
    common::rejects_bad_paging(table.store()).await.unwrap();
    table.drop_table().await.unwrap();
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_save_unknown_id_fails() {
    let table = TestTable::create("unknown").await.unwrap();
    common::save_unknown_id_fails(table.store()).await.unwrap();
    table.drop_table().await.unwrap();
}
