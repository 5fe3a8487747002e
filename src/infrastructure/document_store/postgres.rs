use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;
use tracing::{debug, instrument};

use crate::domain::{
    ports::{check_assigned_id, DocumentStore},
    Document, DocumentId, DomainError, Page, PageRequest, Sort, SortField,
};

pub const DEFAULT_TABLE: &str = "documents";

const COLUMNS: &str = "id, title, metadata, created_at, updated_at";

/// Document store over a Postgres table keyed by a `BIGSERIAL` id.
///
/// The pool is owned by the caller; the store only borrows connections
/// from it per statement.
pub struct PostgresDocumentStore {
    pool: PgPool,
    table: String,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            table: DEFAULT_TABLE.to_string(),
        }
    }

    /// Uses `table` instead of `documents`. The name is interpolated into
    /// SQL, so only plain identifiers are accepted.
    pub fn with_table(mut self, table: impl Into<String>) -> Result<Self, DomainError> {
        let table = table.into();
        validate_identifier(&table)?;
        self.table = table;
        Ok(self)
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Creates the table if it does not exist yet.
    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id BIGSERIAL PRIMARY KEY,
                title TEXT NOT NULL,
                metadata JSONB NOT NULL DEFAULT '{{}}'::jsonb,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )",
            self.table
        );

        sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;

        Ok(())
    }

    fn order_by(sort: Option<Sort>) -> String {
        match sort {
            None => "id ASC".to_string(),
            Some(Sort {
                field: SortField::Id,
                direction,
            }) => format!("id {}", direction.as_sql()),
            Some(sort) => format!(
                "{} {}, id ASC",
                sort.field.column(),
                sort.direction.as_sql()
            ),
        }
    }

    async fn insert(&self, doc: &Document) -> Result<Document, DomainError> {
        let sql = format!(
            "INSERT INTO {} (title, metadata, created_at, updated_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}",
            self.table
        );

        let row = sqlx::query(&sql)
            .bind(&doc.title)
            .bind(&doc.metadata)
            .bind(doc.created_at)
            .bind(doc.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;

        from_row(&row)
    }

    async fn update(&self, id: DocumentId, doc: &Document) -> Result<Document, DomainError> {
        let sql = format!(
            "UPDATE {} SET title = $2, metadata = $3, created_at = $4, updated_at = $5
             WHERE id = $1
             RETURNING {COLUMNS}",
            self.table
        );

        let row = sqlx::query(&sql)
            .bind(id.get())
            .bind(&doc.title)
            .bind(&doc.metadata)
            .bind(doc.created_at)
            .bind(doc.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?
            .ok_or_else(|| DomainError::not_found(format!("document {id}")))?;

        from_row(&row)
    }
}

fn validate_identifier(name: &str) -> Result<(), DomainError> {
    let mut chars = name.chars();
    let valid = name.len() <= 63
        && chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(DomainError::invalid_argument(format!(
            "invalid table name: {name:?}"
        )))
    }
}

fn from_row(row: &PgRow) -> Result<Document, DomainError> {
    let decode = |e: sqlx::Error| DomainError::storage(e.to_string());

    Ok(Document {
        id: Some(DocumentId(row.try_get("id").map_err(decode)?)),
        title: row.try_get("title").map_err(decode)?,
        metadata: row.try_get("metadata").map_err(decode)?,
        created_at: row.try_get("created_at").map_err(decode)?,
        updated_at: row.try_get("updated_at").map_err(decode)?,
    })
}

fn to_i64(value: u64) -> Result<i64, DomainError> {
    i64::try_from(value)
        .map_err(|_| DomainError::invalid_argument(format!("{value} is out of range")))
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    #[instrument(skip(self, doc), fields(id = ?doc.id))]
    async fn save(&self, doc: Document) -> Result<Document, DomainError> {
        check_assigned_id(&doc)?;

        let saved = match doc.id {
            Some(id) => self.update(id, &doc).await?,
            None => self.insert(&doc).await?,
        };

        debug!(id = ?saved.id, "document saved");
        Ok(saved)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: DocumentId) -> Result<Option<Document>, DomainError> {
        let sql = format!("SELECT {COLUMNS} FROM {} WHERE id = $1", self.table);

        sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?
            .map(|row| from_row(&row))
            .transpose()
    }

    #[instrument(skip(self))]
    async fn find_all(&self, page: &PageRequest) -> Result<Page<Document>, DomainError> {
        page.validate()?;

        let total = self.count().await?;

        let sql = format!(
            "SELECT {COLUMNS} FROM {} ORDER BY {} LIMIT $1 OFFSET $2",
            self.table,
            Self::order_by(page.sort)
        );

        let rows = sqlx::query(&sql)
            .bind(to_i64(page.limit)?)
            .bind(to_i64(page.offset)?)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;

        let items = rows
            .iter()
            .map(from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(items, total, page))
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: DocumentId) -> Result<(), DomainError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table);

        let result = sqlx::query(&sql)
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;

        debug!(rows = result.rows_affected(), "document delete");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn exists_by_id(&self, id: DocumentId) -> Result<bool, DomainError> {
        let sql = format!("SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1)", self.table);

        sqlx::query_scalar::<_, bool>(&sql)
            .bind(id.get())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))
    }

    #[instrument(skip(self))]
    async fn count(&self) -> Result<u64, DomainError> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);

        let count = sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;

        u64::try_from(count).map_err(|_| DomainError::internal(format!("negative count {count}")))
    }
}
