use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{Row, SqlitePool};

use crate::domain::split_document_path;

use super::{Document, DocumentStore, MIGRATION_001_DOCUMENTS};

/// Document store backed by a single SQLite table.
/// Each document body is kept as JSON text and addressed by its full path.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new store with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_DOCUMENTS)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Create (if missing) and migrate the database file at `database_path`.
    pub async fn init(database_path: &str) -> Result<Self> {
        let store = Self::connect(&format!("sqlite:{}?mode=rwc", database_path)).await?;
        store.migrate().await?;
        Ok(store)
    }

    /// Open an existing database file at `database_path`.
    pub async fn open(database_path: &str) -> Result<Self> {
        Self::connect(&format!("sqlite:{}", database_path)).await
    }

    fn row_to_document(row: &sqlx::sqlite::SqliteRow) -> Result<Document> {
        let path: String = row.get("path");
        let data: String = row.get("data");

        Ok(Document {
            id: row.get("doc_id"),
            data: serde_json::from_str(&data)
                .with_context(|| format!("Invalid JSON stored at {}", path))?,
            path,
        })
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>> {
        let rows = sqlx::query(
            r#"
            SELECT path, doc_id, data
            FROM documents
            WHERE collection = ?
            ORDER BY doc_id
            "#,
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Failed to list documents in {}", collection))?;

        rows.iter().map(Self::row_to_document).collect()
    }

    async fn query_created_after(
        &self,
        collection: &str,
        field: &str,
        after: DateTime<Utc>,
    ) -> Result<Vec<Document>> {
        let json_path = format!("$.{}", field);

        // julianday() only narrows the scan: it rounds to about a millisecond,
        // so rows within a second of the cutoff are decided by created_after.
        let rows = sqlx::query(
            r#"
            SELECT path, doc_id, data
            FROM documents
            WHERE collection = ?1
              AND (
                julianday(?3) IS NULL
                OR julianday(json_extract(data, ?2)) IS NULL
                OR julianday(json_extract(data, ?2)) >= julianday(?3, '-1 seconds')
              )
            ORDER BY doc_id
            "#,
        )
        .bind(collection)
        .bind(&json_path)
        .bind(after.to_rfc3339())
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Failed to query documents in {}", collection))?;

        let docs = rows
            .iter()
            .map(Self::row_to_document)
            .collect::<Result<Vec<_>>>()?;

        Ok(docs
            .into_iter()
            .filter(|doc| created_after(&doc.data, field, after))
            .collect())
    }

    async fn get_document(&self, path: &str) -> Result<Option<Document>> {
        let row = sqlx::query("SELECT path, doc_id, data FROM documents WHERE path = ?")
            .bind(path)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to fetch document {}", path))?;

        row.as_ref().map(Self::row_to_document).transpose()
    }

    async fn set_document(&self, path: &str, data: &Value) -> Result<()> {
        let (collection, doc_id) = split_document_path(path)
            .ok_or_else(|| anyhow::anyhow!("Invalid document path: {}", path))?;
        let body = serde_json::to_string(data)?;

        sqlx::query(
            r#"
            INSERT INTO documents (path, collection, doc_id, data, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(path) DO UPDATE SET
                data = excluded.data,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(path)
        .bind(collection)
        .bind(doc_id)
        .bind(&body)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to write document {}", path))?;

        Ok(())
    }
}

/// Whether `data[field]` is strictly after `after`, at full precision.
/// Values that are not RFC 3339 strings are kept so the reader can report them.
fn created_after(data: &Value, field: &str, after: DateTime<Utc>) -> bool {
    data.get(field)
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .is_none_or(|ts| ts.with_timezone(&Utc) > after)
}
