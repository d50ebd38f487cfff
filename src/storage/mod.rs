mod sqlite;

pub use sqlite::*;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// SQL migration for the documents table
pub const MIGRATION_001_DOCUMENTS: &str = include_str!("migrations/001_documents.sql");

/// A stored document: its id (last path segment), full path and JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub path: String,
    pub data: Value,
}

/// Hierarchical document store addressed by `/`-separated paths
/// (`collection/doc/collection/doc`).
///
/// Components receive a `&dyn DocumentStore` from their caller, so the
/// connection lifecycle stays with whoever built it.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents directly under a collection, ordered by id.
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>>;

    /// Documents under a collection whose timestamp `field` is strictly after `after`.
    /// Documents where the field is missing or unparseable are returned as well,
    /// so that callers see malformed records instead of silently losing them.
    async fn query_created_after(
        &self,
        collection: &str,
        field: &str,
        after: DateTime<Utc>,
    ) -> Result<Vec<Document>>;

    async fn get_document(&self, path: &str) -> Result<Option<Document>>;

    /// Create or fully replace the document at `path`.
    async fn set_document(&self, path: &str, data: &Value) -> Result<()>;
}
