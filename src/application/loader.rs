use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::domain::{CREATED_AT_FIELD, TransactionRecord, transactions_collection};
use crate::storage::DocumentStore;

/// Reads a user's transaction history out of the store.
pub struct Loader<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> Loader<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Transactions of `uid` created strictly after `cutoff`.
    /// An empty vector means the user has no history in the window.
    /// Store failures and malformed documents are returned as errors.
    pub async fn load(&self, uid: &str, cutoff: DateTime<Utc>) -> Result<Vec<TransactionRecord>> {
        let collection = transactions_collection(uid);
        let docs = self
            .store
            .query_created_after(&collection, CREATED_AT_FIELD, cutoff)
            .await?;

        docs.iter()
            .map(|doc| {
                TransactionRecord::from_document(&doc.data)
                    .with_context(|| format!("Failed to read transaction {}", doc.path))
            })
            .collect()
    }
}
