use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::info;

use crate::domain::{ForecastResult, forecast_document_path};
use crate::storage::DocumentStore;

/// Persists forecast documents, one per user per calendar day.
pub struct ForecastWriter<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> ForecastWriter<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Write `result` at `ai-forecast/<uid>/daily/<date>`, replacing whatever
    /// is there. Returns the path written.
    pub async fn write(&self, uid: &str, date: NaiveDate, result: &ForecastResult) -> Result<String> {
        let path = forecast_document_path(uid, date);
        let data = result
            .to_document()
            .context("Failed to serialize forecast")?;

        self.store.set_document(&path, &data).await?;

        info!(uid, path = %path, categories = result.forecast.len(), "Wrote forecast");
        Ok(path)
    }
}
