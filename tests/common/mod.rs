// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde_json::{Value, json};
use std::collections::HashSet;
use spendcast::domain::{
    CategorySeries, TransactionRecord, transactions_collection, user_path,
};
use spendcast::forecasting::{CategoryForecaster, ForecastError};
use spendcast::storage::{Document, DocumentStore, SqliteStore};
use tempfile::TempDir;

/// Helper to create a test store with a temporary database
pub async fn test_store() -> Result<(SqliteStore, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let store = SqliteStore::init(db_path.to_str().unwrap()).await?;
    Ok((store, temp_dir))
}

/// Helper to parse a date string into DateTime<Utc> at midnight
pub fn parse_date(date_str: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

/// Fixed "now" for driver runs: 2026-10-19 06:00 UTC
pub fn run_time() -> DateTime<Utc> {
    parse_date("2026-10-19") + Duration::hours(6)
}

/// Test fixture: users and their transactions
pub struct Seed;

impl Seed {
    /// Register a user document.
    pub async fn user(store: &dyn DocumentStore, uid: &str) -> Result<()> {
        store.set_document(&user_path(uid), &json!({ "uid": uid })).await
    }

    /// Store one raw transaction document.
    pub async fn raw_transaction(
        store: &dyn DocumentStore,
        uid: &str,
        doc_id: &str,
        data: Value,
    ) -> Result<()> {
        let path = format!("{}/{}", transactions_collection(uid), doc_id);
        store.set_document(&path, &data).await
    }

    /// Store `count` transactions of `amount` in `category`, one every
    /// `step_days` days going back from `last`.
    pub async fn transactions(
        store: &dyn DocumentStore,
        uid: &str,
        category: &str,
        count: usize,
        last: DateTime<Utc>,
        step_days: i64,
        amount: f64,
    ) -> Result<()> {
        for i in 0..count {
            let ts = last - Duration::days(step_days * i as i64);
            let record = TransactionRecord::new(ts, amount, category);
            Self::raw_transaction(
                store,
                uid,
                &format!("{}-{}", category, i),
                record.to_document(),
            )
            .await?;
        }
        Ok(())
    }
}

/// Forecaster stand-in: mean observed amount per transaction times the
/// horizon. Categories listed in `failing` raise a model error.
#[derive(Default)]
pub struct StubForecaster {
    pub failing: HashSet<String>,
}

impl StubForecaster {
    pub fn failing_on(category: &str) -> Self {
        Self {
            failing: HashSet::from([category.to_string()]),
        }
    }
}

impl CategoryForecaster for StubForecaster {
    fn forecast_total(
        &self,
        series: &CategorySeries,
        horizon_days: usize,
    ) -> Result<f64, ForecastError> {
        if self.failing.contains(&series.category) {
            return Err(ForecastError::ModelError("degenerate series".to_string()));
        }
        let mean =
            series.points().iter().map(|(_, a)| a).sum::<f64>() / series.len() as f64;
        Ok(mean * horizon_days as f64)
    }
}

/// Store wrapper that fails reads or writes for selected users.
pub struct FlakyStore<'a> {
    pub inner: &'a dyn DocumentStore,
    pub fail_reads_for: HashSet<String>,
    pub fail_writes_for: HashSet<String>,
}

impl<'a> FlakyStore<'a> {
    pub fn new(inner: &'a dyn DocumentStore) -> Self {
        Self {
            inner,
            fail_reads_for: HashSet::new(),
            fail_writes_for: HashSet::new(),
        }
    }

    pub fn fail_reads(mut self, uid: &str) -> Self {
        self.fail_reads_for.insert(uid.to_string());
        self
    }

    pub fn fail_writes(mut self, uid: &str) -> Self {
        self.fail_writes_for.insert(uid.to_string());
        self
    }

    fn involves(set: &HashSet<String>, path: &str) -> bool {
        set.iter().any(|uid| path.split('/').nth(1) == Some(uid.as_str()))
    }
}

#[async_trait]
impl DocumentStore for FlakyStore<'_> {
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>> {
        self.inner.list_documents(collection).await
    }

    async fn query_created_after(
        &self,
        collection: &str,
        field: &str,
        after: DateTime<Utc>,
    ) -> Result<Vec<Document>> {
        if Self::involves(&self.fail_reads_for, collection) {
            anyhow::bail!("permission denied reading {}", collection);
        }
        self.inner.query_created_after(collection, field, after).await
    }

    async fn get_document(&self, path: &str) -> Result<Option<Document>> {
        self.inner.get_document(path).await
    }

    async fn set_document(&self, path: &str, data: &Value) -> Result<()> {
        if Self::involves(&self.fail_writes_for, path) {
            anyhow::bail!("network unavailable writing {}", path);
        }
        self.inner.set_document(path, data).await
    }
}
