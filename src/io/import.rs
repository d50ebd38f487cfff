use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use std::io::Read;
use uuid::Uuid;

use crate::domain::{transactions_collection, user_path};
use crate::storage::DocumentStore;

/// Result of an import operation
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub imported: usize,
    pub errors: Vec<ImportError>,
}

/// Error that occurred during import
#[derive(Debug, Clone)]
pub struct ImportError {
    pub line: usize,
    pub field: Option<String>,
    pub error: String,
}

/// Options for import operations
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub dry_run: bool,
}

/// Loads transaction rows from CSV into `users/<uid>/transactions`.
///
/// Expected header: `createdAt,amount,catName`. `catName` may be empty or
/// missing, in which case the row is stored without a category.
pub struct Importer<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> Importer<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    pub async fn import_transactions_csv<R: Read>(
        &self,
        uid: &str,
        reader: R,
        options: ImportOptions,
    ) -> Result<ImportResult> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let column = |name: &str| headers.iter().position(|h| h.trim() == name);

        let created_at_col = column("createdAt")
            .ok_or_else(|| anyhow::anyhow!("Missing required column: createdAt"))?;
        let amount_col =
            column("amount").ok_or_else(|| anyhow::anyhow!("Missing required column: amount"))?;
        let category_col = column("catName");

        let mut imported = 0;
        let mut errors = Vec::new();
        let mut records = Vec::new();

        for (line_num, result) in csv_reader.records().enumerate() {
            let line = line_num + 2; // +2 for header and 0-indexing

            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    errors.push(ImportError {
                        line,
                        field: None,
                        error: format!("CSV parse error: {}", e),
                    });
                    continue;
                }
            };

            let timestamp = match parse_timestamp(record.get(created_at_col).unwrap_or("")) {
                Ok(ts) => ts,
                Err(e) => {
                    errors.push(ImportError {
                        line,
                        field: Some("createdAt".to_string()),
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            let amount_str = record.get(amount_col).unwrap_or("").trim();
            let amount = match amount_str.parse::<f64>() {
                Ok(a) if a.is_finite() => a,
                _ => {
                    errors.push(ImportError {
                        line,
                        field: Some("amount".to_string()),
                        error: format!("Invalid amount: {}", amount_str),
                    });
                    continue;
                }
            };

            let category = category_col
                .and_then(|col| record.get(col))
                .map(str::trim)
                .filter(|s| !s.is_empty());

            records.push((timestamp, amount, category.map(str::to_string)));
        }

        if options.dry_run {
            return Ok(ImportResult {
                imported: records.len(),
                errors,
            });
        }

        if !records.is_empty() && self.store.get_document(&user_path(uid)).await?.is_none() {
            self.store
                .set_document(&user_path(uid), &json!({ "uid": uid }))
                .await?;
        }

        let collection = transactions_collection(uid);
        for (timestamp, amount, category) in records {
            let mut data = json!({
                "createdAt": timestamp.to_rfc3339(),
                "amount": amount,
            });
            if let Some(category) = category {
                data["catName"] = json!(category);
            }

            let path = format!("{}/{}", collection, Uuid::new_v4());
            self.store.set_document(&path, &data).await?;
            imported += 1;
        }

        Ok(ImportResult { imported, errors })
    }
}

// Helper function to parse timestamp
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();

    // Try RFC3339 first
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Try YYYY-MM-DD format
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc());
        }
    }

    anyhow::bail!("Invalid timestamp format: {}", s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(
            parse_timestamp("2026-06-01").unwrap(),
            Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_timestamp(" 2026-06-01T09:15:00Z ").unwrap(),
            Utc.with_ymd_and_hms(2026, 6, 1, 9, 15, 0).unwrap()
        );
        assert!(parse_timestamp("06/01/2026").is_err());
    }
}
