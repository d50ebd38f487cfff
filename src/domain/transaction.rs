use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Category assigned to transactions that carry no `catName`.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Field holding the creation timestamp of a transaction document.
pub const CREATED_AT_FIELD: &str = "createdAt";

/// A single spending record as read from the store.
/// Records are never written back; the store owns them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// When the transaction was created
    pub timestamp: DateTime<Utc>,
    /// Amount in currency units (not cents: the model works on floats)
    pub amount: f64,
    /// User-assigned category, `"unknown"` when missing
    pub category: String,
}

/// Raw document shape under `users/<uid>/transactions/*`.
#[derive(Debug, Deserialize)]
struct TransactionDocument {
    #[serde(rename = "createdAt")]
    created_at: String,
    amount: Amount,
    #[serde(rename = "catName", default)]
    cat_name: Option<String>,
}

/// Amounts arrive either as JSON numbers or as numeric strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    fn to_f64(&self) -> Result<f64> {
        match self {
            Amount::Number(n) => Ok(*n),
            Amount::Text(s) => s
                .trim()
                .parse::<f64>()
                .with_context(|| format!("Invalid amount: {}", s)),
        }
    }
}

impl TransactionRecord {
    pub fn new(timestamp: DateTime<Utc>, amount: f64, category: impl Into<String>) -> Self {
        Self {
            timestamp,
            amount,
            category: category.into(),
        }
    }

    /// Map a transaction document to a record.
    pub fn from_document(data: &Value) -> Result<Self> {
        let doc = TransactionDocument::deserialize(data).context("Malformed transaction document")?;

        let timestamp = DateTime::parse_from_rfc3339(&doc.created_at)
            .with_context(|| format!("Invalid createdAt timestamp: {}", doc.created_at))?
            .with_timezone(&Utc);

        let amount = doc.amount.to_f64()?;
        if !amount.is_finite() {
            anyhow::bail!("Invalid amount: {}", amount);
        }

        Ok(Self {
            timestamp,
            amount,
            category: doc.cat_name.unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
        })
    }

    /// Build the document representation used by the store.
    pub fn to_document(&self) -> Value {
        serde_json::json!({
            "createdAt": self.timestamp.to_rfc3339(),
            "amount": self.amount,
            "catName": self.category,
        })
    }
}
