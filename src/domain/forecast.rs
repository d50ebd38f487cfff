use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Per-user forecast document: category -> predicted total over the horizon.
/// Built once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub uid: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub generated_at: DateTime<Utc>,
    pub forecast: BTreeMap<String, f64>,
}

impl ForecastResult {
    pub fn new(
        uid: impl Into<String>,
        generated_at: DateTime<Utc>,
        forecast: BTreeMap<String, f64>,
    ) -> Self {
        Self {
            uid: uid.into(),
            generated_at,
            forecast,
        }
    }

    /// Predicted total for a category, if it was forecast.
    pub fn total_for(&self, category: &str) -> Option<f64> {
        self.forecast.get(category).copied()
    }

    pub fn to_document(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

fn serialize_timestamp<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Micros, true))
}
