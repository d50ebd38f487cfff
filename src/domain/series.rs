use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;

use super::TransactionRecord;

/// Time-ordered (timestamp, amount) pairs for one user and one category.
/// Exists only while that category is being forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySeries {
    pub category: String,
    points: Vec<(DateTime<Utc>, f64)>,
}

impl CategorySeries {
    pub fn new(category: impl Into<String>, mut points: Vec<(DateTime<Utc>, f64)>) -> Self {
        points.sort_by_key(|(ts, _)| *ts);
        Self {
            category: category.into(),
            points,
        }
    }

    pub fn points(&self) -> &[(DateTime<Utc>, f64)] {
        &self.points
    }

    /// Number of observations (raw records, not days).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.points.last().map(|(ts, _)| *ts)
    }

    /// One value per observed calendar day: the mean amount of that day's
    /// transactions. Days without transactions are left out, not zero-filled.
    /// Returns the values and the last date, or `None` for an empty series.
    pub fn daily_means(&self) -> Option<(Vec<f64>, NaiveDate)> {
        let last_date = self.points.last()?.0.date_naive();

        let mut by_day: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
        for (ts, amount) in &self.points {
            let (sum, count) = by_day.entry(ts.date_naive()).or_insert((0.0, 0));
            *sum += amount;
            *count += 1;
        }

        let values = by_day
            .into_values()
            .map(|(sum, count)| sum / count as f64)
            .collect();

        Some((values, last_date))
    }
}

/// Group records by category. Keys come out sorted, so categories are
/// always processed in the same order.
pub fn group_by_category(records: Vec<TransactionRecord>) -> BTreeMap<String, CategorySeries> {
    let mut points: BTreeMap<String, Vec<(DateTime<Utc>, f64)>> = BTreeMap::new();
    for record in records {
        points
            .entry(record.category)
            .or_default()
            .push((record.timestamp, record.amount));
    }

    points
        .into_iter()
        .map(|(category, pts)| {
            let series = CategorySeries::new(category.clone(), pts);
            (category, series)
        })
        .collect()
}
