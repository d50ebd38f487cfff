//! Per-category spending models.
//!
//! The driver only needs one number per category: the predicted total over
//! the next `horizon_days` days. [`CategoryForecaster`] is that seam, and
//! [`SeasonalForecaster`] is the production model.

mod seasonal;

pub use seasonal::*;

use crate::domain::CategorySeries;

/// Error type for forecasting operations
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("Insufficient data: got {0} daily points")]
    InsufficientData(usize),

    #[error("Forecast model error: {0}")]
    ModelError(String),

    #[error("Invalid forecast horizon: {0}")]
    InvalidHorizon(String),
}

pub trait CategoryForecaster {
    /// Fit a model to `series` and return the sum of its predictions over
    /// exactly `horizon_days` days following the last observed day.
    fn forecast_total(
        &self,
        series: &CategorySeries,
        horizon_days: usize,
    ) -> Result<f64, ForecastError>;
}
