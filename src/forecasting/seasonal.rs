//! Weekly-seasonal spending model built on augurs (MSTL + AutoETS).
//!
//! The model sees one value per day that had spending (the mean amount of
//! that day's transactions), in time order. Days without transactions are
//! not observations. The forecast for each of the next `horizon_days` steps
//! is therefore a typical transaction amount, and the total is their sum.
//!
//! The model is chosen by how many observed days there are:
//!
//! - at least 14: MSTL with a single weekly period (7) over a non-seasonal
//!   AutoETS trend. No daily or yearly component.
//! - at least 7: non-seasonal AutoETS.
//! - fewer than 7, or no variation at all: flat forecast at the mean.

use augurs::{ets::AutoETS, forecaster::Forecaster, mstl::MSTLModel};
use tracing::debug;

use crate::config::MAX_FORECAST_HORIZON_DAYS;
use crate::domain::CategorySeries;

use super::{CategoryForecaster, ForecastError};

/// Weekly seasonality period (7 days)
const WEEKLY_PERIOD: usize = 7;

/// Minimum observed days for seasonal (MSTL) forecasting
const MIN_SEASONAL_DAYS: usize = 2 * WEEKLY_PERIOD;

/// Minimum observed days for fitting an ETS model at all
const MIN_ETS_DAYS: usize = WEEKLY_PERIOD;

/// Interval level requested from the model; only point forecasts are used.
const INTERVAL_LEVEL: f64 = 0.95;

/// Which model produced a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Seasonal,
    Trend,
    Flat,
}

impl ModelKind {
    /// Model used for a series of `days` observed days.
    pub fn for_days(days: usize) -> Self {
        if days >= MIN_SEASONAL_DAYS {
            ModelKind::Seasonal
        } else if days >= MIN_ETS_DAYS {
            ModelKind::Trend
        } else {
            ModelKind::Flat
        }
    }

    /// Model used for `values`. A series without variation is always flat.
    pub fn for_values(values: &[f64]) -> Self {
        let constant = values
            .first()
            .is_some_and(|first| values.iter().all(|v| (v - first).abs() < f64::EPSILON));
        if constant {
            ModelKind::Flat
        } else {
            Self::for_days(values.len())
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SeasonalForecaster;

impl SeasonalForecaster {
    pub fn new() -> Self {
        Self
    }

    /// Point forecasts for the `horizon_days` steps after the last observed day.
    pub fn predict_daily(
        &self,
        series: &CategorySeries,
        horizon_days: usize,
    ) -> Result<Vec<f64>, ForecastError> {
        if horizon_days == 0 {
            return Err(ForecastError::InvalidHorizon(
                "horizon_days must be > 0".to_string(),
            ));
        }
        if horizon_days > MAX_FORECAST_HORIZON_DAYS {
            return Err(ForecastError::InvalidHorizon(format!(
                "horizon_days must be <= {}, got {}",
                MAX_FORECAST_HORIZON_DAYS, horizon_days
            )));
        }

        let (values, last_date) = series
            .daily_means()
            .ok_or(ForecastError::InsufficientData(0))?;

        let kind = ModelKind::for_values(&values);
        debug!(
            category = %series.category,
            days = values.len(),
            last_date = %last_date,
            model = ?kind,
            "Fitting category model"
        );

        let point = match kind {
            ModelKind::Seasonal => forecast_with_mstl(&values, horizon_days)?,
            ModelKind::Trend => forecast_with_ets(&values, horizon_days)?,
            ModelKind::Flat => {
                let mean = values.iter().sum::<f64>() / values.len() as f64;
                vec![mean; horizon_days]
            }
        };

        if point.len() < horizon_days {
            return Err(ForecastError::ModelError(format!(
                "expected {} predicted points, got {}",
                horizon_days,
                point.len()
            )));
        }

        Ok(point.into_iter().take(horizon_days).collect())
    }
}

impl CategoryForecaster for SeasonalForecaster {
    fn forecast_total(
        &self,
        series: &CategorySeries,
        horizon_days: usize,
    ) -> Result<f64, ForecastError> {
        let total: f64 = self.predict_daily(series, horizon_days)?.iter().sum();
        if !total.is_finite() {
            return Err(ForecastError::ModelError(format!(
                "non-finite forecast for category '{}'",
                series.category
            )));
        }
        Ok(total)
    }
}

/// Forecast using MSTL (weekly seasonal decomposition) with an AutoETS trend model.
fn forecast_with_mstl(values: &[f64], horizon: usize) -> Result<Vec<f64>, ForecastError> {
    let ets = AutoETS::non_seasonal().into_trend_model();
    let mstl = MSTLModel::new(vec![WEEKLY_PERIOD], ets);
    let mut forecaster = Forecaster::new(mstl);

    forecaster
        .fit(values)
        .map_err(|e| ForecastError::ModelError(format!("MSTL fit error: {e}")))?;

    let forecast = forecaster
        .predict(horizon, INTERVAL_LEVEL)
        .map_err(|e| ForecastError::ModelError(format!("MSTL predict error: {e}")))?;

    Ok(forecast.point)
}

/// Forecast using simple AutoETS (no seasonal decomposition).
fn forecast_with_ets(values: &[f64], horizon: usize) -> Result<Vec<f64>, ForecastError> {
    let ets = AutoETS::non_seasonal();
    let mut forecaster = Forecaster::new(ets);

    forecaster
        .fit(values)
        .map_err(|e| ForecastError::ModelError(format!("ETS fit error: {e}")))?;

    let forecast = forecaster
        .predict(horizon, INTERVAL_LEVEL)
        .map_err(|e| ForecastError::ModelError(format!("ETS predict error: {e}")))?;

    Ok(forecast.point)
}
