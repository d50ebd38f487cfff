use thiserror::Error;

/// Default number of days summed into each forecast.
pub const DEFAULT_FORECAST_HORIZON_DAYS: usize = 30;

/// Default minimum number of transactions a category needs to be forecast.
pub const DEFAULT_MIN_ROWS_PER_CATEGORY: usize = 10;

/// Default trailing window of history fed to the model (about six months).
pub const DEFAULT_LOOKBACK_DAYS: i64 = 180;

/// Longest accepted forecast horizon (ten years).
pub const MAX_FORECAST_HORIZON_DAYS: usize = 3_650;

/// Longest accepted lookback window (a hundred years).
pub const MAX_LOOKBACK_DAYS: i64 = 36_500;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Forecast horizon must be at least one day")]
    ZeroHorizon,

    #[error("Minimum rows per category must be at least 1")]
    ZeroMinRows,

    #[error("Forecast horizon must be at most {max} days, got {0}", max = MAX_FORECAST_HORIZON_DAYS)]
    HorizonTooLong(usize),

    #[error("Lookback window must be positive, got {0} days")]
    NonPositiveLookback(i64),

    #[error("Lookback window must be at most {max} days, got {0}", max = MAX_LOOKBACK_DAYS)]
    LookbackTooLong(i64),
}

/// Tunables for a forecasting run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastConfig {
    pub forecast_horizon_days: usize,
    pub min_rows_per_category: usize,
    pub lookback_days: i64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            forecast_horizon_days: DEFAULT_FORECAST_HORIZON_DAYS,
            min_rows_per_category: DEFAULT_MIN_ROWS_PER_CATEGORY,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }
}

impl ForecastConfig {
    pub fn with_horizon_days(mut self, days: usize) -> Self {
        self.forecast_horizon_days = days;
        self
    }

    pub fn with_min_rows(mut self, rows: usize) -> Self {
        self.min_rows_per_category = rows;
        self
    }

    pub fn with_lookback_days(mut self, days: i64) -> Self {
        self.lookback_days = days;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.forecast_horizon_days == 0 {
            return Err(ConfigError::ZeroHorizon);
        }
        if self.forecast_horizon_days > MAX_FORECAST_HORIZON_DAYS {
            return Err(ConfigError::HorizonTooLong(self.forecast_horizon_days));
        }
        if self.min_rows_per_category == 0 {
            return Err(ConfigError::ZeroMinRows);
        }
        if self.lookback_days <= 0 {
            return Err(ConfigError::NonPositiveLookback(self.lookback_days));
        }
        if self.lookback_days > MAX_LOOKBACK_DAYS {
            return Err(ConfigError::LookbackTooLong(self.lookback_days));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ForecastConfig::default();
        assert_eq!(config.forecast_horizon_days, 30);
        assert_eq!(config.min_rows_per_category, 10);
        assert_eq!(config.lookback_days, 180);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = ForecastConfig::default()
            .with_horizon_days(7)
            .with_min_rows(2)
            .with_lookback_days(30);
        assert_eq!(config.forecast_horizon_days, 7);
        assert_eq!(config.min_rows_per_category, 2);
        assert_eq!(config.lookback_days, 30);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = ForecastConfig::default();
        assert_eq!(
            base.with_horizon_days(0).validate(),
            Err(ConfigError::ZeroHorizon)
        );
        assert_eq!(base.with_min_rows(0).validate(), Err(ConfigError::ZeroMinRows));
        assert_eq!(
            base.with_lookback_days(-5).validate(),
            Err(ConfigError::NonPositiveLookback(-5))
        );
    }

    #[test]
    fn test_validate_rejects_oversized_windows() {
        let base = ForecastConfig::default();
        assert_eq!(
            base.with_lookback_days(10_000_000_000).validate(),
            Err(ConfigError::LookbackTooLong(10_000_000_000))
        );
        assert_eq!(
            base.with_horizon_days(usize::MAX).validate(),
            Err(ConfigError::HorizonTooLong(usize::MAX))
        );
        assert!(
            base.with_lookback_days(MAX_LOOKBACK_DAYS)
                .with_horizon_days(MAX_FORECAST_HORIZON_DAYS)
                .validate()
                .is_ok()
        );
    }
}
