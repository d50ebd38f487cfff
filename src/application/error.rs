use std::fmt;

use thiserror::Error;

use crate::forecasting::ForecastError;

/// Stage at which processing a user failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    StoreRead,
    InsufficientData,
    Fitting,
    StoreWrite,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::StoreRead => "store_read",
            ErrorKind::InsufficientData => "insufficient_data",
            ErrorKind::Fitting => "fitting",
            ErrorKind::StoreWrite => "store_write",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store read failed: {0:#}")]
    StoreRead(anyhow::Error),

    #[error("Insufficient data for category '{category}': {source}")]
    InsufficientData {
        category: String,
        source: ForecastError,
    },

    #[error("Forecast failed for category '{category}': {source}")]
    Fitting {
        category: String,
        source: ForecastError,
    },

    #[error("Store write failed: {0:#}")]
    StoreWrite(anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::StoreRead(_) => ErrorKind::StoreRead,
            AppError::InsufficientData { .. } => ErrorKind::InsufficientData,
            AppError::Fitting { .. } => ErrorKind::Fitting,
            AppError::StoreWrite(_) => ErrorKind::StoreWrite,
        }
    }

    /// Classify a model error raised while forecasting `category`.
    pub fn forecast(category: impl Into<String>, source: ForecastError) -> Self {
        let category = category.into();
        match source {
            ForecastError::InsufficientData(_) => AppError::InsufficientData { category, source },
            _ => AppError::Fitting { category, source },
        }
    }
}
