use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, error, info, warn};

use crate::config::ForecastConfig;
use crate::domain::{ForecastResult, USERS_COLLECTION, group_by_category};
use crate::forecasting::CategoryForecaster;
use crate::storage::DocumentStore;

use super::{AppError, ForecastWriter, Loader};

/// What happened to one user during a run.
#[derive(Debug)]
pub enum UserOutcome {
    Written {
        uid: String,
        path: String,
        result: ForecastResult,
    },
    Skipped {
        uid: String,
    },
    Failed {
        uid: String,
        error: AppError,
    },
}

impl UserOutcome {
    pub fn uid(&self) -> &str {
        match self {
            UserOutcome::Written { uid, .. }
            | UserOutcome::Skipped { uid }
            | UserOutcome::Failed { uid, .. } => uid,
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self, UserOutcome::Written { .. })
    }
}

/// Operator progress line: `WROTE <path>`, `SKIP <uid> (no transactions)`
/// or `ERROR <uid> <message>`.
impl fmt::Display for UserOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserOutcome::Written { path, .. } => write!(f, "WROTE {}", path),
            UserOutcome::Skipped { uid } => write!(f, "SKIP {} (no transactions)", uid),
            UserOutcome::Failed { uid, error } => write!(f, "ERROR {} {}", uid, error),
        }
    }
}

/// Runs load -> forecast -> write for every user, one at a time.
pub struct ForecastDriver<'a> {
    store: &'a dyn DocumentStore,
    forecaster: &'a dyn CategoryForecaster,
    config: ForecastConfig,
}

impl<'a> ForecastDriver<'a> {
    pub fn new(
        store: &'a dyn DocumentStore,
        forecaster: &'a dyn CategoryForecaster,
        config: ForecastConfig,
    ) -> Self {
        Self {
            store,
            forecaster,
            config,
        }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// All user ids known to the store, in id order.
    pub async fn list_users(&self) -> Result<Vec<String>> {
        let docs = self.store.list_documents(USERS_COLLECTION).await?;
        Ok(docs.into_iter().map(|doc| doc.id).collect())
    }

    /// Process every user as of now.
    pub async fn run_all(&self, on_outcome: impl FnMut(&UserOutcome)) -> Result<Vec<UserOutcome>> {
        self.run_all_at(Utc::now(), on_outcome).await
    }

    /// Process every user as of `now`, calling `on_outcome` after each one.
    /// Only an invalid config or a failure to enumerate users aborts the run.
    pub async fn run_all_at(
        &self,
        now: DateTime<Utc>,
        mut on_outcome: impl FnMut(&UserOutcome),
    ) -> Result<Vec<UserOutcome>> {
        self.config.validate()?;
        let uids = self.list_users().await?;
        info!(users = uids.len(), "Starting forecast run");

        let mut outcomes = Vec::with_capacity(uids.len());
        for uid in uids {
            let outcome = self.run_user_at(&uid, now).await;
            on_outcome(&outcome);
            outcomes.push(outcome);
        }

        let written = outcomes.iter().filter(|o| o.is_written()).count();
        let failed = outcomes
            .iter()
            .filter(|o| matches!(o, UserOutcome::Failed { .. }))
            .count();
        info!(
            users = outcomes.len(),
            written,
            skipped = outcomes.len() - written - failed,
            failed,
            "Forecast run finished"
        );

        Ok(outcomes)
    }

    /// Process a single user as of `now`. Never returns an error: failures
    /// become [`UserOutcome::Failed`] and nothing is written for that user.
    pub async fn run_user_at(&self, uid: &str, now: DateTime<Utc>) -> UserOutcome {
        match self.process_user(uid, now).await {
            Ok(Some((path, result))) => UserOutcome::Written {
                uid: uid.to_string(),
                path,
                result,
            },
            Ok(None) => {
                warn!(uid, "No transactions in lookback window, skipping");
                UserOutcome::Skipped {
                    uid: uid.to_string(),
                }
            }
            Err(err) => {
                error!(uid, kind = %err.kind(), error = %err, "Failed to forecast user");
                UserOutcome::Failed {
                    uid: uid.to_string(),
                    error: err,
                }
            }
        }
    }

    /// Start of the lookback window: midnight UTC, `lookback_days` before `now`'s date.
    /// A window reaching past the earliest representable date starts there.
    pub fn cutoff_for(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let since = Duration::try_days(self.config.lookback_days)
            .and_then(|window| now.date_naive().checked_sub_signed(window))
            .unwrap_or(NaiveDate::MIN);
        since.and_time(NaiveTime::MIN).and_utc()
    }

    async fn process_user(
        &self,
        uid: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<(String, ForecastResult)>, AppError> {
        let cutoff = self.cutoff_for(now);
        let records = Loader::new(self.store)
            .load(uid, cutoff)
            .await
            .map_err(AppError::StoreRead)?;

        if records.is_empty() {
            return Ok(None);
        }

        let mut forecast = BTreeMap::new();
        for (category, series) in group_by_category(records) {
            if series.len() < self.config.min_rows_per_category {
                debug!(
                    uid,
                    category = %category,
                    rows = series.len(),
                    "Not enough rows, category left out"
                );
                continue;
            }

            let total = self
                .forecaster
                .forecast_total(&series, self.config.forecast_horizon_days)
                .map_err(|e| AppError::forecast(category.clone(), e))?;
            forecast.insert(category, total);
        }

        let result = ForecastResult::new(uid, now, forecast);
        let path = ForecastWriter::new(self.store)
            .write(uid, now.date_naive(), &result)
            .await
            .map_err(AppError::StoreWrite)?;

        Ok(Some((path, result)))
    }
}
