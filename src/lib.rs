pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod forecasting;
pub mod io;
pub mod logging;
pub mod storage;

pub use config::ForecastConfig;
pub use storage::{DocumentStore, SqliteStore};
