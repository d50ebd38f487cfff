use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};

use crate::application::{ForecastDriver, UserOutcome};
use crate::config::{
    DEFAULT_FORECAST_HORIZON_DAYS, DEFAULT_LOOKBACK_DAYS, DEFAULT_MIN_ROWS_PER_CATEGORY,
    ForecastConfig,
};
use crate::domain::{ForecastResult, forecast_document_path};
use crate::forecasting::SeasonalForecaster;
use crate::logging;
use crate::storage::{DocumentStore, SqliteStore};

/// Spendcast - per-category spending forecasts
#[derive(Parser)]
#[command(name = "spendcast")]
#[command(about = "Computes 30-day per-category spending forecasts for every user in the store")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "SPENDCAST_DATABASE", default_value = "spendcast.db")]
    pub database: String,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Forecast every user and write today's documents
    Run {
        /// Number of days summed into each forecast
        #[arg(long, env = "SPENDCAST_HORIZON_DAYS", default_value_t = DEFAULT_FORECAST_HORIZON_DAYS)]
        horizon_days: usize,

        /// Minimum transactions a category needs to be forecast
        #[arg(long, env = "SPENDCAST_MIN_ROWS", default_value_t = DEFAULT_MIN_ROWS_PER_CATEGORY)]
        min_rows: usize,

        /// Days of history fed to the model
        #[arg(long, env = "SPENDCAST_LOOKBACK_DAYS", default_value_t = DEFAULT_LOOKBACK_DAYS)]
        lookback_days: i64,
    },

    /// Import a user's transactions from CSV (header: createdAt,amount,catName)
    Import {
        /// User id
        uid: String,

        /// Input file (stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,

        /// Validate without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Show a stored forecast document
    Show {
        /// User id
        uid: String,

        /// Forecast date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        logging::init(self.verbose);

        match self.command {
            Commands::Init => {
                SqliteStore::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Run {
                horizon_days,
                min_rows,
                lookback_days,
            } => {
                let config = ForecastConfig::default()
                    .with_horizon_days(horizon_days)
                    .with_min_rows(min_rows)
                    .with_lookback_days(lookback_days);
                config.validate()?;

                let store = SqliteStore::open(&self.database).await?;
                run_forecast_command(&store, config).await?;
            }

            Commands::Import {
                uid,
                input,
                dry_run,
            } => {
                let store = SqliteStore::open(&self.database).await?;
                run_import_command(&store, &uid, input.as_deref(), dry_run).await?;
            }

            Commands::Show { uid, date } => {
                let store = SqliteStore::open(&self.database).await?;
                let date = match date {
                    Some(date_str) => parse_date(&date_str).with_context(|| {
                        format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str)
                    })?,
                    None => Utc::now().date_naive(),
                };
                run_show_command(&store, &uid, date).await?;
            }
        }

        Ok(())
    }
}

async fn run_forecast_command(store: &dyn DocumentStore, config: ForecastConfig) -> Result<()> {
    let forecaster = SeasonalForecaster::new();
    let driver = ForecastDriver::new(store, &forecaster, config);

    driver
        .run_all(|outcome: &UserOutcome| println!("{}", outcome))
        .await?;

    Ok(())
}

async fn run_import_command(
    store: &dyn DocumentStore,
    uid: &str,
    input: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    use crate::io::{ImportOptions, Importer};
    use std::fs::File;
    use std::io::{Read, stdin};

    let importer = Importer::new(store);

    // Determine input reader
    let reader: Box<dyn Read> = match input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Failed to open input file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdin()),
    };

    let result = importer
        .import_transactions_csv(uid, reader, ImportOptions { dry_run })
        .await?;

    if dry_run {
        println!("Validation successful");
    } else {
        println!("Import complete");
    }
    println!("  Imported: {}", result.imported);
    println!("  Errors:   {}", result.errors.len());

    if !result.errors.is_empty() {
        println!("\nErrors:");
        for error in result.errors.iter().take(10) {
            println!(
                "  Line {}: {}",
                error.line,
                error
                    .field
                    .as_ref()
                    .map(|f| format!("{}: ", f))
                    .unwrap_or_default()
                    + &error.error
            );
        }
        if result.errors.len() > 10 {
            println!("  ... and {} more errors", result.errors.len() - 10);
        }
    }

    Ok(())
}

async fn run_show_command(store: &dyn DocumentStore, uid: &str, date: NaiveDate) -> Result<()> {
    let path = forecast_document_path(uid, date);
    let Some(doc) = store.get_document(&path).await? else {
        println!("No forecast found at {}", path);
        return Ok(());
    };

    let result: ForecastResult = serde_json::from_value(doc.data)
        .with_context(|| format!("Malformed forecast document at {}", path))?;

    println!("Forecast: {}", path);
    println!(
        "Generated: {}",
        result.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();

    if result.forecast.is_empty() {
        println!("No categories had enough history.");
        return Ok(());
    }

    println!("{:<30} {:>15}", "CATEGORY", "FORECAST");
    println!("{}", "-".repeat(46));
    for (category, total) in &result.forecast {
        println!("{:<30} {:>15.2}", truncate(category, 30), total);
    }
    println!("{}", "-".repeat(46));
    println!(
        "{:<30} {:>15.2}",
        "TOTAL",
        result.forecast.values().sum::<f64>()
    );

    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").context("Date must be in YYYY-MM-DD format")
}
