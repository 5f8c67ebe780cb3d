use anyhow::Result;
use config::{Config, Environment, File};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::schemas::AppState;

/// Runtime settings that are not passed on the command line.
///
/// Layered from built-in defaults, an optional `accounts-admin.toml` in the
/// working directory and `APP_*` environment variables (e.g.
/// `APP_REQUEST_TIMEOUT_SECS=10`).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Requests running longer than this are aborted by the timeout layer
    pub request_timeout_secs: u64,
    /// Page size used by list views when the query does not set `limit`
    pub default_page_size: u64,
    /// Upper bound applied to any requested page size
    pub max_page_size: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            // Django admin's `list_per_page`
            default_page_size: 100,
            max_page_size: 1000,
        }
    }
}

impl Settings {
    /// Load settings from the config file and environment on top of the defaults.
    pub fn load() -> Result<Self> {
        let defaults = Settings::default();
        let settings = Config::builder()
            .set_default("request_timeout_secs", defaults.request_timeout_secs)?
            .set_default("default_page_size", defaults.default_page_size)?
            .set_default("max_page_size", defaults.max_page_size)?
            .add_source(File::with_name("accounts-admin").required(false))
            .add_source(Environment::with_prefix("APP"))
            .build()?
            .try_deserialize::<Settings>()?;

        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Resolve an optional requested page size against the configured bounds.
    pub fn page_size(&self, requested: Option<u64>) -> u64 {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size.max(1))
    }
}

/// Open a connection pool for the given database URL.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection> {
    info!("Connecting to database: {}", database_url);
    let mut options = ConnectOptions::new(database_url.to_owned());
    options.sqlx_logging(false);
    let db = Database::connect(options).await?;
    Ok(db)
}

/// Initialize application state for the given database URL
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    let settings = Settings::load()?;
    let db = connect(database_url).await?;
    Ok(AppState { db, settings })
}
