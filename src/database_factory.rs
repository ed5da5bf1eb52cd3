use crate::cli::Args;
use crate::database::{Database, DocumentStore, InMemoryStore, SqliteStore};
use crate::date_provider::{DateProvider, OverrideDateProvider, SystemDateProvider};
use crate::error::StoreError;
use chrono::NaiveDate;
use log::info;
use std::sync::Arc;

pub const DEFAULT_DB_PATH: &str = "course_admin.db";

/// Store configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreConfig {
    /// Whether to keep everything in process memory
    pub is_test_mode: bool,
    /// Custom database file path (ignored if in test mode)
    pub custom_path: Option<String>,
    /// Date reported as "today" instead of the system date
    pub override_date: Option<NaiveDate>,
}

impl StoreConfig {
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }

    /// Reads the store flags from parsed command-line arguments
    pub fn from_args(args: &Args) -> Result<Self, String> {
        Ok(StoreConfig {
            is_test_mode: args.test,
            custom_path: args.db_path.as_ref().map(|p| p.to_string_lossy().into_owned()),
            override_date: args.validate_override_date()?,
        })
    }

    /// Gets the effective database path; `None` means in memory
    pub fn get_path(&self) -> Option<&str> {
        if self.is_test_mode {
            None
        } else {
            Some(self.custom_path.as_deref().unwrap_or(DEFAULT_DB_PATH))
        }
    }
}

#[derive(Debug, Default)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    pub fn test_mode(mut self) -> Self {
        self.config.is_test_mode = true;
        self
    }

    pub fn db_path(mut self, path: &str) -> Self {
        self.config.custom_path = Some(path.to_string());
        self
    }

    pub fn date_ymd(mut self, year: i32, month: u32, day: u32) -> Self {
        self.config.override_date = NaiveDate::from_ymd_opt(year, month, day);
        self
    }

    pub fn build(self) -> StoreConfig {
        self.config
    }
}

/// Factory for creating stores and Database instances
pub struct StoreFactory;

impl StoreFactory {
    pub fn create_store(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
        match config.get_path() {
            None => {
                info!("Using in-memory store");
                Ok(Arc::new(InMemoryStore::new()))
            }
            Some(path) => {
                info!("Using SQLite store at {}", path);
                Ok(Arc::new(SqliteStore::open(path)?))
            }
        }
    }

    /// Creates a database with the specified configuration
    pub fn create(config: StoreConfig) -> Result<Database, StoreError> {
        let store = Self::create_store(&config)?;
        let date_provider: Arc<dyn DateProvider> = match config.override_date {
            Some(date) => Arc::new(OverrideDateProvider::new(date)),
            None => Arc::new(SystemDateProvider),
        };
        Ok(Database::with_date_provider(store, date_provider))
    }
}
