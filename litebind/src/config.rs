//! Open-time settings for a [`Connection`](crate::Connection).

use std::path::PathBuf;
use std::time::Duration;

use crate::{Error, Result};

/// How long SQLite retries a locked database before giving up.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

pub const PATH_VAR: &str = "LITEBIND_PATH";
pub const FILENAME_VAR: &str = "LITEBIND_FILENAME";
pub const BUSY_TIMEOUT_VAR: &str = "LITEBIND_BUSY_TIMEOUT_MS";

/// Where the database file lives and how lock contention is handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub path: PathBuf,
    pub filename: String,
    pub busy_timeout: Duration,
}

impl Config {
    pub fn new(path: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            filename: filename.into(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    /// Reads the configuration from the environment, loading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let path = std::env::var(PATH_VAR)
            .map_err(|_| Error::Config(format!("{PATH_VAR} is not set")))?;
        let filename = std::env::var(FILENAME_VAR)
            .map_err(|_| Error::Config(format!("{FILENAME_VAR} is not set")))?;

        let mut config = Self::new(path, filename);
        if let Ok(raw) = std::env::var(BUSY_TIMEOUT_VAR) {
            let millis = raw.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!("{BUSY_TIMEOUT_VAR} must be milliseconds, got {raw:?}"))
            })?;
            config.busy_timeout = Duration::from_millis(millis);
        }
        Ok(config)
    }

    /// `path/filename`, failing when either part is empty.
    pub fn database_path(&self) -> Result<PathBuf> {
        if self.path.as_os_str().is_empty() {
            return Err(Error::Config("database path not specified".to_string()));
        }
        if self.filename.trim().is_empty() {
            return Err(Error::Config("database filename not specified".to_string()));
        }
        Ok(self.path.join(&self.filename))
    }
}
