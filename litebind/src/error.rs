//! Error types for litebind

use thiserror::Error;

/// Result type alias for litebind operations
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong between building a condition and reading back rows.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed configuration (path, filename, busy timeout)
    #[error("configuration error: {0}")]
    Config(String),

    /// The database file could not be opened or created
    #[error("database connection failed: {0}")]
    Connection(String),

    /// A referenced table or column does not exist
    #[error("{0}")]
    Schema(String),

    /// A condition or assignment was given a value of the wrong shape or type
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An operator token that is not part of the supported set
    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// UPDATE or DELETE requested without any WHERE condition
    #[error("refusing to {0} without a WHERE condition")]
    MissingCondition(&'static str),

    /// The driver failed to prepare, bind or execute a statement
    #[error("{context}: {message}")]
    Statement {
        context: &'static str,
        message: String,
    },
}

impl Error {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn table_missing(table: &str) -> Self {
        Self::Schema(format!("table does not exist: {table}"))
    }

    pub fn column_missing(column: &str) -> Self {
        Self::Schema(format!("column does not exist: {column}"))
    }

    pub(crate) fn statement(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Statement {
            context,
            message: err.to_string(),
        }
    }

    pub fn is_missing_condition(&self) -> bool {
        matches!(self, Self::MissingCondition(_))
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema(_))
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
