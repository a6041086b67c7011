//! Typed WHERE clauses and named parameter binding over an embedded SQLite database.
//!
//! ```no_run
//! use litebind::prelude::*;
//!
//! # async fn demo() -> litebind::Result<()> {
//! let conn = Connection::open("/var/lib/app", "app.db").await?;
//! conn.insert("users", &kwargs!(id = 1, name = "Alice", age = 30)).await?;
//! let adults = conn
//!     .select("users", &["name"], &[cond!(age >= 18)?, Condition::in_list("id", [1, 2])?])
//!     .await?;
//! # Ok(())
//! # }
//! ```

/// This module contains the macros used in the crate.
#[macro_use]
mod macros;

/// This module contains the open-time configuration.
pub mod config;

/// This module contains the database-related functionality.
pub mod db;

/// This module contains the error type of the crate.
pub mod error;

/// This module contains the prelude for the crate.
pub mod prelude;

/// This module contains the scalar types bound into and read out of statements.
pub mod types;

mod utils;

pub use config::Config;
pub use db::Connection;
pub use error::{Error, Result};
pub use utils::quote_ident;
