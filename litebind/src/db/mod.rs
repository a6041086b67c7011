//! The `db` module owns the database handle and runs compiled queries against it.
//!
//! Every CRUD helper builds its SQL first (so argument and missing-condition
//! errors never reach the driver), then checks that the referenced table and
//! columns exist, and only then prepares, binds and executes.

use std::path::Path;

use libsql::params::Params;
use tracing::{debug, trace, Level};

/// The `query` module compiles conditions and assignments into SQL with named placeholders.
pub mod query;

/// The `row` module holds materialized result rows.
pub mod row;

use self::query::builder::{self, is_wildcard, Assignment};
use self::query::condition::Condition;
use self::query::{ParamBinding, Query};
use self::row::{ResultSet, Row};
use crate::utils::format_sql;
use crate::{Config, Error, Result};

const TABLE_EXISTS: &str =
    "SELECT name FROM sqlite_master WHERE type = 'table' AND name = :table_name COLLATE NOCASE";
const TABLE_COLUMNS: &str = "SELECT name FROM pragma_table_info(:table_name)";

/// A single open SQLite database file.
///
/// A connection is meant to be driven by one caller at a time; share it across
/// tasks only behind your own serialization.
pub struct Connection {
    _db: libsql::Database,
    conn: libsql::Connection,
}

impl Connection {
    /// Opens (creating if needed) `path/filename` with the default busy timeout.
    pub async fn open(path: impl AsRef<Path>, filename: &str) -> Result<Self> {
        Self::open_with(&Config::new(path.as_ref(), filename)).await
    }

    pub async fn open_with(config: &Config) -> Result<Self> {
        let file = config.database_path()?;
        let connection_error = |e: libsql::Error| {
            Error::Connection(format!("{}: {e}", file.display()))
        };

        let db = libsql::Builder::new_local(&file)
            .build()
            .await
            .map_err(connection_error)?;
        let conn = db.connect().map_err(connection_error)?;
        conn.busy_timeout(config.busy_timeout)
            .map_err(connection_error)?;

        debug!(
            file = %file.display(),
            busy_timeout_ms = config.busy_timeout.as_millis() as u64,
            "opened database"
        );
        Ok(Self { _db: db, conn })
    }

    /// Selects `columns` (or every column for `[]` / `["*"]`) from `table`.
    pub async fn select(
        &self,
        table: &str,
        columns: &[&str],
        conditions: &[Condition],
    ) -> Result<Vec<Row>> {
        let query = builder::build_select(table, columns, conditions)?;
        self.check_table_and_columns(table, columns).await?;
        Ok(self.fetch(&query).await?.into_rows())
    }

    /// Inserts one row and returns the number of rows affected.
    pub async fn insert(&self, table: &str, assignments: &[Assignment]) -> Result<u64> {
        let query = builder::build_insert(table, assignments)?;
        self.check_table_and_columns(table, &assigned_columns(assignments))
            .await?;
        self.run(&query).await
    }

    pub async fn update(
        &self,
        table: &str,
        assignments: &[Assignment],
        conditions: &[Condition],
    ) -> Result<u64> {
        let query = builder::build_update(table, assignments, conditions)?;
        self.check_table_and_columns(table, &assigned_columns(assignments))
            .await?;
        self.run(&query).await
    }

    pub async fn delete(&self, table: &str, conditions: &[Condition]) -> Result<u64> {
        let query = builder::build_delete(table, conditions)?;
        self.check_table_and_columns(table, &[]).await?;
        self.run(&query).await
    }

    /// Runs any statement with the given named bindings and collects its rows.
    pub async fn execute_raw(&self, sql: &str, bindings: &[ParamBinding]) -> Result<ResultSet> {
        let stmt = self.prepare(sql, bindings).await?;
        let rows = stmt
            .query(named_params(bindings))
            .await
            .map_err(|e| Error::statement("failed to execute statement", e))?;
        ResultSet::drain(rows, &self.conn).await
    }

    pub async fn table_exists(&self, table: &str) -> Result<bool> {
        let found = self
            .execute_raw(TABLE_EXISTS, &[ParamBinding::new(":table_name", table)?])
            .await?;
        Ok(found.into_rows().into_iter().next().is_some())
    }

    /// Column names of `table` in declaration order.
    pub async fn columns(&self, table: &str) -> Result<Vec<String>> {
        let rows = self
            .execute_raw(TABLE_COLUMNS, &[ParamBinding::new(":table_name", table)?])
            .await?;
        Ok(rows
            .into_rows()
            .iter()
            .filter_map(|row| row.get("name").and_then(|v| v.as_str()).map(str::to_string))
            .collect())
    }

    /// Fails with [`Error::Schema`] unless `table` exists and has every listed column.
    ///
    /// An empty list or `["*"]` checks the table only. A column may carry a
    /// `table.` prefix naming the table being checked.
    pub async fn check_table_and_columns(&self, table: &str, columns: &[&str]) -> Result<()> {
        trace!(table, ?columns, "checking schema");
        if !self.table_exists(table).await? {
            return Err(Error::table_missing(table));
        }
        if is_wildcard(columns) {
            return Ok(());
        }

        let known = self.columns(table).await?;
        match columns
            .iter()
            .find(|column| {
                let name = unqualified(table, column);
                !known.iter().any(|k| k.eq_ignore_ascii_case(name))
            })
        {
            Some(missing) => Err(Error::column_missing(missing)),
            None => Ok(()),
        }
    }

    /// Rowid of the most recent successful INSERT on this connection, as of now.
    ///
    /// [`ResultSet::last_insert_rowid`] is the same value captured when that
    /// result set's statement finished.
    pub fn last_insert_rowid(&self) -> i64 {
        self.conn.last_insert_rowid()
    }

    async fn fetch(&self, query: &Query) -> Result<ResultSet> {
        self.execute_raw(&query.sql, &query.bindings).await
    }

    async fn run(&self, query: &Query) -> Result<u64> {
        let stmt = self.prepare(&query.sql, &query.bindings).await?;
        let affected = stmt
            .execute(named_params(&query.bindings))
            .await
            .map_err(|e| Error::statement("failed to execute statement", e))?;
        Ok(affected as u64)
    }

    /// Prepares `sql` and checks that `bindings` and its placeholders match one to one.
    async fn prepare(&self, sql: &str, bindings: &[ParamBinding]) -> Result<libsql::Statement> {
        if tracing::enabled!(Level::DEBUG) {
            debug!(sql = %format_sql(sql), bindings = bindings.len(), "executing statement");
        }

        let stmt = self
            .conn
            .prepare(sql)
            .await
            .map_err(|e| Error::statement("failed to prepare statement", e))?;

        let mut placeholders = Vec::with_capacity(stmt.parameter_count());
        for idx in 1..=stmt.parameter_count() {
            match stmt.parameter_name(idx as i32) {
                Some(name) => placeholders.push(name.to_string()),
                None => {
                    return Err(bind_error(format!(
                        "placeholder #{idx} is anonymous, only named placeholders are supported"
                    )))
                }
            }
        }

        if let Some(unknown) = bindings
            .iter()
            .find(|b| !placeholders.iter().any(|p| p == b.name()))
        {
            return Err(bind_error(format!(
                "statement has no placeholder named {}",
                unknown.name()
            )));
        }
        if let Some(unbound) = placeholders
            .iter()
            .find(|p| !bindings.iter().any(|b| b.name() == p.as_str()))
        {
            return Err(bind_error(format!("no value bound to {unbound}")));
        }

        Ok(stmt)
    }
}

fn bind_error(message: String) -> Error {
    Error::Statement {
        context: "failed to bind value",
        message,
    }
}

fn named_params(bindings: &[ParamBinding]) -> Params {
    Params::Named(
        bindings
            .iter()
            .map(|b| (b.name().to_string(), b.to_driver_value()))
            .collect(),
    )
}

/// `users.name` checked against `users` is `name`; anything else is left as is.
fn unqualified<'a>(table: &str, column: &'a str) -> &'a str {
    match column.split_once('.') {
        Some((prefix, rest)) if prefix.eq_ignore_ascii_case(table) => rest,
        _ => column,
    }
}

fn assigned_columns(assignments: &[Assignment]) -> Vec<&str> {
    assignments.iter().map(|a| a.column.as_str()).collect()
}
