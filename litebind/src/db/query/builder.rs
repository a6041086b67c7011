use super::binding::ParamBinding;
use super::condition::{where_clause, Condition};
use super::{placeholder, Query, Scope};
use crate::types::Value;
use crate::utils::quote_ident;
use crate::{Error, Result};

/// A `column = value` pair of an INSERT column list or an UPDATE SET list.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: Value,
}

impl Assignment {
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// `[]` and `["*"]` both mean every column.
pub fn is_wildcard(columns: &[&str]) -> bool {
    columns.is_empty() || columns == ["*"]
}

fn assignment_bindings(assignments: &[Assignment]) -> Result<Vec<ParamBinding>> {
    assignments
        .iter()
        .enumerate()
        .map(|(index, Assignment { column, value })| {
            ParamBinding::new(
                placeholder(Scope::Assignment(index), column, 0),
                value.clone(),
            )
        })
        .collect()
}

fn append_where(sql: &mut String, bindings: &mut Vec<ParamBinding>, conditions: &[Condition]) {
    if conditions.is_empty() {
        return;
    }
    let compiled = where_clause(conditions);
    sql.push_str(" WHERE ");
    sql.push_str(&compiled.fragment);
    bindings.extend(compiled.bindings);
}

/// `SELECT <columns> FROM <table> [WHERE ...]`
///
/// An empty column list or `["*"]` selects every column.
pub fn build_select(table: &str, columns: &[&str], conditions: &[Condition]) -> Result<Query> {
    let columns = if is_wildcard(columns) {
        "*".to_string()
    } else {
        columns
            .iter()
            .map(|column| quote_ident(column))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut sql = format!("SELECT {columns} FROM {table}", table = quote_ident(table));
    let mut bindings = Vec::new();
    append_where(&mut sql, &mut bindings, conditions);

    Ok(Query { sql, bindings })
}

/// `INSERT INTO <table> (<columns>) VALUES (<placeholders>)`
pub fn build_insert(table: &str, assignments: &[Assignment]) -> Result<Query> {
    if assignments.is_empty() {
        return Err(Error::invalid_argument("insert requires at least one assignment"));
    }

    let bindings = assignment_bindings(assignments)?;
    let fields = assignments
        .iter()
        .map(|a| quote_ident(&a.column))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = bindings
        .iter()
        .map(ParamBinding::name)
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!(
        "INSERT INTO {table} ({fields}) VALUES ({placeholders})",
        table = quote_ident(table),
    );

    Ok(Query { sql, bindings })
}

/// `UPDATE <table> SET <column = placeholder, ...> WHERE ...`
///
/// Refuses to build an UPDATE without conditions.
pub fn build_update(
    table: &str,
    assignments: &[Assignment],
    conditions: &[Condition],
) -> Result<Query> {
    if conditions.is_empty() {
        return Err(Error::MissingCondition("update"));
    }
    if assignments.is_empty() {
        return Err(Error::invalid_argument("update requires at least one assignment"));
    }

    let mut bindings = assignment_bindings(assignments)?;
    let placeholders = assignments
        .iter()
        .zip(&bindings)
        .map(|(a, b)| format!("{} = {}", quote_ident(&a.column), b.name()))
        .collect::<Vec<_>>()
        .join(", ");

    let mut sql = format!(
        "UPDATE {table} SET {placeholders}",
        table = quote_ident(table)
    );
    append_where(&mut sql, &mut bindings, conditions);

    Ok(Query { sql, bindings })
}

/// `DELETE FROM <table> WHERE ...`
///
/// Refuses to build a DELETE without conditions.
pub fn build_delete(table: &str, conditions: &[Condition]) -> Result<Query> {
    if conditions.is_empty() {
        return Err(Error::MissingCondition("delete"));
    }

    let mut sql = format!("DELETE FROM {table}", table = quote_ident(table));
    let mut bindings = Vec::new();
    append_where(&mut sql, &mut bindings, conditions);

    Ok(Query { sql, bindings })
}
