use std::collections::VecDeque;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::types::Value;
use crate::{Error, Result};

/// One result row: column names paired with their values, in SELECT order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.columns.iter().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub(crate) fn from_driver(row: &libsql::Row, names: &[String]) -> Result<Self> {
        let columns = names
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let value = row
                    .get_value(idx as i32)
                    .map_err(|e| Error::statement("failed to read column", e))?;
                Ok((name.clone(), Value::from(value)))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { columns })
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Every row a statement produced, read eagerly so the statement has run to
/// completion by the time the caller sees it.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: VecDeque<Row>,
    rows_affected: u64,
    last_insert_rowid: i64,
}

impl ResultSet {
    pub(crate) async fn drain(mut rows: libsql::Rows, conn: &libsql::Connection) -> Result<Self> {
        let column_count = rows.column_count();
        let columns = (0..column_count)
            .map(|idx| rows.column_name(idx).unwrap_or_default().to_string())
            .collect::<Vec<_>>();

        let mut collected = VecDeque::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| Error::statement("failed to execute statement", e))?
        {
            collected.push_back(Row::from_driver(&row, &columns)?);
        }

        Ok(Self {
            columns,
            rows: collected,
            // a statement that yields columns changed nothing
            rows_affected: if column_count > 0 { 0 } else { conn.changes() },
            last_insert_rowid: conn.last_insert_rowid(),
        })
    }

    /// Pops the next row, `None` once exhausted.
    pub fn next_row(&mut self) -> Option<Row> {
        self.rows.pop_front()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows changed by this statement; 0 for anything that returns columns.
    pub fn rows_affected(&self) -> u64 {
        self.rows_affected
    }

    /// The connection's last inserted rowid at the moment this statement finished.
    pub fn last_insert_rowid(&self) -> i64 {
        self.last_insert_rowid
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows.into()
    }
}

impl Iterator for ResultSet {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.next_row()
    }
}
