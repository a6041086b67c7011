/// Renders a (possibly `table.column` qualified) name as a quoted SQLite identifier.
///
/// `*` and `table.*` keep their bare star so they still select every column.
pub fn quote_ident(name: &str) -> String {
    name.split('.')
        .map(|part| {
            if part == "*" {
                part.to_string()
            } else {
                format!("\"{}\"", part.replace('"', "\"\""))
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Reduces a column name to characters SQLite accepts in a `:name` parameter.
pub(crate) fn placeholder_safe(column: &str) -> String {
    column
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

pub(crate) fn format_sql(sql: &str) -> String {
    sqlformat::format(
        sql,
        &sqlformat::QueryParams::None,
        &sqlformat::FormatOptions::default(),
    )
}
