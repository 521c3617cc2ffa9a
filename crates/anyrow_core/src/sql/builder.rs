//! Parameterized CRUD statement builders.
//!
//! # Responsibility
//! - Emit INSERT/UPDATE/DELETE/SELECT-by-key text for a pluggable
//!   placeholder style.
//!
//! # Invariants
//! - Placeholder count always equals the number of values the caller must
//!   bind, in the emitted left-to-right order.
//! - The primary key never appears in a column list; it is always a separate
//!   parameter.
//! - Identifiers must match `[A-Za-z_][A-Za-z0-9_]*`; quoting/escaping beyond
//!   that check is out of scope, so callers supply trusted names only.
//!
//! # See also
//! - DESIGN.md

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static IDENTIFIER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid"));

pub type SqlBuildResult<T> = Result<T, SqlBuildError>;

/// Precondition failure while rendering statement text.
///
/// All variants are programmer errors in table metadata; none is retryable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlBuildError {
    EmptyColumnList { table: String },
    InvalidIdentifier(String),
    PrimaryKeyInColumnList { primary_key: String },
}

impl Display for SqlBuildError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyColumnList { table } => {
                write!(f, "refusing to build statement for `{table}` with no columns")
            }
            Self::InvalidIdentifier(name) => write!(f, "invalid SQL identifier `{name}`"),
            Self::PrimaryKeyInColumnList { primary_key } => write!(
                f,
                "primary key `{primary_key}` must not be listed as a generic column"
            ),
        }
    }
}

impl Error for SqlBuildError {}

/// Placeholder syntax understood by the target driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `?` for every parameter (SQLite, MySQL).
    Positional,
    /// `$1, $2, ...` one-based (PostgreSQL).
    Numbered,
}

impl PlaceholderStyle {
    /// Renders the placeholder for a one-based bind position.
    fn render(self, position: usize) -> String {
        match self {
            Self::Positional => "?".to_string(),
            Self::Numbered => format!("${position}"),
        }
    }
}

/// Builds `INSERT INTO <table> (<cols>) VALUES (<placeholders>)`.
///
/// Bind order: column values in the given order.
pub fn insert_statement(
    style: PlaceholderStyle,
    table: &str,
    columns: &[impl AsRef<str>],
) -> SqlBuildResult<String> {
    validate_identifier(table)?;
    validate_columns(table, columns)?;

    let mut sql = format!("INSERT INTO {table} (");
    push_joined(&mut sql, columns);
    sql.push_str(") VALUES (");
    for position in 1..=columns.len() {
        if position > 1 {
            sql.push_str(", ");
        }
        sql.push_str(&style.render(position));
    }
    sql.push(')');
    Ok(sql)
}

/// Builds `UPDATE <table> SET <col> = <ph>, ... WHERE <pk> = <ph>`.
///
/// Bind order: column values in the given order, then the key value last.
pub fn update_by_key_statement(
    style: PlaceholderStyle,
    table: &str,
    primary_key: &str,
    columns: &[impl AsRef<str>],
) -> SqlBuildResult<String> {
    validate_identifier(table)?;
    validate_identifier(primary_key)?;
    validate_columns(table, columns)?;

    let mut sql = format!("UPDATE {table} SET ");
    for (index, column) in columns.iter().enumerate() {
        if index > 0 {
            sql.push_str(", ");
        }
        sql.push_str(column.as_ref());
        sql.push_str(" = ");
        sql.push_str(&style.render(index + 1));
    }
    sql.push_str(" WHERE ");
    sql.push_str(primary_key);
    sql.push_str(" = ");
    sql.push_str(&style.render(columns.len() + 1));
    Ok(sql)
}

/// Builds `DELETE FROM <table> WHERE <pk> = <ph>`.
///
/// Bind order: the key value only.
pub fn delete_by_key_statement(
    style: PlaceholderStyle,
    table: &str,
    primary_key: &str,
) -> SqlBuildResult<String> {
    validate_identifier(table)?;
    validate_identifier(primary_key)?;

    let mut sql = format!("DELETE FROM {table} WHERE {primary_key} = ");
    sql.push_str(&style.render(1));
    Ok(sql)
}

/// Builds `SELECT <pk>, <cols> FROM <table> WHERE <pk> = <ph>`.
///
/// The key column is always selected first so reads can recover the record
/// identity without schema knowledge. Bind order: the key value only.
pub fn select_by_key_statement(
    style: PlaceholderStyle,
    table: &str,
    primary_key: &str,
    columns: &[impl AsRef<str>],
) -> SqlBuildResult<String> {
    validate_identifier(table)?;
    validate_identifier(primary_key)?;
    validate_columns(table, columns)?;

    let mut sql = format!("SELECT {primary_key}, ");
    push_joined(&mut sql, columns);
    sql.push_str(" FROM ");
    sql.push_str(table);
    sql.push_str(" WHERE ");
    sql.push_str(primary_key);
    sql.push_str(" = ");
    sql.push_str(&style.render(1));
    Ok(sql)
}

/// Validates one identifier against the accepted shape.
pub fn validate_identifier(name: &str) -> SqlBuildResult<()> {
    if IDENTIFIER_PATTERN.is_match(name) {
        Ok(())
    } else {
        Err(SqlBuildError::InvalidIdentifier(name.to_string()))
    }
}

fn validate_columns(table: &str, columns: &[impl AsRef<str>]) -> SqlBuildResult<()> {
    if columns.is_empty() {
        return Err(SqlBuildError::EmptyColumnList {
            table: table.to_string(),
        });
    }
    for column in columns {
        validate_identifier(column.as_ref())?;
    }
    Ok(())
}

fn push_joined(sql: &mut String, columns: &[impl AsRef<str>]) {
    for (index, column) in columns.iter().enumerate() {
        if index > 0 {
            sql.push_str(", ");
        }
        sql.push_str(column.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_identifier, SqlBuildError};

    #[test]
    fn identifier_accepts_snake_case_names() {
        validate_identifier("person").unwrap();
        validate_identifier("_hidden_2").unwrap();
    }

    #[test]
    fn identifier_rejects_quotes_spaces_and_empty() {
        for bad in ["", "per son", "name;drop", "\"person\"", "1col"] {
            let err = validate_identifier(bad).unwrap_err();
            assert_eq!(err, SqlBuildError::InvalidIdentifier(bad.to_string()));
        }
    }
}
