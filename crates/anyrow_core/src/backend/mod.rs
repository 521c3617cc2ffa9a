//! Backend adapter boundary.
//!
//! # Responsibility
//! - Define the three driver capabilities the generic repository consumes:
//!   execute, read back one row, report the last generated key.
//! - Hold validated per-table metadata (`TableBinding`).
//!
//! # Invariants
//! - The core never touches driver types; adapters translate `RowValue`
//!   parameters and result columns at this boundary.
//! - Constraint violations are reported as one generic kind, not parsed into
//!   a backend-specific taxonomy.
//!
//! # See also
//! - DESIGN.md

use crate::model::row::{RowNode, RowValue};
use crate::sql::builder::{validate_identifier, PlaceholderStyle, SqlBuildError};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod generic;
pub mod sqlite;

pub use generic::SqlRepository;

pub type BackendResult<T> = Result<T, BackendError>;

/// Driver-agnostic failure reported by a backend adapter.
#[derive(Debug)]
pub enum BackendError {
    /// Unique/not-null/check violation; the write was rejected.
    Constraint { detail: String },
    /// A value or column shape the adapter cannot represent.
    Unsupported(String),
    /// Any other driver failure, surfaced as-is.
    Driver(Box<dyn Error + Send + Sync>),
}

impl Display for BackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Constraint { detail } => write!(f, "constraint violation: {detail}"),
            Self::Unsupported(detail) => write!(f, "unsupported by backend: {detail}"),
            Self::Driver(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BackendError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Driver(err) => Some(err.as_ref()),
            Self::Constraint { .. } | Self::Unsupported(_) => None,
        }
    }
}

/// Minimal driver surface consumed by [`SqlRepository`].
///
/// Implementations borrow a live session owned by the caller and assume an
/// externally managed transaction; they never commit or roll back.
pub trait Backend {
    /// Executes one parameterized statement, returning the affected-row
    /// count.
    fn execute(&self, sql: &str, params: &[RowValue]) -> BackendResult<u64>;
    /// Executes one parameterized query and maps at most one result row into
    /// a record tree, reading columns back by name.
    fn query_row(&self, sql: &str, params: &[RowValue]) -> BackendResult<Option<RowNode>>;
    /// Returns the key generated by the most recent insert on this session.
    fn last_insert_id(&self) -> BackendResult<i64>;
}

/// Validated metadata for one table.
///
/// The primary key is deliberately kept out of `columns`: it is always its
/// own required parameter, and `new` rejects metadata that lists it twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBinding {
    table: String,
    primary_key: String,
    columns: Vec<String>,
    placeholders: PlaceholderStyle,
}

impl TableBinding {
    /// Builds and validates table metadata.
    ///
    /// # Errors
    /// - `SqlBuildError::InvalidIdentifier` for malformed names.
    /// - `SqlBuildError::EmptyColumnList` when no columns are given.
    /// - `SqlBuildError::PrimaryKeyInColumnList` when the key repeats.
    pub fn new(
        table: impl Into<String>,
        primary_key: impl Into<String>,
        columns: Vec<String>,
        placeholders: PlaceholderStyle,
    ) -> Result<Self, SqlBuildError> {
        let table = table.into();
        let primary_key = primary_key.into();

        validate_identifier(&table)?;
        validate_identifier(&primary_key)?;
        if columns.is_empty() {
            return Err(SqlBuildError::EmptyColumnList { table });
        }
        for column in &columns {
            validate_identifier(column)?;
            if *column == primary_key {
                return Err(SqlBuildError::PrimaryKeyInColumnList { primary_key });
            }
        }

        Ok(Self {
            table,
            primary_key,
            columns,
            placeholders,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn placeholders(&self) -> PlaceholderStyle {
        self.placeholders
    }
}

#[cfg(test)]
mod tests {
    use super::TableBinding;
    use crate::sql::builder::{PlaceholderStyle, SqlBuildError};

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn binding_rejects_primary_key_in_column_list() {
        let err = TableBinding::new(
            "person",
            "id",
            columns(&["name", "id"]),
            PlaceholderStyle::Positional,
        )
        .unwrap_err();
        assert_eq!(
            err,
            SqlBuildError::PrimaryKeyInColumnList {
                primary_key: "id".to_string()
            }
        );
    }

    #[test]
    fn binding_rejects_empty_column_list() {
        let err =
            TableBinding::new("person", "id", Vec::new(), PlaceholderStyle::Positional).unwrap_err();
        assert!(matches!(err, SqlBuildError::EmptyColumnList { .. }));
    }
}
