//! SQLite backend adapter.
//!
//! # Responsibility
//! - Translate `RowValue` parameters into rusqlite bind values and result
//!   columns back into record trees.
//! - Map SQLite constraint failures to the generic constraint kind.
//!
//! # Invariants
//! - SQLite has no boolean or unsigned storage class: booleans bind as 0/1
//!   integers and read back as `Int`; `UInt` values above `i64::MAX` are
//!   rejected rather than silently wrapped.
//! - Result trees are built fresh per row; nothing borrows driver state.

use crate::backend::{Backend, BackendError, BackendResult};
use crate::model::row::{RowNode, RowValue};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params_from_iter, Connection, ErrorCode};

/// Root key given to record trees read back from query results.
const RESULT_ROW_KEY: &str = "row";

/// Adapter over a borrowed rusqlite connection.
pub struct SqliteBackend<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBackend<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl Backend for SqliteBackend<'_> {
    fn execute(&self, sql: &str, params: &[RowValue]) -> BackendResult<u64> {
        let bound = bind_values(params)?;
        let changed = self
            .conn
            .execute(sql, params_from_iter(bound))
            .map_err(map_sqlite_error)?;
        Ok(changed as u64)
    }

    fn query_row(&self, sql: &str, params: &[RowValue]) -> BackendResult<Option<RowNode>> {
        let mut stmt = self.conn.prepare(sql).map_err(map_sqlite_error)?;
        let column_names: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let bound = bind_values(params)?;
        let mut rows = stmt
            .query(params_from_iter(bound))
            .map_err(map_sqlite_error)?;

        let Some(row) = rows.next().map_err(map_sqlite_error)? else {
            return Ok(None);
        };

        let mut record = RowNode::record(RESULT_ROW_KEY);
        for (index, name) in column_names.iter().enumerate() {
            let value_ref = row.get_ref(index).map_err(map_sqlite_error)?;
            let value = read_value(name, value_ref)?;
            record.add_child(name.clone(), value).map_err(|err| {
                BackendError::Unsupported(format!("result row is not a flat record: {err}"))
            })?;
        }
        Ok(Some(record))
    }

    fn last_insert_id(&self) -> BackendResult<i64> {
        Ok(self.conn.last_insert_rowid())
    }
}

fn bind_values(params: &[RowValue]) -> BackendResult<Vec<Value>> {
    params.iter().map(bind_value).collect()
}

fn bind_value(param: &RowValue) -> BackendResult<Value> {
    match param {
        RowValue::Null => Ok(Value::Null),
        RowValue::Int(inner) => Ok(Value::Integer(*inner)),
        RowValue::UInt(inner) => i64::try_from(*inner).map(Value::Integer).map_err(|_| {
            BackendError::Unsupported(format!(
                "unsigned value {inner} exceeds the SQLite INTEGER range"
            ))
        }),
        RowValue::Float(inner) => Ok(Value::Real(*inner)),
        RowValue::Bool(inner) => Ok(Value::Integer(i64::from(*inner))),
        RowValue::Text(inner) => Ok(Value::Text(inner.clone())),
    }
}

fn read_value(column: &str, value: ValueRef<'_>) -> BackendResult<RowValue> {
    match value {
        ValueRef::Null => Ok(RowValue::Null),
        ValueRef::Integer(inner) => Ok(RowValue::Int(inner)),
        ValueRef::Real(inner) => Ok(RowValue::Float(inner)),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .map(|text| RowValue::Text(text.to_string()))
            .map_err(|_| {
                BackendError::Unsupported(format!("column `{column}` holds non-UTF-8 text"))
            }),
        ValueRef::Blob(_) => Err(BackendError::Unsupported(format!(
            "column `{column}` holds a BLOB, which has no row-value shape"
        ))),
    }
}

fn map_sqlite_error(err: rusqlite::Error) -> BackendError {
    if let rusqlite::Error::SqliteFailure(ref failure, ref message) = err {
        if failure.code == ErrorCode::ConstraintViolation {
            let detail = message
                .clone()
                .unwrap_or_else(|| failure.to_string());
            return BackendError::Constraint { detail };
        }
    }
    BackendError::Driver(Box::new(err))
}
