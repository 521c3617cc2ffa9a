//! Generic SQL repository over any backend adapter.
//!
//! # Responsibility
//! - Render CRUD statements from table metadata and bind record values in
//!   declared column order.
//! - Map adapter failures into the repository error taxonomy.
//!
//! # Invariants
//! - Columns missing from a record tree bind as NULL.
//! - Every propagated backend error carries the failing SQL text.
//! - No retry, no commit/rollback; the caller owns the transaction.

use crate::backend::{Backend, BackendError, TableBinding};
use crate::model::row::{RowNode, RowValue};
use crate::repo::repository::{RepoError, RepoResult, Repository};
use crate::sql::builder::{
    delete_by_key_statement, insert_statement, select_by_key_statement, update_by_key_statement,
};
use log::debug;

/// Table-agnostic relational repository.
///
/// Holds only borrowed driver state plus immutable table metadata, so one
/// instance serves repeated calls on the same transaction.
pub struct SqlRepository<'b, B: Backend> {
    backend: &'b B,
    binding: TableBinding,
}

impl<'b, B: Backend> SqlRepository<'b, B> {
    pub fn new(backend: &'b B, binding: TableBinding) -> Self {
        Self { backend, binding }
    }

    pub fn binding(&self) -> &TableBinding {
        &self.binding
    }

    /// Collects bind values for the declared columns, in declared order.
    fn column_params(&self, data: &RowNode) -> Vec<RowValue> {
        self.binding
            .columns()
            .iter()
            .map(|column| {
                data.child(column)
                    .map_or(RowValue::Null, |child| child.value().clone())
            })
            .collect()
    }
}

fn wrap_backend_error(sql: &str, source: BackendError) -> RepoError {
    match source {
        BackendError::Constraint { detail } => RepoError::WriteRejected {
            sql: sql.to_string(),
            detail,
        },
        other => RepoError::Backend {
            sql: sql.to_string(),
            source: other,
        },
    }
}

impl<B: Backend> Repository<i64, RowNode> for SqlRepository<'_, B> {
    fn insert(&self, data: RowNode) -> RepoResult<i64> {
        let sql = insert_statement(
            self.binding.placeholders(),
            self.binding.table(),
            self.binding.columns(),
        )?;
        let params = self.column_params(&data);

        self.backend
            .execute(&sql, &params)
            .map_err(|err| wrap_backend_error(&sql, err))?;
        let id = self
            .backend
            .last_insert_id()
            .map_err(|err| wrap_backend_error(&sql, err))?;

        debug!(
            "event=repo_insert module=backend status=ok table={} id={id}",
            self.binding.table()
        );
        Ok(id)
    }

    fn update(&self, id: &i64, data: RowNode) -> RepoResult<()> {
        let sql = update_by_key_statement(
            self.binding.placeholders(),
            self.binding.table(),
            self.binding.primary_key(),
            self.binding.columns(),
        )?;
        let mut params = self.column_params(&data);
        params.push(RowValue::Int(*id));

        // Zero affected rows is not surfaced: last writer wins and an absent
        // id is treated the same way the in-memory double treats it.
        self.backend
            .execute(&sql, &params)
            .map_err(|err| wrap_backend_error(&sql, err))?;

        debug!(
            "event=repo_update module=backend status=ok table={} id={id}",
            self.binding.table()
        );
        Ok(())
    }

    fn remove(&self, id: &i64) -> RepoResult<()> {
        let sql = delete_by_key_statement(
            self.binding.placeholders(),
            self.binding.table(),
            self.binding.primary_key(),
        )?;

        let changed = self
            .backend
            .execute(&sql, &[RowValue::Int(*id)])
            .map_err(|err| wrap_backend_error(&sql, err))?;

        debug!(
            "event=repo_remove module=backend status=ok table={} id={id} changed={changed}",
            self.binding.table()
        );
        Ok(())
    }

    fn find_by_id(&self, id: &i64) -> RepoResult<Option<RowNode>> {
        let sql = select_by_key_statement(
            self.binding.placeholders(),
            self.binding.table(),
            self.binding.primary_key(),
            self.binding.columns(),
        )?;

        let row = self
            .backend
            .query_row(&sql, &[RowValue::Int(*id)])
            .map_err(|err| wrap_backend_error(&sql, err))?;

        debug!(
            "event=repo_find module=backend status=ok table={} id={id} found={}",
            self.binding.table(),
            row.is_some()
        );
        Ok(row)
    }
}
