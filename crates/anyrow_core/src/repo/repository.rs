//! Generic repository contract and error taxonomy.
//!
//! # Responsibility
//! - Define `Repository<Id, Data>`: the four CRUD operations every backend
//!   implements.
//! - Classify failures into the kinds callers act on.
//!
//! # Invariants
//! - `find_by_id` on a missing id returns `Ok(None)`.
//! - `remove` of a missing id succeeds (idempotent).
//! - `update` is last-writer-wins; there is no optimistic-concurrency check.
//!
//! # See also
//! - DESIGN.md

use crate::backend::BackendError;
use crate::model::row::RowError;
use crate::sql::builder::SqlBuildError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Failure kinds for repository operations.
///
/// `Row` and `Sql` are programmer errors and should fail fast at the call
/// site. `WriteRejected` is a constraint violation reported as one generic
/// kind with no backend-specific code parsing. `Backend` carries every other
/// driver failure unchanged, with the failing SQL text attached for
/// diagnostics.
#[derive(Debug)]
pub enum RepoError {
    Row(RowError),
    Sql(SqlBuildError),
    WriteRejected { sql: String, detail: String },
    Backend { sql: String, source: BackendError },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Row(err) => write!(f, "{err}"),
            Self::Sql(err) => write!(f, "{err}"),
            Self::WriteRejected { sql, detail } => {
                write!(f, "write rejected by constraint: {detail} (sql: {sql})")
            }
            Self::Backend { sql, source } => write!(f, "{source} (sql: {sql})"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Row(err) => Some(err),
            Self::Sql(err) => Some(err),
            Self::WriteRejected { .. } => None,
            Self::Backend { source, .. } => Some(source),
        }
    }
}

impl From<RowError> for RepoError {
    fn from(value: RowError) -> Self {
        Self::Row(value)
    }
}

impl From<SqlBuildError> for RepoError {
    fn from(value: SqlBuildError) -> Self {
        Self::Sql(value)
    }
}

/// Generic CRUD contract over one record shape.
///
/// Implementations are stateless besides a borrowed session: one instance may
/// serve repeated calls on the same transaction, but must not be shared
/// across two concurrently active transactions on one connection. Write data
/// moves in; reads return freshly built values.
pub trait Repository<Id, Data> {
    /// Creates one record and returns its backend-assigned key.
    fn insert(&self, data: Data) -> RepoResult<Id>;
    /// Overwrites the record stored under `id`.
    fn update(&self, id: &Id, data: Data) -> RepoResult<()>;
    /// Deletes the record stored under `id`, succeeding when absent.
    fn remove(&self, id: &Id) -> RepoResult<()>;
    /// Reads one record, or `None` when no row matches.
    fn find_by_id(&self, id: &Id) -> RepoResult<Option<Data>>;
}
