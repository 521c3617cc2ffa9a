//! Generic data-access core: a schema-less record model, parameterized SQL
//! builders, and a backend-agnostic CRUD repository contract.
//! This crate is the single source of truth for the row and statement shapes
//! every backend adapter translates.

pub mod backend;
pub mod db;
pub mod logging;
pub mod model;
pub mod pool;
pub mod repo;
pub mod sql;

pub use backend::sqlite::SqliteBackend;
pub use backend::{Backend, BackendError, BackendResult, SqlRepository, TableBinding};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::row::{FromRowValue, RowError, RowNode, RowResult, RowValue};
pub use pool::{Pool, PoolGuard, PoolTimeout};
pub use repo::memory::MemoryRepository;
pub use repo::repository::{RepoError, RepoResult, Repository};
pub use sql::builder::{
    delete_by_key_statement, insert_statement, select_by_key_statement, update_by_key_statement,
    PlaceholderStyle, SqlBuildError, SqlBuildResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
