//! In-memory repository double.
//!
//! # Responsibility
//! - Implement the full `Repository` contract without a database, for tests
//!   and early wiring.
//!
//! # Invariants
//! - Ids are assigned from a sequence starting at 1 and never reused.
//! - Reads return deep clones; no tree is ever shared with stored state.

use crate::model::row::RowNode;
use crate::repo::repository::{RepoResult, Repository};
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

/// Mutex-guarded map standing in for a real backend.
pub struct MemoryRepository {
    state: Mutex<MemoryState>,
}

struct MemoryState {
    rows: BTreeMap<i64, RowNode>,
    next_id: i64,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.lock_state().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        // A poisoned lock only means another holder panicked mid-operation;
        // the map itself is still usable for tests.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository<i64, RowNode> for MemoryRepository {
    fn insert(&self, data: RowNode) -> RepoResult<i64> {
        let mut state = self.lock_state();
        let id = state.next_id;
        state.next_id += 1;
        state.rows.insert(id, data);
        Ok(id)
    }

    fn update(&self, id: &i64, data: RowNode) -> RepoResult<()> {
        // Last writer wins, matching the SQL implementations. Updating an
        // absent id stores nothing but does not fail either, mirroring an
        // UPDATE that matched zero rows.
        let mut state = self.lock_state();
        if state.rows.contains_key(id) {
            state.rows.insert(*id, data);
        }
        Ok(())
    }

    fn remove(&self, id: &i64) -> RepoResult<()> {
        self.lock_state().rows.remove(id);
        Ok(())
    }

    fn find_by_id(&self, id: &i64) -> RepoResult<Option<RowNode>> {
        Ok(self.lock_state().rows.get(id).cloned())
    }
}
