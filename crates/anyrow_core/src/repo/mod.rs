//! Repository contracts and backend-independent implementations.
//!
//! # Responsibility
//! - Define the generic CRUD data-access contract.
//! - Provide the in-memory double used by tests and composition roots.
//!
//! # Invariants
//! - Not-found on read is a `None` result, never an error.
//! - No implementation commits, rolls back, or retries; the caller owns the
//!   transaction boundary.

pub mod memory;
pub mod repository;
