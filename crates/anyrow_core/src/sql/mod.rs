//! SQL text generation.
//!
//! # Responsibility
//! - Render parameterized CRUD statement text from table metadata.
//!
//! # Invariants
//! - Builders are pure: no I/O, no state, deterministic output.
//! - Values are never interpolated into statement text; only identifiers
//!   appear literally, and their shape is validated first.

pub mod builder;
