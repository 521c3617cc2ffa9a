//! Schema-less record model shared by callers and backends.
//!
//! # Responsibility
//! - Define the dynamic value/node shapes every other layer exchanges.
//!
//! # Invariants
//! - The `RowValue` variant set is closed; backends never see open-ended
//!   runtime types.

pub mod row;
