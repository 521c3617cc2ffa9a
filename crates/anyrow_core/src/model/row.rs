//! Dynamic row value and node model.
//!
//! # Responsibility
//! - Carry one record's worth of named values without a compile-time schema.
//! - Provide the typed extraction boundary between callers and drivers.
//!
//! # Invariants
//! - `RowValue` always has exactly one active variant; `Null` means SQL NULL
//!   and is distinct from an empty string.
//! - Sibling keys inside one `RowNode` are unique; `add_child` enforces this.
//! - A node exclusively owns its children (tree, never a graph).
//!
//! # See also
//! - DESIGN.md

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RowResult<T> = Result<T, RowError>;

/// Error for row construction and typed extraction failures.
///
/// These are programmer errors: callers should fix the call site rather than
/// catch and retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    DuplicateKey(String),
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
}

impl Display for RowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey(key) => write!(f, "duplicate child key `{key}`"),
            Self::TypeMismatch { expected, actual } => {
                write!(f, "row value is `{actual}`, expected `{expected}`")
            }
        }
    }
}

impl Error for RowError {}

/// One column's runtime value.
///
/// The variant set is closed on purpose: backends translate exactly these
/// shapes and nothing else. 32-bit floats widen losslessly into `Float`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowValue {
    /// SQL NULL / absent value.
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl RowValue {
    /// Returns the active variant name, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Text(_) => "text",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<i64> for RowValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for RowValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u64> for RowValue {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<f64> for RowValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for RowValue {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<bool> for RowValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<String> for RowValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for RowValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl<T: Into<RowValue>> From<Option<T>> for RowValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Conversion from a dynamic `RowValue` into a concrete scalar.
///
/// Implemented for the closed scalar set only; no cross-variant coercion is
/// performed (an `Int` does not read back as `f64`).
pub trait FromRowValue: Sized {
    fn from_row_value(value: &RowValue) -> RowResult<Self>;
}

impl FromRowValue for i64 {
    fn from_row_value(value: &RowValue) -> RowResult<Self> {
        match value {
            RowValue::Int(inner) => Ok(*inner),
            other => Err(mismatch("int", other)),
        }
    }
}

impl FromRowValue for u64 {
    fn from_row_value(value: &RowValue) -> RowResult<Self> {
        match value {
            RowValue::UInt(inner) => Ok(*inner),
            other => Err(mismatch("uint", other)),
        }
    }
}

impl FromRowValue for f64 {
    fn from_row_value(value: &RowValue) -> RowResult<Self> {
        match value {
            RowValue::Float(inner) => Ok(*inner),
            other => Err(mismatch("float", other)),
        }
    }
}

impl FromRowValue for bool {
    fn from_row_value(value: &RowValue) -> RowResult<Self> {
        match value {
            RowValue::Bool(inner) => Ok(*inner),
            other => Err(mismatch("bool", other)),
        }
    }
}

impl FromRowValue for String {
    fn from_row_value(value: &RowValue) -> RowResult<Self> {
        match value {
            RowValue::Text(inner) => Ok(inner.clone()),
            other => Err(mismatch("text", other)),
        }
    }
}

fn mismatch(expected: &'static str, actual: &RowValue) -> RowError {
    RowError::TypeMismatch {
        expected,
        actual: actual.kind(),
    }
}

/// One named node in a dynamic record tree.
///
/// A leaf (no children) represents a single column; a record is a root node
/// whose children are the columns. Trees are built by the caller before a
/// write and rebuilt fresh by the backend on every read, so no node is ever
/// shared between two trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowNode {
    key: String,
    value: RowValue,
    children: Vec<RowNode>,
}

impl RowNode {
    /// Creates a record root with no value of its own.
    pub fn record(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: RowValue::Null,
            children: Vec::new(),
        }
    }

    /// Creates a scalar leaf.
    pub fn leaf(key: impl Into<String>, value: impl Into<RowValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            children: Vec::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &RowValue {
        &self.value
    }

    pub fn children(&self) -> &[RowNode] {
        &self.children
    }

    /// Appends a new leaf child and returns a borrow of it.
    ///
    /// # Errors
    /// - `RowError::DuplicateKey` when a sibling with the same key exists.
    pub fn add_child(
        &mut self,
        key: impl Into<String>,
        value: impl Into<RowValue>,
    ) -> RowResult<&mut RowNode> {
        let key = key.into();
        if self.children.iter().any(|child| child.key == key) {
            return Err(RowError::DuplicateKey(key));
        }

        self.children.push(RowNode::leaf(key, value));
        // Just pushed, so the slot exists.
        let index = self.children.len() - 1;
        Ok(&mut self.children[index])
    }

    /// Finds a direct child by key.
    ///
    /// First match wins. Duplicates cannot be created through `add_child`,
    /// but trees deserialized from external sources may carry them.
    pub fn child(&self, key: &str) -> Option<&RowNode> {
        self.children.iter().find(|child| child.key == key)
    }

    /// Extracts this node's scalar value as `T`.
    ///
    /// # Errors
    /// - `RowError::TypeMismatch` when the active variant is not `T`.
    pub fn get<T: FromRowValue>(&self) -> RowResult<T> {
        T::from_row_value(&self.value)
    }

    /// Non-failing variant of [`get`](Self::get).
    pub fn get_opt<T: FromRowValue>(&self) -> Option<T> {
        T::from_row_value(&self.value).ok()
    }

    /// Returns whether this node is the "no data" sentinel: a null value and
    /// zero children.
    pub fn is_empty_record(&self) -> bool {
        self.value.is_null() && self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{RowError, RowNode, RowValue};

    #[test]
    fn option_none_maps_to_null() {
        let value: RowValue = Option::<i64>::None.into();
        assert!(value.is_null());
        let value: RowValue = Some(7i64).into();
        assert_eq!(value, RowValue::Int(7));
    }

    #[test]
    fn f32_widens_into_float() {
        let value: RowValue = 1.5f32.into();
        assert_eq!(value, RowValue::Float(1.5));
    }

    #[test]
    fn add_child_returns_borrow_of_new_leaf() {
        let mut row = RowNode::record("person");
        let child = row.add_child("name", "Alice").unwrap();
        assert_eq!(child.key(), "name");
        assert_eq!(row.children().len(), 1);
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let mut row = RowNode::record("person");
        row.add_child("name", "Alice").unwrap();
        let err = row.add_child("name", "Bob").unwrap_err();
        assert_eq!(err, RowError::DuplicateKey("name".to_string()));
        assert_eq!(row.children().len(), 1);
    }

    #[test]
    fn empty_record_sentinel() {
        assert!(RowNode::record("none").is_empty_record());
        assert!(!RowNode::leaf("note", "").is_empty_record());
    }
}
