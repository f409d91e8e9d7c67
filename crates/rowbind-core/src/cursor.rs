//! Cursor and command interfaces consumed from the connection layer.
//!
//! This crate never opens connections or issues queries itself; the
//! materializer reads rows through [`Cursor`]/[`AsyncCursor`] and the
//! statement builder executes through [`Command`]/[`AsyncCommand`]. Drivers
//! implement these for their native result/statement handles.
//!
//! The async traits integrate with asupersync's structured concurrency via
//! a `Cx` context; cancellation surfaces as `Outcome::Cancelled`, never as a
//! partial result.

use crate::error::Result;
use crate::value::Value;
use asupersync::{Cx, Outcome};
use std::future::Future;

/// A live, single-pass result cursor.
///
/// The cursor starts positioned before the first row; each `advance` moves
/// to the next row and reports whether one exists. Column metadata is stable
/// for the cursor's lifetime.
pub trait Cursor {
    /// Number of columns in the result shape.
    fn column_count(&self) -> usize;

    /// Column name at an ordinal.
    fn column_name(&self, index: usize) -> &str;

    /// Raw value at an ordinal of the current row.
    fn value(&self, index: usize) -> Value;

    /// Advance to the next row; false signals end of data.
    #[allow(clippy::result_large_err)]
    fn advance(&mut self) -> Result<bool>;
}

/// Async mirror of [`Cursor`]; `advance` is the suspension point between
/// row reads.
pub trait AsyncCursor: Send {
    /// Number of columns in the result shape.
    fn column_count(&self) -> usize;

    /// Column name at an ordinal.
    fn column_name(&self, index: usize) -> &str;

    /// Raw value at an ordinal of the current row.
    fn value(&self, index: usize) -> Value;

    /// Advance to the next row; false signals end of data.
    fn advance(&mut self, cx: &Cx) -> impl Future<Output = Outcome<bool, crate::Error>> + Send;
}

/// One bound statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Sanitized, dialect-shaped parameter name.
    pub name: String,
    /// Bound value, already in column representation.
    pub value: Value,
}

/// An ordered, clearable parameter collection.
///
/// Builders always clear and repopulate the set they are given, so a command
/// instance can be reused across build calls without leaking stale
/// parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSet {
    params: Vec<Parameter>,
}

impl ParamSet {
    /// Create an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all parameters.
    pub fn clear(&mut self) {
        self.params.clear();
    }

    /// Append a named parameter.
    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.params.push(Parameter {
            name: name.into(),
            value,
        });
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterate parameters in bind order.
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    /// The bound values in bind order.
    #[must_use]
    pub fn values(&self) -> Vec<Value> {
        self.params.iter().map(|p| p.value.clone()).collect()
    }

    /// Look up a parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }
}

impl<'a> IntoIterator for &'a ParamSet {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

/// A pending database command: SQL text plus a clearable parameter set.
pub trait Command {
    /// The cursor type produced by `query`.
    type Cursor<'a>: Cursor
    where
        Self: 'a;

    /// Replace the command text.
    fn set_text(&mut self, sql: &str);

    /// The current command text.
    fn text(&self) -> &str;

    /// The bound parameters.
    fn params(&self) -> &ParamSet;

    /// Mutable access to the parameter set.
    fn params_mut(&mut self) -> &mut ParamSet;

    /// Execute as a non-query; returns rows affected.
    #[allow(clippy::result_large_err)]
    fn execute(&mut self) -> Result<u64>;

    /// Execute and return the first column of the first row.
    #[allow(clippy::result_large_err)]
    fn query_scalar(&mut self) -> Result<Value>;

    /// Execute and return a result cursor.
    #[allow(clippy::result_large_err)]
    fn query(&mut self) -> Result<Self::Cursor<'_>>;
}

/// Async mirror of [`Command`].
pub trait AsyncCommand: Send {
    /// The cursor type produced by `query`.
    type Cursor<'a>: AsyncCursor
    where
        Self: 'a;

    /// Replace the command text.
    fn set_text(&mut self, sql: &str);

    /// The current command text.
    fn text(&self) -> &str;

    /// Mutable access to the parameter set.
    fn params_mut(&mut self) -> &mut ParamSet;

    /// Execute as a non-query; returns rows affected.
    fn execute(&mut self, cx: &Cx) -> impl Future<Output = Outcome<u64, crate::Error>> + Send;

    /// Execute and return the first column of the first row.
    fn query_scalar(
        &mut self,
        cx: &Cx,
    ) -> impl Future<Output = Outcome<Value, crate::Error>> + Send;

    /// Execute and return a result cursor.
    fn query(
        &mut self,
        cx: &Cx,
    ) -> impl Future<Output = Outcome<Self::Cursor<'_>, crate::Error>> + Send;
}
