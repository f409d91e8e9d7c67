//! Core types and traits for RowBind.
//!
//! This crate provides the foundational abstractions of the mapping core:
//!
//! - `Value` dynamic SQL values and `SqlType` declared column types
//! - `Model` / `ModelDefinition` / `FieldDefinition` metadata with typed
//!   accessors
//! - `Dialect` descriptors (quoting, placeholders, naming, converters)
//! - `ValueConverter` and the per-dialect `ConverterRegistry`
//! - `Cursor` / `Command` interfaces implemented by the connection layer
//! - `Outcome`/`Cx` re-exports from asupersync for cancel-correct async
//!   mirrors

// Re-export asupersync primitives for structured concurrency
pub use asupersync::{Cx, Outcome};

pub mod convert;
pub mod cursor;
pub mod dialect;
pub mod error;
pub mod field;
pub mod identifiers;
pub mod model;
pub mod types;
pub mod value;

pub use convert::{ConverterRegistry, ValueConverter, from_db_value, to_db_value};
pub use cursor::{AsyncCommand, AsyncCursor, Command, Cursor, ParamSet, Parameter};
pub use dialect::{Dialect, NamingStrategy, ParamStyle, QuoteStyle};
pub use error::{
    ConversionError, DatabaseError, Error, InvalidCriteriaError, OptimisticLockError, Result,
    UnknownFieldError, UnresolvedReferenceError,
};
pub use field::FieldDefinition;
pub use model::{Model, ModelDefinition, ReferenceDefinition, ReferenceKind, TableName};
pub use types::{SqlType, TypeKey};
pub use value::Value;
