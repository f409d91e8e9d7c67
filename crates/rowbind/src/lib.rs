//! RowBind: a light-weight row/object mapping core for SQL databases.
//!
//! RowBind bridges typed domain records and relational rows across SQL
//! dialects. It is deliberately *not* an ORM framework: connections,
//! transactions, query expressions, schema DDL and migrations belong to
//! collaborating layers. What lives here is the hot path they all share:
//!
//! - a per-dialect [`ConverterRegistry`] of bidirectional value converters
//!   with row-version/enum/category fallbacks,
//! - dialect-parameterized INSERT/UPDATE/DELETE synthesis
//!   ([`build_insert`], [`build_update`], [`build_delete`]) with optimistic
//!   concurrency accounting,
//! - a [`Materializer`] that resolves each result shape to a cached
//!   `(field, ordinal, converter)` mapping and populates typed rows, plus
//!   raw/map/multi-model shapes,
//! - [`merge`] for stitching separately-fetched parent/child result sets
//!   into object graphs.
//!
//! Every cursor- or command-touching operation has an async mirror driven
//! by asupersync's [`Cx`]/[`Outcome`].

pub use rowbind_core::{
    Command, ConversionError, ConverterRegistry, Cursor, Cx, DatabaseError, Dialect, Error,
    FieldDefinition, InvalidCriteriaError, Model, ModelDefinition, NamingStrategy,
    OptimisticLockError, Outcome, ParamSet, Parameter, ReferenceDefinition, ReferenceKind, Result,
    SqlType, TableName, TypeKey, UnknownFieldError, UnresolvedReferenceError, Value,
    ValueConverter,
};
pub use rowbind_core::cursor::{AsyncCommand, AsyncCursor};
pub use rowbind_core::{from_db_value, to_db_value};
pub use rowbind_map::{
    MAX_CACHED_SHAPES, MapPolicy, MappedField, Materializer, RowIter, ShapeCache, Statement,
    TUPLE_BOUNDARY_COLUMN, build_delete, build_insert, build_update, build_update_add,
    build_update_fields, execute, execute_async, merge, merge_one,
};
