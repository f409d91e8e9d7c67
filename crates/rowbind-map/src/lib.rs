//! Statement synthesis, row materialization and reference merging.
//!
//! `rowbind-map` is the mapping layer on top of `rowbind-core`'s metadata:
//!
//! - **Write path** (`write`): parameterized INSERT/UPDATE/DELETE synthesis
//!   with dialect quoting/placeholders and converter-bound parameters.
//! - **Read path** (`read`): cached (field, ordinal, converter) resolution
//!   per result shape, typed row population, degenerate shapes (raw value
//!   rows, name-keyed maps, multi-model tuples).
//! - **Merge** (`merge`): stitching separately-fetched parent/child result
//!   sets into object graphs through id-keyed lookups.
//!
//! Every cursor/command-touching operation has an async mirror driven by
//! asupersync's `Cx`/`Outcome`.

pub mod merge;
pub mod read;
pub mod write;

pub use merge::{merge, merge_one};
pub use read::{
    MAX_CACHED_SHAPES, MapPolicy, MappedField, Materializer, RowIter, ShapeCache,
    TUPLE_BOUNDARY_COLUMN,
};
pub use write::{
    Statement, build_delete, build_insert, build_update, build_update_add, build_update_fields,
    execute, execute_async,
};

#[cfg(test)]
mod testing;
