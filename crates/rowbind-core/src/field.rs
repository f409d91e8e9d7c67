//! Field definitions: per-column metadata plus typed accessors.

use crate::error::Result;
use crate::types::SqlType;
use crate::value::Value;
use std::any::TypeId;
use std::fmt;

/// Metadata about one model field/column, bound to the domain type `M`
/// through a pair of typed accessors.
///
/// Definitions are built once per model (see `ModelDefinition`) and live for
/// the process lifetime; everything here is immutable after construction.
pub struct FieldDefinition<M> {
    /// Domain field name.
    pub name: &'static str,
    /// Column-name override. When set, this is the column name and `name`
    /// becomes the pre-alias fallback used by fuzzy column matching.
    pub alias: Option<&'static str>,
    /// Declared column type.
    pub sql_type: SqlType,
    /// Whether the column accepts NULL.
    pub nullable: bool,
    /// Whether this is the primary key.
    pub primary_key: bool,
    /// Server-generated identity column.
    pub auto_increment: bool,
    /// Client-generated identifier: the mapper binds a fresh unique id on
    /// insert unless the caller already supplied a non-default value.
    pub auto_id: bool,
    /// Optimistic-concurrency version column.
    pub row_version: bool,
    /// Computed column, never written.
    pub computed: bool,
    /// Explicit annotation that this column references another model type.
    pub foreign_key: Option<TypeId>,
    /// Custom SQL fragment emitted in place of the column in SELECT lists.
    pub custom_select: Option<&'static str>,
    /// Custom SQL fragment emitted in place of the bare placeholder on
    /// INSERT.
    pub custom_insert: Option<&'static str>,
    /// Custom SQL fragment emitted in place of the bare placeholder on
    /// UPDATE.
    pub custom_update: Option<&'static str>,
    get: fn(&M) -> Value,
    set: fn(&mut M, Value) -> Result<()>,
}

impl<M> FieldDefinition<M> {
    /// Create a new field definition with its typed accessors.
    pub fn new(
        name: &'static str,
        sql_type: SqlType,
        get: fn(&M) -> Value,
        set: fn(&mut M, Value) -> Result<()>,
    ) -> Self {
        Self {
            name,
            alias: None,
            sql_type,
            nullable: false,
            primary_key: false,
            auto_increment: false,
            auto_id: false,
            row_version: false,
            computed: false,
            foreign_key: None,
            custom_select: None,
            custom_insert: None,
            custom_update: None,
            get,
            set,
        }
    }

    /// Set a column-name override.
    #[must_use]
    pub fn alias(mut self, name: &'static str) -> Self {
        self.alias = Some(name);
        self
    }

    /// Set nullable flag.
    #[must_use]
    pub fn nullable(mut self, value: bool) -> Self {
        self.nullable = value;
        self
    }

    /// Set primary key flag.
    #[must_use]
    pub fn primary_key(mut self, value: bool) -> Self {
        self.primary_key = value;
        self
    }

    /// Set auto-increment flag.
    #[must_use]
    pub fn auto_increment(mut self, value: bool) -> Self {
        self.auto_increment = value;
        self
    }

    /// Set client-generated-id flag.
    #[must_use]
    pub fn auto_id(mut self, value: bool) -> Self {
        self.auto_id = value;
        self
    }

    /// Set row-version flag.
    #[must_use]
    pub fn row_version(mut self, value: bool) -> Self {
        self.row_version = value;
        self
    }

    /// Set computed flag.
    #[must_use]
    pub fn computed(mut self, value: bool) -> Self {
        self.computed = value;
        self
    }

    /// Declare that this column references model type `C`.
    #[must_use]
    pub fn references<C: 'static>(mut self) -> Self {
        self.foreign_key = Some(TypeId::of::<C>());
        self
    }

    /// Set a custom SELECT fragment.
    #[must_use]
    pub fn custom_select(mut self, sql: &'static str) -> Self {
        self.custom_select = Some(sql);
        self
    }

    /// Set a custom INSERT value fragment.
    #[must_use]
    pub fn custom_insert(mut self, sql: &'static str) -> Self {
        self.custom_insert = Some(sql);
        self
    }

    /// Set a custom UPDATE value fragment.
    #[must_use]
    pub fn custom_update(mut self, sql: &'static str) -> Self {
        self.custom_update = Some(sql);
        self
    }

    /// The effective column name (alias override, else the field name).
    #[must_use]
    pub fn column_name(&self) -> &'static str {
        self.alias.unwrap_or(self.name)
    }

    /// Read the field's current value from a model instance.
    pub fn get_value(&self, model: &M) -> Value {
        (self.get)(model)
    }

    /// Write a value into a model instance through the typed setter.
    pub fn set_value(&self, model: &mut M, value: Value) -> Result<()> {
        (self.set)(model, value)
    }

    /// Whether ordinary value serialization skips this field on INSERT.
    ///
    /// Auto-id fields are also skipped here; the insert path gives them a
    /// distinct generation rule instead.
    #[must_use]
    pub fn should_skip_insert(&self) -> bool {
        self.auto_increment || self.computed || self.row_version
    }

    /// Whether ordinary value serialization skips this field on UPDATE.
    #[must_use]
    pub fn should_skip_update(&self) -> bool {
        self.auto_increment || self.computed || self.row_version
    }

    /// Case-insensitive match against the field name or its alias.
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.alias.is_some_and(|a| a.eq_ignore_ascii_case(name))
    }
}

impl<M> fmt::Debug for FieldDefinition<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDefinition")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("sql_type", &self.sql_type)
            .field("nullable", &self.nullable)
            .field("primary_key", &self.primary_key)
            .field("auto_increment", &self.auto_increment)
            .field("auto_id", &self.auto_id)
            .field("row_version", &self.row_version)
            .field("computed", &self.computed)
            .finish_non_exhaustive()
    }
}
