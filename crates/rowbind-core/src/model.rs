//! Model definitions: table identity, ordered fields, declared references.

use crate::error::{Result, UnknownFieldError};
use crate::field::FieldDefinition;
use std::any::{Any, TypeId};
use std::fmt;

/// Table identity: name plus optional schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableName {
    /// Table name.
    pub name: &'static str,
    /// Schema, when not the connection default.
    pub schema: Option<&'static str>,
}

impl TableName {
    /// Create a schema-less table name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name, schema: None }
    }

    /// Create a schema-qualified table name.
    #[must_use]
    pub const fn with_schema(schema: &'static str, name: &'static str) -> Self {
        Self {
            name,
            schema: Some(schema),
        }
    }
}

/// The shape of a declared reference field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// Collection of child rows (one-to-many).
    List,
    /// A single child row (one-to-one or belongs-to).
    Single,
}

/// A declared relationship field on a parent model.
///
/// Only the declaration lives here (shape, child type, optional back-pointer
/// field); which field carries the join key is derived per merge call.
pub struct ReferenceDefinition<M> {
    /// Field name on the parent.
    pub name: &'static str,
    /// List or single shape.
    pub kind: ReferenceKind,
    /// The parent-side field holding the child's key, for self-resolved
    /// single references.
    pub self_key: Option<&'static str>,
    child_type: TypeId,
    assign: Box<dyn Fn(&mut M, &mut dyn Any) + Send + Sync>,
}

impl<M: 'static> ReferenceDefinition<M> {
    /// Declare a collection-typed reference to child model `C`.
    pub fn list<C: 'static>(name: &'static str, set: fn(&mut M, Vec<C>)) -> Self {
        Self {
            name,
            kind: ReferenceKind::List,
            self_key: None,
            child_type: TypeId::of::<C>(),
            assign: Box::new(move |model, payload| {
                if let Some(slot) = payload.downcast_mut::<Option<Vec<C>>>() {
                    if let Some(children) = slot.take() {
                        set(model, children);
                    }
                }
            }),
        }
    }

    /// Declare a single-valued reference to child model `C`.
    pub fn single<C: 'static>(name: &'static str, set: fn(&mut M, C)) -> Self {
        Self {
            name,
            kind: ReferenceKind::Single,
            self_key: None,
            child_type: TypeId::of::<C>(),
            assign: Box::new(move |model, payload| {
                if let Some(slot) = payload.downcast_mut::<Option<C>>() {
                    if let Some(child) = slot.take() {
                        set(model, child);
                    }
                }
            }),
        }
    }

    /// Name the parent-side field that carries the child's primary key.
    #[must_use]
    pub fn self_key(mut self, field: &'static str) -> Self {
        self.self_key = Some(field);
        self
    }

    /// Whether this reference targets child type `C`.
    #[must_use]
    pub fn child_is<C: 'static>(&self) -> bool {
        self.child_type == TypeId::of::<C>()
    }

    /// Assign a child collection through the type-erased setter.
    ///
    /// Returns false when `C` does not match the declared child type.
    pub fn assign_list<C: 'static>(&self, model: &mut M, children: Vec<C>) -> bool {
        let mut payload: Option<Vec<C>> = Some(children);
        (self.assign)(model, &mut payload);
        payload.is_none()
    }

    /// Assign a single child through the type-erased setter.
    ///
    /// Returns false when `C` does not match the declared child type.
    pub fn assign_single<C: 'static>(&self, model: &mut M, child: C) -> bool {
        let mut payload: Option<C> = Some(child);
        (self.assign)(model, &mut payload);
        payload.is_none()
    }
}

impl<M> fmt::Debug for ReferenceDefinition<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceDefinition")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("self_key", &self.self_key)
            .finish_non_exhaustive()
    }
}

/// Table identity plus the ordered field list for one domain type.
///
/// Built lazily on first use of the type and cached for the process
/// lifetime (see [`Model::definition`]); immutable after construction.
#[derive(Debug)]
pub struct ModelDefinition<M> {
    /// Domain type name (drives implicit `<model>_id` join-key resolution).
    pub model_name: &'static str,
    /// Table identity.
    pub table: TableName,
    fields: Vec<FieldDefinition<M>>,
    references: Vec<ReferenceDefinition<M>>,
}

impl<M> ModelDefinition<M> {
    /// Create a definition for `model_name` mapping to `table`.
    #[must_use]
    pub fn new(model_name: &'static str, table: &'static str) -> Self {
        Self {
            model_name,
            table: TableName::new(table),
            fields: Vec::new(),
            references: Vec::new(),
        }
    }

    /// Set the schema.
    #[must_use]
    pub fn schema(mut self, schema: &'static str) -> Self {
        self.table.schema = Some(schema);
        self
    }

    /// Append a field definition (canonical order is append order).
    #[must_use]
    pub fn field(mut self, field: FieldDefinition<M>) -> Self {
        self.fields.push(field);
        self
    }

    /// Append a reference declaration.
    #[must_use]
    pub fn reference(mut self, reference: ReferenceDefinition<M>) -> Self {
        self.references.push(reference);
        self
    }

    /// The ordered field list.
    #[must_use]
    pub fn fields(&self) -> &[FieldDefinition<M>] {
        &self.fields
    }

    /// The declared reference fields.
    #[must_use]
    pub fn references(&self) -> &[ReferenceDefinition<M>] {
        &self.references
    }

    /// Find a field by name or alias (case-insensitive).
    #[must_use]
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDefinition<M>> {
        self.fields.iter().find(|f| f.matches_name(name))
    }

    /// Find a field's canonical index by name or alias (case-insensitive).
    #[must_use]
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.matches_name(name))
    }

    /// The primary key field, if one is declared.
    #[must_use]
    pub fn primary_key(&self) -> Option<&FieldDefinition<M>> {
        self.fields.iter().find(|f| f.primary_key)
    }

    /// The row-version field, if one is declared.
    #[must_use]
    pub fn row_version(&self) -> Option<&FieldDefinition<M>> {
        self.fields.iter().find(|f| f.row_version)
    }

    /// Resolve an explicit field-name subset to canonical-order indices.
    ///
    /// The result follows the model's field order regardless of the order
    /// names were supplied in. Unknown names are an error.
    pub fn ordered_subset(&self, names: &[&str]) -> Result<Vec<usize>> {
        for name in names {
            if self.field_index(name).is_none() {
                return Err(UnknownFieldError {
                    model: self.model_name,
                    field: (*name).to_string(),
                }
                .into());
            }
        }
        Ok(self
            .fields
            .iter()
            .enumerate()
            .filter(|(_, f)| names.iter().any(|n| f.matches_name(n)))
            .map(|(i, _)| i)
            .collect())
    }
}

/// Trait for domain types that map to database tables.
///
/// `definition()` must return a per-type static built exactly once; the
/// conventional impl keeps it in a `OnceLock`:
///
/// ```ignore
/// impl Model for Customer {
///     fn definition() -> &'static ModelDefinition<Self> {
///         static DEF: OnceLock<ModelDefinition<Customer>> = OnceLock::new();
///         DEF.get_or_init(|| {
///             ModelDefinition::new("Customer", "customers")
///                 .field(FieldDefinition::new("id", SqlType::BigInt, ..., ...).primary_key(true))
///                 .field(FieldDefinition::new("name", SqlType::Text, ..., ...))
///         })
///     }
/// }
/// ```
pub trait Model: Sized + Default + Send + Sync + 'static {
    /// The cached model definition for this type.
    fn definition() -> &'static ModelDefinition<Self>;

    /// Hook invoked once per instance after row population completes.
    fn after_load(&mut self) {}
}
