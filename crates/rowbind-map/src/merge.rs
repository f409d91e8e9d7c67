//! Reference graph merge: stitching independently-fetched parent and child
//! result sets into in-memory object graphs.
//!
//! Relationships are resolved through id-keyed lookup maps built before and
//! discarded after each merge call; nothing here creates in-memory
//! back-pointers that could cycle. Join-side classification is derived per
//! call: explicit foreign-key annotations win, then the parent's declared
//! self-key field, then the implicit `<model>_id` naming convention.

use rowbind_core::error::{Result, UnresolvedReferenceError};
use rowbind_core::field::FieldDefinition;
use rowbind_core::identifiers::to_snake_case;
use rowbind_core::model::{Model, ReferenceDefinition, ReferenceKind};
use rowbind_core::value::Value;
use std::any::TypeId;
use std::collections::HashMap;

/// A hashable join key derived from a field value.
///
/// Floating-point and JSON values never act as join keys; a null key means
/// "no relationship".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum JoinKey {
    Bool(bool),
    Int(i64),
    Text(String),
    Bytes(Vec<u8>),
    Uuid([u8; 16]),
}

fn join_key(value: &Value) -> Option<JoinKey> {
    match value {
        Value::Null | Value::Float(_) | Value::Double(_) | Value::Json(_) => None,
        Value::Bool(v) => Some(JoinKey::Bool(*v)),
        Value::TinyInt(v) => Some(JoinKey::Int(i64::from(*v))),
        Value::SmallInt(v) => Some(JoinKey::Int(i64::from(*v))),
        Value::Int(v) => Some(JoinKey::Int(i64::from(*v))),
        Value::BigInt(v) => Some(JoinKey::Int(*v)),
        Value::Date(v) => Some(JoinKey::Int(i64::from(*v))),
        Value::Time(v) | Value::Timestamp(v) => Some(JoinKey::Int(*v)),
        Value::Decimal(s) | Value::Text(s) => Some(JoinKey::Text(s.clone())),
        Value::Bytes(b) => Some(JoinKey::Bytes(b.clone())),
        Value::Uuid(b) => Some(JoinKey::Uuid(*b)),
    }
}

/// Whether a field looks like the conventional foreign key for `model_name`
/// (`customer_id` / `CustomerId`, by name or alias).
fn is_conventional_ref<M>(field: &FieldDefinition<M>, model_name: &str) -> bool {
    let snake = format!("{}_id", to_snake_case(model_name));
    let pascal = format!("{model_name}Id");
    field.matches_name(&snake) || field.matches_name(&pascal)
}

/// The child-side join field: an explicit foreign-key annotation pointing
/// at the parent type (preferring conventionally-named ones), else the
/// implicit naming convention.
fn child_join_field<P: Model, C: Model>() -> Option<&'static FieldDefinition<C>> {
    let parent_def = P::definition();
    let child_def = C::definition();
    let parent_type = TypeId::of::<P>();

    child_def
        .fields()
        .iter()
        .find(|f| {
            f.foreign_key == Some(parent_type) && is_conventional_ref(f, parent_def.model_name)
        })
        .or_else(|| {
            child_def
                .fields()
                .iter()
                .find(|f| f.foreign_key == Some(parent_type))
        })
        .or_else(|| {
            child_def
                .fields()
                .iter()
                .find(|f| is_conventional_ref(f, parent_def.model_name))
        })
}

/// The parent-side field carrying the child's key for a self-resolved
/// single reference.
fn self_ref_field<P: Model, C: Model>(
    reference: &ReferenceDefinition<P>,
) -> Option<&'static FieldDefinition<P>> {
    let parent_def = P::definition();
    let child_def = C::definition();
    let child_type = TypeId::of::<C>();

    if let Some(self_key) = reference.self_key {
        return parent_def.field_by_name(self_key);
    }

    parent_def
        .fields()
        .iter()
        .find(|f| {
            f.foreign_key == Some(child_type) && {
                let named = format!("{}_id", to_snake_case(reference.name));
                f.matches_name(&named)
            }
        })
        .or_else(|| {
            parent_def
                .fields()
                .iter()
                .find(|f| f.foreign_key == Some(child_type))
        })
        .or_else(|| {
            parent_def
                .fields()
                .iter()
                .find(|f| is_conventional_ref(f, child_def.model_name))
        })
}

fn assign_list_children<P: Model, C: Model + Clone>(
    parents: &mut [P],
    reference: &ReferenceDefinition<P>,
    join_field: &FieldDefinition<C>,
    children: &[C],
) {
    // Group children by join value, preserving original child order.
    let mut groups: HashMap<JoinKey, Vec<C>> = HashMap::new();
    for child in children {
        if let Some(key) = join_key(&join_field.get_value(child)) {
            groups.entry(key).or_default().push(child.clone());
        }
    }

    let Some(pk) = P::definition().primary_key() else {
        return;
    };
    for parent in parents {
        let matched = join_key(&pk.get_value(parent))
            .and_then(|key| groups.get(&key).cloned())
            .unwrap_or_default();
        // Parents with no matches get an empty collection, not a null.
        reference.assign_list(parent, matched);
    }
}

fn assign_self_children<P: Model, C: Model + Clone>(
    parents: &mut [P],
    reference: &ReferenceDefinition<P>,
    self_field: &FieldDefinition<P>,
    children: &[C],
) {
    let Some(child_pk) = C::definition().primary_key() else {
        return;
    };
    let mut by_pk: HashMap<JoinKey, &C> = HashMap::new();
    for child in children {
        if let Some(key) = join_key(&child_pk.get_value(child)) {
            by_pk.insert(key, child);
        }
    }

    for parent in parents {
        if let Some(child) = join_key(&self_field.get_value(parent)).and_then(|k| by_pk.get(&k)) {
            reference.assign_single(parent, (*child).clone());
        }
    }
}

fn assign_forward_children<P: Model, C: Model + Clone>(
    parents: &mut [P],
    reference: &ReferenceDefinition<P>,
    join_field: &FieldDefinition<C>,
    children: &[C],
) {
    let Some(pk) = P::definition().primary_key() else {
        return;
    };
    let mut by_join: HashMap<JoinKey, &C> = HashMap::new();
    for child in children {
        if let Some(key) = join_key(&join_field.get_value(child)) {
            by_join.insert(key, child);
        }
    }

    for parent in parents {
        if let Some(child) = join_key(&pk.get_value(parent)).and_then(|k| by_join.get(&k)) {
            reference.assign_single(parent, (*child).clone());
        }
    }
}

/// Merge a separately-fetched child result set into the parents' declared
/// reference fields of child type `C`.
///
/// Every declared reference field of type `C` is classified as a list,
/// forward single, or self reference and assigned through id-keyed lookups.
/// A field whose join side cannot be resolved is silently skipped, but if
/// no field resolves at all the call fails with a configuration error.
///
/// Mutates the parents in place and returns them for chaining.
#[allow(clippy::result_large_err)]
pub fn merge<'p, P: Model, C: Model + Clone>(
    parents: &'p mut [P],
    children: &[C],
) -> Result<&'p mut [P]> {
    let parent_def = P::definition();
    let mut resolved_any = false;

    for reference in parent_def.references() {
        if !reference.child_is::<C>() {
            continue;
        }

        match reference.kind {
            ReferenceKind::List => {
                if let Some(join_field) = child_join_field::<P, C>() {
                    assign_list_children(parents, reference, join_field, children);
                    resolved_any = true;
                }
            }
            ReferenceKind::Single => {
                if let Some(self_field) = self_ref_field::<P, C>(reference) {
                    assign_self_children(parents, reference, self_field, children);
                    resolved_any = true;
                } else if let Some(join_field) = child_join_field::<P, C>() {
                    assign_forward_children(parents, reference, join_field, children);
                    resolved_any = true;
                }
            }
        }
    }

    if !resolved_any {
        return Err(UnresolvedReferenceError {
            parent: parent_def.model_name,
            child: C::definition().model_name,
        }
        .into());
    }
    Ok(parents)
}

/// Single-parent convenience wrapper around [`merge`].
#[allow(clippy::result_large_err)]
pub fn merge_one<'p, P: Model, C: Model + Clone>(
    parent: &'p mut P,
    children: &[C],
) -> Result<&'p mut P> {
    merge(std::slice::from_mut(parent), children)?;
    Ok(parent)
}
