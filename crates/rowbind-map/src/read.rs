//! Read-path materialization: cached column resolution and row population.
//!
//! For each distinct result shape (ordered column names + model + dialect)
//! the materializer computes a `(field, ordinal, converter)` mapping once,
//! caches it under an admission cap, and reuses it for every row. Column
//! resolution tries direct and naming-strategy matches first, then an
//! ordered set of fuzzy heuristics whose order is a compatibility contract.

use asupersync::{Cx, Outcome};
use regex::Regex;
use rowbind_core::Dialect;
use rowbind_core::convert::{ValueConverter, from_db_value};
use rowbind_core::cursor::{AsyncCursor, Cursor};
use rowbind_core::error::{Error, Result};
use rowbind_core::model::Model;
use rowbind_core::types::SqlType;
use rowbind_core::value::Value;
use std::any::TypeId;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// Admission cap for the shape cache. Once this many distinct shapes are
/// cached, additional shapes are computed on every call but never cached;
/// existing entries are never evicted.
pub const MAX_CACHED_SHAPES: usize = 10_000;

/// Column name marking the boundary between models in a multi-model result.
pub const TUPLE_BOUNDARY_COLUMN: &str = "EOT";

fn sanitize_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("[^0-9a-zA-Z_]").expect("pattern is valid"))
}

/// How to read one column of one cursor shape into one field.
pub struct MappedField {
    /// Index into the model's canonical field list.
    pub field: usize,
    /// Column ordinal in the cursor.
    pub ordinal: usize,
    /// Resolved converter for the field.
    pub converter: Arc<dyn ValueConverter>,
}

impl std::fmt::Debug for MappedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedField")
            .field("field", &self.field)
            .field("ordinal", &self.ordinal)
            .field("converter", &self.converter.kind())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ShapeKey {
    columns: Vec<String>,
    model: TypeId,
    dialect: usize,
}

/// Process-wide cache of resolved result shapes.
///
/// Shared explicitly (usually behind an `Arc`) rather than held as ambient
/// global state; lookups and insertions are guarded by one coarse mutex,
/// which is sufficient given the low churn rate of distinct shapes.
#[derive(Debug, Default)]
pub struct ShapeCache {
    inner: Mutex<HashMap<ShapeKey, Arc<[MappedField]>>>,
}

impl ShapeCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Policy switches for row population.
#[derive(Clone, Copy)]
pub struct MapPolicy {
    /// Enable heuristic column resolution for fields the direct and
    /// naming-strategy passes leave unmatched.
    pub fuzzy_matching: bool,
    /// When true, a field that fails to populate aborts the row; when
    /// false, the failure is logged and the field is left unset.
    pub strict: bool,
    /// Optional substitute for the zero/default value written into
    /// non-nullable fields on database NULL.
    pub null_default: Option<fn(&SqlType) -> Option<Value>>,
}

impl Default for MapPolicy {
    fn default() -> Self {
        Self {
            fuzzy_matching: true,
            strict: true,
            null_default: None,
        }
    }
}

impl std::fmt::Debug for MapPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapPolicy")
            .field("fuzzy_matching", &self.fuzzy_matching)
            .field("strict", &self.strict)
            .field("null_default", &self.null_default.is_some())
            .finish()
    }
}

/// Materializes cursor rows into typed models and degenerate shapes.
#[derive(Debug)]
pub struct Materializer<'d> {
    dialect: &'d Dialect,
    cache: Arc<ShapeCache>,
    policy: MapPolicy,
}

fn collect_columns(cursor: &impl Cursor) -> Vec<String> {
    (0..cursor.column_count())
        .map(|i| cursor.column_name(i).to_string())
        .collect()
}

fn collect_columns_async(cursor: &impl AsyncCursor) -> Vec<String> {
    (0..cursor.column_count())
        .map(|i| cursor.column_name(i).to_string())
        .collect()
}

impl<'d> Materializer<'d> {
    /// Create a materializer over a dialect and a shared shape cache.
    #[must_use]
    pub fn new(dialect: &'d Dialect, cache: Arc<ShapeCache>) -> Self {
        Self {
            dialect,
            cache,
            policy: MapPolicy::default(),
        }
    }

    /// Replace the population policy.
    #[must_use]
    pub fn with_policy(mut self, policy: MapPolicy) -> Self {
        self.policy = policy;
        self
    }

    // ==================== Column resolution ====================

    /// Resolve the `(field, ordinal, converter)` mapping for a column range.
    ///
    /// Pass 1 walks columns and matches each against a field's declared
    /// name/alias, then against the naming-strategy-transformed name.
    /// Pass 2 walks still-unmatched fields and, when fuzzy matching is
    /// enabled, tries the guess heuristics against the remaining unmapped
    /// columns. Fields that remain unmatched are left unpopulated.
    fn resolve<M: Model>(&self, columns: &[String], start: usize, end: usize) -> Vec<MappedField> {
        let def = M::definition();
        let naming = self.dialect.naming();
        let registry = self.dialect.registry();

        let mut mapped = Vec::new();
        let mut column_used = vec![false; end];
        let mut remaining: Vec<usize> = (0..def.fields().len()).collect();

        for (i, column) in columns.iter().enumerate().take(end).skip(start) {
            let direct = def.field_index(column).or_else(|| {
                def.fields().iter().position(|f| {
                    naming
                        .column_name(f.column_name())
                        .eq_ignore_ascii_case(column)
                })
            });
            if let Some(index) = direct {
                remaining.retain(|r| *r != index);
                column_used[i] = true;
                let field = &def.fields()[index];
                mapped.push(MappedField {
                    field: index,
                    ordinal: i,
                    converter: registry.best_match_field(&field.sql_type, field.row_version),
                });
            }
        }

        if !remaining.is_empty() && self.policy.fuzzy_matching {
            let unmapped: Vec<(usize, &str)> = (start..end)
                .filter(|i| !column_used[*i])
                .map(|i| (i, columns[i].as_str()))
                .collect();

            if !unmapped.is_empty() {
                for index in remaining {
                    let field = &def.fields()[index];
                    let column_name = naming.column_name(field.column_name());
                    let found = find_column(&column_name, &unmapped).or_else(|| {
                        // Fall back to the pre-alias field name when an
                        // alias shadowed it.
                        field
                            .alias
                            .map(|_| naming.column_name(field.name))
                            .and_then(|fallback| find_column(&fallback, &unmapped))
                    });
                    if let Some(ordinal) = found {
                        mapped.push(MappedField {
                            field: index,
                            ordinal,
                            converter: registry
                                .best_match_field(&field.sql_type, field.row_version),
                        });
                    }
                }
            }
        }

        mapped
    }

    /// The cached full-range mapping for a column list.
    ///
    /// Computes and admits the mapping on first encounter of the shape;
    /// once [`MAX_CACHED_SHAPES`] distinct shapes are cached, further shapes
    /// are computed per call without caching.
    #[must_use]
    pub fn mapping_for<M: Model>(&self, columns: &[String]) -> Arc<[MappedField]> {
        let key = ShapeKey {
            columns: columns.to_vec(),
            model: TypeId::of::<M>(),
            dialect: self.dialect.id(),
        };

        {
            let cached = self
                .cache
                .inner
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(hit) = cached.get(&key) {
                return Arc::clone(hit);
            }
        }

        let mapping: Arc<[MappedField]> = self.resolve::<M>(columns, 0, columns.len()).into();

        let mut cached = self
            .cache
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(hit) = cached.get(&key) {
            return Arc::clone(hit);
        }
        if cached.len() < MAX_CACHED_SHAPES {
            cached.insert(key, Arc::clone(&mapping));
        }
        mapping
    }

    // ==================== Row population ====================

    fn null_substitute(&self, nullable: bool, ty: &SqlType) -> Value {
        let mut value = if nullable { Value::Null } else { ty.zero_value() };
        if let Some(hook) = self.policy.null_default {
            if let Some(substitute) = hook(ty) {
                value = substitute;
            }
        }
        value
    }

    /// Populate one instance from the current row through a resolved
    /// mapping.
    fn populate<M: Model>(
        &self,
        row: &mut M,
        mapping: &[MappedField],
        get: impl Fn(usize) -> Value,
    ) -> Result<()> {
        let def = M::definition();
        for m in mapping {
            let field = &def.fields()[m.field];
            let raw = get(m.ordinal);

            let value = if raw.is_null() {
                Some(self.null_substitute(field.nullable, &field.sql_type))
            } else {
                match from_db_value(m.converter.as_ref(), &field.sql_type, raw, Some(field.name)) {
                    Ok(Value::Null) => Some(self.null_substitute(field.nullable, &field.sql_type)),
                    Ok(converted) => Some(converted),
                    Err(err) => {
                        if self.policy.strict {
                            return Err(err);
                        }
                        tracing::warn!(
                            model = def.model_name,
                            field = field.name,
                            %err,
                            "field population failed; leaving field unset"
                        );
                        None
                    }
                }
            };

            if let Some(value) = value {
                if let Err(err) = field.set_value(row, value) {
                    if self.policy.strict {
                        return Err(err);
                    }
                    tracing::warn!(
                        model = def.model_name,
                        field = field.name,
                        %err,
                        "field population failed; leaving field unset"
                    );
                }
            }
        }
        row.after_load();
        Ok(())
    }

    // ==================== Model shapes ====================

    /// Materialize the next row, if any.
    #[allow(clippy::result_large_err)]
    pub fn read_one<M: Model>(&self, cursor: &mut impl Cursor) -> Result<Option<M>> {
        if !cursor.advance()? {
            return Ok(None);
        }
        let columns = collect_columns(cursor);
        let mapping = self.mapping_for::<M>(&columns);
        let mut row = M::default();
        self.populate(&mut row, &mapping, |i| cursor.value(i))?;
        Ok(Some(row))
    }

    /// Lazily materialize every remaining row.
    ///
    /// The cursor is single-pass; the iteration is restartable only by
    /// re-issuing the query.
    pub fn read_iter<'a, M: Model, C: Cursor>(&'a self, cursor: &'a mut C) -> RowIter<'a, 'd, M, C> {
        let columns = collect_columns(cursor);
        let mapping = self.mapping_for::<M>(&columns);
        RowIter {
            materializer: self,
            cursor,
            mapping,
            _marker: PhantomData,
        }
    }

    /// Materialize every remaining row into a `Vec`.
    #[allow(clippy::result_large_err)]
    pub fn read_all<M: Model>(&self, cursor: &mut impl Cursor) -> Result<Vec<M>> {
        self.read_iter(cursor).collect()
    }

    // ==================== Degenerate shapes ====================

    /// Capture every remaining row as an ordered list of raw values.
    ///
    /// Bypasses field definitions and the shape cache entirely.
    #[allow(clippy::result_large_err)]
    pub fn read_value_rows(&self, cursor: &mut impl Cursor) -> Result<Vec<Vec<Value>>> {
        let count = cursor.column_count();
        let mut rows = Vec::new();
        while cursor.advance()? {
            rows.push((0..count).map(|i| cursor.value(i)).collect());
        }
        Ok(rows)
    }

    /// Capture every remaining row as a column-name-keyed map.
    ///
    /// Column names are trimmed; bypasses field definitions and the cache.
    #[allow(clippy::result_large_err)]
    pub fn read_map_rows(&self, cursor: &mut impl Cursor) -> Result<Vec<HashMap<String, Value>>> {
        let columns = collect_columns(cursor);
        let mut rows = Vec::new();
        while cursor.advance()? {
            let row = columns
                .iter()
                .enumerate()
                .map(|(i, name)| (name.trim().to_string(), cursor.value(i)))
                .collect();
            rows.push(row);
        }
        Ok(rows)
    }

    // ==================== Multi-model tuples ====================

    /// Split a column list into per-model ranges.
    ///
    /// Each range ends at an explicit boundary sentinel column when one is
    /// present, otherwise after the model's declared field count.
    fn segment_ranges(columns: &[String], field_counts: &[usize]) -> Vec<(usize, usize)> {
        let mut ranges = Vec::with_capacity(field_counts.len());
        let mut start = 0usize;
        for count in field_counts {
            let mut end = start;
            while end < columns.len() && !columns[end].eq_ignore_ascii_case(TUPLE_BOUNDARY_COLUMN) {
                end += 1;
            }
            let no_boundary = end == columns.len();
            if no_boundary {
                end = (start + count).min(columns.len());
            }
            ranges.push((start.min(columns.len()), end));
            start = if no_boundary { end } else { end + 1 };
        }
        ranges
    }

    /// Materialize rows as pairs of two independently-typed models.
    #[allow(clippy::result_large_err)]
    pub fn read_joined2<A: Model, B: Model>(
        &self,
        cursor: &mut impl Cursor,
    ) -> Result<Vec<(A, B)>> {
        let columns = collect_columns(cursor);
        let ranges = Self::segment_ranges(
            &columns,
            &[
                A::definition().fields().len(),
                B::definition().fields().len(),
            ],
        );
        // Partial column ranges are never cached.
        let map_a = self.resolve::<A>(&columns, ranges[0].0, ranges[0].1);
        let map_b = self.resolve::<B>(&columns, ranges[1].0, ranges[1].1);

        let mut rows = Vec::new();
        while cursor.advance()? {
            let mut a = A::default();
            self.populate(&mut a, &map_a, |i| cursor.value(i))?;
            let mut b = B::default();
            self.populate(&mut b, &map_b, |i| cursor.value(i))?;
            rows.push((a, b));
        }
        Ok(rows)
    }

    /// Materialize rows as triples of three independently-typed models.
    #[allow(clippy::result_large_err)]
    pub fn read_joined3<A: Model, B: Model, C: Model>(
        &self,
        cursor: &mut impl Cursor,
    ) -> Result<Vec<(A, B, C)>> {
        let columns = collect_columns(cursor);
        let ranges = Self::segment_ranges(
            &columns,
            &[
                A::definition().fields().len(),
                B::definition().fields().len(),
                C::definition().fields().len(),
            ],
        );
        let map_a = self.resolve::<A>(&columns, ranges[0].0, ranges[0].1);
        let map_b = self.resolve::<B>(&columns, ranges[1].0, ranges[1].1);
        let map_c = self.resolve::<C>(&columns, ranges[2].0, ranges[2].1);

        let mut rows = Vec::new();
        while cursor.advance()? {
            let mut a = A::default();
            self.populate(&mut a, &map_a, |i| cursor.value(i))?;
            let mut b = B::default();
            self.populate(&mut b, &map_b, |i| cursor.value(i))?;
            let mut c = C::default();
            self.populate(&mut c, &map_c, |i| cursor.value(i))?;
            rows.push((a, b, c));
        }
        Ok(rows)
    }

    // ==================== Async mirrors ====================

    /// Async mirror of [`Materializer::read_one`]; cancellation is checked
    /// before the row advance.
    pub async fn read_one_async<M: Model>(
        &self,
        cx: &Cx,
        cursor: &mut impl AsyncCursor,
    ) -> Outcome<Option<M>, Error> {
        if let Some(reason) = cx.cancel_reason() {
            return Outcome::Cancelled(reason);
        }
        match cursor.advance(cx).await {
            Outcome::Ok(true) => {}
            Outcome::Ok(false) => return Outcome::Ok(None),
            Outcome::Err(err) => return Outcome::Err(err),
            Outcome::Cancelled(reason) => return Outcome::Cancelled(reason),
            Outcome::Panicked(payload) => return Outcome::Panicked(payload),
        }
        let columns = collect_columns_async(cursor);
        let mapping = self.mapping_for::<M>(&columns);
        let mut row = M::default();
        match self.populate(&mut row, &mapping, |i| cursor.value(i)) {
            Ok(()) => Outcome::Ok(Some(row)),
            Err(err) => Outcome::Err(err),
        }
    }

    /// Async mirror of [`Materializer::read_all`]; yields control between
    /// row reads and checks cancellation at each suspension point.
    pub async fn read_all_async<M: Model>(
        &self,
        cx: &Cx,
        cursor: &mut impl AsyncCursor,
    ) -> Outcome<Vec<M>, Error> {
        let columns = collect_columns_async(cursor);
        let mapping = self.mapping_for::<M>(&columns);
        let mut rows = Vec::new();
        loop {
            if let Some(reason) = cx.cancel_reason() {
                return Outcome::Cancelled(reason);
            }
            match cursor.advance(cx).await {
                Outcome::Ok(true) => {}
                Outcome::Ok(false) => break,
                Outcome::Err(err) => return Outcome::Err(err),
                Outcome::Cancelled(reason) => return Outcome::Cancelled(reason),
                Outcome::Panicked(payload) => return Outcome::Panicked(payload),
            }
            let mut row = M::default();
            if let Err(err) = self.populate(&mut row, &mapping, |i| cursor.value(i)) {
                return Outcome::Err(err);
            }
            rows.push(row);
        }
        Outcome::Ok(rows)
    }

    /// Async mirror of [`Materializer::read_value_rows`].
    pub async fn read_value_rows_async(
        &self,
        cx: &Cx,
        cursor: &mut impl AsyncCursor,
    ) -> Outcome<Vec<Vec<Value>>, Error> {
        let count = cursor.column_count();
        let mut rows = Vec::new();
        loop {
            if let Some(reason) = cx.cancel_reason() {
                return Outcome::Cancelled(reason);
            }
            match cursor.advance(cx).await {
                Outcome::Ok(true) => rows.push((0..count).map(|i| cursor.value(i)).collect()),
                Outcome::Ok(false) => break,
                Outcome::Err(err) => return Outcome::Err(err),
                Outcome::Cancelled(reason) => return Outcome::Cancelled(reason),
                Outcome::Panicked(payload) => return Outcome::Panicked(payload),
            }
        }
        Outcome::Ok(rows)
    }

    /// Async mirror of [`Materializer::read_map_rows`].
    pub async fn read_map_rows_async(
        &self,
        cx: &Cx,
        cursor: &mut impl AsyncCursor,
    ) -> Outcome<Vec<HashMap<String, Value>>, Error> {
        let columns = collect_columns_async(cursor);
        let mut rows = Vec::new();
        loop {
            if let Some(reason) = cx.cancel_reason() {
                return Outcome::Cancelled(reason);
            }
            match cursor.advance(cx).await {
                Outcome::Ok(true) => {
                    let row = columns
                        .iter()
                        .enumerate()
                        .map(|(i, name)| (name.trim().to_string(), cursor.value(i)))
                        .collect();
                    rows.push(row);
                }
                Outcome::Ok(false) => break,
                Outcome::Err(err) => return Outcome::Err(err),
                Outcome::Cancelled(reason) => return Outcome::Cancelled(reason),
                Outcome::Panicked(payload) => return Outcome::Panicked(payload),
            }
        }
        Outcome::Ok(rows)
    }

    /// Async mirror of [`Materializer::read_joined2`].
    pub async fn read_joined2_async<A: Model, B: Model>(
        &self,
        cx: &Cx,
        cursor: &mut impl AsyncCursor,
    ) -> Outcome<Vec<(A, B)>, Error> {
        let columns = collect_columns_async(cursor);
        let ranges = Self::segment_ranges(
            &columns,
            &[
                A::definition().fields().len(),
                B::definition().fields().len(),
            ],
        );
        let map_a = self.resolve::<A>(&columns, ranges[0].0, ranges[0].1);
        let map_b = self.resolve::<B>(&columns, ranges[1].0, ranges[1].1);

        let mut rows = Vec::new();
        loop {
            if let Some(reason) = cx.cancel_reason() {
                return Outcome::Cancelled(reason);
            }
            match cursor.advance(cx).await {
                Outcome::Ok(true) => {}
                Outcome::Ok(false) => break,
                Outcome::Err(err) => return Outcome::Err(err),
                Outcome::Cancelled(reason) => return Outcome::Cancelled(reason),
                Outcome::Panicked(payload) => return Outcome::Panicked(payload),
            }
            let mut a = A::default();
            if let Err(err) = self.populate(&mut a, &map_a, |i| cursor.value(i)) {
                return Outcome::Err(err);
            }
            let mut b = B::default();
            if let Err(err) = self.populate(&mut b, &map_b, |i| cursor.value(i)) {
                return Outcome::Err(err);
            }
            rows.push((a, b));
        }
        Outcome::Ok(rows)
    }

    /// Async mirror of [`Materializer::read_joined3`].
    pub async fn read_joined3_async<A: Model, B: Model, C: Model>(
        &self,
        cx: &Cx,
        cursor: &mut impl AsyncCursor,
    ) -> Outcome<Vec<(A, B, C)>, Error> {
        let columns = collect_columns_async(cursor);
        let ranges = Self::segment_ranges(
            &columns,
            &[
                A::definition().fields().len(),
                B::definition().fields().len(),
                C::definition().fields().len(),
            ],
        );
        let map_a = self.resolve::<A>(&columns, ranges[0].0, ranges[0].1);
        let map_b = self.resolve::<B>(&columns, ranges[1].0, ranges[1].1);
        let map_c = self.resolve::<C>(&columns, ranges[2].0, ranges[2].1);

        let mut rows = Vec::new();
        loop {
            if let Some(reason) = cx.cancel_reason() {
                return Outcome::Cancelled(reason);
            }
            match cursor.advance(cx).await {
                Outcome::Ok(true) => {}
                Outcome::Ok(false) => break,
                Outcome::Err(err) => return Outcome::Err(err),
                Outcome::Cancelled(reason) => return Outcome::Cancelled(reason),
                Outcome::Panicked(payload) => return Outcome::Panicked(payload),
            }
            let mut a = A::default();
            if let Err(err) = self.populate(&mut a, &map_a, |i| cursor.value(i)) {
                return Outcome::Err(err);
            }
            let mut b = B::default();
            if let Err(err) = self.populate(&mut b, &map_b, |i| cursor.value(i)) {
                return Outcome::Err(err);
            }
            let mut c = C::default();
            if let Err(err) = self.populate(&mut c, &map_c, |i| cursor.value(i)) {
                return Outcome::Err(err);
            }
            rows.push((a, b, c));
        }
        Outcome::Ok(rows)
    }
}

/// Lazy row iterator over a single-pass cursor.
pub struct RowIter<'a, 'd, M: Model, C: Cursor> {
    materializer: &'a Materializer<'d>,
    cursor: &'a mut C,
    mapping: Arc<[MappedField]>,
    _marker: PhantomData<M>,
}

impl<M: Model, C: Cursor> Iterator for RowIter<'_, '_, M, C> {
    type Item = Result<M>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.cursor.advance() {
            Ok(true) => {}
            Ok(false) => return None,
            Err(err) => return Some(Err(err)),
        }
        let mut row = M::default();
        match self
            .materializer
            .populate(&mut row, &self.mapping, |i| self.cursor.value(i))
        {
            Ok(()) => Some(Ok(row)),
            Err(err) => Some(Err(err)),
        }
    }
}

// ==================== Fuzzy heuristics ====================

/// Locate a field's column among the unmapped columns.
///
/// Tries an exact (case-insensitive) match first, then the guess
/// heuristics. Columns are visited in ordinal order, so resolution is
/// deterministic.
fn find_column(field_name: &str, unmapped: &[(usize, &str)]) -> Option<usize> {
    for (ordinal, column) in unmapped {
        if column.eq_ignore_ascii_case(field_name) {
            return Some(*ordinal);
        }
    }
    try_guess_column(field_name, unmapped)
}

/// The heuristic ladder, in order. This order is a compatibility contract;
/// the first heuristic that matches wins.
fn try_guess_column(field_name: &str, unmapped: &[(usize, &str)]) -> Option<usize> {
    let field_lower = field_name.to_lowercase();
    let field_no_underscores = field_lower.replace('_', "");
    for (ordinal, column) in unmapped {
        // First guess: maybe the DB column has underscores?
        // e.g. customer_id (DB) vs CustomerId
        let no_underscores = column.replace('_', "");
        if no_underscores.eq_ignore_ascii_case(field_name) {
            return Some(*ordinal);
        }

        // Next guess: maybe the DB column has special characters?
        // e.g. quantity% (DB) vs Quantity
        let sanitized = sanitize_pattern().replace_all(column, "");
        if sanitized.eq_ignore_ascii_case(field_name) {
            return Some(*ordinal);
        }

        // Next guess: special characters *and* underscores?
        // e.g. quantity_% (DB) vs Quantity
        if sanitized.replace('_', "").eq_ignore_ascii_case(field_name) {
            return Some(*ordinal);
        }

        // Next guess: maybe the DB column has a prefix we don't have?
        // e.g. t130CustomerId (DB) vs CustomerId
        if column.to_lowercase().ends_with(&field_lower) {
            return Some(*ordinal);
        }

        // Next guess: a prefix *and* underscores, on either side?
        // e.g. t130_customer_id (DB) vs CustomerId
        if no_underscores
            .to_lowercase()
            .ends_with(&field_no_underscores)
        {
            return Some(*ordinal);
        }
    }
    None
}
