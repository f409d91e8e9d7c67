//! Write-path statement synthesis: parameterized INSERT/UPDATE/DELETE.
//!
//! Builders walk a model's field definitions, obtain quoting / placeholder
//! syntax / parameter-name sanitization from the active dialect, and bind
//! parameter values through the dialect's best-match converters. The same
//! algorithm therefore produces correct text for every supported RDBMS.

use asupersync::{Cx, Outcome};
use rowbind_core::convert::to_db_value;
use rowbind_core::cursor::{AsyncCommand, Command, ParamSet};
use rowbind_core::error::{
    Error, InvalidCriteriaError, OptimisticLockError, Result, UnknownFieldError,
};
use rowbind_core::field::FieldDefinition;
use rowbind_core::model::Model;
use rowbind_core::value::Value;
use rowbind_core::Dialect;
use std::fmt;

/// A fully built, parameterized statement.
#[derive(Debug, Clone)]
pub struct Statement {
    /// The parameterized SQL text.
    pub sql: String,
    /// Bound parameters in placeholder order.
    pub params: ParamSet,
    /// Whether a row-version predicate was applied: zero affected rows must
    /// then be reported as a concurrency conflict, not a no-op.
    pub optimistic: bool,
    /// Quoted table name, kept for conflict diagnostics.
    pub table: String,
}

impl Statement {
    /// Load this statement into a command: replaces the text and clears and
    /// repopulates the parameter set, so command instances can be reused
    /// across build calls.
    pub fn apply_to<C: Command>(&self, cmd: &mut C) {
        cmd.set_text(&self.sql);
        let params = cmd.params_mut();
        params.clear();
        for p in &self.params {
            params.push(p.name.clone(), p.value.clone());
        }
    }

    /// Async-command counterpart of [`Statement::apply_to`].
    pub fn apply_to_async<C: AsyncCommand>(&self, cmd: &mut C) {
        cmd.set_text(&self.sql);
        let params = cmd.params_mut();
        params.clear();
        for p in &self.params {
            params.push(p.name.clone(), p.value.clone());
        }
    }

    /// Map an affected-row count through the optimistic contract.
    #[allow(clippy::result_large_err)]
    pub fn check_rows(&self, rows: u64) -> Result<u64> {
        if rows == 0 && self.optimistic {
            return Err(OptimisticLockError {
                table: self.table.clone(),
            }
            .into());
        }
        Ok(rows)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SQL: {}", self.sql)?;
        if !self.params.is_empty() {
            write!(f, "\nPARAMS: ")?;
            for (i, p) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}={}", p.name, p.value)?;
            }
        }
        Ok(())
    }
}

/// Whether a caller-supplied id counts as "not supplied": the generation
/// rule only fills defaults, it never overwrites a real value.
fn is_default_id(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Uuid(bytes) => bytes.iter().all(|b| *b == 0),
        Value::Text(s) => s.is_empty(),
        other => other.as_i64() == Some(0),
    }
}

fn fresh_id() -> Value {
    Value::Uuid(*uuid::Uuid::new_v4().as_bytes())
}

/// Quoted, naming-strategy-transformed column name.
fn column_sql<M>(dialect: &Dialect, field: &FieldDefinition<M>) -> String {
    dialect.quote_ident(&dialect.naming().column_name(field.column_name()))
}

/// Bind one field's current value through its best-match converter.
#[allow(clippy::result_large_err)]
fn bind_field<M: Model>(
    dialect: &Dialect,
    params: &mut ParamSet,
    field: &FieldDefinition<M>,
    model: &M,
    value_override: Option<Value>,
) -> Result<()> {
    let converter = dialect
        .registry()
        .best_match_field(&field.sql_type, field.row_version);
    let raw = value_override.unwrap_or_else(|| field.get_value(model));
    let bound = to_db_value(converter.as_ref(), &field.sql_type, raw, Some(field.name))?;
    params.push(dialect.sanitize_param_name(field.column_name()), bound);
    Ok(())
}

/// Emit the value expression for a column: the bare placeholder, or a custom
/// fragment with `{0}` substituted by the placeholder.
fn value_expr(placeholder: &str, custom: Option<&str>) -> String {
    match custom {
        Some(fragment) if fragment.contains("{0}") => fragment.replace("{0}", placeholder),
        Some(fragment) => fragment.to_string(),
        None => placeholder.to_string(),
    }
}

/// Build a parameterized INSERT for a model instance.
///
/// `fields` restricts the statement to an explicit subset, reordered to the
/// model's canonical field order; `None` inserts the full field set. Fields
/// marked skip-on-insert are omitted unless they are client-generated-id
/// fields, which get a fresh identifier bound when the instance does not
/// already carry one.
#[allow(clippy::result_large_err)]
pub fn build_insert<M: Model>(
    dialect: &Dialect,
    model: &M,
    fields: Option<&[&str]>,
) -> Result<Statement> {
    let def = M::definition();
    let indices = match fields {
        Some(names) => def.ordered_subset(names)?,
        None => (0..def.fields().len()).collect(),
    };

    let table = dialect.quote_table(&def.table);
    let mut columns = String::new();
    let mut values = String::new();
    let mut params = ParamSet::new();

    for index in indices {
        let field = &def.fields()[index];
        if field.should_skip_insert() && !field.auto_id {
            continue;
        }

        if !columns.is_empty() {
            columns.push(',');
            values.push(',');
        }
        columns.push_str(&column_sql(dialect, field));

        let name = dialect.sanitize_param_name(field.column_name());
        let placeholder = dialect.placeholder(&name, params.len() + 1);
        values.push_str(&value_expr(&placeholder, field.custom_insert));

        if field.auto_id {
            let current = field.get_value(model);
            let id = if is_default_id(&current) {
                fresh_id()
            } else {
                current
            };
            bind_field(dialect, &mut params, field, model, Some(id))?;
        } else {
            bind_field(dialect, &mut params, field, model, None)?;
        }
    }

    Ok(Statement {
        sql: format!("INSERT INTO {table} ({columns}) VALUES ({values})"),
        params,
        optimistic: false,
        table,
    })
}

/// Build a whole-object UPDATE.
///
/// Every field marked primary-key or row-version moves into an AND-joined
/// WHERE predicate against its current value; the remaining writable fields
/// form the SET list. The statement is optimistic when a row-version field
/// contributed to the predicate.
#[allow(clippy::result_large_err)]
pub fn build_update<M: Model>(dialect: &Dialect, model: &M) -> Result<Statement> {
    let def = M::definition();
    let table = dialect.quote_table(&def.table);
    let mut set = String::new();
    let mut filter = String::new();
    let mut params = ParamSet::new();
    let mut optimistic = false;

    // SET list first so bind order matches placeholder appearance order on
    // purely positional dialects.
    let mut filter_fields = Vec::new();
    for field in def.fields() {
        if field.primary_key || field.row_version {
            filter_fields.push(field);
            optimistic |= field.row_version;
            continue;
        }
        if field.should_skip_update() {
            continue;
        }

        if !set.is_empty() {
            set.push_str(", ");
        }
        let name = dialect.sanitize_param_name(field.column_name());
        let placeholder = dialect.placeholder(&name, params.len() + 1);
        set.push_str(&column_sql(dialect, field));
        set.push('=');
        set.push_str(&value_expr(&placeholder, field.custom_update));
        bind_field(dialect, &mut params, field, model, None)?;
    }

    for field in filter_fields {
        if !filter.is_empty() {
            filter.push_str(" AND ");
        }
        let name = dialect.sanitize_param_name(field.column_name());
        let placeholder = dialect.placeholder(&name, params.len() + 1);
        filter.push_str(&column_sql(dialect, field));
        filter.push('=');
        filter.push_str(&placeholder);
        bind_field(dialect, &mut params, field, model, None)?;
    }

    let sql = if set.is_empty() {
        String::new()
    } else if filter.is_empty() {
        format!("UPDATE {table} SET {set}")
    } else {
        format!("UPDATE {table} SET {set} WHERE {filter}")
    };

    Ok(Statement {
        sql,
        params,
        optimistic,
        table,
    })
}

#[derive(Clone, Copy)]
enum SetMode {
    Assign,
    Additive,
}

#[allow(clippy::result_large_err)]
fn build_update_subset<M: Model>(
    dialect: &Dialect,
    model: &M,
    fields: &[&str],
    where_sql: &str,
    where_params: &[Value],
    mode: SetMode,
) -> Result<Statement> {
    let def = M::definition();
    let indices = def.ordered_subset(fields)?;
    let table = dialect.quote_table(&def.table);
    let mut set = String::new();
    let mut params = ParamSet::new();

    for index in indices {
        let field = &def.fields()[index];
        // Primary keys and auto-increment columns are never SET, even when
        // named explicitly.
        if field.primary_key || field.should_skip_update() {
            continue;
        }

        if !set.is_empty() {
            set.push_str(", ");
        }
        let name = dialect.sanitize_param_name(field.column_name());
        let placeholder = dialect.placeholder(&name, params.len() + 1);
        let column = column_sql(dialect, field);
        match mode {
            SetMode::Additive if field.sql_type.is_numeric() => {
                set.push_str(&format!("{column}={column}+{placeholder}"));
            }
            _ => {
                set.push_str(&column);
                set.push('=');
                set.push_str(&value_expr(&placeholder, field.custom_update));
            }
        }
        bind_field(dialect, &mut params, field, model, None)?;
    }

    for (i, value) in where_params.iter().enumerate() {
        params.push(format!("w{i}"), value.clone());
    }

    let sql = if where_sql.is_empty() {
        format!("UPDATE {table} SET {set}")
    } else {
        format!("UPDATE {table} SET {set} WHERE {where_sql}")
    };

    Ok(Statement {
        sql,
        params,
        optimistic: false,
        table,
    })
}

/// Build an explicit field-list UPDATE.
///
/// Only the named fields are SET (primary-key and auto-increment fields are
/// excluded even if named); the WHERE predicate is supplied by the caller as
/// ready-built SQL plus parameters, not synthesized here.
#[allow(clippy::result_large_err)]
pub fn build_update_fields<M: Model>(
    dialect: &Dialect,
    model: &M,
    fields: &[&str],
    where_sql: &str,
    where_params: &[Value],
) -> Result<Statement> {
    build_update_subset(dialect, model, fields, where_sql, where_params, SetMode::Assign)
}

/// Build an additive UPDATE: numeric fields are written as
/// `col = col + ?`, letting counters increment without a read-modify-write
/// race; non-numeric fields fall back to plain assignment.
#[allow(clippy::result_large_err)]
pub fn build_update_add<M: Model>(
    dialect: &Dialect,
    model: &M,
    fields: &[&str],
    where_sql: &str,
    where_params: &[Value],
) -> Result<Statement> {
    build_update_subset(
        dialect,
        model,
        fields,
        where_sql,
        where_params,
        SetMode::Additive,
    )
}

/// Build a DELETE from a field → value criteria map.
///
/// Criteria are AND-joined in canonical field order, using `IS NULL` for
/// null values and parameterized equality otherwise. At least one non-null
/// criterion is required; a row-version criterion makes the statement
/// optimistic.
#[allow(clippy::result_large_err)]
pub fn build_delete<M: Model>(dialect: &Dialect, criteria: &[(&str, Value)]) -> Result<Statement> {
    if criteria.iter().all(|(_, value)| value.is_null()) {
        return Err(InvalidCriteriaError {
            message: "delete requires at least one non-null criterion".to_string(),
        }
        .into());
    }

    let def = M::definition();
    for (name, _) in criteria {
        if def.field_index(name).is_none() {
            return Err(UnknownFieldError {
                model: def.model_name,
                field: (*name).to_string(),
            }
            .into());
        }
    }

    let table = dialect.quote_table(&def.table);
    let mut filter = String::new();
    let mut params = ParamSet::new();
    let mut optimistic = false;

    for field in def.fields() {
        let Some((_, value)) = criteria.iter().find(|(name, _)| field.matches_name(name)) else {
            continue;
        };

        if !filter.is_empty() {
            filter.push_str(" AND ");
        }
        optimistic |= field.row_version;

        if value.is_null() {
            filter.push_str(&column_sql(dialect, field));
            filter.push_str(" IS NULL");
        } else {
            let name = dialect.sanitize_param_name(field.column_name());
            let placeholder = dialect.placeholder(&name, params.len() + 1);
            filter.push_str(&column_sql(dialect, field));
            filter.push('=');
            filter.push_str(&placeholder);

            let converter = dialect
                .registry()
                .best_match_field(&field.sql_type, field.row_version);
            let bound = to_db_value(
                converter.as_ref(),
                &field.sql_type,
                value.clone(),
                Some(field.name),
            )?;
            params.push(name, bound);
        }
    }

    Ok(Statement {
        sql: format!("DELETE FROM {table} WHERE {filter}"),
        params,
        optimistic,
        table,
    })
}

/// Apply a statement to a command, execute it, and enforce the optimistic
/// contract on the affected-row count.
#[allow(clippy::result_large_err)]
pub fn execute<C: Command>(statement: &Statement, cmd: &mut C) -> Result<u64> {
    statement.apply_to(cmd);
    let rows = cmd.execute()?;
    statement.check_rows(rows)
}

/// Async mirror of [`execute`]; checks for cancellation before issuing the
/// command.
pub async fn execute_async<C: AsyncCommand>(
    statement: &Statement,
    cx: &Cx,
    cmd: &mut C,
) -> Outcome<u64, Error> {
    if let Some(reason) = cx.cancel_reason() {
        return Outcome::Cancelled(reason);
    }
    statement.apply_to_async(cmd);
    match cmd.execute(cx).await {
        Outcome::Ok(rows) => match statement.check_rows(rows) {
            Ok(rows) => Outcome::Ok(rows),
            Err(err) => Outcome::Err(err),
        },
        Outcome::Err(err) => Outcome::Err(err),
        Outcome::Cancelled(reason) => Outcome::Cancelled(reason),
        Outcome::Panicked(payload) => Outcome::Panicked(payload),
    }
}
