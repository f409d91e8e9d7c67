//! Dialect descriptors: quoting, parameter syntax, naming, converters.
//!
//! A [`Dialect`] bundles everything the statement builder and materializer
//! need to target one RDBMS flavor: identifier quoting, parameter
//! placeholder shape, the naming strategy that maps domain names to column
//! names, and that dialect's own [`ConverterRegistry`] instance.

use crate::convert::{
    BoolAsIntConverter, ConverterRegistry, JsonAsTextConverter, UuidAsTextConverter, from_db_value,
    to_db_value,
};
use crate::error::Result;
use crate::identifiers::{quote_ansi, quote_backtick, sanitize_name, to_snake_case};
use crate::model::TableName;
use crate::types::SqlType;
use crate::value::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Domain name → column/table name transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingStrategy {
    /// Use domain names verbatim.
    #[default]
    Preserve,
    /// `CustomerId` → `customer_id`.
    SnakeCase,
    /// `CustomerId` → `customerid`.
    Lowercase,
}

impl NamingStrategy {
    /// Transform a domain field name into a column name.
    #[must_use]
    pub fn column_name(&self, name: &str) -> String {
        match self {
            NamingStrategy::Preserve => name.to_string(),
            NamingStrategy::SnakeCase => to_snake_case(name),
            NamingStrategy::Lowercase => name.to_lowercase(),
        }
    }

    /// Transform a domain type name into a table name.
    #[must_use]
    pub fn table_name(&self, name: &str) -> String {
        self.column_name(name)
    }
}

/// Identifier quoting flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// ANSI double quotes (`"name"`).
    Ansi,
    /// MySQL backticks (`` `name` ``).
    Backtick,
}

/// Parameter placeholder flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamStyle {
    /// Positional `$1`, `$2`, ... (PostgreSQL).
    Dollar,
    /// Anonymous `?` (MySQL).
    Question,
    /// Named `:name` (SQLite).
    ColonNamed,
}

static NEXT_DIALECT_ID: AtomicUsize = AtomicUsize::new(0);

/// One RDBMS flavor's syntax and conversion rules.
pub struct Dialect {
    name: &'static str,
    id: usize,
    quote_style: QuoteStyle,
    param_style: ParamStyle,
    naming: NamingStrategy,
    registry: ConverterRegistry,
}

impl Dialect {
    fn with(
        name: &'static str,
        quote_style: QuoteStyle,
        param_style: ParamStyle,
        naming: NamingStrategy,
        registry: ConverterRegistry,
    ) -> Self {
        Self {
            name,
            id: NEXT_DIALECT_ID.fetch_add(1, Ordering::Relaxed),
            quote_style,
            param_style,
            naming,
            registry,
        }
    }

    /// PostgreSQL: ANSI quoting, `$n` placeholders, snake_case naming,
    /// native bool/uuid; JSON travels as text through the reference-type
    /// fallback.
    #[must_use]
    pub fn postgres() -> Self {
        Self::with(
            "postgres",
            QuoteStyle::Ansi,
            ParamStyle::Dollar,
            NamingStrategy::SnakeCase,
            ConverterRegistry::new(),
        )
    }

    /// MySQL: backtick quoting, `?` placeholders, verbatim naming; bools,
    /// UUIDs and JSON travel as integers/text.
    #[must_use]
    pub fn mysql() -> Self {
        let mut registry = ConverterRegistry::new();
        registry.register(&SqlType::Boolean, Arc::new(BoolAsIntConverter));
        registry.register(&SqlType::Uuid, Arc::new(UuidAsTextConverter));
        registry.register(&SqlType::Json, Arc::new(JsonAsTextConverter));
        Self::with(
            "mysql",
            QuoteStyle::Backtick,
            ParamStyle::Question,
            NamingStrategy::Preserve,
            registry,
        )
    }

    /// SQLite: ANSI quoting, `:name` placeholders, verbatim naming; bools,
    /// UUIDs and JSON travel as integers/text.
    #[must_use]
    pub fn sqlite() -> Self {
        let mut registry = ConverterRegistry::new();
        registry.register(&SqlType::Boolean, Arc::new(BoolAsIntConverter));
        registry.register(&SqlType::Uuid, Arc::new(UuidAsTextConverter));
        registry.register(&SqlType::Json, Arc::new(JsonAsTextConverter));
        Self::with(
            "sqlite",
            QuoteStyle::Ansi,
            ParamStyle::ColonNamed,
            NamingStrategy::Preserve,
            registry,
        )
    }

    /// Override the naming strategy.
    #[must_use]
    pub fn with_naming(mut self, naming: NamingStrategy) -> Self {
        self.naming = naming;
        self
    }

    /// Dialect name ("postgres", "mysql", "sqlite").
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Unique instance id; shape-cache keys include it so mappings built
    /// against one dialect instance are never served to another.
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    /// The active naming strategy.
    #[must_use]
    pub fn naming(&self) -> NamingStrategy {
        self.naming
    }

    /// This dialect's converter registry.
    #[must_use]
    pub fn registry(&self) -> &ConverterRegistry {
        &self.registry
    }

    /// Mutable registry access, for custom converter registration.
    pub fn registry_mut(&mut self) -> &mut ConverterRegistry {
        &mut self.registry
    }

    /// Quote an identifier.
    #[must_use]
    pub fn quote_ident(&self, name: &str) -> String {
        match self.quote_style {
            QuoteStyle::Ansi => quote_ansi(name),
            QuoteStyle::Backtick => quote_backtick(name),
        }
    }

    /// Quote a (possibly schema-qualified) table name.
    #[must_use]
    pub fn quote_table(&self, table: &TableName) -> String {
        match table.schema {
            Some(schema) => format!(
                "{}.{}",
                self.quote_ident(schema),
                self.quote_ident(table.name)
            ),
            None => self.quote_ident(table.name),
        }
    }

    /// Sanitize a field name for use as a parameter name.
    #[must_use]
    pub fn sanitize_param_name(&self, name: &str) -> String {
        sanitize_name(name)
    }

    /// Render a parameter placeholder.
    ///
    /// `ordinal` is 1-based bind position; `name` is the sanitized
    /// parameter name for named styles.
    #[must_use]
    pub fn placeholder(&self, name: &str, ordinal: usize) -> String {
        match self.param_style {
            ParamStyle::Dollar => format!("${ordinal}"),
            ParamStyle::Question => "?".to_string(),
            ParamStyle::ColonNamed => format!(":{name}"),
        }
    }

    /// Convert a domain value to this dialect's column representation.
    ///
    /// NULL short-circuits; conversion failures are logged then propagated.
    #[allow(clippy::result_large_err)]
    pub fn to_db(&self, value: Value, ty: &SqlType) -> Result<Value> {
        let converter = self.registry.best_match(ty);
        to_db_value(converter.as_ref(), ty, value, None)
    }

    /// Convert a raw column value to its domain representation.
    #[allow(clippy::result_large_err)]
    pub fn from_db(&self, value: Value, ty: &SqlType) -> Result<Value> {
        let converter = self.registry.best_match(ty);
        from_db_value(converter.as_ref(), ty, value, None)
    }
}

impl std::fmt::Debug for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dialect")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("quote_style", &self.quote_style)
            .field("param_style", &self.param_style)
            .field("naming", &self.naming)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naming_strategies() {
        assert_eq!(NamingStrategy::Preserve.column_name("CustomerId"), "CustomerId");
        assert_eq!(
            NamingStrategy::SnakeCase.column_name("CustomerId"),
            "customer_id"
        );
        assert_eq!(
            NamingStrategy::Lowercase.column_name("CustomerId"),
            "customerid"
        );
    }

    #[test]
    fn quoting_per_dialect() {
        assert_eq!(Dialect::postgres().quote_ident("order"), "\"order\"");
        assert_eq!(Dialect::mysql().quote_ident("order"), "`order`");
        assert_eq!(Dialect::sqlite().quote_ident("order"), "\"order\"");
    }

    #[test]
    fn table_quoting_with_schema() {
        let dialect = Dialect::postgres();
        assert_eq!(
            dialect.quote_table(&TableName::with_schema("crm", "customers")),
            "\"crm\".\"customers\""
        );
        assert_eq!(
            dialect.quote_table(&TableName::new("customers")),
            "\"customers\""
        );
    }

    #[test]
    fn placeholders_per_dialect() {
        assert_eq!(Dialect::postgres().placeholder("name", 2), "$2");
        assert_eq!(Dialect::mysql().placeholder("name", 2), "?");
        assert_eq!(Dialect::sqlite().placeholder("name", 2), ":name");
    }

    #[test]
    fn param_name_sanitization() {
        let dialect = Dialect::sqlite();
        assert_eq!(dialect.sanitize_param_name("total%"), "total");
        assert_eq!(dialect.sanitize_param_name("a b;c"), "abc");
    }

    #[test]
    fn dialect_ids_are_unique() {
        let a = Dialect::sqlite();
        let b = Dialect::sqlite();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn sqlite_bool_round_trip_through_front_door() {
        let dialect = Dialect::sqlite();
        let db = dialect.to_db(Value::Bool(true), &SqlType::Boolean).unwrap();
        assert_eq!(db, Value::Int(1));
        let back = dialect.from_db(db, &SqlType::Boolean).unwrap();
        assert_eq!(back, Value::Bool(true));
    }

    #[test]
    fn postgres_bool_is_native() {
        let dialect = Dialect::postgres();
        let db = dialect.to_db(Value::Bool(true), &SqlType::Boolean).unwrap();
        assert_eq!(db, Value::Bool(true));
    }

    #[test]
    fn null_round_trip_never_converts() {
        let dialect = Dialect::mysql();
        assert_eq!(dialect.to_db(Value::Null, &SqlType::Uuid).unwrap(), Value::Null);
        assert_eq!(dialect.from_db(Value::Null, &SqlType::Uuid).unwrap(), Value::Null);
    }

    #[test]
    fn custom_registration_overrides_stock() {
        use crate::convert::ReferenceTypeConverter;
        let mut dialect = Dialect::sqlite();
        dialect
            .registry_mut()
            .register(&SqlType::Json, Arc::new(ReferenceTypeConverter));
        assert_eq!(
            dialect.registry().best_match(&SqlType::Json).kind(),
            "reference-type"
        );
    }
}
