//! Per-type value converters and the per-dialect registry.
//!
//! Converters translate between the domain representation of a value and
//! the column representation a dialect actually sends over the wire (e.g.
//! booleans as integers on SQLite, UUIDs as text on MySQL). Each dialect
//! owns its own [`ConverterRegistry`] instance; resolution falls back from
//! exact registrations to category converters.

use crate::error::{ConversionError, Result};
use crate::types::{SqlType, TypeKey};
use crate::value::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Bidirectional mapping between a declared type's domain values and its
/// column representation.
///
/// Converters are stateless and shared; a registry hands out `Arc` clones
/// that the shape cache holds per mapped column.
pub trait ValueConverter: Send + Sync {
    /// Converter kind, used in diagnostics.
    fn kind(&self) -> &'static str;

    /// Domain value to column representation.
    #[allow(clippy::result_large_err)]
    fn to_db(&self, ty: &SqlType, value: Value) -> Result<Value>;

    /// Column representation to domain value.
    #[allow(clippy::result_large_err)]
    fn from_db(&self, ty: &SqlType, value: Value) -> Result<Value>;
}

fn mismatch(kind: &'static str, expected: &'static str, value: &Value) -> ConversionError {
    ConversionError {
        converter: kind,
        expected,
        actual: value.type_name().to_string(),
        field: None,
    }
}

/// Convert a domain value to its column representation.
///
/// NULL short-circuits without invoking the converter. A conversion failure
/// is logged with converter/field/value-type context at the point of
/// detection, then propagated - never silently defaulted.
#[allow(clippy::result_large_err)]
pub fn to_db_value(
    converter: &dyn ValueConverter,
    ty: &SqlType,
    value: Value,
    field: Option<&str>,
) -> Result<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    let value_type = value.type_name();
    converter.to_db(ty, value).map_err(|err| {
        tracing::error!(
            converter = converter.kind(),
            field,
            value_type,
            %err,
            "to-db conversion failed"
        );
        err
    })
}

/// Convert a raw column value to its domain representation.
///
/// Database NULL short-circuits without invoking the converter; failures are
/// logged then propagated, as in [`to_db_value`].
#[allow(clippy::result_large_err)]
pub fn from_db_value(
    converter: &dyn ValueConverter,
    ty: &SqlType,
    value: Value,
    field: Option<&str>,
) -> Result<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    let value_type = value.type_name();
    converter.from_db(ty, value).map_err(|err| {
        tracing::error!(
            converter = converter.kind(),
            field,
            value_type,
            %err,
            "from-db conversion failed"
        );
        err
    })
}

// ============================================================================
// Shared category converters
// ============================================================================

/// Optimistic-concurrency version counters.
///
/// Stored as a signed 64-bit integer; big-endian 8-byte blobs (as produced
/// by timestamp/rowversion columns on some servers) are accepted from the
/// database.
#[derive(Debug, Default)]
pub struct RowVersionConverter;

impl ValueConverter for RowVersionConverter {
    fn kind(&self) -> &'static str {
        "row-version"
    }

    fn to_db(&self, _ty: &SqlType, value: Value) -> Result<Value> {
        value
            .as_i64()
            .map(Value::BigInt)
            .ok_or_else(|| mismatch(self.kind(), "integer version counter", &value).into())
    }

    fn from_db(&self, _ty: &SqlType, value: Value) -> Result<Value> {
        match value {
            Value::Bytes(b) if b.len() == 8 => {
                let mut arr = [0u8; 8];
                arr.copy_from_slice(&b);
                #[allow(clippy::cast_possible_wrap)]
                Ok(Value::BigInt(u64::from_be_bytes(arr) as i64))
            }
            other => other
                .as_i64()
                .map(Value::BigInt)
                .ok_or_else(|| mismatch(self.kind(), "integer or 8-byte blob", &other).into()),
        }
    }
}

/// Enumerations stored by variant name.
///
/// The domain representation is the variant name as text; integer payloads
/// pass through untouched for integer-backed enums. Trailing whitespace
/// from padded CHAR columns is trimmed on read.
#[derive(Debug, Default)]
pub struct EnumConverter;

impl ValueConverter for EnumConverter {
    fn kind(&self) -> &'static str {
        "enum"
    }

    fn to_db(&self, _ty: &SqlType, value: Value) -> Result<Value> {
        match value {
            v @ (Value::Text(_)
            | Value::TinyInt(_)
            | Value::SmallInt(_)
            | Value::Int(_)
            | Value::BigInt(_)) => Ok(v),
            other => Err(mismatch(self.kind(), "variant name or integer", &other).into()),
        }
    }

    fn from_db(&self, _ty: &SqlType, value: Value) -> Result<Value> {
        match value {
            Value::Text(s) => Ok(Value::Text(s.trim_end().to_string())),
            v @ (Value::TinyInt(_) | Value::SmallInt(_) | Value::Int(_) | Value::BigInt(_)) => {
                Ok(v)
            }
            other => Err(mismatch(self.kind(), "variant name or integer", &other).into()),
        }
    }
}

/// Fallback for object-like types with no exact registration.
///
/// Complex values are carried as JSON text; plain text and blobs pass
/// through.
#[derive(Debug, Default)]
pub struct ReferenceTypeConverter;

impl ValueConverter for ReferenceTypeConverter {
    fn kind(&self) -> &'static str {
        "reference-type"
    }

    fn to_db(&self, _ty: &SqlType, value: Value) -> Result<Value> {
        match value {
            Value::Json(v) => Ok(Value::Text(v.to_string())),
            v @ (Value::Text(_) | Value::Decimal(_) | Value::Bytes(_)) => Ok(v),
            other => Ok(Value::Text(other.to_string())),
        }
    }

    fn from_db(&self, ty: &SqlType, value: Value) -> Result<Value> {
        match (ty.base(), value) {
            (SqlType::Json, Value::Json(v)) => Ok(Value::Json(v)),
            (SqlType::Json, Value::Text(s)) => serde_json::from_str(&s)
                .map(Value::Json)
                .map_err(|e| {
                    ConversionError {
                        converter: self.kind(),
                        expected: "valid JSON text",
                        actual: format!("unparsable JSON: {e}"),
                        field: None,
                    }
                    .into()
                }),
            (_, v @ (Value::Text(_) | Value::Decimal(_) | Value::Bytes(_))) => Ok(v),
            (_, other) => Err(mismatch(self.kind(), "text or blob", &other).into()),
        }
    }
}

/// Fallback for plain scalar types with no exact registration.
///
/// Performs the ordinary numeric/boolean/text coercions toward the declared
/// type on read; writes pass values through unchanged.
#[derive(Debug, Default)]
pub struct ValueTypeConverter;

impl ValueConverter for ValueTypeConverter {
    fn kind(&self) -> &'static str {
        "value-type"
    }

    fn to_db(&self, _ty: &SqlType, value: Value) -> Result<Value> {
        Ok(value)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_db(&self, ty: &SqlType, value: Value) -> Result<Value> {
        let coerced = match ty.key() {
            TypeKey::TinyInt => value.as_i64().map(|v| Value::TinyInt(v as i8)),
            TypeKey::SmallInt => value.as_i64().map(|v| Value::SmallInt(v as i16)),
            TypeKey::Integer => value.as_i64().map(|v| Value::Int(v as i32)),
            TypeKey::BigInt => value.as_i64().map(Value::BigInt),
            TypeKey::Real => value.as_f64().map(|v| Value::Float(v as f32)),
            TypeKey::Double => value.as_f64().map(Value::Double),
            TypeKey::Boolean => value.as_bool().map(Value::Bool),
            TypeKey::Decimal => match &value {
                Value::Decimal(_) => Some(value.clone()),
                Value::Text(s) => Some(Value::Decimal(s.clone())),
                other => other.as_f64().map(|v| Value::Decimal(v.to_string())),
            },
            TypeKey::Date => match &value {
                Value::Date(_) => Some(value.clone()),
                other => other.as_i64().map(|v| Value::Date(v as i32)),
            },
            TypeKey::Time => match &value {
                Value::Time(_) => Some(value.clone()),
                other => other.as_i64().map(Value::Time),
            },
            TypeKey::Timestamp => match &value {
                Value::Timestamp(_) => Some(value.clone()),
                other => other.as_i64().map(Value::Timestamp),
            },
            _ => Some(value.clone()),
        };
        coerced.ok_or_else(|| mismatch(self.kind(), "coercible scalar", &value).into())
    }
}

// ============================================================================
// Dialect-specific converters
// ============================================================================

/// Booleans carried as integers (SQLite, MySQL `TINYINT(1)`).
#[derive(Debug, Default)]
pub struct BoolAsIntConverter;

impl ValueConverter for BoolAsIntConverter {
    fn kind(&self) -> &'static str {
        "bool-as-int"
    }

    fn to_db(&self, _ty: &SqlType, value: Value) -> Result<Value> {
        value
            .as_bool()
            .map(|v| Value::Int(i32::from(v)))
            .ok_or_else(|| mismatch(self.kind(), "boolean", &value).into())
    }

    fn from_db(&self, _ty: &SqlType, value: Value) -> Result<Value> {
        value
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| mismatch(self.kind(), "boolean-like integer", &value).into())
    }
}

/// UUIDs carried as hyphenated text (SQLite, MySQL).
#[derive(Debug, Default)]
pub struct UuidAsTextConverter;

impl ValueConverter for UuidAsTextConverter {
    fn kind(&self) -> &'static str {
        "uuid-as-text"
    }

    fn to_db(&self, _ty: &SqlType, value: Value) -> Result<Value> {
        match value {
            Value::Uuid(bytes) => Ok(Value::Text(
                uuid::Uuid::from_bytes(bytes).hyphenated().to_string(),
            )),
            v @ Value::Text(_) => Ok(v),
            other => Err(mismatch(self.kind(), "UUID", &other).into()),
        }
    }

    fn from_db(&self, _ty: &SqlType, value: Value) -> Result<Value> {
        match value {
            Value::Text(s) => uuid::Uuid::parse_str(s.trim())
                .map(|u| Value::Uuid(*u.as_bytes()))
                .map_err(|e| {
                    ConversionError {
                        converter: self.kind(),
                        expected: "UUID text",
                        actual: format!("unparsable UUID: {e}"),
                        field: None,
                    }
                    .into()
                }),
            Value::Bytes(b) if b.len() == 16 => {
                let mut arr = [0u8; 16];
                arr.copy_from_slice(&b);
                Ok(Value::Uuid(arr))
            }
            v @ Value::Uuid(_) => Ok(v),
            other => Err(mismatch(self.kind(), "UUID text or 16 bytes", &other).into()),
        }
    }
}

/// JSON documents carried as text (SQLite, MySQL wire format).
#[derive(Debug, Default)]
pub struct JsonAsTextConverter;

impl ValueConverter for JsonAsTextConverter {
    fn kind(&self) -> &'static str {
        "json-as-text"
    }

    fn to_db(&self, _ty: &SqlType, value: Value) -> Result<Value> {
        match value {
            Value::Json(v) => Ok(Value::Text(v.to_string())),
            v @ Value::Text(_) => Ok(v),
            other => Err(mismatch(self.kind(), "JSON", &other).into()),
        }
    }

    fn from_db(&self, _ty: &SqlType, value: Value) -> Result<Value> {
        match value {
            Value::Text(s) => serde_json::from_str(&s).map(Value::Json).map_err(|e| {
                ConversionError {
                    converter: self.kind(),
                    expected: "JSON text",
                    actual: format!("unparsable JSON: {e}"),
                    field: None,
                }
                .into()
            }),
            v @ Value::Json(_) => Ok(v),
            other => Err(mismatch(self.kind(), "JSON text", &other).into()),
        }
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Per-dialect converter registry.
///
/// Resolution order is a compatibility contract: the row-version flag
/// overrides everything, an exact registration for the (nullable-unwrapped)
/// type wins next, then enums, then the reference-type/value-type category
/// fallback.
pub struct ConverterRegistry {
    exact: HashMap<TypeKey, Arc<dyn ValueConverter>>,
    enum_converter: Arc<dyn ValueConverter>,
    row_version_converter: Arc<dyn ValueConverter>,
    reference_converter: Arc<dyn ValueConverter>,
    value_converter: Arc<dyn ValueConverter>,
}

impl ConverterRegistry {
    /// Create a registry with the shared category converters and no exact
    /// registrations.
    #[must_use]
    pub fn new() -> Self {
        Self {
            exact: HashMap::new(),
            enum_converter: Arc::new(EnumConverter),
            row_version_converter: Arc::new(RowVersionConverter),
            reference_converter: Arc::new(ReferenceTypeConverter),
            value_converter: Arc::new(ValueTypeConverter),
        }
    }

    /// Register a converter for a type; replaces any existing registration
    /// (last write wins).
    pub fn register(&mut self, ty: &SqlType, converter: Arc<dyn ValueConverter>) {
        self.exact.insert(ty.key(), converter);
    }

    /// The converter registered for exactly this (nullable-unwrapped) type.
    #[must_use]
    pub fn get_exact(&self, ty: &SqlType) -> Option<Arc<dyn ValueConverter>> {
        self.exact.get(&ty.key()).cloned()
    }

    /// Best-match resolution for a declared type with no field context.
    #[must_use]
    pub fn best_match(&self, ty: &SqlType) -> Arc<dyn ValueConverter> {
        if let Some(exact) = self.get_exact(ty) {
            return exact;
        }
        if ty.enum_name().is_some() {
            return Arc::clone(&self.enum_converter);
        }
        if ty.is_ref_type() {
            Arc::clone(&self.reference_converter)
        } else {
            Arc::clone(&self.value_converter)
        }
    }

    /// Best-match resolution for a field.
    ///
    /// The row-version flag always wins, regardless of the declared type.
    #[must_use]
    pub fn best_match_field(&self, ty: &SqlType, row_version: bool) -> Arc<dyn ValueConverter> {
        if row_version {
            return Arc::clone(&self.row_version_converter);
        }
        self.best_match(ty)
    }

    /// The shared row-version converter.
    #[must_use]
    pub fn row_version_converter(&self) -> Arc<dyn ValueConverter> {
        Arc::clone(&self.row_version_converter)
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("exact", &self.exact.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
