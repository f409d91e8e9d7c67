//! Declared SQL column types and their classification.

use crate::value::Value;

/// SQL data types a field can declare.
///
/// The declared type drives converter resolution (see
/// `convert::ConverterRegistry`) and the zero/default substitution applied
/// when a non-nullable field reads a database NULL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlType {
    // Integer types
    TinyInt,
    SmallInt,
    Integer,
    BigInt,

    // Floating point
    Real,
    Double,

    // Fixed precision
    Decimal { precision: u8, scale: u8 },

    // Boolean
    Boolean,

    // String types
    Char(u32),
    VarChar(u32),
    Text,

    // Binary
    Blob,

    // Date/time types
    Date,
    Time,
    Timestamp,

    // UUID
    Uuid,

    // JSON
    Json,

    /// Enumeration, carrying the domain enum's name.
    Enum(&'static str),

    /// Custom type name, passed through to DDL/diagnostics verbatim.
    Custom(&'static str),

    /// Optional wrapper around another type.
    ///
    /// Converter resolution always unwraps this first; nullability itself
    /// is tracked on the field definition.
    Nullable(Box<SqlType>),
}

/// Parameter-independent registry key for a declared type.
///
/// `Decimal(10, 2)` and `Decimal(8, 4)` resolve to the same converter, so
/// registration is keyed by this reduced form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKey {
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Double,
    Decimal,
    Boolean,
    Char,
    VarChar,
    Text,
    Blob,
    Date,
    Time,
    Timestamp,
    Uuid,
    Json,
    Enum,
    Custom(&'static str),
}

impl SqlType {
    /// Unwrap the `Nullable` wrapper, if any.
    #[must_use]
    pub fn base(&self) -> &SqlType {
        match self {
            SqlType::Nullable(inner) => inner.base(),
            other => other,
        }
    }

    /// Whether this type carries the optional wrapper.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        matches!(self, SqlType::Nullable(_))
    }

    /// The registry key for this type (nullable-unwrapped).
    #[must_use]
    pub fn key(&self) -> TypeKey {
        match self.base() {
            SqlType::TinyInt => TypeKey::TinyInt,
            SqlType::SmallInt => TypeKey::SmallInt,
            SqlType::Integer => TypeKey::Integer,
            SqlType::BigInt => TypeKey::BigInt,
            SqlType::Real => TypeKey::Real,
            SqlType::Double => TypeKey::Double,
            SqlType::Decimal { .. } => TypeKey::Decimal,
            SqlType::Boolean => TypeKey::Boolean,
            SqlType::Char(_) => TypeKey::Char,
            SqlType::VarChar(_) => TypeKey::VarChar,
            SqlType::Text => TypeKey::Text,
            SqlType::Blob => TypeKey::Blob,
            SqlType::Date => TypeKey::Date,
            SqlType::Time => TypeKey::Time,
            SqlType::Timestamp => TypeKey::Timestamp,
            SqlType::Uuid => TypeKey::Uuid,
            SqlType::Json => TypeKey::Json,
            SqlType::Enum(_) => TypeKey::Enum,
            SqlType::Custom(name) => TypeKey::Custom(name),
            SqlType::Nullable(_) => unreachable!("base() strips Nullable"),
        }
    }

    /// Check if this type is numeric (additive updates use `col = col + ?`).
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self.base(),
            SqlType::TinyInt
                | SqlType::SmallInt
                | SqlType::Integer
                | SqlType::BigInt
                | SqlType::Real
                | SqlType::Double
                | SqlType::Decimal { .. }
        )
    }

    /// Check if this type is text-based.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(
            self.base(),
            SqlType::Char(_) | SqlType::VarChar(_) | SqlType::Text
        )
    }

    /// Check if this type is a date/time type.
    #[must_use]
    pub fn is_temporal(&self) -> bool {
        matches!(
            self.base(),
            SqlType::Date | SqlType::Time | SqlType::Timestamp
        )
    }

    /// Check if this type is object-like.
    ///
    /// Object-like types fall back to the shared reference-type converter
    /// when no exact converter is registered; everything else falls back to
    /// the value-type converter.
    #[must_use]
    pub fn is_ref_type(&self) -> bool {
        matches!(
            self.base(),
            SqlType::Char(_)
                | SqlType::VarChar(_)
                | SqlType::Text
                | SqlType::Blob
                | SqlType::Json
                | SqlType::Custom(_)
        )
    }

    /// The enumeration name, if this is an enum type.
    #[must_use]
    pub fn enum_name(&self) -> Option<&'static str> {
        match self.base() {
            SqlType::Enum(name) => Some(name),
            _ => None,
        }
    }

    /// The zero/default value substituted for a database NULL read into a
    /// non-nullable field.
    #[must_use]
    pub fn zero_value(&self) -> Value {
        if self.is_nullable() {
            return Value::Null;
        }
        match self.base() {
            SqlType::TinyInt => Value::TinyInt(0),
            SqlType::SmallInt => Value::SmallInt(0),
            SqlType::Integer => Value::Int(0),
            SqlType::BigInt => Value::BigInt(0),
            SqlType::Real => Value::Float(0.0),
            SqlType::Double => Value::Double(0.0),
            SqlType::Decimal { .. } => Value::Decimal("0".to_string()),
            SqlType::Boolean => Value::Bool(false),
            SqlType::Char(_) | SqlType::VarChar(_) | SqlType::Text => Value::Text(String::new()),
            SqlType::Blob => Value::Bytes(Vec::new()),
            SqlType::Date => Value::Date(0),
            SqlType::Time => Value::Time(0),
            SqlType::Timestamp => Value::Timestamp(0),
            SqlType::Uuid => Value::Uuid([0; 16]),
            SqlType::Json => Value::Json(serde_json::Value::Null),
            SqlType::Enum(_) | SqlType::Custom(_) => Value::Text(String::new()),
            SqlType::Nullable(_) => unreachable!("base() strips Nullable"),
        }
    }

    /// Wrap this type in the optional wrapper.
    #[must_use]
    pub fn nullable(self) -> SqlType {
        SqlType::Nullable(Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_unwraps_nested_nullable() {
        let ty = SqlType::Integer.nullable();
        assert_eq!(ty.base(), &SqlType::Integer);
        assert!(ty.is_nullable());

        let deep = SqlType::Nullable(Box::new(SqlType::Text.nullable()));
        assert_eq!(deep.base(), &SqlType::Text);
    }

    #[test]
    fn key_ignores_type_parameters() {
        let a = SqlType::Decimal {
            precision: 10,
            scale: 2,
        };
        let b = SqlType::Decimal {
            precision: 8,
            scale: 4,
        };
        assert_eq!(a.key(), b.key());
        assert_eq!(SqlType::VarChar(32).key(), SqlType::VarChar(255).key());
    }

    #[test]
    fn key_sees_through_nullable() {
        assert_eq!(SqlType::Uuid.nullable().key(), TypeKey::Uuid);
    }

    #[test]
    fn numeric_classification() {
        assert!(SqlType::Integer.is_numeric());
        assert!(
            SqlType::Decimal {
                precision: 10,
                scale: 2
            }
            .is_numeric()
        );
        assert!(SqlType::BigInt.nullable().is_numeric());
        assert!(!SqlType::Text.is_numeric());
    }

    #[test]
    fn ref_type_classification() {
        assert!(SqlType::Text.is_ref_type());
        assert!(SqlType::Json.is_ref_type());
        assert!(SqlType::Custom("citext").is_ref_type());
        assert!(!SqlType::Integer.is_ref_type());
        assert!(!SqlType::Boolean.is_ref_type());
        assert!(!SqlType::Enum("color").is_ref_type());
    }

    #[test]
    fn zero_values_match_types() {
        assert_eq!(SqlType::Integer.zero_value(), Value::Int(0));
        assert_eq!(SqlType::Boolean.zero_value(), Value::Bool(false));
        assert_eq!(SqlType::Text.zero_value(), Value::Text(String::new()));
        assert_eq!(SqlType::Uuid.zero_value(), Value::Uuid([0; 16]));
        // The nullable wrapper's zero is NULL itself.
        assert_eq!(SqlType::Integer.nullable().zero_value(), Value::Null);
    }

    #[test]
    fn enum_name_extraction() {
        assert_eq!(SqlType::Enum("color").enum_name(), Some("color"));
        assert_eq!(SqlType::Enum("color").nullable().enum_name(), Some("color"));
        assert_eq!(SqlType::Text.enum_name(), None);
    }
}
