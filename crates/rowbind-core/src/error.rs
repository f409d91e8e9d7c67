//! Error types for RowBind operations.

use std::fmt;

/// The primary error type for all mapping operations.
#[derive(Debug)]
pub enum Error {
    /// A value converter failed in either direction.
    Conversion(ConversionError),
    /// An explicit field name has no corresponding field definition.
    UnknownField(UnknownFieldError),
    /// A row-versioned update or delete affected zero rows.
    OptimisticLock(OptimisticLockError),
    /// Graph merge found no resolvable relationship field for a child type.
    UnresolvedReference(UnresolvedReferenceError),
    /// A delete was attempted with zero non-null criteria.
    InvalidCriteria(InvalidCriteriaError),
    /// An error raised by the underlying cursor/command implementation.
    Database(DatabaseError),
    /// Operation was cancelled.
    Cancelled,
}

/// A converter failed to translate a value.
///
/// Conversion errors are logged with full context at the point of detection
/// before being raised; they are never silently defaulted.
#[derive(Debug)]
pub struct ConversionError {
    /// Converter kind ("enum", "row-version", "value", ...).
    pub converter: &'static str,
    /// What the converter expected.
    pub expected: &'static str,
    /// Source value type, or failure detail.
    pub actual: String,
    /// Field being converted, when known.
    pub field: Option<String>,
}

/// A field-name/value map referenced a name with no field definition.
#[derive(Debug)]
pub struct UnknownFieldError {
    /// The model the lookup ran against.
    pub model: &'static str,
    /// The unknown field name.
    pub field: String,
}

/// A row-versioned write affected zero rows.
///
/// Distinct from "no matching rows by ordinary filter", which is not an
/// error.
#[derive(Debug)]
pub struct OptimisticLockError {
    /// The table the statement targeted.
    pub table: String,
}

/// No declared reference field on the parent resolved to the child type.
#[derive(Debug)]
pub struct UnresolvedReferenceError {
    /// Parent model name.
    pub parent: &'static str,
    /// Child type name.
    pub child: &'static str,
}

/// A delete carried no usable criteria.
#[derive(Debug)]
pub struct InvalidCriteriaError {
    /// Human-readable description.
    pub message: String,
}

/// An error surfaced by the cursor/command layer.
#[derive(Debug)]
pub struct DatabaseError {
    /// Human-readable description.
    pub message: String,
    /// Underlying driver error, if any.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Conversion(e) => write!(f, "Conversion error: {e}"),
            Error::UnknownField(e) => write!(f, "Unknown field: {e}"),
            Error::OptimisticLock(e) => write!(f, "Optimistic concurrency conflict: {e}"),
            Error::UnresolvedReference(e) => write!(f, "Unresolved reference: {e}"),
            Error::InvalidCriteria(e) => write!(f, "Invalid criteria: {e}"),
            Error::Database(e) => write!(f, "Database error: {e}"),
            Error::Cancelled => write!(f, "Operation cancelled"),
        }
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(field) = &self.field {
            write!(
                f,
                "{} converter failed on field '{}': expected {}, found {}",
                self.converter, field, self.expected, self.actual
            )
        } else {
            write!(
                f,
                "{} converter failed: expected {}, found {}",
                self.converter, self.expected, self.actual
            )
        }
    }
}

impl fmt::Display for UnknownFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no field '{}' on model '{}'", self.field, self.model)
    }
}

impl fmt::Display for OptimisticLockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row in '{}' was modified or deleted since the last read",
            self.table
        )
    }
}

impl fmt::Display for UnresolvedReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no reference field on '{}' resolves to child type '{}'",
            self.parent, self.child
        )
    }
}

impl fmt::Display for InvalidCriteriaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Database(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl From<ConversionError> for Error {
    fn from(err: ConversionError) -> Self {
        Error::Conversion(err)
    }
}

impl From<UnknownFieldError> for Error {
    fn from(err: UnknownFieldError) -> Self {
        Error::UnknownField(err)
    }
}

impl From<OptimisticLockError> for Error {
    fn from(err: OptimisticLockError) -> Self {
        Error::OptimisticLock(err)
    }
}

impl From<UnresolvedReferenceError> for Error {
    fn from(err: UnresolvedReferenceError) -> Self {
        Error::UnresolvedReference(err)
    }
}

impl From<InvalidCriteriaError> for Error {
    fn from(err: InvalidCriteriaError) -> Self {
        Error::InvalidCriteria(err)
    }
}

impl From<DatabaseError> for Error {
    fn from(err: DatabaseError) -> Self {
        Error::Database(err)
    }
}

/// Result type alias for RowBind operations.
pub type Result<T> = std::result::Result<T, Error>;
