use serde::Serialize;

/// The SQL kind of a mapped column.
///
/// Drives how backends decode a raw column into a [`Value`] and what a
/// field setter is allowed to receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    BigInt,
    Double,
    Text,
    Bool,
}

impl FieldKind {
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::BigInt => "BIGINT",
            FieldKind::Double => "DOUBLE",
            FieldKind::Text => "TEXT",
            FieldKind::Bool => "BOOL",
        }
    }
}

/// A SQL-representable scalar, including NULL.
///
/// This is the currency of the whole layer: column extraction produces
/// `Value`s, condition arguments are `Value`s, and row decoding hands
/// `Value`s back to field setters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Null,
    BigInt(i64),
    Double(f64),
    Text(String),
    Bool(bool),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Human-readable kind of this value, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::BigInt(_) => "BIGINT",
            Value::Double(_) => "DOUBLE",
            Value::Text(_) => "TEXT",
            Value::Bool(_) => "BOOL",
        }
    }

    /// Extract a non-null `BIGINT`, reporting `column` on mismatch.
    pub fn into_big_int(self, column: &'static str) -> Result<i64, MappingError> {
        match self {
            Value::BigInt(v) => Ok(v),
            other => Err(MappingError::new(column, FieldKind::BigInt, &other)),
        }
    }

    pub fn into_opt_big_int(self, column: &'static str) -> Result<Option<i64>, MappingError> {
        match self {
            Value::Null => Ok(None),
            other => other.into_big_int(column).map(Some),
        }
    }

    pub fn into_double(self, column: &'static str) -> Result<f64, MappingError> {
        match self {
            Value::Double(v) => Ok(v),
            other => Err(MappingError::new(column, FieldKind::Double, &other)),
        }
    }

    pub fn into_opt_double(self, column: &'static str) -> Result<Option<f64>, MappingError> {
        match self {
            Value::Null => Ok(None),
            other => other.into_double(column).map(Some),
        }
    }

    pub fn into_text(self, column: &'static str) -> Result<String, MappingError> {
        match self {
            Value::Text(v) => Ok(v),
            other => Err(MappingError::new(column, FieldKind::Text, &other)),
        }
    }

    pub fn into_opt_text(self, column: &'static str) -> Result<Option<String>, MappingError> {
        match self {
            Value::Null => Ok(None),
            other => other.into_text(column).map(Some),
        }
    }

    pub fn into_bool(self, column: &'static str) -> Result<bool, MappingError> {
        match self {
            Value::Bool(v) => Ok(v),
            other => Err(MappingError::new(column, FieldKind::Bool, &other)),
        }
    }

    pub fn into_opt_bool(self, column: &'static str) -> Result<Option<bool>, MappingError> {
        match self {
            Value::Null => Ok(None),
            other => other.into_bool(column).map(Some),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::BigInt(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::BigInt(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// A field could not be written from a row value.
///
/// Carries the column, the kind the field expected, and the kind the row
/// actually held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingError {
    pub column: &'static str,
    pub expected: FieldKind,
    pub found: &'static str,
}

impl MappingError {
    pub fn new(column: &'static str, expected: FieldKind, found: &Value) -> Self {
        Self {
            column,
            expected,
            found: found.kind_name(),
        }
    }
}

impl std::fmt::Display for MappingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "column {}: expected {}, found {}",
            self.column,
            self.expected.name(),
            self.found
        )
    }
}

impl std::error::Error for MappingError {}
