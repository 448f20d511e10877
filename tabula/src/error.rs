use crate::statement::StatementError;

/// Errors that can occur in the data layer.
#[derive(Debug)]
pub enum DataError {
    /// A caller broke an operation's contract (null id where one is
    /// required, preset id on create). Raised before any I/O.
    Precondition(String),
    /// A statement could not be constructed.
    Statement(StatementError),
    /// The underlying store failed executing a statement.
    Database(Box<dyn std::error::Error + Send + Sync>),
    /// An INSERT completed but the store returned no generated key; a
    /// schema or driver misconfiguration.
    NoGeneratedKey { table: String },
}

impl DataError {
    /// Construct a `Database` variant from any error type.
    ///
    /// Used by backend crates to wrap driver-specific errors.
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        DataError::Database(Box::new(err))
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        DataError::Precondition(msg.into())
    }
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::Precondition(msg) => write!(f, "precondition violated: {msg}"),
            DataError::Statement(err) => write!(f, "statement error: {err}"),
            DataError::Database(err) => write!(f, "database error: {err}"),
            DataError::NoGeneratedKey { table } => {
                write!(f, "insert into {table} returned no generated key")
            }
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Database(err) => Some(err.as_ref()),
            DataError::Statement(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StatementError> for DataError {
    fn from(err: StatementError) -> Self {
        DataError::Statement(err)
    }
}
