use serde::Serialize;

/// A result row that could not be turned into an entity.
#[derive(Debug, Clone, Serialize)]
pub struct RowError {
    /// Zero-based position of the row in the result set.
    pub index: usize,
    /// Column the failure was pinned to, when known.
    pub column: Option<String>,
    pub message: String,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.column {
            Some(column) => write!(f, "row {} ({}): {}", self.index, column, self.message),
            None => write!(f, "row {}: {}", self.index, self.message),
        }
    }
}

/// The outcome of a multi-row read: the entities that mapped, plus one
/// [`RowError`] per row that did not.
///
/// A failed row never aborts the read and is never silently dropped; callers
/// decide whether a partial result is acceptable.
#[derive(Debug, Clone)]
pub struct Fetched<E> {
    pub entities: Vec<E>,
    pub failures: Vec<RowError>,
}

impl<E> Fetched<E> {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Drop the failure channel and keep the mapped entities.
    pub fn into_entities(self) -> Vec<E> {
        self.entities
    }
}

impl<E> Default for Fetched<E> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            failures: Vec::new(),
        }
    }
}
