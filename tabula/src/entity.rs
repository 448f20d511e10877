use crate::value::{FieldKind, MappingError, Value};

/// Conventional name of the identity column.
pub const ID_COLUMN: &str = "id";

/// Descriptor for one persisted field of an entity: column name, SQL kind,
/// getter and setter. The full table is declared once per type via
/// [`Entity::fields`] and drives extraction, population and row decoding.
pub struct Field<T> {
    pub column: &'static str,
    pub kind: FieldKind,
    pub get: fn(&T) -> Value,
    pub set: fn(&mut T, Value) -> Result<(), MappingError>,
}

impl<T> Field<T> {
    pub const fn new(
        column: &'static str,
        kind: FieldKind,
        get: fn(&T) -> Value,
        set: fn(&mut T, Value) -> Result<(), MappingError>,
    ) -> Self {
        Self {
            column,
            kind,
            get,
            set,
        }
    }
}

// Manual impls: the derives would put bounds on `T`, which the fn pointers
// do not need.
impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Field<T> {}

/// Trait representing a database entity mapped to one table with one
/// numeric, database-generated identity column.
///
/// `Default` supplies blank instances when materializing rows, and `Clone`
/// backs the no-aliasing contract of `create` (the caller's instance is
/// never mutated).
///
/// # Example
///
/// ```ignore
/// impl Entity for Account {
///     fn table_name() -> &'static str { "account" }
///     fn fields() -> &'static [Field<Self>] {
///         &[
///             Field::new(ID_COLUMN, FieldKind::BigInt,
///                 |e| Value::from(e.id),
///                 |e, v| { e.id = v.into_opt_big_int(ID_COLUMN)?; Ok(()) }),
///             Field::new("name", FieldKind::Text,
///                 |e| Value::from(e.name.clone()),
///                 |e, v| { e.name = v.into_text("name")?; Ok(()) }),
///         ]
///     }
///     fn id(&self) -> Option<i64> { self.id }
///     fn set_id(&mut self, id: Option<i64>) { self.id = id; }
/// }
/// ```
pub trait Entity: Clone + Default + Send + Sync + Unpin + 'static {
    fn table_name() -> &'static str;

    /// Schema qualifying the table, if any.
    fn schema() -> Option<&'static str> {
        None
    }

    fn id_column() -> &'static str {
        ID_COLUMN
    }

    /// Sequence backing the identity column, for dialects that generate
    /// keys through an explicit sequence.
    fn id_sequence() -> Option<&'static str> {
        None
    }

    /// The persisted fields in declaration order. The identity column must
    /// appear here like any other field (its extracted value may be null).
    fn fields() -> &'static [Field<Self>];

    /// `None` means "not yet persisted".
    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: Option<i64>);
}
