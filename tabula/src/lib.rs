pub mod columns;
pub mod condition;
pub mod entity;
pub mod error;
pub mod fetched;
pub mod repository;
pub mod statement;
pub mod value;

pub use columns::{column_data, populate, table_ident, ColumnData};
pub use condition::ConditionBuilder;
pub use entity::{Entity, Field, ID_COLUMN};
pub use error::DataError;
pub use fetched::{Fetched, RowError};
pub use repository::Repository;
pub use statement::{Dialect, Query, StatementError, Statements};
pub use value::{FieldKind, MappingError, Value};

pub mod prelude {
    //! Re-exports of the most commonly used data types.
    pub use crate::{
        ConditionBuilder, DataError, Dialect, Entity, Fetched, Field, FieldKind, Repository, Value,
    };
}
