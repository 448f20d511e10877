//! Decoding of `AnyRow`s into entities through their field descriptors.

use sqlx::any::AnyRow;
use sqlx::Row;
use tabula::{populate, Entity, FieldKind, Value};

/// Why a single row could not be materialized. The manager attaches the row
/// index and hands it to the caller as a `RowError`.
pub(crate) struct DecodeFailure {
    pub column: Option<String>,
    pub message: String,
}

/// Materialize one row: decode each described column into a [`Value`], then
/// write the values into a blank entity.
///
/// Columns the row does not carry are skipped, leaving the field at its
/// default, matching the populate contract.
pub(crate) fn decode_entity<E: Entity>(row: &AnyRow) -> Result<E, DecodeFailure> {
    let mut values: Vec<(&'static str, Value)> = Vec::with_capacity(E::fields().len());
    for field in E::fields() {
        match decode_column(row, field.column, field.kind) {
            Ok(Some(value)) => values.push((field.column, value)),
            Ok(None) => {}
            Err(message) => {
                return Err(DecodeFailure {
                    column: Some(field.column.to_string()),
                    message,
                })
            }
        }
    }

    let mut entity = E::default();
    populate(&mut entity, &values).map_err(|err| DecodeFailure {
        column: Some(err.column.to_string()),
        message: err.to_string(),
    })?;
    Ok(entity)
}

fn decode_column(row: &AnyRow, column: &str, kind: FieldKind) -> Result<Option<Value>, String> {
    let decoded = match kind {
        FieldKind::BigInt => row.try_get::<Option<i64>, _>(column).map(Value::from),
        FieldKind::Double => row.try_get::<Option<f64>, _>(column).map(Value::from),
        FieldKind::Text => row.try_get::<Option<String>, _>(column).map(Value::from),
        FieldKind::Bool => row.try_get::<Option<bool>, _>(column).map(Value::from),
    };
    match decoded {
        Ok(value) => Ok(Some(value)),
        Err(sqlx::Error::ColumnNotFound(_)) => Ok(None),
        Err(err) => Err(err.to_string()),
    }
}
