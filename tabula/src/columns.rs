use crate::entity::Entity;
use crate::value::{MappingError, Value};

/// Ordered column-name → value extraction of an entity's persisted fields.
///
/// Rebuilt on every call, never stored. Order follows the entity's field
/// declaration order and is what the statement builder renders.
pub type ColumnData = Vec<(&'static str, Value)>;

/// Extract the column data of `entity`, identity column included (possibly
/// null).
pub fn column_data<E: Entity>(entity: &E) -> ColumnData {
    E::fields()
        .iter()
        .map(|f| (f.column, (f.get)(entity)))
        .collect()
}

/// Write row values into `entity` through its field descriptors.
///
/// Columns without a descriptor are ignored; fields without a row value keep
/// their defaults. The first field that rejects its value fails the whole
/// row.
pub fn populate<E: Entity>(entity: &mut E, row: &[(&str, Value)]) -> Result<(), MappingError> {
    for (name, value) in row {
        if let Some(field) = E::fields().iter().find(|f| f.column == *name) {
            (field.set)(entity, value.clone())?;
        }
    }
    Ok(())
}

/// Derive a database-style identifier from a Rust type name.
///
/// `UserAccount` becomes `user_account`. Deterministic; part of the frozen
/// naming convention entities are expected to follow in their
/// [`Entity::table_name`] impls.
pub fn table_ident(type_name: &str) -> String {
    let mut out = String::with_capacity(type_name.len() + 4);
    for (i, c) in type_name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i != 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Field, ID_COLUMN};
    use crate::value::FieldKind;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Account {
        id: Option<i64>,
        name: String,
        balance: i64,
        rate: f64,
        nickname: Option<String>,
        active: bool,
    }

    impl Entity for Account {
        fn table_name() -> &'static str {
            "account"
        }

        fn fields() -> &'static [Field<Self>] {
            const FIELDS: &[Field<Account>] = &[
                Field::new(
                    ID_COLUMN,
                    FieldKind::BigInt,
                    |e| Value::from(e.id),
                    |e, v| {
                        e.id = v.into_opt_big_int(ID_COLUMN)?;
                        Ok(())
                    },
                ),
                Field::new(
                    "name",
                    FieldKind::Text,
                    |e| Value::from(e.name.clone()),
                    |e, v| {
                        e.name = v.into_text("name")?;
                        Ok(())
                    },
                ),
                Field::new(
                    "balance",
                    FieldKind::BigInt,
                    |e| Value::from(e.balance),
                    |e, v| {
                        e.balance = v.into_big_int("balance")?;
                        Ok(())
                    },
                ),
                Field::new(
                    "rate",
                    FieldKind::Double,
                    |e| Value::from(e.rate),
                    |e, v| {
                        e.rate = v.into_double("rate")?;
                        Ok(())
                    },
                ),
                Field::new(
                    "nickname",
                    FieldKind::Text,
                    |e| Value::from(e.nickname.clone()),
                    |e, v| {
                        e.nickname = v.into_opt_text("nickname")?;
                        Ok(())
                    },
                ),
                Field::new(
                    "active",
                    FieldKind::Bool,
                    |e| Value::from(e.active),
                    |e, v| {
                        e.active = v.into_bool("active")?;
                        Ok(())
                    },
                ),
            ];
            FIELDS
        }

        fn id(&self) -> Option<i64> {
            self.id
        }

        fn set_id(&mut self, id: Option<i64>) {
            self.id = id;
        }
    }

    fn sample() -> Account {
        Account {
            id: Some(4),
            name: "Alice".into(),
            balance: 100,
            rate: 0.25,
            nickname: None,
            active: true,
        }
    }

    #[test]
    fn test_extraction_order_and_id_presence() {
        let data = column_data(&sample());
        let names: Vec<_> = data.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec!["id", "name", "balance", "rate", "nickname", "active"]
        );
        assert_eq!(data[0].1, Value::BigInt(4));
        assert_eq!(data[4].1, Value::Null);
    }

    #[test]
    fn test_unset_id_extracts_as_null() {
        let mut account = sample();
        account.id = None;
        assert_eq!(column_data(&account)[0].1, Value::Null);
    }

    #[test]
    fn test_round_trip() {
        let original = sample();
        let data = column_data(&original);
        let mut blank = Account::default();
        populate(&mut blank, &data).unwrap();
        assert_eq!(blank, original);
    }

    #[test]
    fn test_unknown_columns_ignored_and_missing_left_default() {
        let mut blank = Account::default();
        let row = vec![
            ("name", Value::Text("Bob".into())),
            ("no_such_column", Value::BigInt(1)),
        ];
        populate(&mut blank, &row).unwrap();
        assert_eq!(blank.name, "Bob");
        assert_eq!(blank.balance, 0);
        assert_eq!(blank.id, None);
    }

    #[test]
    fn test_type_mismatch_fails_the_row() {
        let mut blank = Account::default();
        let row = vec![("balance", Value::Text("lots".into()))];
        let err = populate(&mut blank, &row).unwrap_err();
        assert_eq!(err.column, "balance");
    }

    #[test]
    fn test_table_ident() {
        assert_eq!(table_ident("Account"), "account");
        assert_eq!(table_ident("UserAccount"), "user_account");
        assert_eq!(table_ident("already_snake"), "already_snake");
    }
}
