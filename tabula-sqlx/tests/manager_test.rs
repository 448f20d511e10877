use tabula::prelude::*;
use tabula::{Field, ID_COLUMN};
use tabula_sqlx::{DatabaseConfig, SqlxManager};

#[derive(Debug, Clone, Default, PartialEq)]
struct Account {
    id: Option<i64>,
    name: String,
    balance: i64,
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

fn account(name: &str, balance: i64) -> Account {
    Account {
        id: None,
        name: name.to_string(),
        balance,
    }
}

/// One in-memory database per test. A single pooled connection keeps every
/// statement on the same SQLite memory instance.
async fn manager() -> SqlxManager<Account> {
    let mut config = DatabaseConfig::new("sqlite::memory:");
    config.max_connections = 1;
    let pool = config.connect().await.unwrap();
    sqlx::query(
        "CREATE TABLE account (id INTEGER PRIMARY KEY AUTOINCREMENT, \
         name TEXT NOT NULL, balance INTEGER NOT NULL)",
    )
    .execute(&pool)
    .await
    .unwrap();
    SqlxManager::new(pool, config.dialect()).unwrap()
}

#[tokio::test]
async fn test_create_assigns_id_and_leaves_input_untouched() {
    let manager = manager().await;
    let original = account("Alice", 100);

    let created = manager.create(&original).await.unwrap();

    assert_eq!(created.id, Some(1));
    assert_eq!(created.name, "Alice");
    assert_eq!(created.balance, 100);
    assert_eq!(original.id, None);
}

#[tokio::test]
async fn test_create_with_preset_id_fails_before_io() {
    let manager = manager().await;
    let mut preset = account("Bob", 10);
    preset.id = Some(99);

    let err = manager.create(&preset).await.unwrap_err();
    assert!(matches!(err, DataError::Precondition(_)));

    let all = manager.find_all().await.unwrap();
    assert!(all.entities.is_empty());
}

#[tokio::test]
async fn test_find_by_id_round_trip() {
    let manager = manager().await;
    let created = manager.create(&account("Alice", 100)).await.unwrap();

    let found = manager.find_by_id(created.id.unwrap()).await.unwrap();
    assert_eq!(found, Some(created));

    assert_eq!(manager.find_by_id(12345).await.unwrap(), None);
}

#[tokio::test]
async fn test_update_changes_matching_row() {
    let manager = manager().await;
    let mut alice = manager.create(&account("Alice", 100)).await.unwrap();
    let bob = manager.create(&account("Bob", 50)).await.unwrap();

    alice.balance = 150;
    assert_eq!(manager.update(&alice).await.unwrap(), 1);

    assert_eq!(
        manager.find_by_id(alice.id.unwrap()).await.unwrap(),
        Some(alice)
    );
    assert_eq!(
        manager.find_by_id(bob.id.unwrap()).await.unwrap(),
        Some(bob)
    );
}

#[tokio::test]
async fn test_update_matching_zero_rows_is_not_an_error() {
    let manager = manager().await;
    let mut ghost = account("Ghost", 1);
    ghost.id = Some(404);

    assert_eq!(manager.update(&ghost).await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_requires_id() {
    let manager = manager().await;
    let err = manager.update(&account("Nobody", 0)).await.unwrap_err();
    assert!(matches!(err, DataError::Precondition(_)));
}

#[tokio::test]
async fn test_update_where_binds_condition_after_set_values() {
    let manager = manager().await;
    let alice = manager.create(&account("Alice", 100)).await.unwrap();
    manager.create(&account("Bob", 50)).await.unwrap();

    let mut template = alice.clone();
    template.balance = 0;
    let drained = manager
        .update_where(&template, &ConditionBuilder::new().where_gt("balance", 75i64))
        .await
        .unwrap();
    assert_eq!(drained, 1);

    let found = manager.find_by_id(alice.id.unwrap()).await.unwrap().unwrap();
    assert_eq!(found.balance, 0);
}

#[tokio::test]
async fn test_delete_then_find_is_none() {
    let manager = manager().await;
    let created = manager.create(&account("Alice", 100)).await.unwrap();

    assert_eq!(manager.delete(&created).await.unwrap(), 1);
    assert_eq!(manager.find_by_id(created.id.unwrap()).await.unwrap(), None);
    assert_eq!(manager.delete(&created).await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_requires_id() {
    let manager = manager().await;
    let err = manager.delete(&account("Nobody", 0)).await.unwrap_err();
    assert!(matches!(err, DataError::Precondition(_)));
}

#[tokio::test]
async fn test_find_with_empty_condition_returns_every_row() {
    let manager = manager().await;
    manager.create(&account("Alice", 100)).await.unwrap();
    manager.create(&account("Bob", 50)).await.unwrap();
    manager.create(&account("Carol", 75)).await.unwrap();

    let all = manager.find_all().await.unwrap();
    assert_eq!(all.entities.len(), 3);
    assert!(all.is_complete());

    let limited = manager
        .find(&ConditionBuilder::new().limit(1))
        .await
        .unwrap();
    assert_eq!(limited.entities.len(), 1);
}

#[tokio::test]
async fn test_find_one_does_not_mutate_callers_condition() {
    let manager = manager().await;
    manager.create(&account("Alice", 100)).await.unwrap();

    let condition = ConditionBuilder::new().where_eq("name", "Alice");
    let found = manager.find_one(&condition).await.unwrap();
    assert!(found.is_some());
    assert_eq!(condition.row_limit(), None);
}

#[tokio::test]
async fn test_row_that_fails_to_map_is_reported_not_dropped() {
    let manager = manager().await;
    manager.create(&account("Alice", 100)).await.unwrap();

    // SQLite's type affinity keeps the unconvertible text as TEXT in an
    // INTEGER column, which fails the BIGINT decode on the way out.
    sqlx::query("INSERT INTO account (name, balance) VALUES ('Mallory', 'not-a-number')")
        .execute(manager.pool())
        .await
        .unwrap();

    let fetched = manager.find_all().await.unwrap();
    assert_eq!(fetched.entities.len(), 1);
    assert_eq!(fetched.entities[0].name, "Alice");
    assert_eq!(fetched.failures.len(), 1);
    assert_eq!(fetched.failures[0].index, 1);
    assert_eq!(fetched.failures[0].column.as_deref(), Some("balance"));
}

#[tokio::test]
async fn test_refetch_sees_other_writers_changes() {
    let manager = manager().await;
    let created = manager.create(&account("Alice", 100)).await.unwrap();

    sqlx::query("UPDATE account SET balance = 999 WHERE id = 1")
        .execute(manager.pool())
        .await
        .unwrap();

    let refetched = manager.refetch(&created).await.unwrap().unwrap();
    assert_eq!(refetched.balance, 999);
}

// The end-to-end lifecycle: create, update, conditional find, delete.
#[tokio::test]
async fn test_account_lifecycle() {
    let manager = manager().await;

    let created = manager.create(&account("Alice", 100)).await.unwrap();
    assert_eq!(created.id, Some(1));

    let mut updated = created.clone();
    updated.balance = 150;
    assert_eq!(manager.update(&updated).await.unwrap(), 1);

    let rich = manager
        .find(&ConditionBuilder::new().where_gt("balance", 100i64))
        .await
        .unwrap();
    assert_eq!(rich.entities, vec![updated.clone()]);

    assert_eq!(manager.delete(&updated).await.unwrap(), 1);
    assert_eq!(manager.find_by_id(1).await.unwrap(), None);
}
