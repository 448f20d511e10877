use crate::error::SqlxErrorExt;
use crate::row::decode_entity;
use sqlx::any::AnyArguments;
use sqlx::query::Query as AnyQuery;
use sqlx::{Any, AnyPool, Row};
use std::marker::PhantomData;
use tabula::{
    column_data, ConditionBuilder, DataError, Dialect, Entity, Fetched, Query, Repository,
    RowError, Statements,
};
use tracing::{debug, warn};

/// The entity manager: create/update/delete/find for one entity type over an
/// `sqlx::AnyPool`.
///
/// Statement text is prepared per call from the entity's field descriptors;
/// each operation checks out one pooled connection for the lifetime of a
/// single statement and releases it on every exit path. The manager holds no
/// mutable state and is safe to share across tasks.
///
/// # Example
///
/// ```ignore
/// let manager = SqlxManager::<Account>::new(pool.clone(), Dialect::Sqlite)?;
/// let created = manager.create(&account).await?;
/// let found = manager.find_by_id(created.id().unwrap()).await?;
/// ```
pub struct SqlxManager<E: Entity> {
    pool: AnyPool,
    statements: Statements,
    _marker: PhantomData<E>,
}

impl<E: Entity> SqlxManager<E> {
    /// Validates the entity's column mapping up front; an entity with no
    /// mapped fields or a malformed identifier is rejected here, before any
    /// statement is ever built.
    pub fn new(pool: AnyPool, dialect: Dialect) -> Result<Self, DataError> {
        let statements = Statements::for_entity::<E>(dialect)?;
        Ok(Self {
            pool,
            statements,
            _marker: PhantomData,
        })
    }

    /// Get the underlying pool reference.
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// The schema-qualified table this manager operates on.
    pub fn table(&self) -> &str {
        self.statements.table()
    }

    fn id_condition(&self, id: i64) -> ConditionBuilder {
        ConditionBuilder::new().where_eq(E::id_column(), id)
    }
}

// Manual impl: `E` itself is only a marker here and needs no `Clone` bound
// beyond what `Entity` already requires.
impl<E: Entity> Clone for SqlxManager<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            statements: self.statements.clone(),
            _marker: PhantomData,
        }
    }
}

fn bind_args<'q>(sql: &'q str, args: &'q [tabula::Value]) -> AnyQuery<'q, Any, AnyArguments<'q>> {
    use tabula::Value;

    let mut query = sqlx::query::<Any>(sql);
    for arg in args {
        query = match arg {
            Value::Null => query.bind(None::<String>),
            Value::BigInt(v) => query.bind(*v),
            Value::Double(v) => query.bind(*v),
            Value::Text(v) => query.bind(v.clone()),
            Value::Bool(v) => query.bind(*v),
        };
    }
    query
}

impl<E: Entity> Repository<E> for SqlxManager<E> {
    async fn create(&self, entity: &E) -> Result<E, DataError> {
        if entity.id().is_some() {
            return Err(DataError::precondition(format!(
                "create into {} requires an unset id",
                self.table()
            )));
        }

        let mut created = entity.clone();
        let query = self.statements.insert(&column_data(&created))?;
        debug!(table = self.table(), sql = %query.sql, "insert");

        let mut conn = self.pool.acquire().await.map_err(|e| e.into_data_error())?;
        let id = if self.statements.dialect().supports_returning() {
            let row = bind_args(&query.sql, &query.args)
                .fetch_one(&mut *conn)
                .await
                .map_err(|e| e.into_data_error())?;
            row.try_get::<i64, _>(E::id_column())
                .map_err(|_| DataError::NoGeneratedKey {
                    table: self.table().to_string(),
                })?
        } else {
            let result = bind_args(&query.sql, &query.args)
                .execute(&mut *conn)
                .await
                .map_err(|e| e.into_data_error())?;
            result
                .last_insert_id()
                .ok_or_else(|| DataError::NoGeneratedKey {
                    table: self.table().to_string(),
                })?
        };

        created.set_id(Some(id));
        Ok(created)
    }

    async fn update(&self, entity: &E) -> Result<u64, DataError> {
        let id = entity.id().ok_or_else(|| {
            DataError::precondition(format!("update of {} requires an id", self.table()))
        })?;
        self.update_where(entity, &self.id_condition(id)).await
    }

    async fn update_where(
        &self,
        entity: &E,
        condition: &ConditionBuilder,
    ) -> Result<u64, DataError> {
        let id = entity.id().ok_or_else(|| {
            DataError::precondition(format!("update of {} requires an id", self.table()))
        })?;

        let query = self.statements.update(&column_data(entity), condition)?;
        debug!(table = self.table(), sql = %query.sql, "update");

        let affected = self.execute(&query).await?;
        if affected == 0 {
            warn!(table = self.table(), id, "update affected no rows");
        }
        Ok(affected)
    }

    async fn delete(&self, entity: &E) -> Result<u64, DataError> {
        let id = entity.id().ok_or_else(|| {
            DataError::precondition(format!("delete from {} requires an id", self.table()))
        })?;

        let query = self.statements.delete(&self.id_condition(id))?;
        debug!(table = self.table(), sql = %query.sql, "delete");

        let affected = self.execute(&query).await?;
        if affected > 1 {
            warn!(
                table = self.table(),
                id, affected, "delete by id affected more than one row"
            );
        }
        Ok(affected)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<E>, DataError> {
        self.find_one(&self.id_condition(id)).await
    }

    async fn find_one(&self, condition: &ConditionBuilder) -> Result<Option<E>, DataError> {
        // Clone, so forcing the limit never leaks into the caller's builder.
        let limited = condition.clone().limit(1);
        let fetched = self.find(&limited).await?;
        Ok(fetched.into_entities().into_iter().next())
    }

    async fn refetch(&self, entity: &E) -> Result<Option<E>, DataError> {
        let id = entity.id().ok_or_else(|| {
            DataError::precondition(format!("refetch from {} requires an id", self.table()))
        })?;
        self.find_by_id(id).await
    }

    async fn find(&self, condition: &ConditionBuilder) -> Result<Fetched<E>, DataError> {
        let query = self.statements.select(condition)?;
        debug!(table = self.table(), sql = %query.sql, "select");

        let mut conn = self.pool.acquire().await.map_err(|e| e.into_data_error())?;
        let rows = bind_args(&query.sql, &query.args)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| e.into_data_error())?;

        let mut fetched = Fetched::default();
        for (index, row) in rows.iter().enumerate() {
            match decode_entity::<E>(row) {
                Ok(entity) => fetched.entities.push(entity),
                Err(failure) => {
                    let failure = RowError {
                        index,
                        column: failure.column,
                        message: failure.message,
                    };
                    warn!(table = self.table(), %failure, "row failed to map");
                    fetched.failures.push(failure);
                }
            }
        }
        Ok(fetched)
    }

    async fn find_all(&self) -> Result<Fetched<E>, DataError> {
        self.find(&ConditionBuilder::new()).await
    }
}

impl<E: Entity> SqlxManager<E> {
    async fn execute(&self, query: &Query) -> Result<u64, DataError> {
        let mut conn = self.pool.acquire().await.map_err(|e| e.into_data_error())?;
        let result = bind_args(&query.sql, &query.args)
            .execute(&mut *conn)
            .await
            .map_err(|e| e.into_data_error())?;
        Ok(result.rows_affected())
    }
}
