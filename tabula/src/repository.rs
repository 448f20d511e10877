use crate::condition::ConditionBuilder;
use crate::entity::Entity;
use crate::error::DataError;
use crate::fetched::Fetched;
use std::future::Future;

/// Generic async repository trait covering the full entity lifecycle.
///
/// Uses RPITIT (return-position `impl Trait` in traits) — no `async-trait`
/// needed.
pub trait Repository<E: Entity>: Send + Sync {
    /// Persist a new entity and return a copy carrying the generated id.
    /// The argument is untouched; its id must be unset.
    fn create(&self, entity: &E) -> impl Future<Output = Result<E, DataError>> + Send;

    /// Update the row matching the entity's id. Returns the affected-row
    /// count; zero is a reported outcome, not an error.
    fn update(&self, entity: &E) -> impl Future<Output = Result<u64, DataError>> + Send;

    /// Update the rows matching `condition` with the entity's non-identity
    /// column values.
    fn update_where(
        &self,
        entity: &E,
        condition: &ConditionBuilder,
    ) -> impl Future<Output = Result<u64, DataError>> + Send;

    /// Delete the row matching the entity's id. Returns the affected-row
    /// count.
    fn delete(&self, entity: &E) -> impl Future<Output = Result<u64, DataError>> + Send;

    fn find_by_id(&self, id: i64) -> impl Future<Output = Result<Option<E>, DataError>> + Send;

    /// First entity matching `condition`, or `None`. The caller's builder is
    /// not mutated by the internal limit.
    fn find_one(
        &self,
        condition: &ConditionBuilder,
    ) -> impl Future<Output = Result<Option<E>, DataError>> + Send;

    /// Re-read a persisted entity by its id.
    fn refetch(&self, entity: &E) -> impl Future<Output = Result<Option<E>, DataError>> + Send;

    fn find(
        &self,
        condition: &ConditionBuilder,
    ) -> impl Future<Output = Result<Fetched<E>, DataError>> + Send;

    fn find_all(&self) -> impl Future<Output = Result<Fetched<E>, DataError>> + Send;
}
