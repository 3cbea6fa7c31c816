use crate::errors::DomainResult;
use async_trait::async_trait;
use sqlx::{Sqlite, Transaction};
use uuid::Uuid;

/// Trait for finding entities by ID
#[async_trait]
pub trait FindById<T> {
    /// Find an entity by ID
    async fn find_by_id(&self, id: Uuid) -> DomainResult<T>;
}

/// Trait for entities that support deletion by ID
///
/// Deletes are hard deletes; join-table rows referencing the entity must
/// be removed inside the same transaction before the entity row.
#[async_trait]
pub trait DeleteById {
    /// The name of the entity table in the database
    fn entity_name(&self) -> &'static str;

    /// Delete an entity by ID (standalone)
    async fn delete(&self, id: Uuid) -> DomainResult<()>;

    /// Delete an entity by ID within a transaction
    async fn delete_with_tx(
        &self,
        id: Uuid,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> DomainResult<()>;
}

/// SQL LIKE pattern for a case-insensitive substring search on `name`
pub fn like_pattern(term: &str) -> String {
    format!("%{}%", term)
}
