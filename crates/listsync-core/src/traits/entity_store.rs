// # Entity Store Trait
//
// Defines the interface for durable keyed storage of lists and members.
//
// ## Purpose
//
// The store owns local identity: it assigns a fresh id the first time an
// entity is saved and never reassigns it. All writes for one request are
// buffered in a [`StoreTransaction`] and applied atomically at commit, so a
// failed remote call can undo every local write of that request.
//
// ## Implementations
//
// - In-memory: `store::MemoryStore`
// - Future: SQLite, Postgres, etc.

use async_trait::async_trait;
use uuid::Uuid;

use crate::entity::{List, ListMember};
use crate::error::Result;

/// Trait for local store implementations
///
/// Reads go through the store directly; writes go through a transaction
/// obtained from [`EntityStore::begin`].
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks. The
/// transaction provides atomicity for one request's writes, not isolation
/// across concurrent requests touching the same entity.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Look up a list by local identity
    async fn find_list(&self, list_id: Uuid) -> Result<Option<List>>;

    /// Look up a member by local identity
    async fn find_member(&self, member_id: Uuid) -> Result<Option<ListMember>>;

    /// Local identities of all stored lists
    async fn list_ids(&self) -> Result<Vec<Uuid>>;

    /// Local identities of all stored members
    async fn member_ids(&self) -> Result<Vec<Uuid>>;

    /// Open a transaction scope for one request's writes
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>>;
}

/// One request's transaction scope
///
/// Writes are buffered until [`StoreTransaction::commit`]; dropping the
/// transaction without committing discards them, same as an explicit
/// [`StoreTransaction::rollback`].
#[async_trait]
pub trait StoreTransaction: Send {
    /// Insert or update a list
    ///
    /// Assigns `list_id` if the entity has never been saved. The identity is
    /// visible to the caller immediately even though the write itself only
    /// lands at commit.
    async fn save_list(&mut self, list: &mut List) -> Result<()>;

    /// Insert or update a member
    ///
    /// Same identity semantics as [`StoreTransaction::save_list`].
    async fn save_member(&mut self, member: &mut ListMember) -> Result<()>;

    /// Delete a list by local identity
    async fn delete_list(&mut self, list_id: Uuid) -> Result<()>;

    /// Delete a member by local identity
    async fn delete_member(&mut self, member_id: Uuid) -> Result<()>;

    /// Apply all buffered writes atomically
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Discard all buffered writes
    async fn rollback(self: Box<Self>) -> Result<()>;
}
