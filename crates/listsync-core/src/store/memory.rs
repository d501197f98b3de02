// # Memory Store
//
// In-memory implementation of EntityStore.
//
// ## Purpose
//
// Provides a simple, fast store that doesn't persist across restarts. Used
// for tests and for deployments where the remote API is the system of record
// and losing the local mirror on restart is acceptable.
//
// ## Transaction model
//
// A transaction buffers its writes as an ordered op list. Commit takes the
// write lock once and applies every op while holding it, so a request's
// writes land atomically. Rollback (or dropping the transaction) discards
// the ops; nothing touches the shared maps before commit.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::entity::{List, ListMember};
use crate::error::{Error, Result};
use crate::traits::{EntityStore, StoreTransaction};

#[derive(Debug, Default)]
struct Inner {
    lists: HashMap<Uuid, List>,
    members: HashMap<Uuid, ListMember>,
}

/// In-memory entity store
///
/// Cloning is cheap and shares the underlying maps, which is how tests hold
/// a handle onto a store owned by the engine.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

/// A buffered write
#[derive(Debug, Clone)]
enum Op {
    PutList(List),
    PutMember(ListMember),
    DeleteList(Uuid),
    DeleteMember(Uuid),
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored lists
    pub async fn list_count(&self) -> usize {
        self.inner.read().await.lists.len()
    }

    /// Number of stored members
    pub async fn member_count(&self) -> usize {
        self.inner.read().await.members.len()
    }

    /// Check if the store holds no entities
    pub async fn is_empty(&self) -> bool {
        let guard = self.inner.read().await;
        guard.lists.is_empty() && guard.members.is_empty()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn find_list(&self, list_id: Uuid) -> Result<Option<List>> {
        let guard = self.inner.read().await;
        Ok(guard.lists.get(&list_id).cloned())
    }

    async fn find_member(&self, member_id: Uuid) -> Result<Option<ListMember>> {
        let guard = self.inner.read().await;
        Ok(guard.members.get(&member_id).cloned())
    }

    async fn list_ids(&self) -> Result<Vec<Uuid>> {
        let guard = self.inner.read().await;
        Ok(guard.lists.keys().copied().collect())
    }

    async fn member_ids(&self) -> Result<Vec<Uuid>> {
        let guard = self.inner.read().await;
        Ok(guard.members.keys().copied().collect())
    }

    async fn begin(&self) -> Result<Box<dyn StoreTransaction>> {
        Ok(Box::new(MemoryTransaction {
            inner: Arc::clone(&self.inner),
            ops: Vec::new(),
        }))
    }
}

/// Buffered-write transaction over a [`MemoryStore`]
struct MemoryTransaction {
    inner: Arc<RwLock<Inner>>,
    ops: Vec<Op>,
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn save_list(&mut self, list: &mut List) -> Result<()> {
        // Identity is assigned once, at first save
        if list.list_id.is_none() {
            list.list_id = Some(Uuid::new_v4());
        }
        self.ops.push(Op::PutList(list.clone()));
        Ok(())
    }

    async fn save_member(&mut self, member: &mut ListMember) -> Result<()> {
        if member.member_id.is_none() {
            member.member_id = Some(Uuid::new_v4());
        }
        self.ops.push(Op::PutMember(member.clone()));
        Ok(())
    }

    async fn delete_list(&mut self, list_id: Uuid) -> Result<()> {
        self.ops.push(Op::DeleteList(list_id));
        Ok(())
    }

    async fn delete_member(&mut self, member_id: Uuid) -> Result<()> {
        self.ops.push(Op::DeleteMember(member_id));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let mut guard = self.inner.write().await;
        for op in self.ops {
            match op {
                Op::PutList(list) => {
                    let id = list
                        .list_id
                        .ok_or_else(|| Error::store("cannot commit a list without an identity"))?;
                    guard.lists.insert(id, list);
                }
                Op::PutMember(member) => {
                    let id = member.member_id.ok_or_else(|| {
                        Error::store("cannot commit a member without an identity")
                    })?;
                    guard.members.insert(id, member);
                }
                Op::DeleteList(id) => {
                    guard.lists.remove(&id);
                }
                Op::DeleteMember(id) => {
                    guard.members.remove(&id);
                }
            }
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        // Writes were never applied; dropping the op buffer is the rollback
        Ok(())
    }
}
