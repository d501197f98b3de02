//! Synchronization engine
//!
//! The SyncEngine drives every create/update/delete request through
//! validate → local write → remote call → local backfill as one unit, and
//! defines what happens when any step fails.
//!
//! ## Request flow
//!
//! ```text
//! request attributes
//!        │
//!        ▼
//! ┌──────────────┐  violations  ┌──────────┐
//! │  Validating  │─────────────▶│ REJECTED │  (no writes attempted)
//! └──────────────┘              └──────────┘
//!        │ pass
//!        ▼
//! ┌──────────────┐   ┌───────────────┐   ┌──────────────┐
//! │ LocalWriting │──▶│ RemoteCalling │──▶│  Backfilling │ (create only)
//! └──────────────┘   └───────────────┘   └──────────────┘
//!        │                  │                   │
//!        └──── any failure ─┴───────────────────┘
//!                       │                       │ success
//!                       ▼                       ▼
//!                  ┌────────┐             ┌───────────┐
//!                  │ FAILED │ (rollback)  │ COMMITTED │
//!                  └────────┘             └───────────┘
//! ```
//!
//! ## Failure semantics
//!
//! Local writes and the remote call share one transaction scope, so a remote
//! failure undoes the local write and the store ends in its pre-request
//! state. The inverse gap is accepted: if the remote create succeeded and a
//! later local step fails, the remote resource is left orphaned. The engine
//! logs the orphaned remote identity but performs no compensating delete.
//!
//! Validation failures and local lookup misses terminate before any
//! transactional work begins. Nothing is retried.

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::entity::{self, List, ListMember, ListPatch, MemberPatch, RemoteView};
use crate::error::{Error, Result};
use crate::traits::{EntityStore, RemoteClient, StoreTransaction};
use crate::validate::{self, Rule};

/// Orchestrates local store and remote client for one request at a time
///
/// Both collaborators are constructor parameters; the engine holds no other
/// state and no ambient configuration.
pub struct SyncEngine {
    store: Box<dyn EntityStore>,
    remote: Box<dyn RemoteClient>,
}

impl SyncEngine {
    /// Create a new engine from its two collaborators
    pub fn new(store: Box<dyn EntityStore>, remote: Box<dyn RemoteClient>) -> Self {
        Self { store, remote }
    }

    // ---- lists ----

    /// Create a list locally and remotely, backfilling the remote identity
    pub async fn create_list(&self, patch: ListPatch) -> Result<List> {
        let mut list = List::from_patch(patch);
        ensure_valid(&list.remote_view(), entity::list::rules())?;

        let mut tx = self.store.begin().await?;
        tx.save_list(&mut list).await?;

        let created = match self.remote.create_list(&list.remote_view()).await {
            Ok(resource) => resource,
            Err(err) => {
                warn!(client = self.remote.client_name(), error = %err, "remote list create failed, rolling back");
                tx.rollback().await?;
                return Err(err);
            }
        };

        list.remote_list_id = Some(created.id);
        if let Err(err) = tx.save_list(&mut list).await {
            self.warn_orphaned_list(&list, &err);
            tx.rollback().await?;
            return Err(err);
        }
        if let Err(err) = tx.commit().await {
            self.warn_orphaned_list(&list, &err);
            return Err(err);
        }

        info!(
            list_id = %display_id(list.list_id),
            remote_list_id = list.remote_list_id.as_deref().unwrap_or(""),
            "list created"
        );
        Ok(list)
    }

    /// Retrieve a list by local identity
    pub async fn show_list(&self, list_id: Uuid) -> Result<List> {
        self.find_list(list_id).await
    }

    /// Apply a partial update to a list locally and remotely
    pub async fn update_list(&self, list_id: Uuid, patch: ListPatch) -> Result<List> {
        let mut list = self.find_list(list_id).await?;
        list.fill(patch);
        ensure_valid(&list.remote_view(), entity::list::rules())?;

        let remote_id = required_remote_list_id(&list)?;

        let mut tx = self.store.begin().await?;
        tx.save_list(&mut list).await?;

        if let Err(err) = self.remote.update_list(&remote_id, &list.remote_view()).await {
            warn!(client = self.remote.client_name(), %list_id, error = %err, "remote list update failed, rolling back");
            tx.rollback().await?;
            return Err(err);
        }
        tx.commit().await?;

        debug!(%list_id, "list updated");
        Ok(list)
    }

    /// Delete a list locally and remotely
    pub async fn remove_list(&self, list_id: Uuid) -> Result<()> {
        let list = self.find_list(list_id).await?;
        let remote_id = required_remote_list_id(&list)?;

        let mut tx = self.store.begin().await?;
        tx.delete_list(list_id).await?;

        if let Err(err) = self.remote.delete_list(&remote_id).await {
            warn!(client = self.remote.client_name(), %list_id, error = %err, "remote list delete failed, rolling back");
            tx.rollback().await?;
            return Err(err);
        }
        tx.commit().await?;

        info!(%list_id, "list deleted");
        Ok(())
    }

    // ---- members ----

    /// Create a member under a list, locally and remotely
    ///
    /// The owning list must exist and must already carry a remote identity;
    /// a member cannot be synchronized to a list that has no remote
    /// counterpart.
    pub async fn create_member(&self, list_id: Uuid, patch: MemberPatch) -> Result<ListMember> {
        let list = self.find_list(list_id).await?;
        let remote_list_id = list
            .remote_list_id
            .clone()
            .ok_or_else(|| Error::list_unsynced(list_id))?;

        let mut member = ListMember::new(list_id, patch);
        ensure_valid(&member.remote_view(), entity::member::rules())?;

        let mut tx = self.store.begin().await?;
        tx.save_member(&mut member).await?;

        let created = match self
            .remote
            .create_member(&remote_list_id, &member.remote_view())
            .await
        {
            Ok(resource) => resource,
            Err(err) => {
                warn!(client = self.remote.client_name(), %list_id, error = %err, "remote member create failed, rolling back");
                tx.rollback().await?;
                return Err(err);
            }
        };

        member.remote_member_id = Some(created.id);
        if let Err(err) = tx.save_member(&mut member).await {
            self.warn_orphaned_member(&member, &remote_list_id, &err);
            tx.rollback().await?;
            return Err(err);
        }
        if let Err(err) = tx.commit().await {
            self.warn_orphaned_member(&member, &remote_list_id, &err);
            return Err(err);
        }

        info!(
            %list_id,
            member_id = %display_id(member.member_id),
            "member created"
        );
        Ok(member)
    }

    /// Retrieve a member by local identity, under its owning list
    pub async fn show_member(&self, list_id: Uuid, member_id: Uuid) -> Result<ListMember> {
        self.find_list(list_id).await?;
        self.find_member(member_id).await
    }

    /// Apply a partial update to a member locally and remotely
    pub async fn update_member(
        &self,
        list_id: Uuid,
        member_id: Uuid,
        patch: MemberPatch,
    ) -> Result<ListMember> {
        let list = self.find_list(list_id).await?;
        let mut member = self.find_member(member_id).await?;
        member.fill(patch);
        ensure_valid(&member.remote_view(), entity::member::rules())?;

        let remote_list_id = required_remote_list_id(&list)?;
        let remote_member_id = required_remote_member_id(&member)?;

        let mut tx = self.store.begin().await?;
        tx.save_member(&mut member).await?;

        if let Err(err) = self
            .remote
            .update_member(&remote_list_id, &remote_member_id, &member.remote_view())
            .await
        {
            warn!(client = self.remote.client_name(), %member_id, error = %err, "remote member update failed, rolling back");
            tx.rollback().await?;
            return Err(err);
        }
        tx.commit().await?;

        debug!(%member_id, "member updated");
        Ok(member)
    }

    /// Delete a member locally and remotely
    pub async fn remove_member(&self, list_id: Uuid, member_id: Uuid) -> Result<()> {
        let list = self.find_list(list_id).await?;
        let member = self.find_member(member_id).await?;

        let remote_list_id = required_remote_list_id(&list)?;
        let remote_member_id = required_remote_member_id(&member)?;

        let mut tx = self.store.begin().await?;
        tx.delete_member(member_id).await?;

        if let Err(err) = self
            .remote
            .delete_member(&remote_list_id, &remote_member_id)
            .await
        {
            warn!(client = self.remote.client_name(), %member_id, error = %err, "remote member delete failed, rolling back");
            tx.rollback().await?;
            return Err(err);
        }
        tx.commit().await?;

        info!(%member_id, "member deleted");
        Ok(())
    }

    // ---- helpers ----

    async fn find_list(&self, list_id: Uuid) -> Result<List> {
        self.store
            .find_list(list_id)
            .await?
            .ok_or_else(|| Error::list_not_found(list_id))
    }

    async fn find_member(&self, member_id: Uuid) -> Result<ListMember> {
        self.store
            .find_member(member_id)
            .await?
            .ok_or_else(|| Error::member_not_found(member_id))
    }

    /// Accepted asymmetry: remote create succeeded but the local side failed.
    /// No compensating remote delete is issued; the orphan is logged for
    /// manual reconciliation.
    fn warn_orphaned_list(&self, list: &List, err: &Error) {
        warn!(
            client = self.remote.client_name(),
            remote_list_id = list.remote_list_id.as_deref().unwrap_or(""),
            error = %err,
            "local write failed after remote list create; remote list left orphaned"
        );
    }

    fn warn_orphaned_member(&self, member: &ListMember, remote_list_id: &str, err: &Error) {
        warn!(
            client = self.remote.client_name(),
            remote_list_id,
            remote_member_id = member.remote_member_id.as_deref().unwrap_or(""),
            error = %err,
            "local write failed after remote member create; remote member left orphaned"
        );
    }
}

/// Short-circuit with a validation error when the rule table reports violations
fn ensure_valid(view: &RemoteView, rules: &[Rule]) -> Result<()> {
    let violations = validate::check(view, rules);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::validation(violations))
    }
}

/// A committed list always carries a remote identity; its absence means the
/// local record is corrupt, which surfaces as a store error.
fn required_remote_list_id(list: &List) -> Result<String> {
    list.remote_list_id
        .clone()
        .ok_or_else(|| Error::store(format!("List[{}] has no remote identity", display_id(list.list_id))))
}

fn required_remote_member_id(member: &ListMember) -> Result<String> {
    member.remote_member_id.clone().ok_or_else(|| {
        Error::store(format!(
            "ListMember[{}] has no remote identity",
            display_id(member.member_id)
        ))
    })
}

fn display_id(id: Option<Uuid>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}
