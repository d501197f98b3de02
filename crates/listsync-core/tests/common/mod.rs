//! Test doubles and common utilities for the synchronization contract tests
//!
//! The mock remote client records every call and can be told to fail
//! specific operations, so tests can verify both the happy path and the
//! rollback behavior without any network access.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use listsync_core::entity::RemoteView;
use listsync_core::error::{Error, Result};
use listsync_core::traits::{
    EntityStore, RemoteClient, RemoteResource, StoreTransaction,
};
use listsync_core::{List, ListMember, ListPatch, MemberPatch, MemoryStore};
use serde_json::json;
use uuid::Uuid;

/// A mock RemoteClient that tracks calls and fails on demand
pub struct MockRemoteClient {
    /// Recorded calls, as "op" or "op:arg" descriptors
    calls: Arc<Mutex<Vec<String>>>,
    /// Sequence for generated remote identities
    id_seq: Arc<AtomicUsize>,
    /// Operation names that should fail
    fail_on: Arc<Mutex<HashSet<&'static str>>>,
}

impl MockRemoteClient {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            id_seq: Arc::new(AtomicUsize::new(0)),
            fail_on: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Create a new MockRemoteClient that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            calls: Arc::clone(&other.calls),
            id_seq: Arc::clone(&other.id_seq),
            fail_on: Arc::clone(&other.fail_on),
        }
    }

    /// Make the named operation fail from now on
    pub fn fail_on(&self, op: &'static str) {
        self.fail_on.lock().unwrap().insert(op);
    }

    /// Number of recorded calls whose descriptor starts with `op`
    pub fn call_count(&self, op: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.starts_with(op))
            .count()
    }

    /// All recorded call descriptors
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, descriptor: String, op: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(descriptor);
        if self.fail_on.lock().unwrap().contains(op) {
            return Err(Error::remote("simulated remote failure"));
        }
        Ok(())
    }

    fn next_id(&self, prefix: &str) -> String {
        let n = self.id_seq.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{prefix}-{n}")
    }
}

#[async_trait]
impl RemoteClient for MockRemoteClient {
    async fn create_list(&self, _payload: &RemoteView) -> Result<RemoteResource> {
        self.record("create_list".into(), "create_list")?;
        Ok(RemoteResource::new(self.next_id("remote-list")))
    }

    async fn update_list(&self, remote_list_id: &str, _payload: &RemoteView) -> Result<()> {
        self.record(format!("update_list:{remote_list_id}"), "update_list")
    }

    async fn delete_list(&self, remote_list_id: &str) -> Result<()> {
        self.record(format!("delete_list:{remote_list_id}"), "delete_list")
    }

    async fn create_member(
        &self,
        remote_list_id: &str,
        _payload: &RemoteView,
    ) -> Result<RemoteResource> {
        self.record(format!("create_member:{remote_list_id}"), "create_member")?;
        Ok(RemoteResource::new(self.next_id("remote-member")))
    }

    async fn update_member(
        &self,
        remote_list_id: &str,
        remote_member_id: &str,
        _payload: &RemoteView,
    ) -> Result<()> {
        self.record(
            format!("update_member:{remote_list_id}/{remote_member_id}"),
            "update_member",
        )
    }

    async fn delete_member(&self, remote_list_id: &str, remote_member_id: &str) -> Result<()> {
        self.record(
            format!("delete_member:{remote_list_id}/{remote_member_id}"),
            "delete_member",
        )
    }

    fn client_name(&self) -> &'static str {
        "mock"
    }
}

/// A store wrapper that fails after a set number of saves
///
/// Used to exercise the path where the remote create succeeded but the
/// local backfill save fails.
#[derive(Clone)]
pub struct FailingSaveStore {
    inner: MemoryStore,
    saves_before_failure: usize,
    save_count: Arc<AtomicUsize>,
}

impl FailingSaveStore {
    pub fn new(inner: MemoryStore, saves_before_failure: usize) -> Self {
        Self {
            inner,
            saves_before_failure,
            save_count: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl EntityStore for FailingSaveStore {
    async fn find_list(&self, list_id: Uuid) -> Result<Option<List>> {
        self.inner.find_list(list_id).await
    }

    async fn find_member(&self, member_id: Uuid) -> Result<Option<ListMember>> {
        self.inner.find_member(member_id).await
    }

    async fn list_ids(&self) -> Result<Vec<Uuid>> {
        self.inner.list_ids().await
    }

    async fn member_ids(&self) -> Result<Vec<Uuid>> {
        self.inner.member_ids().await
    }

    async fn begin(&self) -> Result<Box<dyn StoreTransaction>> {
        Ok(Box::new(FailingSaveTransaction {
            inner: self.inner.begin().await?,
            saves_before_failure: self.saves_before_failure,
            save_count: Arc::clone(&self.save_count),
        }))
    }
}

struct FailingSaveTransaction {
    inner: Box<dyn StoreTransaction>,
    saves_before_failure: usize,
    save_count: Arc<AtomicUsize>,
}

impl FailingSaveTransaction {
    fn check_budget(&self) -> Result<()> {
        let n = self.save_count.fetch_add(1, Ordering::SeqCst);
        if n >= self.saves_before_failure {
            return Err(Error::store("simulated store failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl StoreTransaction for FailingSaveTransaction {
    async fn save_list(&mut self, list: &mut List) -> Result<()> {
        self.check_budget()?;
        self.inner.save_list(list).await
    }

    async fn save_member(&mut self, member: &mut ListMember) -> Result<()> {
        self.check_budget()?;
        self.inner.save_member(member).await
    }

    async fn delete_list(&mut self, list_id: Uuid) -> Result<()> {
        self.inner.delete_list(list_id).await
    }

    async fn delete_member(&mut self, member_id: Uuid) -> Result<()> {
        self.inner.delete_member(member_id).await
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.inner.commit().await
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.inner.rollback().await
    }
}

/// A well-formed list payload
pub fn valid_list_patch() -> ListPatch {
    serde_json::from_value(json!({
        "name": "Quarterly newsletter",
        "permission_reminder": "You signed up for updates on our website.",
        "email_type_option": false,
        "contact": {
            "company": "Doe Ltd.",
            "address1": "DoeStreet 1",
            "address2": "",
            "city": "Doesy",
            "state": "Doedoe",
            "zip": "1672-12",
            "country": "US",
            "phone": "55533344412"
        },
        "campaign_defaults": {
            "from_name": "John Doe",
            "from_email": "john@doe.com",
            "subject": "My new campaign!",
            "language": "US"
        },
        "visibility": "prv",
        "use_archive_bar": false,
        "notify_on_subscribe": "notify@example.com",
        "notify_on_unsubscribe": "notify@example.com"
    }))
    .expect("valid list patch deserializes")
}

/// A well-formed member payload
pub fn valid_member_patch() -> MemberPatch {
    serde_json::from_value(json!({
        "email_address": "jane@example.com",
        "email_type": "text",
        "status": "subscribed",
        "merge_fields": {"FNAME": "", "LNAME": ""},
        "language": "en",
        "vip": false,
        "location": {"longitude": 1, "latitude": 1},
        "marketing_permissions": [],
        "ip_signup": "192.168.10.10",
        "ip_opt": "192.168.10.10",
        "tags": []
    }))
    .expect("valid member patch deserializes")
}
