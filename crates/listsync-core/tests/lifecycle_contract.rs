//! Synchronization Contract: entity lifecycle
//!
//! Verifies the happy path of the synchronization protocol:
//! - create backfills the remote identity into the committed local record
//! - show is idempotent when no write happened in between
//! - update and delete run against the previously stored remote identity
//!
//! If these fail, the local store and the remote API drift apart.

mod common;

use common::*;
use listsync_core::{EntityStore, MemoryStore, SyncEngine};

fn engine_with(store: &MemoryStore, remote: &MockRemoteClient) -> SyncEngine {
    SyncEngine::new(
        Box::new(store.clone()),
        Box::new(MockRemoteClient::sharing_counters_with(remote)),
    )
}

#[tokio::test]
async fn create_list_backfills_remote_identity() {
    let store = MemoryStore::new();
    let remote = MockRemoteClient::new();
    let engine = engine_with(&store, &remote);

    let list = engine.create_list(valid_list_patch()).await.unwrap();

    let list_id = list.list_id.expect("local identity assigned");
    assert_eq!(list.remote_list_id.as_deref(), Some("remote-list-1"));

    // The committed record carries the same remote identity
    let stored = store.find_list(list_id).await.unwrap().unwrap();
    assert_eq!(stored.remote_list_id, list.remote_list_id);
    assert_eq!(remote.call_count("create_list"), 1);
}

#[tokio::test]
async fn show_twice_without_writes_is_identical() {
    let store = MemoryStore::new();
    let remote = MockRemoteClient::new();
    let engine = engine_with(&store, &remote);

    let list = engine.create_list(valid_list_patch()).await.unwrap();
    let id = list.list_id.unwrap();

    let first = engine.show_list(id).await.unwrap().local_view();
    let second = engine.show_list(id).await.unwrap().local_view();
    assert_eq!(first, second);

    // Reads never hit the remote API
    assert_eq!(remote.call_count("create_list"), 1);
    assert_eq!(remote.calls().len(), 1);
}

#[tokio::test]
async fn update_list_patches_the_stored_remote_identity() {
    let store = MemoryStore::new();
    let remote = MockRemoteClient::new();
    let engine = engine_with(&store, &remote);

    let list = engine.create_list(valid_list_patch()).await.unwrap();
    let id = list.list_id.unwrap();

    let mut patch = valid_list_patch();
    patch.name = Some("Renamed newsletter".into());
    let updated = engine.update_list(id, patch).await.unwrap();

    assert_eq!(updated.name.as_deref(), Some("Renamed newsletter"));
    assert_eq!(updated.list_id, Some(id));
    assert_eq!(
        store.find_list(id).await.unwrap().unwrap().name.as_deref(),
        Some("Renamed newsletter")
    );
    assert_eq!(remote.calls()[1], "update_list:remote-list-1");
}

#[tokio::test]
async fn remove_list_deletes_locally_and_remotely() {
    let store = MemoryStore::new();
    let remote = MockRemoteClient::new();
    let engine = engine_with(&store, &remote);

    let list = engine.create_list(valid_list_patch()).await.unwrap();
    let id = list.list_id.unwrap();

    engine.remove_list(id).await.unwrap();

    assert!(store.find_list(id).await.unwrap().is_none());
    assert_eq!(remote.calls()[1], "delete_list:remote-list-1");

    // A second delete is a clean not-found, and nothing reaches the remote
    let err = engine.remove_list(id).await.unwrap_err();
    assert_eq!(err.http_status(), 404);
    assert_eq!(remote.call_count("delete_list"), 1);
}

#[tokio::test]
async fn member_lifecycle_under_a_synchronized_list() {
    let store = MemoryStore::new();
    let remote = MockRemoteClient::new();
    let engine = engine_with(&store, &remote);

    let list = engine.create_list(valid_list_patch()).await.unwrap();
    let list_id = list.list_id.unwrap();

    // Create: remote call targets the list's remote identity
    let member = engine
        .create_member(list_id, valid_member_patch())
        .await
        .unwrap();
    let member_id = member.member_id.expect("local identity assigned");
    assert_eq!(member.remote_member_id.as_deref(), Some("remote-member-2"));
    assert_eq!(member.list_id, list_id);
    assert_eq!(remote.calls()[1], "create_member:remote-list-1");

    // Show
    let shown = engine.show_member(list_id, member_id).await.unwrap();
    assert_eq!(shown.local_view(), member.local_view());

    // Update: both stored remote identities appear in the call
    let mut patch = valid_member_patch();
    patch.status = Some("unsubscribed".into());
    let updated = engine.update_member(list_id, member_id, patch).await.unwrap();
    assert_eq!(updated.status.as_deref(), Some("unsubscribed"));
    assert_eq!(
        remote.calls()[2],
        "update_member:remote-list-1/remote-member-2"
    );

    // Delete
    engine.remove_member(list_id, member_id).await.unwrap();
    assert!(store.find_member(member_id).await.unwrap().is_none());
    assert_eq!(
        remote.calls()[3],
        "delete_member:remote-list-1/remote-member-2"
    );
}

#[tokio::test]
async fn member_lookups_resolve_the_list_first() {
    let store = MemoryStore::new();
    let remote = MockRemoteClient::new();
    let engine = engine_with(&store, &remote);

    let list = engine.create_list(valid_list_patch()).await.unwrap();
    let list_id = list.list_id.unwrap();
    let member = engine
        .create_member(list_id, valid_member_patch())
        .await
        .unwrap();
    let member_id = member.member_id.unwrap();

    // Unknown list short-circuits even though the member exists
    let unknown = uuid::Uuid::new_v4();
    let err = engine.show_member(unknown, member_id).await.unwrap_err();
    assert_eq!(err.to_string(), format!("List[{unknown}] not found"));

    // Known list, unknown member
    let err = engine.show_member(list_id, unknown).await.unwrap_err();
    assert_eq!(err.to_string(), format!("ListMember[{unknown}] not found"));
}
