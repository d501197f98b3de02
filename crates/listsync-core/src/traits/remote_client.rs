// # Remote Client Trait
//
// Defines the interface for the remote marketing platform's list and member
// resource endpoints.
//
// ## Implementations
//
// - MailChimp Marketing API v3: `listsync-remote-mailchimp` crate
//
// ## Constraints
//
// Remote clients are stateless request/response wrappers. Every call is a
// single attempt:
//
// - no retry or backoff logic (retry policy is explicitly out of scope for
//   the whole system; a failed call surfaces to the engine and rolls the
//   request back)
// - no caching, no state between requests
// - no access to the local store (owned by `SyncEngine`)
// - no spawned tasks

use async_trait::async_trait;

use crate::entity::RemoteView;
use crate::error::Result;

/// A resource as acknowledged by the remote API
///
/// Create calls must expose at least the remote identity; everything else the
/// API returned rides along untyped.
#[derive(Debug, Clone)]
pub struct RemoteResource {
    /// The identifier assigned by the remote API
    pub id: String,
    /// Remaining response fields, unparsed
    pub extra: serde_json::Value,
}

impl RemoteResource {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            extra: serde_json::Value::Null,
        }
    }
}

/// Trait for remote API client implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// `POST /lists` — create a list, returning its remote identity
    async fn create_list(&self, payload: &RemoteView) -> Result<RemoteResource>;

    /// `PATCH /lists/{id}` — update an existing list
    async fn update_list(&self, remote_list_id: &str, payload: &RemoteView) -> Result<()>;

    /// `DELETE /lists/{id}` — delete a list
    async fn delete_list(&self, remote_list_id: &str) -> Result<()>;

    /// `POST /lists/{id}/members` — create a member, returning its remote identity
    async fn create_member(
        &self,
        remote_list_id: &str,
        payload: &RemoteView,
    ) -> Result<RemoteResource>;

    /// `PATCH /lists/{id}/members/{id}` — update an existing member
    async fn update_member(
        &self,
        remote_list_id: &str,
        remote_member_id: &str,
        payload: &RemoteView,
    ) -> Result<()>;

    /// `DELETE /lists/{id}/members/{id}` — delete a member
    async fn delete_member(&self, remote_list_id: &str, remote_member_id: &str) -> Result<()>;

    /// Client name for logging/debugging
    fn client_name(&self) -> &'static str;
}
