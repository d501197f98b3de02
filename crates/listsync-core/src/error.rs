//! Error types for the listsync system
//!
//! This module defines all error types used throughout the crate, plus the
//! total mapping from error kind to HTTP status code used by the daemon.

use thiserror::Error;

use crate::validate::Violations;

/// Result type alias for listsync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the listsync system
#[derive(Error, Debug)]
pub enum Error {
    /// Field-level validation failures; never reaches the transaction
    #[error("validation failed")]
    Validation(Violations),

    /// Local lookup miss, resolved before any write is attempted
    #[error("{0}")]
    NotFound(String),

    /// Member creation targeting a list that has no remote identity yet
    #[error("{0}")]
    ListUnsynced(String),

    /// The remote API call failed; triggers rollback of local writes
    #[error("remote API error: {0}")]
    Remote(String),

    /// Authentication with the remote API failed
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The remote API rejected the call for rate limiting
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Local persistence failure; same rollback treatment as remote errors
    #[error("store error: {0}")]
    Store(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a validation error from a violation set
    pub fn validation(violations: Violations) -> Self {
        Self::Validation(violations)
    }

    /// Create a "not found" error for a list id
    pub fn list_not_found(list_id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("List[{list_id}] not found"))
    }

    /// Create a "not found" error for a member id
    pub fn member_not_found(member_id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("ListMember[{member_id}] not found"))
    }

    /// Create an unsynced-list error for a list id
    pub fn list_unsynced(list_id: impl std::fmt::Display) -> Self {
        Self::ListUnsynced(format!(
            "List[{list_id}] has no remote identity yet; synchronize the list first"
        ))
    }

    /// Create a remote API error
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::Remote(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Total mapping from error kind to HTTP status code
    ///
    /// Independent of any HTTP framework so the daemon stays a thin layer.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::ListUnsynced(_) => 422,
            Self::NotFound(_) => 404,
            Self::Remote(_)
            | Self::Authentication(_)
            | Self::RateLimited(_)
            | Self::Store(_)
            | Self::Config(_)
            | Self::Json(_) => 500,
        }
    }

    /// Field violations carried by this error, if any
    pub fn violations(&self) -> Option<&Violations> {
        match self {
            Self::Validation(violations) => Some(violations),
            _ => None,
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Store(err.to_string())
    }
}
