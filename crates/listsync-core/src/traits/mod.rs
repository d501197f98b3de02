//! Core traits for the listsync system
//!
//! This module defines the abstract interfaces the engine coordinates:
//!
//! - [`EntityStore`]: keyed local persistence with request-scoped transactions
//! - [`RemoteClient`]: single-shot calls against the remote API's resource
//!   endpoints

pub mod entity_store;
pub mod remote_client;

pub use entity_store::{EntityStore, StoreTransaction};
pub use remote_client::{RemoteClient, RemoteResource};
