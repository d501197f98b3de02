// # listsync-core
//
// Core library for the listsync synchronization system.
//
// ## Architecture Overview
//
// This library keeps a local relational store and a third-party marketing
// platform in sync, one request at a time:
//
// - **Entity model**: `List` and `ListMember` records carrying a local
//   identity, a nullable remote identity, and an attribute bag
// - **Validation gate**: declarative per-entity rule tables checked against
//   the remote view before any write is attempted
// - **EntityStore**: trait for keyed local persistence with transactional
//   save/delete spanning a whole request
// - **RemoteClient**: trait for the remote API's list/member CRUD endpoints
// - **SyncEngine**: the orchestrator driving validate → local write → remote
//   call → backfill inside one transaction scope
//
// ## Design Principles
//
// 1. **Separation of Concerns**: the engine owns all coordination; stores
//    persist, remote clients make exactly one API call per invocation
// 2. **Explicit wiring**: store and remote client are constructor parameters,
//    never ambient singletons
// 3. **One transaction per request**: a remote failure rolls back every local
//    write made for that request
// 4. **No retries**: a failed remote call surfaces immediately to the caller

pub mod config;
pub mod engine;
pub mod entity;
pub mod error;
pub mod store;
pub mod traits;
pub mod validate;

// Re-export core types for convenience
pub use engine::SyncEngine;
pub use entity::{List, ListMember, ListPatch, MemberPatch};
pub use error::{Error, Result};
pub use store::MemoryStore;
pub use traits::{EntityStore, RemoteClient, RemoteResource, StoreTransaction};
pub use validate::Violations;
