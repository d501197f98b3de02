//! HTTP layer for the listsync daemon
//!
//! This is a thin integration layer only: request decoding, the error
//! envelope, and routing. All synchronization logic lives in
//! `listsync-core`.

pub mod api;
