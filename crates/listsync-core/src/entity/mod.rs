//! Entity model
//!
//! Two record kinds, [`List`] and [`ListMember`], each carrying a local
//! identity (assigned by the store at first save), a nullable remote identity
//! (backfilled after a successful remote create), and an attribute bag.
//!
//! Every entity translates between three shapes:
//! - the inbound patch ([`ListPatch`] / [`MemberPatch`]): an enumerated set of
//!   independently settable optional fields; unknown request keys are ignored
//!   by contract
//! - the local view: every field including both identities
//! - the remote view: only remote-accepted attribute fields, unset optionals
//!   omitted

pub mod list;
pub mod member;

pub use list::{List, ListPatch};
pub use member::{ListMember, MemberPatch};

/// The JSON map shape sent to and validated against the remote API
pub type RemoteView = serde_json::Map<String, serde_json::Value>;
