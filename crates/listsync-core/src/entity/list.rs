//! The List entity and its rule table

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::RemoteView;
use crate::validate::{Kind, Rule};

/// A subscriber list mirrored between the local store and the remote API
///
/// `list_id` is assigned by the store at first save and never reassigned.
/// `remote_list_id` stays `None` until the remote create call has succeeded;
/// once set it is never cleared while the record exists.
#[derive(Debug, Clone, Serialize)]
pub struct List {
    pub list_id: Option<Uuid>,
    pub remote_list_id: Option<String>,
    pub name: Option<String>,
    pub permission_reminder: Option<String>,
    pub email_type_option: Option<bool>,
    pub contact: Option<Value>,
    pub campaign_defaults: Option<Value>,
    pub visibility: Option<String>,
    pub use_archive_bar: Option<bool>,
    pub notify_on_subscribe: Option<String>,
    pub notify_on_unsubscribe: Option<String>,
}

/// Partial list attributes decoded from a request body
///
/// All fields are independently settable; serde ignores unknown keys, so
/// unrecognized request fields are dropped rather than rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPatch {
    pub name: Option<String>,
    pub permission_reminder: Option<String>,
    pub email_type_option: Option<bool>,
    pub contact: Option<Value>,
    pub campaign_defaults: Option<Value>,
    pub visibility: Option<String>,
    pub use_archive_bar: Option<bool>,
    pub notify_on_subscribe: Option<String>,
    pub notify_on_unsubscribe: Option<String>,
}

impl List {
    /// Build a new, unsaved list from request attributes
    pub fn from_patch(patch: ListPatch) -> Self {
        let mut list = Self {
            list_id: None,
            remote_list_id: None,
            name: None,
            permission_reminder: None,
            email_type_option: None,
            contact: None,
            campaign_defaults: None,
            visibility: None,
            use_archive_bar: None,
            notify_on_subscribe: None,
            notify_on_unsubscribe: None,
        };
        list.fill(patch);
        list
    }

    /// Apply a partial update: only fields present in the patch change
    pub fn fill(&mut self, patch: ListPatch) {
        let ListPatch {
            name,
            permission_reminder,
            email_type_option,
            contact,
            campaign_defaults,
            visibility,
            use_archive_bar,
            notify_on_subscribe,
            notify_on_unsubscribe,
        } = patch;

        if name.is_some() {
            self.name = name;
        }
        if permission_reminder.is_some() {
            self.permission_reminder = permission_reminder;
        }
        if email_type_option.is_some() {
            self.email_type_option = email_type_option;
        }
        if contact.is_some() {
            self.contact = contact;
        }
        if campaign_defaults.is_some() {
            self.campaign_defaults = campaign_defaults;
        }
        if visibility.is_some() {
            self.visibility = visibility;
        }
        if use_archive_bar.is_some() {
            self.use_archive_bar = use_archive_bar;
        }
        if notify_on_subscribe.is_some() {
            self.notify_on_subscribe = notify_on_subscribe;
        }
        if notify_on_unsubscribe.is_some() {
            self.notify_on_unsubscribe = notify_on_unsubscribe;
        }
    }

    /// All fields including both identities, as JSON
    pub fn local_view(&self) -> Value {
        // Serialize cannot fail for this shape
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Remote-API-accepted fields only; identities and unset optionals omitted
    pub fn remote_view(&self) -> RemoteView {
        let mut view = RemoteView::new();
        insert_str(&mut view, "name", &self.name);
        insert_str(&mut view, "permission_reminder", &self.permission_reminder);
        insert_bool(&mut view, "email_type_option", &self.email_type_option);
        insert_value(&mut view, "contact", &self.contact);
        insert_value(&mut view, "campaign_defaults", &self.campaign_defaults);
        insert_str(&mut view, "visibility", &self.visibility);
        insert_bool(&mut view, "use_archive_bar", &self.use_archive_bar);
        insert_str(&mut view, "notify_on_subscribe", &self.notify_on_subscribe);
        insert_str(&mut view, "notify_on_unsubscribe", &self.notify_on_unsubscribe);
        view
    }
}

pub(crate) fn insert_str(view: &mut RemoteView, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        view.insert(key.to_string(), Value::String(value.clone()));
    }
}

pub(crate) fn insert_bool(view: &mut RemoteView, key: &str, value: &Option<bool>) {
    if let Some(value) = value {
        view.insert(key.to_string(), Value::Bool(*value));
    }
}

pub(crate) fn insert_value(view: &mut RemoteView, key: &str, value: &Option<Value>) {
    if let Some(value) = value {
        view.insert(key.to_string(), value.clone());
    }
}

/// Validation rule table for lists
pub fn rules() -> &'static [Rule] {
    const RULES: &[Rule] = &[
        Rule { path: "name", required: true, kinds: &[Kind::Str] },
        Rule { path: "permission_reminder", required: true, kinds: &[Kind::Str] },
        Rule { path: "email_type_option", required: true, kinds: &[Kind::Boolean] },
        Rule { path: "contact", required: true, kinds: &[Kind::Array] },
        Rule { path: "contact.company", required: true, kinds: &[Kind::Str] },
        Rule { path: "contact.address1", required: true, kinds: &[Kind::Str] },
        Rule { path: "contact.address2", required: false, kinds: &[Kind::Str] },
        Rule { path: "contact.city", required: true, kinds: &[Kind::Str] },
        Rule { path: "contact.state", required: true, kinds: &[Kind::Str] },
        Rule { path: "contact.zip", required: true, kinds: &[Kind::Str] },
        Rule { path: "contact.country", required: true, kinds: &[Kind::Str] },
        Rule { path: "contact.phone", required: false, kinds: &[Kind::Str] },
        Rule { path: "campaign_defaults", required: true, kinds: &[Kind::Array] },
        Rule { path: "campaign_defaults.from_name", required: true, kinds: &[Kind::Str] },
        Rule { path: "campaign_defaults.from_email", required: true, kinds: &[Kind::Str] },
        Rule { path: "campaign_defaults.subject", required: true, kinds: &[Kind::Str] },
        Rule { path: "campaign_defaults.language", required: true, kinds: &[Kind::Str] },
        Rule { path: "visibility", required: false, kinds: &[Kind::OneOf(&["pub", "prv"])] },
        Rule { path: "use_archive_bar", required: false, kinds: &[Kind::Boolean] },
        Rule { path: "notify_on_subscribe", required: false, kinds: &[Kind::Email] },
        Rule { path: "notify_on_unsubscribe", required: false, kinds: &[Kind::Email] },
    ];
    RULES
}
