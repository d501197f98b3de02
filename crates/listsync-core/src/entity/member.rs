//! The ListMember entity and its rule table

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::RemoteView;
use super::list::{insert_bool, insert_str, insert_value};
use crate::validate::{Kind, Rule};

/// Language codes the remote API accepts for a member
const LANGUAGES: &[&str] = &[
    "en", "ar", "af", "be", "bg", "ca", "zh", "hr", "cs", "da", "nl", "et", "fa", "fi", "fr",
    "fr_CA", "de", "el", "he", "hi", "hu", "is", "id", "ga", "it", "ja", "km", "ko", "lv", "lt",
    "mt", "ms", "mk", "no", "pl", "pt", "pt_PT", "ro", "ru", "sr", "sk", "sl", "es", "es_ES",
    "sw", "sv", "ta", "th", "tr", "uk", "vi",
];

/// Subscription statuses the remote API accepts
const STATUSES: &[&str] = &["subscribed", "unsubscribed", "cleaned", "pending"];

/// A subscriber belonging to exactly one [`super::List`]
///
/// `list_id` references the owning list's local identity; a member cannot
/// exist without a valid list. `remote_member_id` follows the same lifecycle
/// as the list's remote identity: `None` until the remote create succeeded.
#[derive(Debug, Clone, Serialize)]
pub struct ListMember {
    pub member_id: Option<Uuid>,
    pub remote_member_id: Option<String>,
    pub list_id: Uuid,
    pub email_address: Option<String>,
    pub email_type: Option<String>,
    pub status: Option<String>,
    pub merge_fields: Option<Value>,
    pub interests: Option<Value>,
    pub language: Option<String>,
    pub vip: Option<bool>,
    pub location: Option<Value>,
    pub marketing_permissions: Option<Value>,
    pub ip_signup: Option<String>,
    pub ip_opt: Option<String>,
    pub tags: Option<Value>,
}

/// Partial member attributes decoded from a request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberPatch {
    pub email_address: Option<String>,
    pub email_type: Option<String>,
    pub status: Option<String>,
    pub merge_fields: Option<Value>,
    pub interests: Option<Value>,
    pub language: Option<String>,
    pub vip: Option<bool>,
    pub location: Option<Value>,
    pub marketing_permissions: Option<Value>,
    pub ip_signup: Option<String>,
    pub ip_opt: Option<String>,
    pub tags: Option<Value>,
}

impl ListMember {
    /// Build a new, unsaved member owned by the given list
    pub fn new(list_id: Uuid, patch: MemberPatch) -> Self {
        let mut member = Self {
            member_id: None,
            remote_member_id: None,
            list_id,
            email_address: None,
            email_type: None,
            status: None,
            merge_fields: None,
            interests: None,
            language: None,
            vip: None,
            location: None,
            marketing_permissions: None,
            ip_signup: None,
            ip_opt: None,
            tags: None,
        };
        member.fill(patch);
        member
    }

    /// Apply a partial update: only fields present in the patch change
    pub fn fill(&mut self, patch: MemberPatch) {
        let MemberPatch {
            email_address,
            email_type,
            status,
            merge_fields,
            interests,
            language,
            vip,
            location,
            marketing_permissions,
            ip_signup,
            ip_opt,
            tags,
        } = patch;

        if email_address.is_some() {
            self.email_address = email_address;
        }
        if email_type.is_some() {
            self.email_type = email_type;
        }
        if status.is_some() {
            self.status = status;
        }
        if merge_fields.is_some() {
            self.merge_fields = merge_fields;
        }
        if interests.is_some() {
            self.interests = interests;
        }
        if language.is_some() {
            self.language = language;
        }
        if vip.is_some() {
            self.vip = vip;
        }
        if location.is_some() {
            self.location = location;
        }
        if marketing_permissions.is_some() {
            self.marketing_permissions = marketing_permissions;
        }
        if ip_signup.is_some() {
            self.ip_signup = ip_signup;
        }
        if ip_opt.is_some() {
            self.ip_opt = ip_opt;
        }
        if tags.is_some() {
            self.tags = tags;
        }
    }

    /// All fields including identities and the list back-reference, as JSON
    pub fn local_view(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Remote-API-accepted fields only
    pub fn remote_view(&self) -> RemoteView {
        let mut view = RemoteView::new();
        insert_str(&mut view, "email_address", &self.email_address);
        insert_str(&mut view, "email_type", &self.email_type);
        insert_str(&mut view, "status", &self.status);
        insert_value(&mut view, "merge_fields", &self.merge_fields);
        insert_value(&mut view, "interests", &self.interests);
        insert_str(&mut view, "language", &self.language);
        insert_bool(&mut view, "vip", &self.vip);
        insert_value(&mut view, "location", &self.location);
        insert_value(&mut view, "marketing_permissions", &self.marketing_permissions);
        insert_str(&mut view, "ip_signup", &self.ip_signup);
        insert_str(&mut view, "ip_opt", &self.ip_opt);
        insert_value(&mut view, "tags", &self.tags);
        view
    }
}

/// Validation rule table for list members
pub fn rules() -> &'static [Rule] {
    const RULES: &[Rule] = &[
        Rule { path: "email_address", required: true, kinds: &[Kind::Str] },
        Rule { path: "email_type", required: false, kinds: &[Kind::OneOf(&["email", "text"])] },
        Rule { path: "status", required: true, kinds: &[Kind::Str, Kind::OneOf(STATUSES)] },
        Rule { path: "merge_fields", required: false, kinds: &[Kind::Array] },
        // Interest map keys are the remote API's interest ids
        Rule { path: "interests", required: false, kinds: &[Kind::Array] },
        Rule { path: "language", required: false, kinds: &[Kind::OneOf(LANGUAGES)] },
        Rule { path: "vip", required: false, kinds: &[Kind::Boolean] },
        Rule { path: "location", required: false, kinds: &[Kind::Array] },
        Rule { path: "location.longitude", required: false, kinds: &[Kind::Numeric] },
        Rule { path: "location.latitude", required: false, kinds: &[Kind::Numeric] },
        Rule { path: "marketing_permissions", required: false, kinds: &[Kind::Array] },
        Rule {
            path: "marketing_permissions.*.marketing_permission_id",
            required: false,
            kinds: &[Kind::Str],
        },
        Rule { path: "marketing_permissions.*.enabled", required: false, kinds: &[Kind::Boolean] },
        Rule { path: "ip_signup", required: false, kinds: &[Kind::Ip] },
        Rule { path: "ip_opt", required: false, kinds: &[Kind::Ip] },
        Rule { path: "tags", required: false, kinds: &[Kind::Array] },
    ];
    RULES
}
