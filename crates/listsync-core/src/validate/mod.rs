//! Declarative validation gate
//!
//! Validation runs against an entity's remote view (the JSON map that would
//! be sent to the remote API) using a fixed per-entity rule table. It is
//! pure: no storage, no network, no side effects. The result is a mapping
//! from field path to human-readable messages; an empty mapping means the
//! payload passed.
//!
//! Rule tables live next to the entities (`entity::list::rules()`,
//! `entity::member::rules()`).

use std::collections::BTreeMap;
use std::net::IpAddr;

use serde::Serialize;
use serde_json::{Map, Value};

/// A single field rule
///
/// `path` is a dot-separated field path. A `*` segment matches every element
/// of an array; violations are reported with the concrete index
/// (`marketing_permissions.0.enabled`).
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Dot-separated field path
    pub path: &'static str,
    /// Whether the field must be present and non-null
    pub required: bool,
    /// Checks applied when a value is present
    pub kinds: &'static [Kind],
}

/// Value checks a rule can require
#[derive(Debug, Clone, Copy)]
pub enum Kind {
    /// Must be a JSON string
    Str,
    /// Must be a JSON boolean
    Boolean,
    /// Must be a JSON array or object (the source treats both as "array")
    Array,
    /// Must be a number, or a string parsing as one
    Numeric,
    /// Must be a string shaped like an email address
    Email,
    /// Must be a string parsing as an IPv4/IPv6 address
    Ip,
    /// Must be a string drawn from a fixed value set
    OneOf(&'static [&'static str]),
}

/// Violation set keyed by field path
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Violations(BTreeMap<String, Vec<String>>);

impl Violations {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Messages recorded for a field path, if any
    pub fn get(&self, path: &str) -> Option<&[String]> {
        self.0.get(path).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    fn add(&mut self, path: impl Into<String>, message: String) {
        self.0.entry(path.into()).or_default().push(message);
    }
}

/// Check a remote-view map against a rule table
pub fn check(view: &Map<String, Value>, rules: &[Rule]) -> Violations {
    let mut violations = Violations::default();
    let root = Value::Object(view.clone());

    for rule in rules {
        let segments: Vec<&str> = rule.path.split('.').collect();
        let matches = resolve(&root, &segments, String::new());

        if rule.required {
            let present = matches.iter().any(|(_, value)| is_present(value));
            if !present {
                violations.add(rule.path, format!("The {} field is required.", rule.path));
                continue;
            }
        }

        for (concrete_path, value) in &matches {
            if value.is_null() {
                continue;
            }
            for kind in rule.kinds {
                if let Some(message) = check_kind(kind, value, concrete_path) {
                    violations.add(concrete_path.clone(), message);
                }
            }
        }
    }

    violations
}

/// Resolve a dot path against a JSON value, expanding `*` over array indexes
///
/// Missing intermediate fields resolve to no matches; the required check is
/// the only place that distinguishes "absent" from "present".
fn resolve<'a>(value: &'a Value, segments: &[&str], prefix: String) -> Vec<(String, &'a Value)> {
    let Some((head, rest)) = segments.split_first() else {
        return vec![(prefix, value)];
    };

    match *head {
        "*" => match value {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .flat_map(|(index, item)| {
                    resolve(item, rest, join_path(&prefix, &index.to_string()))
                })
                .collect(),
            _ => Vec::new(),
        },
        key => match value.get(key) {
            Some(child) => resolve(child, rest, join_path(&prefix, key)),
            None => Vec::new(),
        },
    }
}

/// A required field must be non-null and non-empty; `""` and `[]` count as
/// absent.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}.{segment}")
    }
}

fn check_kind(kind: &Kind, value: &Value, path: &str) -> Option<String> {
    match kind {
        Kind::Str => {
            (!value.is_string()).then(|| format!("The {path} field must be a string."))
        }
        Kind::Boolean => {
            (!value.is_boolean()).then(|| format!("The {path} field must be a boolean."))
        }
        Kind::Array => (!value.is_array() && !value.is_object())
            .then(|| format!("The {path} field must be an array.")),
        Kind::Numeric => {
            let numeric = value.is_number()
                || value
                    .as_str()
                    .is_some_and(|s| s.parse::<f64>().is_ok());
            (!numeric).then(|| format!("The {path} field must be numeric."))
        }
        Kind::Email => {
            let valid = value.as_str().is_some_and(is_email);
            (!valid).then(|| format!("The {path} field must be a valid email address."))
        }
        Kind::Ip => {
            let valid = value
                .as_str()
                .is_some_and(|s| s.parse::<IpAddr>().is_ok());
            (!valid).then(|| format!("The {path} field must be a valid IP address."))
        }
        Kind::OneOf(allowed) => {
            let valid = value.as_str().is_some_and(|s| allowed.contains(&s));
            (!valid).then(|| {
                format!("The {path} field must be one of: {}.", allowed.join(", "))
            })
        }
    }
}

/// Minimal email shape check: non-empty local part, dotted non-empty domain
fn is_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn view(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test view must be an object"),
        }
    }

    const RULES: &[Rule] = &[
        Rule { path: "status", required: true, kinds: &[Kind::Str, Kind::OneOf(&["on", "off"])] },
        Rule { path: "vip", required: false, kinds: &[Kind::Boolean] },
        Rule { path: "location.longitude", required: false, kinds: &[Kind::Numeric] },
        Rule { path: "permissions.*.enabled", required: false, kinds: &[Kind::Boolean] },
        Rule { path: "ip_signup", required: false, kinds: &[Kind::Ip] },
        Rule { path: "notify", required: false, kinds: &[Kind::Email] },
    ];

    #[test]
    fn missing_required_field_is_reported_by_path() {
        let violations = check(&view(json!({})), RULES);
        assert_eq!(
            violations.get("status"),
            Some(&["The status field is required.".to_string()][..])
        );
    }

    #[test]
    fn empty_string_does_not_satisfy_a_required_rule() {
        let violations = check(&view(json!({"status": ""})), RULES);
        assert_eq!(
            violations.get("status"),
            Some(&["The status field is required.".to_string()][..])
        );
    }

    #[test]
    fn enum_violation_reports_allowed_values() {
        let violations = check(&view(json!({"status": "maybe"})), RULES);
        let messages = violations.get("status").unwrap();
        assert!(messages[0].contains("one of: on, off"));
    }

    #[test]
    fn wildcard_paths_materialize_indexes() {
        let payload = json!({
            "status": "on",
            "permissions": [{"enabled": true}, {"enabled": "yes"}],
        });
        let violations = check(&view(payload), RULES);
        assert!(violations.get("permissions.0.enabled").is_none());
        assert!(violations.get("permissions.1.enabled").is_some());
    }

    #[test]
    fn nested_numeric_and_ip_checks() {
        let payload = json!({
            "status": "on",
            "location": {"longitude": "east"},
            "ip_signup": "999.1.1.1",
        });
        let violations = check(&view(payload), RULES);
        assert!(violations.get("location.longitude").is_some());
        assert!(violations.get("ip_signup").is_some());
    }

    #[test]
    fn numeric_accepts_numbers_and_numeric_strings() {
        let payload = json!({"status": "on", "location": {"longitude": "12.5"}});
        assert!(check(&view(payload), RULES).is_empty());

        let payload = json!({"status": "on", "location": {"longitude": 12.5}});
        assert!(check(&view(payload), RULES).is_empty());
    }

    #[test]
    fn email_shape() {
        assert!(is_email("notify@example.com"));
        assert!(!is_email("notify"));
        assert!(!is_email("notify@"));
        assert!(!is_email("notify@nodot"));
    }

    #[test]
    fn null_values_satisfy_nullable_rules() {
        let payload = json!({"status": "on", "vip": null});
        assert!(check(&view(payload), RULES).is_empty());
    }
}
