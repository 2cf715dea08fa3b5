//! Per-field manifest rewrite rules
//!
//! Each rule maps a field's source value (with the whole source manifest for
//! context) to its replacement. `None` drops the field. Fields without a rule
//! pass through unchanged.

use crate::models::manifest::value_to_text;
use crate::models::ManifestDocument;
use lazy_static::lazy_static;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

pub type FieldRule = fn(&Value, &ManifestDocument) -> Option<Value>;

lazy_static! {
    static ref FIELD_RULES: HashMap<&'static str, FieldRule> = {
        let mut rules: HashMap<&'static str, FieldRule> = HashMap::new();
        for key in DROPPED_FIELDS {
            rules.insert(key, drop_field);
        }
        rules.insert("background", background);
        rules.insert("content_scripts", content_scripts);
        rules.insert("permissions", permissions);
        rules
    };
}

/// Chrome-only fields Firefox rejects or ignores. `side_panel` is re-emitted
/// as `sidebar_action` by the manifest transformer.
const DROPPED_FIELDS: [&str; 6] = [
    "update_url",
    "minimum_chrome_version",
    "key",
    "externally_connectable",
    "storage",
    "side_panel",
];

pub fn rule_for(field: &str) -> Option<FieldRule> {
    FIELD_RULES.get(field).copied()
}

/// Apply the rule registered for `field`, or copy the value through.
pub fn apply(field: &str, value: &Value, manifest: &ManifestDocument) -> Option<Value> {
    match rule_for(field) {
        Some(rule) => rule(value, manifest),
        None => Some(value.clone()),
    }
}

fn drop_field(_value: &Value, _manifest: &ManifestDocument) -> Option<Value> {
    None
}

fn background(value: &Value, _manifest: &ManifestDocument) -> Option<Value> {
    if let Some(page) = value.get("page").filter(|p| !p.is_null()) {
        return Some(json!({ "page": page }));
    }

    let scripts = background_scripts(value);
    if scripts.is_empty() {
        None
    } else {
        Some(json!({ "scripts": scripts }))
    }
}

/// Background script files named by a `background` value: `scripts` entries
/// in order, then the service worker.
pub fn background_scripts(value: &Value) -> Vec<String> {
    let mut scripts: Vec<String> = value
        .get("scripts")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter(|s| !s.is_null())
                .map(value_to_text)
                .collect()
        })
        .unwrap_or_default();

    if let Some(worker) = value.get("service_worker").filter(|sw| !sw.is_null()) {
        scripts.push(value_to_text(worker));
    }

    scripts
}

fn content_scripts(value: &Value, _manifest: &ManifestDocument) -> Option<Value> {
    let mut value = value.clone();
    if let Some(entries) = value.as_array_mut() {
        for entry in entries.iter_mut().filter_map(Value::as_object_mut) {
            let has_matches = entry
                .get("matches")
                .and_then(Value::as_array)
                .is_some_and(|m| !m.is_empty());
            if !has_matches {
                entry.insert("matches".to_string(), json!(["<all_urls>"]));
            }
        }
    }
    Some(value)
}

fn permissions(value: &Value, _manifest: &ManifestDocument) -> Option<Value> {
    match value {
        Value::Array(perms) => Some(Value::Array(
            perms
                .iter()
                .filter(|p| !p.as_str().is_some_and(|s| s.eq_ignore_ascii_case("sidePanel")))
                .cloned()
                .collect(),
        )),
        other => Some(other.clone()),
    }
}

/// Build the Firefox `sidebar_action` equivalent of a Chrome `side_panel`.
pub fn sidebar_action(side_panel: &Map<String, Value>, manifest: &ManifestDocument) -> Value {
    let default_panel = side_panel
        .get("default_path")
        .filter(|p| !p.is_null())
        .map(value_to_text)
        .unwrap_or_else(|| "sidebar.html".to_string());
    let default_title = manifest
        .get("name")
        .filter(|n| !n.is_null())
        .map(value_to_text)
        .unwrap_or_else(|| "Sidebar".to_string());

    json!({
        "default_panel": default_panel,
        "default_title": default_title,
    })
}
