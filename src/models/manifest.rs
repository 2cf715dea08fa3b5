//! Manifest document model
//!
//! Manifests are kept as raw JSON objects rather than typed structs: unknown
//! keys must survive conversion untouched and in their original order.

use serde_json::{Map, Value};
use std::fmt;

/// An order-preserving `manifest.json` object.
pub type ManifestDocument = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ManifestVersion {
    V2,
    V3,
}

impl ManifestVersion {
    /// Read an explicit `manifest_version` value. Only `2` and `3` are valid.
    pub fn from_value(value: &Value) -> Option<Self> {
        let number = value
            .as_u64()
            .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as u64))?;
        match number {
            2 => Some(Self::V2),
            3 => Some(Self::V3),
            _ => None,
        }
    }

    /// Guess the dialect of a manifest that has no usable `manifest_version`.
    pub fn infer(manifest: &ManifestDocument) -> Self {
        if could_be_v3(manifest) {
            Self::V3
        } else {
            Self::V2
        }
    }

    pub fn as_u64(self) -> u64 {
        match self {
            Self::V2 => 2,
            Self::V3 => 3,
        }
    }
}

impl fmt::Display for ManifestVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MV{}", self.as_u64())
    }
}

fn could_be_v3(manifest: &ManifestDocument) -> bool {
    if manifest.contains_key("host_permissions") || manifest.contains_key("action") {
        return true;
    }

    let has_service_worker = manifest
        .get("background")
        .and_then(|b| b.get("service_worker"))
        .is_some_and(|sw| !sw.is_null());
    if has_service_worker {
        return true;
    }

    let v3_resources = manifest
        .get("web_accessible_resources")
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
        .and_then(Value::as_object)
        .is_some_and(|entry| entry.contains_key("resources"));
    if v3_resources {
        return true;
    }

    manifest
        .get("content_security_policy")
        .is_some_and(Value::is_object)
}

/// Render a JSON value the way it should appear inside a plain string field:
/// strings unquoted, everything else as JSON text.
pub(crate) fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
