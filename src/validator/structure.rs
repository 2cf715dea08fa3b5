//! Structural validation of a rewritten manifest
//!
//! Problems found here are advisory: Firefox may still load the extension,
//! so they are surfaced as warnings rather than failing the conversion.

use crate::models::ManifestDocument;
use serde_json::Value;

/// Fields Firefox refuses to load an extension without.
const REQUIRED_FIELDS: [&str; 2] = ["name", "version"];

pub fn validate_manifest(manifest: &ManifestDocument) -> Vec<String> {
    let mut issues = Vec::new();

    for field in REQUIRED_FIELDS {
        match manifest.get(field) {
            None | Some(Value::Null) => {
                issues.push(format!("Manifest {} is required by Firefox but missing", field));
            }
            Some(Value::String(s)) if s.trim().is_empty() => {
                issues.push(format!("Manifest {} is empty", field));
            }
            _ => {}
        }
    }

    issues
}
