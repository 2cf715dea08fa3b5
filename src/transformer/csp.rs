//! Content-Security-Policy normalization
//!
//! Firefox needs `'unsafe-eval'` to keep most converted extensions working,
//! and rejects `wasm-unsafe-eval` in the policy grammar it accepts here.

use crate::models::manifest::value_to_text;
use crate::models::ManifestDocument;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Value};

/// Policy injected when the manifest declares none.
pub const DEFAULT_EXTENSION_PAGES_CSP: &str =
    "script-src 'self' 'unsafe-eval'; object-src 'self'; style-src 'self' 'unsafe-inline'";

lazy_static! {
    static ref WASM_UNSAFE_EVAL: Regex = Regex::new(r"(?i)'?wasm-unsafe-eval'?\s*").unwrap();
    static ref QUOTED_UNSAFE_EVAL: Regex = Regex::new(r"(?i)'+unsafe-eval'+").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

pub struct CspPatcher;

impl CspPatcher {
    /// Rewrite `content_security_policy` in place into the
    /// `{ "extension_pages": ... }` form.
    pub fn patch(manifest: &mut ManifestDocument) {
        let policy = match manifest.get("content_security_policy") {
            None => DEFAULT_EXTENSION_PAGES_CSP.to_string(),
            Some(Value::String(policy)) => Self::normalize(policy),
            Some(Value::Object(policy)) => {
                let pages = policy
                    .get("extension_pages")
                    .filter(|p| !p.is_null())
                    .map(value_to_text)
                    .unwrap_or_default();
                Self::normalize(&pages)
            }
            Some(_) => Self::normalize(""),
        };

        manifest.insert(
            "content_security_policy".to_string(),
            json!({ "extension_pages": policy }),
        );
    }

    /// Normalize a single policy string.
    pub fn normalize(policy: &str) -> String {
        let policy = WASM_UNSAFE_EVAL.replace_all(policy, "");
        let mut policy = QUOTED_UNSAFE_EVAL
            .replace_all(&policy, "'unsafe-eval'")
            .into_owned();

        if !policy.contains("'unsafe-eval'") {
            policy.push_str(" 'unsafe-eval'");
        }

        let policy = WHITESPACE.replace_all(&policy, " ");
        policy
            .trim()
            .trim_end_matches(|c: char| c == ';' || c.is_whitespace())
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn patched(csp: Option<Value>) -> Value {
        let mut manifest = ManifestDocument::new();
        if let Some(csp) = csp {
            manifest.insert("content_security_policy".to_string(), csp);
        }
        CspPatcher::patch(&mut manifest);
        manifest["content_security_policy"].clone()
    }

    #[test_case("script-src 'self' 'wasm-unsafe-eval'", "script-src 'self' 'unsafe-eval'" ; "strips wasm token")]
    #[test_case("script-src 'self' WASM-UNSAFE-EVAL; object-src 'self'", "script-src 'self' ; object-src 'self' 'unsafe-eval'" ; "strips unquoted wasm token")]
    #[test_case("script-src 'self' ''unsafe-eval'''", "script-src 'self' 'unsafe-eval'" ; "collapses doubled quotes")]
    #[test_case("script-src 'self' 'UNSAFE-EVAL'", "script-src 'self' 'unsafe-eval'" ; "lowercases quoted token")]
    #[test_case("script-src   'self';\n   object-src 'self'", "script-src 'self'; object-src 'self' 'unsafe-eval'" ; "collapses whitespace")]
    #[test_case("script-src 'self' 'unsafe-eval'; ;", "script-src 'self' 'unsafe-eval'" ; "strips trailing separators")]
    #[test_case("", "'unsafe-eval'" ; "empty policy")]
    fn test_normalize(input: &str, expected: &str) {
        assert_eq!(CspPatcher::normalize(input), expected);
    }

    #[test]
    fn test_default_policy_injected() {
        assert_eq!(
            patched(None),
            json!({ "extension_pages": DEFAULT_EXTENSION_PAGES_CSP })
        );
    }

    #[test]
    fn test_object_form_keeps_only_extension_pages() {
        let csp = json!({
            "extension_pages": "script-src 'self' 'wasm-unsafe-eval'; object-src 'self'",
            "sandbox": "sandbox allow-scripts"
        });
        assert_eq!(
            patched(Some(csp)),
            json!({ "extension_pages": "script-src 'self' ; object-src 'self' 'unsafe-eval'" })
        );
    }

    #[test]
    fn test_object_without_extension_pages() {
        let csp = json!({ "sandbox": "sandbox allow-scripts" });
        assert_eq!(patched(Some(csp)), json!({ "extension_pages": "'unsafe-eval'" }));
    }

    #[test]
    fn test_idempotent() {
        for input in [
            None,
            Some(json!("script-src 'self' 'wasm-unsafe-eval'; object-src 'self';")),
            Some(json!({ "extension_pages": "default-src 'self' ; ;" })),
            Some(json!(42)),
        ] {
            let once = patched(input);
            let twice = patched(Some(once.clone()));
            assert_eq!(once, twice);
        }
    }
}
