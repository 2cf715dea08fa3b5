//! Manifest transformation for Firefox compatibility

use crate::models::{ConversionOptions, ManifestDocument, ManifestVersion, Result, WarningSink};
use crate::parser::manifest::{read_manifest, write_manifest};
use crate::transformer::csp::CspPatcher;
use crate::transformer::import_scripts::ImportScriptsStripper;
use crate::transformer::rules;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// Result of rewriting a manifest document
#[derive(Debug, Clone)]
pub struct TransformedManifest {
    pub manifest: ManifestDocument,
    pub version: ManifestVersion,
    /// Scripts listed under the rewritten `background.scripts`.
    pub background_scripts: Vec<String>,
}

pub struct ManifestTransformer {
    gecko_id: String,
}

impl ManifestTransformer {
    pub fn new(options: &ConversionOptions) -> Self {
        Self {
            gecko_id: options.gecko_id.clone(),
        }
    }

    /// Rewrite a parsed manifest. Pure: no files are touched.
    pub fn transform(&self, source: &ManifestDocument) -> TransformedManifest {
        let mut manifest = source.clone();

        // 1. Settle the manifest dialect
        let version = resolve_version(&mut manifest);

        // 2. Permissions Firefox needs to behave like Chrome's defaults
        inject_permissions(&mut manifest, version);

        // 3. Field rules, in source order
        let mut result = ManifestDocument::new();
        for (key, value) in &manifest {
            if let Some(new_value) = rules::apply(key, value, &manifest) {
                result.insert(key.clone(), new_value);
            }
        }

        // 4. side_panel -> sidebar_action
        if let Some(Value::Object(side_panel)) = manifest.get("side_panel") {
            result.insert(
                "sidebar_action".to_string(),
                rules::sidebar_action(side_panel, &manifest),
            );
        }

        // 5. Firefox add-on id
        if !result.contains_key("browser_specific_settings") {
            result.insert(
                "browser_specific_settings".to_string(),
                json!({ "gecko": { "id": self.gecko_id } }),
            );
        }

        // 6. CSP last, on the finished document
        CspPatcher::patch(&mut result);

        let background_scripts = result
            .get("background")
            .map(rules::background_scripts)
            .unwrap_or_default();

        TransformedManifest {
            manifest: result,
            version,
            background_scripts,
        }
    }

    /// Rewrite `manifest.json` in place and strip `importScripts()` from the
    /// background scripts it names.
    ///
    /// Returns the transformed manifest and the background scripts that were
    /// rewritten, relative to `root`.
    pub fn convert_file(
        &self,
        manifest_path: &Path,
        root: &Path,
        sink: &mut dyn WarningSink,
    ) -> Result<(TransformedManifest, Vec<PathBuf>)> {
        let source = read_manifest(manifest_path)?;
        let transformed = self.transform(&source);

        write_manifest(manifest_path, &transformed.manifest)?;
        tracing::info!(
            "Rewrote {} as {}",
            manifest_path.display(),
            transformed.version
        );

        // Scripts are only touched once the manifest is safely on disk.
        let stripped = ImportScriptsStripper::strip(&transformed.background_scripts, root, sink);

        Ok((transformed, stripped))
    }
}

/// Use a valid `manifest_version` or infer one, and write it back.
pub fn resolve_version(manifest: &mut ManifestDocument) -> ManifestVersion {
    let version = manifest
        .get("manifest_version")
        .and_then(ManifestVersion::from_value)
        .unwrap_or_else(|| {
            let inferred = ManifestVersion::infer(manifest);
            tracing::debug!("No usable manifest_version, inferred {}", inferred);
            inferred
        });
    manifest.insert("manifest_version".to_string(), json!(version.as_u64()));
    version
}

/// Add the permissions every converted extension relies on. Safe to repeat.
pub fn inject_permissions(manifest: &mut ManifestDocument, version: ManifestVersion) {
    match version {
        ManifestVersion::V3 => {
            ensure_entries(manifest, "permissions", &["activeTab"]);
            ensure_entries(manifest, "host_permissions", &["<all_urls>"]);
        }
        ManifestVersion::V2 => {
            ensure_entries(manifest, "permissions", &["activeTab", "<all_urls>"]);
        }
    }
}

fn ensure_entries(manifest: &mut ManifestDocument, key: &str, entries: &[&str]) {
    match manifest.get_mut(key) {
        Some(Value::Array(existing)) => {
            for entry in entries {
                if !existing.iter().any(|e| e.as_str() == Some(*entry)) {
                    existing.push(json!(entry));
                }
            }
        }
        _ => {
            manifest.insert(key.to_string(), json!(entries));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    fn doc(value: Value) -> ManifestDocument {
        value.as_object().cloned().unwrap()
    }

    fn transform(value: Value) -> ManifestDocument {
        ManifestTransformer::new(&ConversionOptions::default())
            .transform(&doc(value))
            .manifest
    }

    #[test_case(json!({ "host_permissions": [] }), ManifestVersion::V3 ; "host permissions")]
    #[test_case(json!({ "background": { "service_worker": "sw.js" } }), ManifestVersion::V3 ; "service worker")]
    #[test_case(json!({ "action": {} }), ManifestVersion::V3 ; "action")]
    #[test_case(json!({ "web_accessible_resources": [{ "resources": ["a.png"] }] }), ManifestVersion::V3 ; "v3 resources")]
    #[test_case(json!({ "content_security_policy": {} }), ManifestVersion::V3 ; "csp object")]
    #[test_case(json!({ "manifest_version": 7, "browser_action": {} }), ManifestVersion::V2 ; "invalid version")]
    #[test_case(json!({ "manifest_version": 2, "action": {} }), ManifestVersion::V2 ; "explicit wins")]
    #[test_case(json!({ "name": "x" }), ManifestVersion::V2 ; "nothing")]
    fn test_resolve_version(value: Value, expected: ManifestVersion) {
        let mut manifest = doc(value);
        assert_eq!(resolve_version(&mut manifest), expected);
        assert_eq!(manifest["manifest_version"], json!(expected.as_u64()));
    }

    #[test]
    fn test_v3_permissions_created() {
        let result = transform(json!({ "manifest_version": 3, "name": "x" }));
        assert_eq!(result["permissions"], json!(["activeTab"]));
        assert_eq!(result["host_permissions"], json!(["<all_urls>"]));
    }

    #[test]
    fn test_v2_permissions_appended() {
        let result = transform(json!({ "manifest_version": 2, "permissions": ["tabs"] }));
        assert_eq!(result["permissions"], json!(["tabs", "activeTab", "<all_urls>"]));
        assert!(!result.contains_key("host_permissions"));
    }

    #[test]
    fn test_inject_permissions_idempotent() {
        let mut manifest = doc(json!({ "permissions": ["tabs", "activeTab"] }));
        inject_permissions(&mut manifest, ManifestVersion::V2);
        inject_permissions(&mut manifest, ManifestVersion::V2);
        assert_eq!(manifest["permissions"], json!(["tabs", "activeTab", "<all_urls>"]));
    }

    #[test]
    fn test_side_panel_permission_removed_after_injection() {
        let result = transform(json!({
            "manifest_version": 3,
            "permissions": ["sidePanel", "storage"]
        }));
        assert_eq!(result["permissions"], json!(["storage", "activeTab"]));
    }

    #[test]
    fn test_output_keeps_source_order() {
        let result = transform(json!({
            "name": "Ordered",
            "version": "1.0",
            "manifest_version": 3,
            "update_url": "https://clients2.google.com/service/update2/crx",
            "author": "someone",
            "permissions": ["tabs"]
        }));
        let keys: Vec<_> = result.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "name",
                "version",
                "manifest_version",
                "author",
                "permissions",
                "host_permissions",
                "browser_specific_settings",
                "content_security_policy",
            ]
        );
    }

    #[test]
    fn test_sidebar_action_synthesized() {
        let result = transform(json!({
            "manifest_version": 3,
            "name": "Notes",
            "side_panel": { "default_path": "panel.html" }
        }));
        assert!(!result.contains_key("side_panel"));
        assert_eq!(
            result["sidebar_action"],
            json!({ "default_panel": "panel.html", "default_title": "Notes" })
        );
    }

    #[test]
    fn test_existing_browser_specific_settings_kept() {
        let settings = json!({ "gecko": { "id": "mine@example.com" } });
        let result = transform(json!({
            "manifest_version": 2,
            "browser_specific_settings": settings.clone()
        }));
        assert_eq!(result["browser_specific_settings"], settings);
    }

    #[test]
    fn test_custom_gecko_id() {
        let options = ConversionOptions {
            gecko_id: "custom@example.org".to_string(),
            ..ConversionOptions::default()
        };
        let result = ManifestTransformer::new(&options).transform(&doc(json!({ "name": "x" })));
        assert_eq!(
            result.manifest["browser_specific_settings"],
            json!({ "gecko": { "id": "custom@example.org" } })
        );
    }

    #[test]
    fn test_background_scripts_reported() {
        let transformed = ManifestTransformer::new(&ConversionOptions::default()).transform(&doc(json!({
            "background": { "service_worker": "sw.js", "type": "module" }
        })));
        assert_eq!(transformed.version, ManifestVersion::V3);
        assert_eq!(transformed.background_scripts, vec!["sw.js".to_string()]);
        assert_eq!(transformed.manifest["background"], json!({ "scripts": ["sw.js"] }));
    }

    #[test]
    fn test_source_document_untouched() {
        let source = doc(json!({ "content_scripts": [{ "js": ["a.js"] }] }));
        let before = source.clone();
        ManifestTransformer::new(&ConversionOptions::default()).transform(&source);
        assert_eq!(source, before);
    }

    #[test]
    fn test_failed_manifest_write_leaves_scripts_alone() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let root = temp_dir.path();
        let manifest_path = root.join("manifest.json");
        std::fs::write(
            &manifest_path,
            r#"{ "manifest_version": 2, "background": { "scripts": ["bg.js"] } }"#,
        )
        .unwrap();
        std::fs::write(root.join("bg.js"), "importScripts('a.js');\nrun();").unwrap();

        let mut permissions = std::fs::metadata(&manifest_path).unwrap().permissions();
        permissions.set_readonly(true);
        std::fs::set_permissions(&manifest_path, permissions).unwrap();
        if std::fs::OpenOptions::new().write(true).open(&manifest_path).is_ok() {
            // Privileged users can write read-only files.
            return;
        }

        let mut warnings: Vec<String> = Vec::new();
        let result = ManifestTransformer::new(&ConversionOptions::default()).convert_file(
            &manifest_path,
            root,
            &mut warnings,
        );

        assert!(result.is_err());
        assert_eq!(
            std::fs::read_to_string(root.join("bg.js")).unwrap(),
            "importScripts('a.js');\nrun();"
        );
    }
}
