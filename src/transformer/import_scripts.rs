//! Removal of `importScripts()` from background scripts
//!
//! Firefox loads every background script listed in the manifest itself, so
//! the service-worker style `importScripts(...)` calls have to go.

use crate::models::WarningSink;
use crate::utils::helpers::{read_text_file, resolve_in_root, write_text_file};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref IMPORT_SCRIPTS_CALL: Regex = Regex::new(r"(?s)importScripts\s*\(.*?\)\s*;?").unwrap();
    static ref IMPORT_SCRIPTS_RESIDUE: Regex = Regex::new(r"importScripts\s*\(").unwrap();
}

pub struct ImportScriptsStripper;

impl ImportScriptsStripper {
    /// Strip the calls from every listed script that exists under `root`.
    ///
    /// Returns the scripts that were rewritten. Missing files are skipped:
    /// they may be remote or simply absent from the package. Paths leading
    /// outside `root` are never opened.
    pub fn strip(scripts: &[String], root: &Path, sink: &mut dyn WarningSink) -> Vec<PathBuf> {
        let mut modified = Vec::new();

        for script in scripts {
            let relative = PathBuf::from(script.trim_start_matches('/'));
            let Some(path) = resolve_in_root(root, &relative) else {
                sink.warn(&format!(
                    "Background script {} points outside the extension, skipped.",
                    script
                ));
                continue;
            };
            if !path.is_file() {
                tracing::debug!("Background script {} not found, skipping", script);
                continue;
            }

            let Some(content) = read_text_file(&path, sink) else {
                continue;
            };

            let cleaned = Self::strip_source(&content);
            if cleaned != content && write_text_file(&path, &cleaned, sink) {
                tracing::info!("Patched importScripts() out of {}", script);
                modified.push(relative);
            }

            if IMPORT_SCRIPTS_RESIDUE.is_match(&cleaned) {
                sink.warn(&format!(
                    "importScripts() still present in {} after patch, manual check recommended.",
                    script
                ));
            }
        }

        modified
    }

    pub fn strip_source(source: &str) -> String {
        IMPORT_SCRIPTS_CALL.replace_all(source, "").into_owned()
    }
}
