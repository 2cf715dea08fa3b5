//! Helper utility functions

use crate::models::WarningSink;
use anyhow::{bail, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

pub const CHROME_WEB_STORE_PREFIX: &str = "https://chromewebstore.google.com/detail/";

/// Check a file's extension against a lowercase list, case-insensitively
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| extensions.contains(&e.as_str()))
}

/// Join a manifest-relative path onto `root`. `None` when the path is
/// absolute or climbs out of `root` through `..`.
pub fn resolve_in_root(root: &Path, relative: &Path) -> Option<PathBuf> {
    let escapes = relative.components().any(|c| {
        matches!(c, Component::ParentDir | Component::Prefix(_) | Component::RootDir)
    });
    if escapes {
        return None;
    }
    Some(root.join(relative))
}

/// Read a text file, reporting failures as warnings instead of errors.
pub fn read_text_file(path: &Path, sink: &mut dyn WarningSink) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            sink.warn(&format!("Could not read {}: {}", path.display(), e));
            None
        }
    }
}

/// Write a text file, reporting failures as warnings. Returns whether the
/// write went through.
pub fn write_text_file(path: &Path, content: &str, sink: &mut dyn WarningSink) -> bool {
    match fs::write(path, content) {
        Ok(()) => true,
        Err(e) => {
            sink.warn(&format!("Could not write {}: {}", path.display(), e));
            false
        }
    }
}

/// Make an extension name usable as a folder name on any platform
pub fn safe_folder_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = replaced.trim();
    if trimmed.is_empty() {
        "extension".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Extract the extension id from a Chrome Web Store listing URL
pub fn extension_id_from_store_url(url: &str) -> Result<String> {
    let url = url.trim();
    if !url.starts_with(CHROME_WEB_STORE_PREFIX) {
        bail!("Invalid URL format, expected {}<name>/<id>", CHROME_WEB_STORE_PREFIX);
    }

    match url.trim_end_matches('/').rsplit('/').next() {
        Some(id) if !id.is_empty() && url.len() > CHROME_WEB_STORE_PREFIX.len() => Ok(id.to_string()),
        _ => bail!("No extension id found in {}", url),
    }
}

/// Update-service URL a fetcher downloads the CRX package from
pub fn crx_download_url(extension_id: &str) -> String {
    format!(
        "https://clients2.google.com/service/update2/crx?response=redirect&prodversion=133.0&acceptformat=crx2,crx3&x=id={}%26uc",
        extension_id
    )
}
