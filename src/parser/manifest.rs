//! Manifest parsing functionality

use crate::models::{ConversionError, ManifestDocument, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Name used when a manifest's `name` is explicitly `null`.
pub const UNNAMED_EXTENSION: &str = "UnnamedExtension";

/// Parse manifest text into an ordered JSON object.
///
/// Strict JSON is tried first; store manifests occasionally carry comments,
/// so JSON5 is the fallback.
pub fn parse_manifest(content: &str, path: &Path) -> Result<ManifestDocument> {
    let value: Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(strict_err) => json5::from_str(content).map_err(|_| ConversionError::ManifestParse {
            path: path.to_path_buf(),
            message: strict_err.to_string(),
        })?,
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ConversionError::ManifestNotObject(path.to_path_buf())),
    }
}

/// Read and parse `manifest.json` from disk
pub fn read_manifest(path: &Path) -> Result<ManifestDocument> {
    if !path.is_file() {
        return Err(ConversionError::ManifestNotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path).map_err(|e| ConversionError::io(path, e))?;
    let text = String::from_utf8(bytes).map_err(|e| ConversionError::ManifestParse {
        path: path.to_path_buf(),
        message: format!("not valid UTF-8: {}", e.utf8_error()),
    })?;
    // Tolerate a UTF-8 byte order mark.
    parse_manifest(text.trim_start_matches('\u{feff}'), path)
}

pub fn write_manifest(path: &Path, manifest: &ManifestDocument) -> Result<()> {
    let json = serde_json::to_string_pretty(manifest).map_err(|e| ConversionError::ManifestParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    fs::write(path, json).map_err(|e| ConversionError::io(path, e))
}

/// Read the extension's `name` for naming output artifacts.
pub fn extension_name(path: &Path) -> Result<String> {
    let manifest = read_manifest(path)?;
    match manifest.get("name") {
        Some(Value::String(name)) => Ok(name.clone()),
        Some(Value::Null) => Ok(UNNAMED_EXTENSION.to_string()),
        Some(_) => Err(ConversionError::InvalidName(path.to_path_buf())),
        None => Err(ConversionError::MissingName(path.to_path_buf())),
    }
}
