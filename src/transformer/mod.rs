//! Transformation stages for converting Chrome extensions to Firefox

pub mod rules;
pub mod manifest;
pub mod csp;
pub mod import_scripts;
pub mod string_methods;

pub use manifest::{ManifestTransformer, TransformedManifest};
pub use csp::CspPatcher;
pub use import_scripts::ImportScriptsStripper;
pub use string_methods::UnsafeStringMethodPatcher;

use crate::models::manifest::value_to_text;
use crate::models::{ConversionOptions, ConversionReport, Result, WarningSink};
use crate::parser::manifest::UNNAMED_EXTENSION;
use crate::utils::UrlRewriter;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "manifest.json";

/// Run every stage over an unpacked extension directory, in place.
///
/// The manifest stage runs first (it feeds the background script list to
/// the `importScripts()` stripper); the remaining stages each re-read their
/// files from disk, so their relative order does not matter.
pub fn transform_extension(
    root: &Path,
    options: &ConversionOptions,
    sink: &mut dyn WarningSink,
) -> Result<ConversionReport> {
    let mut report = ConversionReport::default();

    // 1. Manifest (+ background scripts)
    let transformer = ManifestTransformer::new(options);
    let (transformed, stripped) = transformer.convert_file(&root.join(MANIFEST_FILE), root, sink)?;
    report.add_modified(std::iter::once(PathBuf::from(MANIFEST_FILE)));
    report.add_modified(stripped);
    report.manifest_version = transformed.version.as_u64();
    report.extension_name = transformed
        .manifest
        .get("name")
        .filter(|n| !n.is_null())
        .map(value_to_text)
        .unwrap_or_else(|| UNNAMED_EXTENSION.to_string());

    for issue in crate::validator::validate_manifest(&transformed.manifest) {
        sink.warn(&issue);
    }

    // 2. Absolute extension URLs
    if options.rewrite_extension_urls {
        report.add_modified(UrlRewriter::rewrite_directory(root, sink));
    }

    // 3. Unguarded string methods
    if options.guard_string_methods {
        report.add_modified(UnsafeStringMethodPatcher::patch_directory(root, sink));
    }

    Ok(report)
}
