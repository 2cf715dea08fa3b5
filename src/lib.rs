//! Chrome to Firefox Extension Converter
//!
//! Rewrites an unpacked Chrome extension so Firefox can load it: the manifest
//! is translated field by field, and a handful of pattern-based patches are
//! applied to its scripts, styles and pages.

pub mod models;
pub mod parser;
pub mod transformer;
pub mod packager;
pub mod validator;
pub mod report;
pub mod utils;

pub use models::{
    ConversionError, ConversionOptions, ConversionReport, ManifestDocument, ManifestVersion,
    WarningSink,
};
pub use parser::extension_name;
pub use transformer::transform_extension;

use anyhow::Context;
use models::RecordingSink;
use packager::{Repacker, Unpacker};
use std::path::Path;

/// Convert an unpacked extension in place.
///
/// Only an unreadable or unparsable manifest fails the conversion; every
/// other problem is passed to `sink` and recorded in the report.
pub fn convert_directory(
    root: &Path,
    options: &ConversionOptions,
    sink: &mut dyn WarningSink,
) -> models::Result<ConversionReport> {
    let mut recording = RecordingSink::new(sink);
    let mut report = transform_extension(root, options, &mut recording)?;
    report.warnings = recording.recorded;
    Ok(report)
}

/// Unpack, convert and repack an extension through the package collaborators.
pub fn convert_package(
    unpacker: &dyn Unpacker,
    repacker: &dyn Repacker,
    workdir: &Path,
    options: &ConversionOptions,
    sink: &mut dyn WarningSink,
) -> anyhow::Result<ConversionReport> {
    // 1. Populate the working directory
    unpacker
        .unpack_into(workdir)
        .context("Failed to unpack extension")?;

    // 2. Convert in place
    let report = convert_directory(workdir, options, sink)?;

    // 3. Hand the result to the repacker
    repacker
        .repack_from(workdir)
        .context("Failed to repack extension")?;

    Ok(report)
}
