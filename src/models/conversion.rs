//! Conversion options, results and the warning sink

use serde::Serialize;
use std::path::PathBuf;

/// Gecko application id injected when a manifest carries no
/// `browser_specific_settings` of its own.
pub const DEFAULT_GECKO_ID: &str = "chrome2fox@converted-extension.org";

#[derive(Debug, Clone)]
pub struct ConversionOptions {
    pub gecko_id: String,
    pub rewrite_extension_urls: bool,
    pub guard_string_methods: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            gecko_id: DEFAULT_GECKO_ID.to_string(),
            rewrite_extension_urls: true,
            guard_string_methods: true,
        }
    }
}

/// Receives advisory messages from the patch stages.
///
/// Implementations must not panic; a warning never changes control flow.
pub trait WarningSink {
    fn warn(&mut self, message: &str);
}

impl<F> WarningSink for F
where
    F: FnMut(&str),
{
    fn warn(&mut self, message: &str) {
        self(message)
    }
}

impl WarningSink for Vec<String> {
    fn warn(&mut self, message: &str) {
        self.push(message.to_string());
    }
}

/// Forwards warnings to an inner sink while keeping a copy for the report.
/// The inner sink owns user-facing output; the log only sees them at debug.
pub(crate) struct RecordingSink<'a> {
    inner: &'a mut dyn WarningSink,
    pub(crate) recorded: Vec<String>,
}

impl<'a> RecordingSink<'a> {
    pub(crate) fn new(inner: &'a mut dyn WarningSink) -> Self {
        Self {
            inner,
            recorded: Vec::new(),
        }
    }
}

impl WarningSink for RecordingSink<'_> {
    fn warn(&mut self, message: &str) {
        tracing::debug!("warning: {}", message);
        self.recorded.push(message.to_string());
        self.inner.warn(message);
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionReport {
    pub extension_name: String,
    pub manifest_version: u64,
    pub modified_files: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

impl ConversionReport {
    /// Record a rewritten file once, however many stages touched it.
    pub fn add_modified(&mut self, files: impl IntoIterator<Item = PathBuf>) {
        for file in files {
            if !self.modified_files.contains(&file) {
                self.modified_files.push(file);
            }
        }
    }
}
