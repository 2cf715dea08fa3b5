//! Regex-based rewriter for `chrome-extension://` URLs
//! Works on any text asset (JS, HTML, CSS)
//!
//! Absolute same-extension URLs become relative `./` paths. Anything the
//! patterns cannot see (URLs assembled at runtime) is reported, not guessed at.

use crate::models::WarningSink;
use crate::utils::helpers::{has_extension, read_text_file, write_text_file};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

pub const EXTENSION_SCHEME: &str = "chrome-extension://";

/// The extension's own base URL spelled with the predefined i18n message.
const OWN_EXTENSION_PREFIX: &str = "chrome-extension://__MSG_@@extension_id__/";

const RELATIVE_MARKER: &str = "./";

const TEXT_ASSET_EXTENSIONS: &[&str] = &["js", "css", "html"];

/// Cached regex for `chrome-extension://<id>/`
static EXTENSION_URL_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_extension_url_regex() -> &'static Regex {
    EXTENSION_URL_REGEX.get_or_init(|| {
        // The id segment stops at quotes and whitespace so a prefix that is
        // concatenated with a runtime id is not merged with unrelated text.
        Regex::new(r#"chrome-extension://[^/\s"'`]+/"#).unwrap()
    })
}

/// Replace all same-extension URLs in the given text with relative paths
pub fn replace_extension_urls(content: &str) -> String {
    let content = content.replace(OWN_EXTENSION_PREFIX, RELATIVE_MARKER);
    get_extension_url_regex()
        .replace_all(&content, RELATIVE_MARKER)
        .into_owned()
}

pub struct UrlRewriter;

impl UrlRewriter {
    /// Rewrite every `.js`, `.css` and `.html` file under `root`.
    ///
    /// Returns the files that changed, relative to `root`. Each file still
    /// referencing the scheme afterwards produces one warning.
    pub fn rewrite_directory(root: &Path, sink: &mut dyn WarningSink) -> Vec<PathBuf> {
        let mut modified = Vec::new();

        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !entry.file_type().is_file() || !has_extension(path, TEXT_ASSET_EXTENSIONS) {
                continue;
            }

            let Some(content) = read_text_file(path, sink) else {
                continue;
            };

            let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();
            let result = replace_extension_urls(&content);

            if result != content && write_text_file(path, &result, sink) {
                tracing::info!("Rewrote extension URLs in {}", relative.display());
                modified.push(relative.clone());
            }

            if result.contains(EXTENSION_SCHEME) {
                sink.warn(&format!(
                    "Unpatched chrome-extension reference(s) in {}",
                    relative.display()
                ));
            }
        }

        modified
    }
}
