//! Type guards for string method calls
//!
//! Some Chrome APIs always hand back strings where Firefox may return
//! `undefined` or `null`. Assignments such as `x = value.trim()` are rewritten
//! to check `typeof value === "string"` first. Matching is pattern based and
//! only sees the simple `ident = expr.method(...)` shape.

use crate::models::WarningSink;
use crate::utils::helpers::{has_extension, read_text_file, write_text_file};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

struct GuardedMethod {
    name: &'static str,
    takes_args: bool,
    fallback: &'static str,
}

/// Applied in this order, one pass per method.
static GUARDED_METHODS: [GuardedMethod; 7] = [
    GuardedMethod { name: "split", takes_args: true, fallback: "[]" },
    GuardedMethod { name: "toLowerCase", takes_args: false, fallback: "\"\"" },
    GuardedMethod { name: "toUpperCase", takes_args: false, fallback: "\"\"" },
    GuardedMethod { name: "trim", takes_args: false, fallback: "\"\"" },
    GuardedMethod { name: "replace", takes_args: true, fallback: "\"\"" },
    GuardedMethod { name: "substr", takes_args: true, fallback: "\"\"" },
    GuardedMethod { name: "substring", takes_args: true, fallback: "\"\"" },
];

lazy_static! {
    static ref METHOD_PATTERNS: Vec<(&'static GuardedMethod, Regex)> = GUARDED_METHODS
        .iter()
        .map(|method| {
            let call = if method.takes_args { r"\(([^)]*)\)" } else { r"\(\)" };
            let pattern = format!(
                r"(\b(?:var|let|const)?\s*\w+\s*=\s*)([a-zA-Z0-9_$.]+)\.{}\s*{}",
                method.name, call
            );
            (method, Regex::new(&pattern).unwrap())
        })
        .collect();
}

pub struct UnsafeStringMethodPatcher;

impl UnsafeStringMethodPatcher {
    /// Guard every `.js` file under `root`. Returns the files rewritten,
    /// relative to `root`.
    pub fn patch_directory(root: &Path, sink: &mut dyn WarningSink) -> Vec<PathBuf> {
        let mut modified = Vec::new();

        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !entry.file_type().is_file() || !has_extension(path, &["js"]) {
                continue;
            }

            let Some(content) = read_text_file(path, sink) else {
                continue;
            };

            let patched = Self::patch_source(&content);
            if patched != content && write_text_file(path, &patched, sink) {
                let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();
                tracing::info!("Guarded string method calls in {}", relative.display());
                modified.push(relative);
            }
        }

        modified
    }

    pub fn patch_source(source: &str) -> String {
        let mut content = source.to_string();
        for (method, pattern) in METHOD_PATTERNS.iter() {
            content = pattern
                .replace_all(&content, |caps: &Captures| guard(method, caps))
                .into_owned();
        }
        content
    }
}

fn guard(method: &GuardedMethod, caps: &Captures) -> String {
    let left = &caps[1];
    let target = &caps[2];
    let args = caps.get(3).map_or("", |m| m.as_str());

    // Regex-literal separators are left alone.
    if method.name == "split" && args.trim_start().starts_with('/') {
        return caps[0].to_string();
    }

    format!(
        "{left}typeof {target} === \"string\" ? {target}.{name}({args}) : {fallback}",
        name = method.name,
        fallback = method.fallback,
    )
}
