//! Directory tree copying

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Copy every file under `source_dir` into `dest_dir`, keeping the layout
pub fn copy_directory(source_dir: &Path, dest_dir: &Path) -> Result<()> {
    fs::create_dir_all(dest_dir)
        .with_context(|| format!("Failed to create {}", dest_dir.display()))?;

    for entry in WalkDir::new(source_dir) {
        let entry = entry.context("Failed to walk extension directory")?;
        let relative_path = entry
            .path()
            .strip_prefix(source_dir)
            .context("Failed to get relative path")?;
        let dest_path = dest_dir.join(relative_path);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest_path)
                .with_context(|| format!("Failed to create {}", dest_path.display()))?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &dest_path)
                .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
        }
    }

    Ok(())
}
