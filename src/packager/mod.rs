//! Package collaborators
//!
//! Fetching and decoding the source package, and archiving the result, live
//! outside the conversion engine. These traits are the seams; the directory
//! implementations cover extensions that are already unpacked.

pub mod builder;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Populates a working directory with an unpacked extension.
pub trait Unpacker {
    fn unpack_into(&self, workdir: &Path) -> Result<()>;
}

/// Turns a converted working directory into the output package.
pub trait Repacker {
    fn repack_from(&self, workdir: &Path) -> Result<()>;
}

/// Copies an unpacked extension tree into the working directory
pub struct DirectoryUnpacker {
    source: PathBuf,
}

impl DirectoryUnpacker {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl Unpacker for DirectoryUnpacker {
    fn unpack_into(&self, workdir: &Path) -> Result<()> {
        if !self.source.is_dir() {
            anyhow::bail!("Extension directory not found: {}", self.source.display());
        }
        if workdir.exists() {
            fs::remove_dir_all(workdir)
                .with_context(|| format!("Failed to clear {}", workdir.display()))?;
        }
        builder::copy_directory(&self.source, workdir)
    }
}

/// Copies the converted tree to an output directory
pub struct DirectoryRepacker {
    output: PathBuf,
}

impl DirectoryRepacker {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
        }
    }
}

impl Repacker for DirectoryRepacker {
    fn repack_from(&self, workdir: &Path) -> Result<()> {
        builder::copy_directory(workdir, &self.output)
    }
}
