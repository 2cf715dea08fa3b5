//! Fatal conversion errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a conversion.
///
/// Everything else that can go wrong while patching scripts is advisory and
/// goes through a [`WarningSink`](super::WarningSink) instead.
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Manifest file not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {message}", .path.display())]
    ManifestParse { path: PathBuf, message: String },

    #[error("Manifest {} is not a JSON object", .0.display())]
    ManifestNotObject(PathBuf),

    #[error("Could not find 'name' property in {}", .0.display())]
    MissingName(PathBuf),

    #[error("'name' property in {} is not a string", .0.display())]
    InvalidName(PathBuf),
}

impl ConversionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = ConversionError> = std::result::Result<T, E>;
