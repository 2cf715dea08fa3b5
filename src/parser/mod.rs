//! Manifest parsing

pub mod manifest;

pub use manifest::{extension_name, parse_manifest, read_manifest, write_manifest};
