//! Core data models for extension conversion

pub mod manifest;
pub mod conversion;
pub mod error;

pub use manifest::*;
pub use conversion::*;
pub use error::*;
