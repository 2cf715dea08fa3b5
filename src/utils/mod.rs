//! Shared helpers and the extension URL rewriter

pub mod helpers;
pub mod url_replacer;

pub use url_replacer::UrlRewriter;
