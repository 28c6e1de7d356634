//! HTML parsing and text extraction
//!
//! Feed entries are parsed in [`crate::crawler::feed`]; this module handles
//! article pages and the cleanup of text taken from either source.

pub mod content;
pub mod sanitize;
pub mod selectors;

pub use content::{ContentExtractor, ExtractionStrategy};
pub use selectors::ContentSelectors;
