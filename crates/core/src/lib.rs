// ABOUTME: Main library entry point for the docpress document pipeline.
// ABOUTME: Re-exports the public API: Preparer, Prepared, Options, Metadata, PrepareError, Cms.

//! docpress - normalizes word-processor HTML exports for publishing.
//!
//! Exported documents arrive full of boilerplate: inline styles on every
//! element, redirect-wrapped hyperlinks, stray empty spans and paragraphs,
//! and optionally a two-column table at the document boundary carrying
//! author-supplied metadata. This crate turns such an export into a clean
//! content fragment plus a structured metadata record (title, snippet,
//! cover image, and the table's key/value pairs).
//!
//! # Example
//!
//! ```
//! use docpress_core::{prepare_document, Options};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), docpress_core::PrepareError> {
//! let html = r#"<body><h1>My Post</h1><p style="color:red">Hello</p></body>"#;
//! let prepared = prepare_document(html, &Options::default()).await?;
//! assert_eq!(prepared.title(), "My Post");
//! assert_eq!(prepared.content, "<p>Hello</p>");
//! # Ok(())
//! # }
//! ```

pub mod dom;
pub mod error;
pub mod extractors;
pub mod meta;
pub mod options;
pub mod prepare;
pub mod resource;
pub mod store;

pub use crate::dom::cleaners::extract_link_url;
pub use crate::error::{PrepareError, Result};
pub use crate::meta::Metadata;
pub use crate::options::{Options, PreparerBuilder};
pub use crate::prepare::{prepare_document, Prepared, Preparer};
pub use crate::store::{Cms, DocumentStore, StoredDocument};
