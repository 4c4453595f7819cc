// ABOUTME: Derived-field extractors for prepared documents.
// ABOUTME: Title, snippet, description, and cover image derivation.

pub mod fields;

pub use fields::{
    extract_description, extract_snippet, extract_title, first_heading, first_image,
    first_image_excluding, normalize_whitespace, truncate_at_word,
};
