// ABOUTME: DOM transforms over the parsed document tree.
// ABOUTME: Sibling scanning, in-place cleaners, and metadata table extraction.

pub mod cleaners;
pub mod siblings;
pub mod table_meta;
