// ABOUTME: Locates the boundary two-column metadata table and extracts its key/value rows.
// ABOUTME: The located table is detached so it never reaches the content fragment.

use dom_query::{Document, NodeRef, Selection};
use tracing::debug;

use crate::dom::siblings::{next_with_content, prior_with_content};
use crate::meta::Metadata;

/// Find the metadata table, if one exists.
///
/// A candidate must be two-column shaped: no row with more than two cells
/// and at least one row with exactly two (rows collapsed by column spans
/// are tolerated). A candidate qualifies when it sits at a document
/// boundary: no richer-content sibling before it, or none after it.
/// The first qualifying table in document order wins.
pub fn find_meta_table<'a>(doc: &'a Document) -> Option<NodeRef<'a>> {
    for node in doc.select("table").nodes() {
        let table = Selection::from(*node);
        if !is_two_column(&table) {
            continue;
        }
        let first = prior_with_content(node).is_none();
        let last = next_with_content(node).is_none();
        if first || last {
            debug!(first, last, "located boundary metadata table");
            return Some(*node);
        }
    }
    None
}

fn is_two_column(table: &Selection) -> bool {
    let rows = table.select("tr");
    if rows.length() == 0 {
        return false;
    }
    let mut has_pair = false;
    for row in rows.iter() {
        let cells = row.select("td, th").length();
        if cells > 2 {
            return false;
        }
        if cells == 2 {
            has_pair = true;
        }
    }
    has_pair
}

/// Convert a metadata table's rows into a key/value record.
///
/// Keys come from the first data cell (trimmed, lowercased so table keys
/// line up with the reserved derived keys). Values come from an image
/// `src` inside the second cell when one exists, else the cell text.
/// Rows without two data cells or with a blank key are skipped.
pub fn table_metadata(table: &Selection) -> Metadata {
    let mut meta = Metadata::new();
    for row in table.select("tr").iter() {
        let cells = table_cells(&row);
        let (Some(key_cell), Some(value_cell)) = (cells.first(), cells.get(1)) else {
            continue;
        };
        let key = Selection::from(*key_cell).text().trim().to_lowercase();
        if key.is_empty() {
            continue;
        }
        let value_sel = Selection::from(*value_cell);
        let value = image_src(&value_sel)
            .unwrap_or_else(|| value_sel.text().trim().to_string());
        meta.insert(key, value);
    }
    meta
}

fn table_cells<'a>(row: &Selection<'a>) -> Vec<NodeRef<'a>> {
    row.select("td").nodes().to_vec()
}

fn image_src(cell: &Selection) -> Option<String> {
    cell.select("img")
        .attr("src")
        .map(|src| src.trim().to_string())
        .filter(|src| !src.is_empty())
}

/// Remove the metadata table and return its values.
///
/// Returns an empty record when no table qualifies; that is a normal
/// outcome, not an error.
pub fn extract_table_meta(doc: &Document) -> Metadata {
    let Some(node) = find_meta_table(doc) else {
        return Metadata::new();
    };
    let table = Selection::from(node);
    let meta = table_metadata(&table);
    table.remove();
    meta
}
