// ABOUTME: Field extraction helpers reading derived defaults from the document tree.
// ABOUTME: First-match-wins discipline; whitespace is normalized; empty means no match.

use dom_query::{Document, NodeRef, Selection};

use crate::dom::siblings::next_with_content;

/// Collapse runs of whitespace into single spaces and trim.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The first heading-level element in document order, if any.
pub fn first_heading<'a>(doc: &'a Document) -> Option<NodeRef<'a>> {
    doc.select("h1, h2, h3, h4, h5, h6").nodes().first().copied()
}

/// Derive the document title from the first heading.
///
/// Returns `None` when the document has no heading; callers default to an
/// empty string.
pub fn extract_title(doc: &Document) -> Option<String> {
    first_heading(doc).map(|h| normalize_whitespace(&Selection::from(h).text()))
}

/// Derive a description from the first content paragraph after the heading.
pub fn extract_description(doc: &Document) -> Option<String> {
    let heading = first_heading(doc)?;
    let follower = next_with_content(&heading)?;
    let is_paragraph = follower
        .node_name()
        .map_or(false, |name| name.eq_ignore_ascii_case("p"));
    if !is_paragraph {
        return None;
    }
    let text = normalize_whitespace(&Selection::from(follower).text());
    (!text.is_empty()).then_some(text)
}

/// Derive the snippet: the body's visible text, truncated to `max_len`.
pub fn extract_snippet(doc: &Document, max_len: usize) -> String {
    let text = normalize_whitespace(&doc.select("body").text());
    truncate_at_word(&text, max_len)
}

/// Truncate to at most `max_len` characters without splitting a word.
///
/// The cut lands on the nearest whitespace boundary before the limit;
/// text with no such boundary is cut hard at the limit. Shorter input is
/// returned unmodified.
pub fn truncate_at_word(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let window: String = text.chars().take(max_len).collect();
    // only a boundary with non-space on both sides splits a word
    let next_is_space = text.chars().nth(max_len).map_or(true, char::is_whitespace);
    if next_is_space {
        return window.trim_end().to_string();
    }
    match window.rfind(char::is_whitespace) {
        Some(cut) => window[..cut].trim_end().to_string(),
        None => window,
    }
}

/// The first image element with a non-empty `src`, in document order.
pub fn first_image<'a>(doc: &'a Document) -> Option<NodeRef<'a>> {
    first_image_excluding(doc, None)
}

/// Like [`first_image`], but ignoring images under `excluded`.
///
/// The metadata table owns its images (they become table values), so the
/// cover extractor must not claim them.
pub fn first_image_excluding<'a>(
    doc: &'a Document,
    excluded: Option<&NodeRef<'a>>,
) -> Option<NodeRef<'a>> {
    for node in doc.select("img").nodes() {
        if let Some(root) = excluded {
            if is_descendant(node, root) {
                continue;
            }
        }
        let has_src = Selection::from(*node)
            .attr("src")
            .map_or(false, |src| !src.trim().is_empty());
        if has_src {
            return Some(*node);
        }
    }
    None
}

fn is_descendant(node: &NodeRef, ancestor: &NodeRef) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if parent.id == ancestor.id {
            return true;
        }
        current = parent.parent();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn title_comes_from_the_first_heading() {
        let doc = Document::from("<body><h1>  My   Document  </h1><p>Body</p></body>");
        assert_eq!(extract_title(&doc), Some("My Document".to_string()));
    }

    #[test]
    fn any_heading_level_can_carry_the_title() {
        let doc = Document::from("<body><p>Intro</p><h2>Section Title</h2></body>");
        assert_eq!(extract_title(&doc), Some("Section Title".to_string()));
    }

    #[test]
    fn missing_heading_yields_no_title() {
        let doc = Document::from("<body><p>No headings here</p></body>");
        assert_eq!(extract_title(&doc), None);
    }

    #[test]
    fn description_is_the_paragraph_after_the_heading() {
        let doc = Document::from(
            "<body><h1>Title</h1><p> </p><p>The lede paragraph.</p><p>More.</p></body>",
        );
        assert_eq!(
            extract_description(&doc),
            Some("The lede paragraph.".to_string())
        );
    }

    #[test]
    fn description_requires_a_paragraph() {
        let doc = Document::from("<body><h1>Title</h1><div>Not a paragraph</div></body>");
        assert_eq!(extract_description(&doc), None);
    }

    #[test]
    fn snippet_is_normalized_body_text() {
        let doc = Document::from("<body><p>Hello</p>\n<p>world</p></body>");
        assert_eq!(extract_snippet(&doc, 200), "Hello world");
    }

    #[test]
    fn snippet_respects_the_length_limit() {
        let doc = Document::from("<body><p>alpha beta gamma delta epsilon</p></body>");
        let snippet = extract_snippet(&doc, 12);
        assert_eq!(snippet, "alpha beta");
        assert!(snippet.chars().count() <= 12);
    }

    #[test]
    fn truncate_cuts_at_word_boundaries() {
        assert_eq!(truncate_at_word("one two three", 9), "one two");
        assert_eq!(truncate_at_word("one two three", 8), "one two");
        assert_eq!(truncate_at_word("short", 200), "short");
    }

    #[test]
    fn truncate_without_whitespace_cuts_hard() {
        assert_eq!(truncate_at_word("abcdefghij", 4), "abcd");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        let text = "héllö wörld ünd mehr";
        let cut = truncate_at_word(text, 11);
        assert_eq!(cut, "héllö wörld");
        assert!(cut.chars().count() <= 11);
    }

    #[test]
    fn first_image_skips_empty_sources() {
        let doc = Document::from(
            r#"<body><img src=""><img src="   "><img src="https://example.com/real.jpg"></body>"#,
        );
        let node = first_image(&doc).expect("should find the real image");
        assert_eq!(
            Selection::from(node).attr("src").map(|s| s.to_string()),
            Some("https://example.com/real.jpg".to_string())
        );
    }

    #[test]
    fn no_images_yields_none() {
        let doc = Document::from("<body><p>No images here</p></body>");
        assert!(first_image(&doc).is_none());
    }

    #[test]
    fn excluded_subtrees_do_not_provide_the_first_image() {
        let doc = Document::from(
            r#"<body><table><tr><td><img src="table.png"></td></tr></table><p><img src="content.png"></p></body>"#,
        );
        let table = *doc.select("table").nodes().first().unwrap();

        let node = first_image_excluding(&doc, Some(&table)).expect("should skip the table image");
        assert_eq!(
            Selection::from(node).attr("src").map(|s| s.to_string()),
            Some("content.png".to_string())
        );
    }
}
