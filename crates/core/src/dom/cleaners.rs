// ABOUTME: In-place tree cleaners for exported documents.
// ABOUTME: Style stripping, empty-element removal, paragraph collapsing, link and referrer rewrites.

use dom_query::{Document, Selection};
use url::Url;

/// Remove the `style` attribute from every element. No-op when none present.
pub fn strip_styles(doc: &Document) {
    for node in doc.select("[style]").nodes() {
        Selection::from(*node).remove_attr("style");
    }
}

/// Remove anchor and span elements whose trimmed text content is empty.
///
/// Elements that contain an image are kept: exports wrap every image in a
/// styled span, and the cover extractor still has to see it.
pub fn remove_empty_text(doc: &Document) {
    for node in doc.select("a, span").nodes() {
        let sel = Selection::from(*node);
        if !sel.text().trim().is_empty() {
            continue;
        }
        if sel.select("img").length() > 0 {
            continue;
        }
        sel.remove();
    }
}

/// Replace paragraphs with empty trimmed text by a single `<br>` in place.
///
/// Image-bearing paragraphs are left alone, same guard as
/// [`remove_empty_text`]. Non-empty paragraphs are untouched.
pub fn collapse_empty_paragraphs(doc: &Document) {
    for node in doc.select("p").nodes() {
        let sel = Selection::from(*node);
        if !sel.text().trim().is_empty() {
            continue;
        }
        if sel.select("img").length() > 0 {
            continue;
        }
        sel.replace_with_html("<br>");
    }
}

/// Rewrite redirect-wrapped hrefs to their real target.
///
/// Every anchor href is run through [`extract_link_url`]; anchors whose
/// href is already direct are left untouched.
pub fn rewrite_redirect_links(doc: &Document) {
    for node in doc.select("a[href]").nodes() {
        let sel = Selection::from(*node);
        let Some(href) = sel.attr("href").map(|s| s.to_string()) else {
            continue;
        };
        let target = extract_link_url(&href);
        if target != href {
            sel.set_attr("href", &target);
        }
    }
}

/// Resolve a redirect-wrapped href to its real target.
///
/// If the href parses as a URL and carries a `q` query parameter, the
/// decoded `q` value is the original target. Anything else, including
/// values that are not URLs at all, is returned verbatim; this function
/// never fails on malformed input.
pub fn extract_link_url(href: &str) -> String {
    let Ok(parsed) = Url::parse(href) else {
        return href.to_string();
    };
    match parsed.query_pairs().find(|(key, _)| key == "q") {
        Some((_, value)) if !value.is_empty() => value.into_owned(),
        _ => href.to_string(),
    }
}

/// Force `referrerpolicy="no-referrer"` on every image.
///
/// Published fragments are rendered off-origin; without this a client
/// fetching the image would announce the document's origin as referrer.
pub fn strip_referrers(doc: &Document) {
    for node in doc.select("img").nodes() {
        Selection::from(*node).set_attr("referrerpolicy", "no-referrer");
    }
}
