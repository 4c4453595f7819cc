// ABOUTME: The pipeline orchestrator: parses an export, runs the cleaners and extractors
// ABOUTME: in fixed order, and assembles the content fragment plus metadata record.

use dom_query::{Document, Selection};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::dom::cleaners::{
    collapse_empty_paragraphs, remove_empty_text, rewrite_redirect_links, strip_referrers,
    strip_styles,
};
use crate::dom::table_meta::{find_meta_table, table_metadata};
use crate::error::{PrepareError, Result};
use crate::extractors::fields;
use crate::meta::{self, Metadata};
use crate::options::{Options, PreparerBuilder};
use crate::resource;

/// The result of preparing an exported document.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Prepared {
    /// The cleaned content fragment (the body's inner HTML).
    pub content: String,
    /// Derived defaults merged with the document's metadata table.
    pub meta: Metadata,
    /// Set when cover inlining was requested but fell back to the plain
    /// URL; carries the fetch error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_fallback: Option<String>,
}

impl Prepared {
    /// The derived or table-provided title, empty when absent.
    pub fn title(&self) -> &str {
        self.meta.get(meta::KEY_TITLE).unwrap_or_default()
    }

    /// The derived snippet, empty when absent.
    pub fn snippet(&self) -> &str {
        self.meta.get(meta::KEY_SNIPPET).unwrap_or_default()
    }

    /// The cover image value (URL or data URL), empty when absent.
    pub fn cover_image(&self) -> &str {
        self.meta.get(meta::KEY_COVER_IMAGE).unwrap_or_default()
    }

    /// Returns true if the cover image was inlined as a data URL.
    pub fn cover_inlined(&self) -> bool {
        self.cover_image().starts_with("data:")
    }

    /// Returns true if the result carries no content and no metadata.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.meta.is_empty()
    }
}

/// Runs the preparation pipeline over exported documents.
///
/// A Preparer owns its configuration and the HTTP client used for cover
/// inlining; it holds no other state, so one instance can prepare any
/// number of documents and calls on different inputs are independent.
#[derive(Debug, Clone)]
pub struct Preparer {
    opts: Options,
    http_client: reqwest::Client,
}

impl Preparer {
    /// Create a new PreparerBuilder for configuring a Preparer.
    pub fn builder() -> PreparerBuilder {
        PreparerBuilder::new()
    }

    /// Create a new Preparer with the given options.
    pub fn new(opts: Options) -> Self {
        let http_client = opts.http_client.clone().unwrap_or_else(|| {
            reqwest::Client::builder()
                .user_agent(&opts.user_agent)
                .timeout(opts.timeout)
                .build()
                .expect("failed to build HTTP client")
        });
        Self { opts, http_client }
    }

    /// The options this Preparer was built with.
    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Prepare one exported document.
    ///
    /// Every tree transform runs synchronously; the optional cover fetch
    /// is the only suspension point and only rewrites the already
    /// assembled cover value, so the tree never lives across an await.
    pub async fn prepare(&self, html: &str) -> Result<Prepared> {
        let (content, mut meta, cover_url) = self.run_stages(html)?;

        let mut cover_fallback = None;
        if let Some(url) = cover_url {
            match resource::fetch_binary(&self.http_client, &url, self.opts.allow_private_networks)
                .await
            {
                Ok(binary) => {
                    meta.insert(
                        meta::KEY_COVER_IMAGE,
                        resource::to_data_url(binary.content_type.as_deref(), &binary.body),
                    );
                }
                Err(err) => {
                    warn!(url = %url, error = %err, "cover inlining failed, keeping plain URL");
                    cover_fallback = Some(err.to_string());
                }
            }
        }

        Ok(Prepared {
            content,
            meta,
            cover_fallback,
        })
    }

    /// The synchronous stages: parse, clean, derive, extract the table,
    /// collapse, serialize. Returns the content fragment, the merged
    /// record, and the cover URL to inline (when requested).
    fn run_stages(&self, html: &str) -> Result<(String, Metadata, Option<String>)> {
        let opts = &self.opts;
        let doc = Document::from(html);
        let body = doc.select("body");
        if body.length() == 0 {
            return Err(PrepareError::parse("document produced no body element"));
        }

        if !opts.keep_styles {
            strip_styles(&doc);
        }
        if !opts.keep_empty_text {
            remove_empty_text(&doc);
        }
        if !opts.keep_google_links {
            rewrite_redirect_links(&doc);
        }
        if !opts.keep_referrer {
            strip_referrers(&doc);
        }

        let mut record = Metadata::new();

        // Located up front so the cover extractor leaves table-owned
        // images alone; detachment still happens after derivation.
        let meta_table = if opts.ignore_meta {
            None
        } else {
            find_meta_table(&doc)
        };

        let heading = fields::first_heading(&doc);
        if !opts.ignore_title {
            let title = heading
                .map(|h| fields::normalize_whitespace(&Selection::from(h).text()))
                .unwrap_or_default();
            record.insert(meta::KEY_TITLE, title);
        }
        if opts.extract_description {
            if let Some(description) = fields::extract_description(&doc) {
                record.insert(meta::KEY_DESCRIPTION, description);
            }
        }
        if !opts.ignore_title && !opts.keep_title_heading {
            if let Some(h) = heading {
                Selection::from(h).remove();
            }
        }

        if !opts.ignore_snippet {
            record.insert(
                meta::KEY_SNIPPET,
                fields::extract_snippet(&doc, opts.snippet_length),
            );
        }

        if !opts.ignore_cover {
            let image = fields::first_image_excluding(&doc, meta_table.as_ref());
            let src = image
                .and_then(|n| Selection::from(n).attr("src"))
                .map(|s| s.trim().to_string())
                .unwrap_or_default();
            record.insert(meta::KEY_COVER_IMAGE, src);
            if !opts.keep_cover_element {
                if let Some(n) = image {
                    Selection::from(n).remove();
                }
            }
        }

        if let Some(node) = meta_table {
            let table = Selection::from(node);
            record.merge(table_metadata(&table));
            table.remove();
        }

        if !opts.keep_empty_para {
            collapse_empty_paragraphs(&doc);
        }

        let content = doc.select("body").inner_html().trim().to_string();

        let cover_url = if opts.inline_cover && !opts.ignore_cover {
            record
                .get(meta::KEY_COVER_IMAGE)
                .filter(|u| u.starts_with("http://") || u.starts_with("https://"))
                .map(|u| u.to_string())
        } else {
            None
        };

        Ok((content, record, cover_url))
    }
}

impl Default for Preparer {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

/// Prepare one exported document with the given options.
///
/// Convenience wrapper constructing a throwaway [`Preparer`].
pub async fn prepare_document(html: &str, opts: &Options) -> Result<Prepared> {
    Preparer::new(opts.clone()).prepare(html).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const EXPORT: &str = r#"<html><head><style type="text/css">p{color:red;}</style></head><body><table><tr><td>Author</td><td>Jane Doe</td></tr></table><h1>Doc Title</h1><p style="color: red;">Hello World</p><span></span><p></p><a href="https://google.com/url?q=http://example.com&sa=D">link</a></body></html>"#;

    async fn prepare_default(html: &str) -> Prepared {
        prepare_document(html, &Options::default())
            .await
            .expect("prepare should succeed")
    }

    #[tokio::test]
    async fn default_run_cleans_and_extracts() {
        let prepared = prepare_default(EXPORT).await;

        assert!(!prepared.content.contains("style=\"color: red;\""));
        assert!(!prepared.content.contains("<span></span>"));
        assert!(prepared.content.contains("<br>"));
        assert!(!prepared.content.contains("<p></p>"));
        assert!(prepared.content.contains(r#"<a href="http://example.com">link</a>"#));
        assert!(!prepared.content.contains("<table"));
        assert_eq!(prepared.title(), "Doc Title");
        assert_eq!(prepared.meta.get("author"), Some("Jane Doe"));
        assert!(prepared.cover_fallback.is_none());
    }

    #[tokio::test]
    async fn title_heading_is_removed_from_content() {
        let prepared = prepare_default(EXPORT).await;
        assert!(!prepared.content.contains("<h1>"));
    }

    #[tokio::test]
    async fn keep_flags_disable_individual_transforms() {
        let opts = Options {
            keep_styles: true,
            keep_empty_text: true,
            keep_empty_para: true,
            keep_google_links: true,
            keep_title_heading: true,
            ..Options::default()
        };
        let prepared = prepare_document(EXPORT, &opts).await.unwrap();

        assert!(prepared.content.contains("style=\"color: red;\""));
        assert!(prepared.content.contains("<span></span>"));
        assert!(prepared.content.contains("<p></p>"));
        assert!(!prepared.content.contains("<br>"));
        assert!(prepared.content.contains("google.com/url?q="));
        assert!(prepared.content.contains("<h1>"));
    }

    #[tokio::test]
    async fn ignore_meta_skips_the_table() {
        let opts = Options {
            ignore_meta: true,
            ..Options::default()
        };
        let prepared = prepare_document(EXPORT, &opts).await.unwrap();

        assert!(prepared.meta.get("author").is_none());
        assert!(prepared.content.contains("<table"));
    }

    #[tokio::test]
    async fn ignore_flags_drop_derived_fields() {
        let opts = Options {
            ignore_title: true,
            ignore_snippet: true,
            ignore_cover: true,
            ignore_meta: true,
            ..Options::default()
        };
        let prepared = prepare_document("<body><h1>T</h1><p>B</p></body>", &opts)
            .await
            .unwrap();

        assert!(prepared.meta.is_empty());
        // the heading stays when title derivation is off
        assert!(prepared.content.contains("<h1>T</h1>"));
    }

    #[tokio::test]
    async fn description_is_opt_in() {
        let html = "<body><h1>Title</h1><p>The lede.</p><p>More body.</p></body>";

        let default_run = prepare_default(html).await;
        assert!(!default_run.meta.contains_key(meta::KEY_DESCRIPTION));

        let opts = Options {
            extract_description: true,
            ..Options::default()
        };
        let with_description = prepare_document(html, &opts).await.unwrap();
        assert_eq!(
            with_description.meta.get(meta::KEY_DESCRIPTION),
            Some("The lede.")
        );
    }

    #[tokio::test]
    async fn cover_image_is_derived_and_element_removed() {
        let html = r#"<body><p>Intro</p><p><img src="https://example.com/cover.png"></p></body>"#;
        let prepared = prepare_default(html).await;

        assert_eq!(prepared.cover_image(), "https://example.com/cover.png");
        assert!(!prepared.content.contains("<img"));
    }

    #[tokio::test]
    async fn cover_element_can_be_kept() {
        let html = r#"<body><p>Intro</p><p><img src="https://example.com/cover.png"></p></body>"#;
        let opts = Options {
            keep_cover_element: true,
            ..Options::default()
        };
        let prepared = prepare_document(html, &opts).await.unwrap();

        assert_eq!(prepared.cover_image(), "https://example.com/cover.png");
        assert!(prepared.content.contains("<img"));
    }

    #[tokio::test]
    async fn snippet_length_is_enforced() {
        let html = format!("<body><p>{}</p></body>", "word ".repeat(100));
        for limit in [10, 50, 200] {
            let opts = Options {
                snippet_length: limit,
                ..Options::default()
            };
            let prepared = prepare_document(&html, &opts).await.unwrap();
            assert!(prepared.snippet().chars().count() <= limit);
        }
    }
}
