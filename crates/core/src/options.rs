// ABOUTME: Configuration options for the document pipeline and the PreparerBuilder.
// ABOUTME: PreparerBuilder provides a fluent API for constructing Preparer instances.

use std::time::Duration;

use crate::prepare::Preparer;

/// Configuration for one preparation run.
///
/// Every field is read once per call and never mutated while the pipeline
/// runs. The `keep_*` flags disable individual content transforms, the
/// `ignore_*` flags disable individual derived fields.
#[derive(Debug, Clone)]
pub struct Options {
    /// Keep inline `style` attributes.
    pub keep_styles: bool,
    /// Keep content-empty anchor and span elements.
    pub keep_empty_text: bool,
    /// Keep content-empty paragraphs instead of collapsing them to `<br>`.
    pub keep_empty_para: bool,
    /// Keep redirect-wrapped hyperlinks as exported.
    pub keep_google_links: bool,
    /// Keep image referrer behavior as exported.
    pub keep_referrer: bool,
    /// Skip metadata table extraction.
    pub ignore_meta: bool,
    /// Skip snippet derivation.
    pub ignore_snippet: bool,
    /// Maximum snippet length in characters.
    pub snippet_length: usize,
    /// Skip title derivation.
    pub ignore_title: bool,
    /// Skip cover-image derivation.
    pub ignore_cover: bool,
    /// Leave the title heading in the content fragment.
    pub keep_title_heading: bool,
    /// Leave the cover image element in the content fragment.
    pub keep_cover_element: bool,
    /// Derive a `description` from the paragraph following the heading.
    pub extract_description: bool,
    /// Fetch the cover image and inline it as a base64 data value.
    pub inline_cover: bool,
    /// Permit cover fetches that resolve to private addresses.
    pub allow_private_networks: bool,
    /// Timeout applied to the cover fetch.
    pub timeout: Duration,
    /// User-Agent sent with the cover fetch.
    pub user_agent: String,
    /// Use a custom HTTP client for the cover fetch.
    pub http_client: Option<reqwest::Client>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            keep_styles: false,
            keep_empty_text: false,
            keep_empty_para: false,
            keep_google_links: false,
            keep_referrer: false,
            ignore_meta: false,
            ignore_snippet: false,
            snippet_length: 200,
            ignore_title: false,
            ignore_cover: false,
            keep_title_heading: false,
            keep_cover_element: false,
            extract_description: false,
            inline_cover: false,
            allow_private_networks: false,
            timeout: Duration::from_secs(30),
            user_agent: concat!("docpress/", env!("CARGO_PKG_VERSION")).to_string(),
            http_client: None,
        }
    }
}

/// Builder for constructing Preparer instances with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct PreparerBuilder {
    opts: Options,
}

impl PreparerBuilder {
    /// Create a new PreparerBuilder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole option set.
    pub fn options(mut self, opts: Options) -> Self {
        self.opts = opts;
        self
    }

    /// Set the maximum snippet length.
    pub fn snippet_length(mut self, len: usize) -> Self {
        self.opts.snippet_length = len;
        self
    }

    /// Fetch the cover image and inline it as base64.
    pub fn inline_cover(mut self, inline: bool) -> Self {
        self.opts.inline_cover = inline;
        self
    }

    /// Allow or disallow cover fetches to private networks.
    pub fn allow_private_networks(mut self, allow: bool) -> Self {
        self.opts.allow_private_networks = allow;
        self
    }

    /// Set the cover-fetch timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the cover-fetch User-Agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Use a custom HTTP client for the cover fetch.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Build the Preparer with the configured options.
    pub fn build(self) -> Preparer {
        Preparer::new(self.opts)
    }
}
