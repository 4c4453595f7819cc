// ABOUTME: The document-store boundary and the Cms service that combines
// ABOUTME: a store with a Preparer to deliver publishable documents by id.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::meta::Metadata;
use crate::options::Options;
use crate::prepare::Preparer;

/// A remote store that can export documents as HTML.
///
/// Implementations own authentication, listing, and pagination; the only
/// thing the pipeline needs is the exported HTML string for an id.
/// Export failures should be surfaced as [`crate::PrepareError::Store`].
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Export the document with the given id as an HTML string.
    async fn export_html(&self, id: &str) -> Result<String>;
}

/// A prepared document as delivered from a store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredDocument {
    /// The store-side document id.
    pub id: String,
    /// The cleaned content fragment.
    pub content: String,
    /// The merged metadata record.
    pub meta: Metadata,
    /// See [`crate::Prepared::cover_fallback`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_fallback: Option<String>,
}

/// Serves publishable documents out of a [`DocumentStore`].
#[derive(Debug, Clone)]
pub struct Cms<S> {
    store: S,
    preparer: Preparer,
}

impl<S: DocumentStore> Cms<S> {
    /// Create a Cms with default preparation options.
    pub fn new(store: S) -> Self {
        Self::with_options(store, Options::default())
    }

    /// Create a Cms with custom preparation options.
    pub fn with_options(store: S, opts: Options) -> Self {
        Self {
            store,
            preparer: Preparer::new(opts),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Export the document with the given id and run the pipeline on it.
    pub async fn document(&self, id: &str) -> Result<StoredDocument> {
        let html = self.store.export_html(id).await?;
        let prepared = self.preparer.prepare(&html).await?;
        Ok(StoredDocument {
            id: id.to_string(),
            content: prepared.content,
            meta: prepared.meta,
            cover_fallback: prepared.cover_fallback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PrepareError;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    struct FixtureStore {
        documents: HashMap<String, String>,
    }

    impl FixtureStore {
        fn new(entries: &[(&str, &str)]) -> Self {
            Self {
                documents: entries
                    .iter()
                    .map(|(id, html)| (id.to_string(), html.to_string()))
                    .collect(),
            }
        }
    }

    impl DocumentStore for FixtureStore {
        async fn export_html(&self, id: &str) -> Result<String> {
            self.documents
                .get(id)
                .cloned()
                .ok_or_else(|| PrepareError::store(anyhow::anyhow!("no document with id {}", id)))
        }
    }

    #[tokio::test]
    async fn document_exports_and_prepares() {
        let store = FixtureStore::new(&[(
            "doc-1",
            r#"<body><h1>Post</h1><p style="color:red">Body text.</p></body>"#,
        )]);
        let cms = Cms::new(store);

        let doc = cms.document("doc-1").await.expect("should prepare");

        assert_eq!(doc.id, "doc-1");
        assert_eq!(doc.meta.get("title"), Some("Post"));
        assert_eq!(doc.content, "<p>Body text.</p>");
    }

    #[tokio::test]
    async fn missing_documents_surface_store_errors() {
        let cms = Cms::new(FixtureStore::new(&[]));

        let err = cms.document("ghost").await.expect_err("should fail");

        assert!(matches!(err, PrepareError::Store(_)));
        assert!(err.to_string().contains("ghost"));
    }

    #[tokio::test]
    async fn options_flow_through_to_preparation() {
        let store = FixtureStore::new(&[("doc-1", "<body><h1>Post</h1><p>Body</p></body>")]);
        let opts = Options {
            keep_title_heading: true,
            ..Options::default()
        };
        let cms = Cms::with_options(store, opts);

        let doc = cms.document("doc-1").await.unwrap();

        assert!(doc.content.contains("<h1>Post</h1>"));
    }
}
