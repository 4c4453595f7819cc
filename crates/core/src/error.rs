// ABOUTME: Error types for document preparation.
// ABOUTME: Provides the PrepareError enum and the crate-level Result alias.

use thiserror::Error;

/// Errors that can occur while preparing an exported document.
#[derive(Debug, Error)]
pub enum PrepareError {
    /// The input could not be turned into a usable document tree.
    #[error("failed to parse document: {0}")]
    Parse(String),

    /// A URL handed to the fetch layer was malformed or unsupported.
    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    /// A network fetch failed (connect error, oversized body, bad status).
    #[error("fetch failed for {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    /// A fetch was blocked because it would reach a private address.
    #[error("blocked request to private address: {0}")]
    PrivateNetwork(String),

    /// A document store could not export the requested document.
    #[error("document store error: {0}")]
    Store(#[source] anyhow::Error),
}

impl PrepareError {
    /// Create a Parse error with a custom message.
    pub fn parse(msg: impl Into<String>) -> Self {
        PrepareError::Parse(msg.into())
    }

    /// Create an InvalidUrl error.
    pub fn invalid_url(url: impl Into<String>, source: anyhow::Error) -> Self {
        PrepareError::InvalidUrl {
            url: url.into(),
            source,
        }
    }

    /// Create a Fetch error.
    pub fn fetch(url: impl Into<String>, source: anyhow::Error) -> Self {
        PrepareError::Fetch {
            url: url.into(),
            source,
        }
    }

    /// Create a Store error from any underlying error.
    pub fn store(source: impl Into<anyhow::Error>) -> Self {
        PrepareError::Store(source.into())
    }

    /// Returns true if this is a Parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, PrepareError::Parse(_))
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        matches!(self, PrepareError::Fetch { .. })
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        matches!(self, PrepareError::InvalidUrl { .. })
    }

    /// Returns true if the error came from the private-network guard.
    pub fn is_private_network(&self) -> bool {
        matches!(self, PrepareError::PrivateNetwork(_))
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PrepareError>;
