//! Error types for Solr operations.

use thiserror::Error;

/// Solr error type.
#[derive(Error, Debug)]
pub enum SolrError {
    /// Invalid or incomplete request configuration.
    ///
    /// Raised before any network interaction takes place.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Transport failure or a non-2xx status on a query.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The response body is not valid JSON.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The response is valid JSON but lacks a subtree the accessor requires.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A projection was requested for a field that is not a configured shortcut.
    #[error("No projection configured for field: {0}")]
    UnknownProjection(String),

    /// Cache store failure. Never aborts a query.
    #[error("Cache error: {0}")]
    Cache(String),

    /// An update response body is not valid UTF-8.
    #[error("Encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

impl SolrError {
    /// Check if this is a configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Check if this is a connection error.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Check if this is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }

    pub(crate) fn malformed(what: impl Into<String>) -> Self {
        Self::MalformedResponse(what.into())
    }
}

impl From<reqwest::Error> for SolrError {
    fn from(e: reqwest::Error) -> Self {
        Self::Connection(e.to_string())
    }
}

/// Result type alias for Solr operations.
pub type Result<T> = std::result::Result<T, SolrError>;
