//! HTTP transport collaborator.

use crate::{config::SolrConfig, error::{Result, SolrError}};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

/// Status and body of an engine reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw body.
    pub body: Bytes,
}

impl TransportResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body as UTF-8 text.
    pub fn text(&self) -> Result<String> {
        Ok(String::from_utf8(self.body.to_vec())?)
    }
}

/// Sends requests to the engine.
///
/// Paths are absolute on the server, for example `/solr/select`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` to `path`.
    async fn post(&self, path: &str, body: String, content_type: &str) -> Result<TransportResponse>;

    /// GET `path_and_query`.
    async fn get(&self, path_and_query: &str) -> Result<TransportResponse>;
}

/// [`Transport`] over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for the configured server.
    pub fn new(config: &SolrConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| SolrError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url(),
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read(response: reqwest::Response) -> Result<TransportResponse> {
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        debug!(status = status, bytes = body.len(), "Solr response received");
        Ok(TransportResponse { status, body })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        path: &str,
        body: String,
        content_type: &str,
    ) -> Result<TransportResponse> {
        let url = self.url(path);
        debug!(method = "POST", url = %url, bytes = body.len(), "Sending Solr request");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;

        Self::read(response).await
    }

    async fn get(&self, path_and_query: &str) -> Result<TransportResponse> {
        let url = self.url(path_and_query);
        debug!(method = "GET", url = %url, "Sending Solr request");

        let response = self.client.get(&url).send().await?;
        Self::read(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_status() {
        assert!(TransportResponse::new(200, "ok").is_success());
        assert!(TransportResponse::new(204, "").is_success());
        assert!(!TransportResponse::new(500, "boom").is_success());
        assert!(!TransportResponse::new(302, "").is_success());
    }

    #[test]
    fn test_response_text() {
        assert_eq!(TransportResponse::new(200, "{}").text().unwrap(), "{}");

        let invalid = TransportResponse::new(200, vec![0xff, 0xfe]);
        assert!(matches!(invalid.text(), Err(SolrError::Encoding(_))));
    }

    #[test]
    fn test_base_url() {
        let transport = HttpTransport::new(&SolrConfig::new("solr1", 8080)).unwrap();
        assert_eq!(transport.base_url(), "http://solr1:8080");
    }
}
