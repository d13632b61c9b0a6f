//! Solr client: queries, the response cache and document updates.

use crate::{
    cache::QueryCache,
    config::SolrConfig,
    document::Document,
    error::{Result, SolrError},
    logger::{SolrLogger, TracingLogger},
    query::{QueryBuilder, SolrQuery},
    request::RequestSpec,
    response::{ResponseOptions, SolrResponse},
    transport::{HttpTransport, Transport},
    update::{
        add_xml, delete_by_id_xml, delete_by_query_xml, is_update_success, UpdateOptions,
        COMMIT_XML, OPTIMIZE_XML, UPDATE_CONTENT_TYPE,
    },
};
use bytes::Bytes;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Content type of select requests.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Client for one Solr install.
///
/// # Example
///
/// ```rust,ignore
/// use armature_solr::prelude::*;
/// use std::sync::Arc;
///
/// let client = SolrClient::new(SolrConfig::new("localhost", 8983))?
///     .with_cache(Arc::new(InMemoryCache::new()));
///
/// let response = client
///     .query("standard", RequestSpec::new("good book").limit(20).enable_caching(true))
///     .await?;
/// println!("{} matches", response.total()?);
///
/// client
///     .update_and_commit([Document::new().add_field("id", 1)], &UpdateOptions::new())
///     .await?;
/// ```
#[derive(Clone)]
pub struct SolrClient {
    config: Arc<SolrConfig>,
    transport: Arc<dyn Transport>,
    cache: Option<Arc<dyn QueryCache>>,
    logger: Arc<dyn SolrLogger>,
    pending: Arc<Mutex<Vec<Document>>>,
}

impl SolrClient {
    /// Create a client over HTTP.
    pub fn new(config: SolrConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        debug!(server = %config.full_path(), "Solr client initialized");
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client over a custom transport.
    pub fn with_transport(config: SolrConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            cache: None,
            logger: Arc::new(TracingLogger),
            pending: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the response cache.
    pub fn with_cache(mut self, cache: Arc<dyn QueryCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Set the logger hook.
    pub fn with_logger(mut self, logger: Arc<dyn SolrLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &SolrConfig {
        &self.config
    }

    /// Run a query through `request_handler`.
    ///
    /// With `enable_caching` set and a cache configured, the body is looked
    /// up by [`SolrQuery::cache_key`] first and stored after a fetch.
    pub async fn query(&self, request_handler: &str, spec: RequestSpec) -> Result<SolrResponse> {
        let cache = self.cache.as_ref().filter(|_| spec.enable_caching);
        let ttl = spec.ttl.unwrap_or(self.config.cache_ttl);

        let query = QueryBuilder::new(request_handler, spec).build()?;
        let cache_key = query.cache_key();
        let url = self.log_url(&query);

        debug!(handler = request_handler, cache_key = %cache_key, "Executing Solr query");

        let started = Instant::now();
        let cached = match cache {
            Some(cache) => match cache.get(&cache_key).await {
                Ok(body) => body.filter(|b| !b.is_empty()),
                Err(e) => {
                    warn!(error = %e, cache_key = %cache_key, "Cache lookup failed");
                    None
                }
            },
            None => None,
        };
        let cache_time = started.elapsed().as_millis();

        let from_cache = cached.is_some();
        let body = match cached {
            Some(body) => Bytes::from(body),
            None => self.fetch(&query, &url).await?,
        };

        let options = ResponseOptions {
            shortcuts: self.config.shortcuts.clone(),
            unique_key: self.config.unique_key.clone(),
            from_cache,
        };
        let response = SolrResponse::parse_slice(&body, &query, options, self.logger.as_ref())?;

        if !response.success() {
            self.logger.error(&format!("ERROR {}", url));
            return Ok(response);
        }

        let (elapsed, source) = if from_cache {
            (cache_time, "CACHE")
        } else {
            let qtime = response
                .qtime()
                .map(u128::from)
                .unwrap_or_else(|_| started.elapsed().as_millis());
            (qtime, "SOLR")
        };
        self.logger.info(&format!("{}ms {} {}", elapsed, source, url));

        if let Some(cache) = cache.filter(|_| !from_cache) {
            let body = String::from_utf8_lossy(&body).into_owned();
            if let Err(e) = cache.set(&cache_key, body, ttl).await {
                warn!(error = %e, cache_key = %cache_key, "Cache store failed");
            }
        }

        Ok(response)
    }

    async fn fetch(&self, query: &SolrQuery, url: &str) -> Result<Bytes> {
        let response = match self
            .transport
            .post(
                &self.config.select_path(),
                query.query_string().to_string(),
                FORM_CONTENT_TYPE,
            )
            .await
        {
            Ok(response) => response,
            Err(e) => {
                self.logger.error(&format!("ERROR {}", url));
                return Err(match e {
                    SolrError::Connection(_) => e,
                    other => SolrError::Connection(other.to_string()),
                });
            }
        };

        if !response.is_success() {
            self.logger.error(&format!("ERROR {}", url));
            return Err(SolrError::Connection(format!(
                "Connection failed with status: {}",
                response.status
            )));
        }

        Ok(response.body)
    }

    fn log_url(&self, query: &SolrQuery) -> String {
        format!(
            "{}://{}{}",
            self.config.scheme,
            self.config.full_path(),
            query.request_string()
        )
    }

    // =========================================================================
    // Updates
    // =========================================================================

    /// Buffer documents for the next [`post_update`](Self::post_update).
    pub fn update(&self, docs: impl IntoIterator<Item = Document>) {
        self.pending.lock().extend(docs);
    }

    /// Post the buffered documents and clear the buffer.
    pub async fn post_update(&self, options: &UpdateOptions) -> Result<bool> {
        let docs = std::mem::take(&mut *self.pending.lock());
        debug!(documents = docs.len(), "Posting Solr update");
        self.post_xml(add_xml(&docs, options)).await
    }

    /// Buffer documents and post immediately.
    pub async fn update_and_post(
        &self,
        docs: impl IntoIterator<Item = Document>,
        options: &UpdateOptions,
    ) -> Result<bool> {
        self.update(docs);
        self.post_update(options).await
    }

    /// Post documents, then commit if the post succeeded.
    pub async fn update_and_commit(
        &self,
        docs: impl IntoIterator<Item = Document>,
        options: &UpdateOptions,
    ) -> Result<bool> {
        Ok(self.update_and_post(docs, options).await? && self.commit().await?)
    }

    /// Delete a document by unique key.
    pub async fn delete(&self, id: impl ToString) -> Result<bool> {
        self.post_xml(delete_by_id_xml(&id.to_string())).await
    }

    /// Delete the documents matching `query`.
    pub async fn delete_by_query(&self, query: &str) -> Result<bool> {
        self.post_xml(delete_by_query_xml(query)).await
    }

    /// Commit pending adds and deletes.
    pub async fn commit(&self) -> Result<bool> {
        self.post_xml(COMMIT_XML.to_string()).await
    }

    /// Optimize the index.
    pub async fn optimize(&self) -> Result<bool> {
        self.post_xml(OPTIMIZE_XML.to_string()).await
    }

    /// Snapshot of the buffered documents.
    pub fn pending_documents(&self) -> Vec<Document> {
        self.pending.lock().clone()
    }

    /// Number of buffered documents.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    async fn post_xml(&self, body: String) -> Result<bool> {
        let response = self
            .transport
            .post(&self.config.update_path(), body, UPDATE_CONTENT_TYPE)
            .await?;
        let text = response.text()?;

        if is_update_success(&text) {
            Ok(true)
        } else {
            self.logger.error(&text);
            Ok(false)
        }
    }
}

impl std::fmt::Debug for SolrClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolrClient")
            .field("config", &self.config)
            .field("cache", &self.cache.is_some())
            .field("pending", &self.pending_count())
            .finish()
    }
}
