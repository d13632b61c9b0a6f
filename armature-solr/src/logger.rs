//! Logger hook invoked on query success, query failure and parse errors.

use tracing::{error, info};

/// Receives the client's human-readable log lines.
///
/// Implementations must be cheap; they are called inline on every query.
pub trait SolrLogger: Send + Sync {
    /// Log an informational line, such as `"12ms SOLR http://..."`.
    fn info(&self, message: &str);

    /// Log an error line.
    fn error(&self, message: &str);
}

/// Forwards log lines to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl SolrLogger for TracingLogger {
    fn info(&self, message: &str) {
        info!(target: "armature_solr", "{}", message);
    }

    fn error(&self, message: &str) {
        error!(target: "armature_solr", "{}", message);
    }
}

/// Discards every line.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl SolrLogger for NoopLogger {
    fn info(&self, _message: &str) {}

    fn error(&self, _message: &str) {}
}
