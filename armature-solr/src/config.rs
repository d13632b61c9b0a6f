//! Solr client configuration.

use std::env;
use std::time::Duration;

/// Fields projected across the documents of every response unless configured otherwise.
pub const DEFAULT_SHORTCUTS: [&str; 3] = ["id", "unique_id", "score"];

/// Solr client configuration.
#[derive(Debug, Clone)]
pub struct SolrConfig {
    /// URL scheme (`http` or `https`).
    pub scheme: String,
    /// Solr host name.
    pub server: String,
    /// Solr port.
    pub port: u16,
    /// Path of the Solr install (for example `/solr` or `/solr/core1`).
    pub path: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Document fields exposed as projections on every response.
    pub shortcuts: Vec<String>,
    /// Document field holding the key of the highlighting subtree.
    pub unique_key: String,
    /// Time-to-live for cached query responses.
    pub cache_ttl: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl SolrConfig {
    /// Create a new configuration for a server and port.
    pub fn new(server: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: "http".to_string(),
            server: server.into(),
            port,
            path: "/solr".to_string(),
            timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(10),
            shortcuts: DEFAULT_SHORTCUTS.iter().map(|s| s.to_string()).collect(),
            unique_key: "unique_id".to_string(),
            cache_ttl: Duration::from_secs(60 * 60),
            user_agent: format!("armature-solr/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `ARMATURE_SOLR_SERVER`, `ARMATURE_SOLR_PORT`, `ARMATURE_SOLR_PATH`
    /// and `ARMATURE_SOLR_TIMEOUT` (seconds). Unset or unparseable variables keep
    /// their defaults, with `localhost:8983` as the default server.
    pub fn from_env() -> Self {
        let server = env::var("ARMATURE_SOLR_SERVER").unwrap_or_else(|_| "localhost".to_string());
        let port = env::var("ARMATURE_SOLR_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8983);

        let mut config = Self::new(server, port);

        if let Ok(path) = env::var("ARMATURE_SOLR_PATH") {
            config = config.with_path(path);
        }
        if let Some(secs) = env::var("ARMATURE_SOLR_TIMEOUT")
            .ok()
            .and_then(|t| t.parse().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }

        config
    }

    /// Set the URL scheme.
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Set the path of the Solr install.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.path = if path.starts_with('/') {
            path
        } else {
            format!("/{}", path)
        };
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the projected shortcut fields.
    pub fn with_shortcuts<I, S>(mut self, shortcuts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shortcuts = shortcuts.into_iter().map(Into::into).collect();
        self
    }

    /// Set the unique key field used to look up highlights.
    pub fn with_unique_key(mut self, field: impl Into<String>) -> Self {
        self.unique_key = field.into();
        self
    }

    /// Set the default cache time-to-live.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Set the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// `server:port/path`, as used in log lines.
    pub fn full_path(&self) -> String {
        format!("{}:{}{}", self.server, self.port, self.path)
    }

    /// `scheme://server:port`, without the install path.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.server, self.port)
    }

    /// Path of the select handler.
    pub fn select_path(&self) -> String {
        format!("{}/select", self.path)
    }

    /// Path of the update handler.
    pub fn update_path(&self) -> String {
        format!("{}/update", self.path)
    }
}

impl Default for SolrConfig {
    fn default() -> Self {
        Self::new("localhost", 8983)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SolrConfig::new("localhost", 8983);
        assert_eq!(config.path, "/solr");
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(config.shortcuts, vec!["id", "unique_id", "score"]);
        assert_eq!(config.full_path(), "localhost:8983/solr");
        assert_eq!(config.base_url(), "http://localhost:8983");
        assert_eq!(config.select_path(), "/solr/select");
        assert_eq!(config.update_path(), "/solr/update");
    }

    #[test]
    fn test_with_path_adds_leading_slash() {
        let config = SolrConfig::new("solr1", 8080).with_path("abcsolr");
        assert_eq!(config.path, "/abcsolr");
        assert_eq!(config.select_path(), "/abcsolr/select");
    }

    #[test]
    fn test_from_env() {
        unsafe {
            env::set_var("ARMATURE_SOLR_SERVER", "solr-env");
            env::set_var("ARMATURE_SOLR_PORT", "9999");
            env::set_var("ARMATURE_SOLR_PATH", "/search");
            env::set_var("ARMATURE_SOLR_TIMEOUT", "5");
        }

        let config = SolrConfig::from_env();
        assert_eq!(config.full_path(), "solr-env:9999/search");
        assert_eq!(config.timeout, Duration::from_secs(5));

        unsafe {
            env::remove_var("ARMATURE_SOLR_SERVER");
            env::remove_var("ARMATURE_SOLR_PORT");
            env::remove_var("ARMATURE_SOLR_PATH");
            env::remove_var("ARMATURE_SOLR_TIMEOUT");
        }
    }
}
