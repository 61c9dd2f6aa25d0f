//! Connection configuration for the HTTP client.

use std::time::Duration;

/// Endpoint used when nothing else is configured.
pub const DEFAULT_URL: &str = "http://localhost:9200";

/// Connection settings for [`OpenSearchClient`](crate::OpenSearchClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service URL.
    pub url: String,
    /// Index used by requests that do not name one.
    pub default_index: String,
    /// Basic auth username.
    pub username: Option<String>,
    /// Basic auth password.
    pub password: Option<String>,
    /// Request timeout.
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration for a single node.
    pub fn new(url: impl Into<String>, default_index: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            default_index: default_index.into(),
            username: None,
            password: None,
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Set basic authentication credentials.
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_URL, "")
    }
}
