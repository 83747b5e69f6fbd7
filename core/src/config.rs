//! Client configuration.

use std::time::Duration;

/// Public node used when no base URL is given.
pub const DEFAULT_BASE_URL: &str = "https://node.deso.org/api";

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How clients share the underlying HTTP transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransportScope {
    /// One transport per process, bound to the base URL of whichever client
    /// first sends a request. Later clients reuse it even if they were
    /// configured with a different base URL.
    #[default]
    Process,
    /// One shared transport per distinct base URL.
    PerBaseUrl,
    /// Each client owns its own transport.
    Dedicated,
}

/// Settings fixed at `ApiClient` construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Node API root, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout applied by the transport.
    pub timeout: Duration,
    pub scope: TransportScope,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            scope: TransportScope::default(),
        }
    }
}

impl ClientConfig {
    /// Default settings against a different node.
    #[must_use]
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn scope(mut self, scope: TransportScope) -> Self {
        self.scope = scope;
        self
    }
}

pub(crate) fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
