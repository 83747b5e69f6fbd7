//! Error types for the DeSo API client.
//!
//! # Design
//! Callers see two kinds of failure. `Validation` is raised by the `build_*`
//! methods before any I/O and names the first missing parameter. `Transport`
//! carries whatever the HTTP layer reported, untouched: the client never
//! retries or reclassifies it, so callers own interpretation and retry policy.

/// Errors returned by `ApiClient` operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required parameter was missing (empty, zero, or unset).
    #[error("missing required parameter `{field}`")]
    Validation { field: &'static str },

    /// The transport failed or the server answered with a non-2xx status.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request body could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl ApiError {
    /// The parameter named by a validation failure, if this is one.
    pub fn missing_field(&self) -> Option<&'static str> {
        match self {
            ApiError::Validation { field } => Some(*field),
            _ => None,
        }
    }
}

/// Errors raised by a [`Transport`](crate::transport::Transport) or while
/// unwrapping its response.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HTTP client could not be constructed.
    #[error("failed to initialize HTTP client: {0}")]
    Init(#[source] reqwest::Error),

    /// Connection, DNS, TLS, or timeout failure.
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The server returned a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not valid JSON.
    #[error("malformed response body: {0}")]
    Decode(#[source] serde_json::Error),
}
