//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `ApiClient::build_*` produces an
//! `HttpRequest` whose `path` is relative to the node's base URL; a
//! [`Transport`](crate::transport::Transport) joins it with the base URL it
//! is bound to, performs the round-trip, and hands back an `HttpResponse`
//! without interpreting the status.

/// HTTP method for a request. The node API only uses these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Endpoint path relative to the base URL, e.g. `/v0/get-app-state`.
    pub path: String,
    pub headers: Vec<(String, String)>,
    /// JSON-encoded body. Always `None` for GET.
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Produced by a transport and consumed by `ApiClient::parse_response`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
