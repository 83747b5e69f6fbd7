//! The HTTP capability behind `ApiClient`, and the process-wide registry of
//! shared transports.
//!
//! # Design
//! `Transport` is the only seam where I/O happens. `HttpTransport` is the
//! reqwest implementation; tests substitute recording spies through
//! `ApiClient::with_transport`.
//!
//! Shared transports are created lazily, on the first request that needs
//! one. Creation for a given slot runs under a single guard (a `OnceCell`
//! for the process slot, a map shard lock for the per-URL slots), so racing
//! callers all end up holding the same instance.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use once_cell::sync::{Lazy, OnceCell};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

use crate::config::{ClientConfig, TransportScope};
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes `HttpRequest`s against one base URL.
///
/// Implementations return non-2xx responses as data; only failures to get a
/// response at all are errors.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// The base URL request paths are joined onto.
    fn base_url(&self) -> &str;

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// reqwest-backed transport bound to a single base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    inner: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(TransportError::Init)?;
        Ok(Self {
            inner,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = match request.method {
            HttpMethod::Get => self.inner.get(&url),
            HttpMethod::Post => self.inner.post(&url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(TransportError::Request)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await.map_err(TransportError::Request)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

static PROCESS_TRANSPORT: OnceCell<Arc<dyn Transport>> = OnceCell::new();

static TRANSPORTS_BY_URL: Lazy<DashMap<String, Arc<dyn Transport>>> = Lazy::new(DashMap::new);

/// Find or create the transport a client with `config` should use.
pub(crate) fn resolve(config: &ClientConfig) -> Result<Arc<dyn Transport>, TransportError> {
    match config.scope {
        TransportScope::Process => {
            let transport = PROCESS_TRANSPORT.get_or_try_init(|| create(config))?;
            if transport.base_url() != config.base_url {
                tracing::warn!(
                    configured = %config.base_url,
                    shared = %transport.base_url(),
                    "process-wide transport is bound to another base URL; requests go there"
                );
            }
            Ok(Arc::clone(transport))
        }
        TransportScope::PerBaseUrl => {
            let entry = TRANSPORTS_BY_URL
                .entry(config.base_url.clone())
                .or_try_insert_with(|| create(config))?;
            Ok(Arc::clone(entry.value()))
        }
        TransportScope::Dedicated => create(config),
    }
}

fn create(config: &ClientConfig) -> Result<Arc<dyn Transport>, TransportError> {
    tracing::debug!(
        base_url = %config.base_url,
        scope = ?config.scope,
        "creating HTTP transport"
    );
    let transport = HttpTransport::new(&config.base_url, config.timeout)?;
    Ok(Arc::new(transport))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn per_url(base_url: &str) -> ClientConfig {
        ClientConfig::with_base_url(base_url).scope(TransportScope::PerBaseUrl)
    }

    #[test]
    fn http_transport_strips_trailing_slash() {
        let transport = HttpTransport::new("http://localhost:17001/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:17001/api");
    }

    #[test]
    fn per_base_url_reuses_the_same_instance() {
        let first = resolve(&per_url("http://reuse.invalid/api")).unwrap();
        let second = resolve(&per_url("http://reuse.invalid/api")).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.base_url(), "http://reuse.invalid/api");
    }

    #[test]
    fn per_base_url_keeps_urls_apart() {
        let a = resolve(&per_url("http://apart-a.invalid/api")).unwrap();
        let b = resolve(&per_url("http://apart-b.invalid/api")).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(b.base_url(), "http://apart-b.invalid/api");
    }

    #[test]
    fn dedicated_creates_a_fresh_instance_each_time() {
        let config = ClientConfig::with_base_url("http://dedicated.invalid/api").scope(TransportScope::Dedicated);
        let a = resolve(&config).unwrap();
        let b = resolve(&config).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn racing_first_use_installs_one_transport() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| resolve(&per_url("http://race.invalid/api")).unwrap()))
            .collect();
        let transports: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for transport in &transports[1..] {
            assert!(Arc::ptr_eq(&transports[0], transport));
        }
    }
}
