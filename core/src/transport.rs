//! Transport abstraction and the default reqwest-backed implementation.
//!
//! # Design
//! A transport executes `HttpRequest` values verbatim and reports non-2xx
//! statuses as data, never as `Err`; interpreting status codes belongs to
//! the parse layer. Only failures below HTTP semantics, like DNS errors,
//! refused connections or timeouts, surface as `Error::Transport`. The
//! trait is object-safe so `TodosApi` can hold an `Arc<dyn HttpTransport>`
//! and tests can substitute scripted fakes for the network.

use std::time::Duration;

use async_trait::async_trait;
use tracing::trace;

use crate::error::Error;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Default per-request timeout for [`ReqwestTransport`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Executes HTTP requests on behalf of the typed API client.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Execute one request and return the raw response.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, Error>;
}

/// Production transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, Error> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(format!("todo-sync/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;
        Ok(Self { http, timeout })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        trace!(
            method = request.method.as_str(),
            url = %request.url,
            "executing request"
        );
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .http
            .request(method, &request.url)
            .timeout(self.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
