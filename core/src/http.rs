//! HTTP value types shared by the request builder and the transport.
//!
//! # Design
//! Requests and responses are plain owned data. `TodoClient` builds
//! `HttpRequest` values and interprets `HttpResponse` values without ever
//! touching the network; an `HttpTransport` implementation executes the
//! round-trip in between. Keeping the two sides decoupled makes the protocol
//! layer deterministic and lets tests script the wire exactly.

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Canonical uppercase name, as it appears on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `TodoClient::build_*` methods and executed by an
/// [`HttpTransport`](crate::transport::HttpTransport).
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header value with the given name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// Produced by the transport and passed to `TodoClient::parse_*` methods for
/// status interpretation and deserialization. Non-2xx statuses are carried
/// here as data, not as transport errors.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}
