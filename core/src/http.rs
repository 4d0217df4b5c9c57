//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! builds `HttpRequest` values and interprets `HttpResponse` values; the host
//! (browser shell, CLI, test harness) executes the round-trip through the
//! `Transport` trait. Orchestration code that needs several attempts (endpoint
//! probing, dual-verb retry) drives the transport itself, one call at a time.
//!
//! All fields use owned types (`String`, `Vec`) so values move freely between
//! the core and whatever executes them.

use std::fmt;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Built by `BlogClient::build_*` methods. `path` is the absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
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

/// The request never produced a response (DNS, refused connection, CORS,
/// timeout). Carries the transport's own description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError(pub String);

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for TransportError {}

/// Raw result of one round-trip, before any status interpretation.
pub type CallOutcome = Result<HttpResponse, TransportError>;

/// Executes one HTTP round-trip on behalf of the core.
///
/// Implementations must return non-2xx responses as `Ok` data; only a missing
/// response is an `Err`. Closures with the matching signature implement this
/// trait, which keeps scripted test transports short.
pub trait Transport {
    fn send(&mut self, request: HttpRequest) -> CallOutcome;
}

impl<F> Transport for F
where
    F: FnMut(HttpRequest) -> CallOutcome,
{
    fn send(&mut self, request: HttpRequest) -> CallOutcome {
        self(request)
    }
}

/// Send `request` and split the outcome into a 2xx response or the raw
/// failure, ready for the error normalizer.
pub(crate) fn send_checked<T: Transport + ?Sized>(
    transport: &mut T,
    request: HttpRequest,
) -> Result<HttpResponse, crate::error::OperationError> {
    match transport.send(request) {
        Ok(response) if response.is_success() => Ok(response),
        outcome => Err(crate::error::normalize(&outcome)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range_is_2xx_only() {
        let mk = |status| HttpResponse {
            status,
            headers: Vec::new(),
            body: String::new(),
        };
        assert!(mk(200).is_success());
        assert!(mk(204).is_success());
        assert!(!mk(199).is_success());
        assert!(!mk(301).is_success());
        assert!(!mk(404).is_success());
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest {
            method: HttpMethod::Get,
            path: "http://x/blogs".to_string(),
            headers: vec![("Authorization".to_string(), "Bearer t".to_string())],
            body: None,
        };
        assert_eq!(req.header("authorization"), Some("Bearer t"));
        assert_eq!(req.header("content-type"), None);
    }

    #[test]
    fn closures_act_as_transports() {
        let mut calls = 0;
        let mut transport = |_req: HttpRequest| -> CallOutcome {
            calls += 1;
            Err(TransportError("offline".to_string()))
        };
        let req = HttpRequest {
            method: HttpMethod::Get,
            path: "http://x".to_string(),
            headers: Vec::new(),
            body: None,
        };
        assert!(transport.send(req).is_err());
        drop(transport);
        assert_eq!(calls, 1);
    }
}
