//! Stateless HTTP request builder and response parser for the blog admin API.
//!
//! # Design
//! `BlogClient` holds only a `base_url` and carries no mutable state between
//! calls. Each endpoint is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Tokens are passed in per call; the client never remembers one.
//! Orchestration (retries, probing, session bookkeeping) lives in the modules
//! above this one.

use serde::Serialize;
use tracing::warn;

use crate::error::{normalize, ErrorKind, OperationError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    AdminStatus, Blog, BlogEnvelope, BlogListEnvelope, BlogPayload, BootstrapRequest,
    BootstrapResponse, LoginRequest, LoginResponse, PublishPayload,
};

/// Synchronous, stateless client for the blog admin API.
#[derive(Debug, Clone)]
pub struct BlogClient {
    base_url: String,
}

impl BlogClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join a configured path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn build_login(&self, input: &LoginRequest) -> Result<HttpRequest, OperationError> {
        json_request(HttpMethod::Post, self.url("/auth/login"), None, input)
    }

    pub fn build_bootstrap(
        &self,
        path: &str,
        input: &BootstrapRequest,
    ) -> Result<HttpRequest, OperationError> {
        json_request(HttpMethod::Post, self.url(path), None, input)
    }

    pub fn build_check_admin(&self) -> HttpRequest {
        bare_request(HttpMethod::Get, self.url("/auth/check-admin"), None)
    }

    pub fn build_list_blogs(&self) -> HttpRequest {
        bare_request(HttpMethod::Get, self.url("/blogs"), None)
    }

    pub fn build_get_blog(&self, id: &str) -> HttpRequest {
        bare_request(HttpMethod::Get, self.blog_url(id), None)
    }

    pub fn build_create_blog(
        &self,
        token: &str,
        input: &BlogPayload,
    ) -> Result<HttpRequest, OperationError> {
        json_request(HttpMethod::Post, self.url("/blogs"), Some(token), input)
    }

    pub fn build_update_blog(
        &self,
        token: &str,
        id: &str,
        input: &BlogPayload,
    ) -> Result<HttpRequest, OperationError> {
        json_request(HttpMethod::Put, self.blog_url(id), Some(token), input)
    }

    /// Partial update of the `published` flag. The dual-verb executor may
    /// resend this with another method.
    pub fn build_set_published(
        &self,
        token: &str,
        id: &str,
        published: bool,
    ) -> Result<HttpRequest, OperationError> {
        json_request(
            HttpMethod::Patch,
            self.blog_url(id),
            Some(token),
            &PublishPayload { published },
        )
    }

    pub fn build_delete_blog(&self, token: &str, id: &str) -> HttpRequest {
        bare_request(HttpMethod::Delete, self.blog_url(id), Some(token))
    }

    /// A 2xx login answer whose body is not JSON decodes as an empty
    /// response; the session manager reports it as a rejected login.
    pub fn parse_login(&self, response: HttpResponse) -> Result<LoginResponse, OperationError> {
        check_status(&response)?;
        Ok(serde_json::from_str(&response.body).unwrap_or_default())
    }

    pub fn parse_bootstrap(
        &self,
        response: HttpResponse,
    ) -> Result<BootstrapResponse, OperationError> {
        check_status(&response)?;
        Ok(serde_json::from_str(&response.body).unwrap_or_default())
    }

    pub fn parse_check_admin(&self, response: HttpResponse) -> Result<AdminStatus, OperationError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| OperationError::malformed(&e.to_string()))
    }

    /// An envelope mismatch degrades to an empty list instead of failing.
    /// Posts that do not decode are dropped one by one; the rest are kept.
    pub fn parse_list_blogs(&self, response: HttpResponse) -> Result<Vec<Blog>, OperationError> {
        check_status(&response)?;
        let entries = match serde_json::from_str::<BlogListEnvelope>(&response.body) {
            Ok(envelope) => envelope.blogs,
            Err(e) => {
                warn!(error = %e, "blog list response did not match the expected shape; showing no posts");
                return Ok(Vec::new());
            }
        };
        let blogs = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value::<Blog>(entry) {
                Ok(blog) => Some(blog),
                Err(e) => {
                    warn!(index, error = %e, "dropping blog entry that did not decode");
                    None
                }
            })
            .collect();
        Ok(blogs)
    }

    pub fn parse_get_blog(&self, response: HttpResponse) -> Result<Blog, OperationError> {
        check_status(&response)?;
        serde_json::from_str::<BlogEnvelope>(&response.body)
            .map_err(|e| OperationError::malformed(&e.to_string()))?
            .blog
            .ok_or_else(|| OperationError::malformed("missing `blog` field"))
    }

    /// Create, update, publish and delete only need a 2xx; the body is
    /// ignored because the caller re-lists afterwards.
    pub fn parse_mutation(&self, response: HttpResponse) -> Result<(), OperationError> {
        check_status(&response)
    }

    /// Ids are opaque, so they are percent-encoded into a single segment.
    fn blog_url(&self, id: &str) -> String {
        format!("{}/blogs/{}", self.base_url, urlencoding::encode(id))
    }
}

fn auth_headers(token: Option<&str>) -> Vec<(String, String)> {
    token
        .map(|t| vec![("authorization".to_string(), format!("Bearer {t}"))])
        .unwrap_or_default()
}

fn bare_request(method: HttpMethod, path: String, token: Option<&str>) -> HttpRequest {
    HttpRequest {
        method,
        path,
        headers: auth_headers(token),
        body: None,
    }
}

fn json_request<T: Serialize>(
    method: HttpMethod,
    path: String,
    token: Option<&str>,
    input: &T,
) -> Result<HttpRequest, OperationError> {
    let body = serde_json::to_string(input).map_err(|e| {
        OperationError::new(
            ErrorKind::MalformedResponse,
            format!("could not encode request body: {e}"),
        )
    })?;
    let mut headers = vec![("content-type".to_string(), "application/json".to_string())];
    headers.extend(auth_headers(token));
    Ok(HttpRequest {
        method,
        path,
        headers,
        body: Some(body),
    })
}

/// Route every non-2xx response through the error normalizer.
fn check_status(response: &HttpResponse) -> Result<(), OperationError> {
    if response.is_success() {
        return Ok(());
    }
    Err(normalize(&Ok(response.clone())))
}
