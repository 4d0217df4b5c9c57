//! Operation errors and the normalizer that produces them.
//!
//! # Design
//! The backend reports failures in several shapes (`{message}`, `{error}`,
//! plain text, nothing at all). All shape-sniffing lives in `normalize`;
//! every other module treats `OperationError` as opaque data. Constructors
//! are crate-private so errors only originate here or from the few
//! orchestration-level kinds (`Unauthenticated`, `NoViableEndpoint`, ...).

use serde_json::Value;
use thiserror::Error;

use crate::http::{CallOutcome, HttpResponse, TransportError};

/// Message used whenever the failure carries nothing readable.
pub const FALLBACK_MESSAGE: &str = "Request failed";

/// Substring the backend uses when a login is refused for bad credentials.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Classification of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No response was received.
    Unreachable,
    /// Login answered but did not grant a token.
    AuthenticationRejected,
    /// An authenticated operation was attempted without a session.
    Unauthenticated,
    /// Every bootstrap candidate answered 404.
    NoViableEndpoint,
    /// Non-2xx response.
    RemoteRejected,
    /// 2xx response whose body lacked a required field.
    MalformedResponse,
}

/// Uniform failure of one logical operation, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct OperationError {
    pub kind: ErrorKind,
    pub message: String,
    pub http_status: Option<u16>,
}

impl OperationError {
    pub(crate) fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = non_empty(message.into());
        Self {
            kind,
            message,
            http_status: None,
        }
    }

    pub(crate) fn unauthenticated() -> Self {
        Self::new(ErrorKind::Unauthenticated, "Not logged in")
    }

    pub(crate) fn malformed(what: &str) -> Self {
        Self::new(ErrorKind::MalformedResponse, format!("Malformed response: {what}"))
    }

    /// True when the failure is the backend saying "no such route/resource".
    pub fn is_not_found(&self) -> bool {
        self.http_status == Some(404)
    }

    /// True when the backend refused the credentials, which usually means no
    /// administrator exists yet and bootstrap is worth offering.
    pub fn suggests_bootstrap(&self) -> bool {
        self.message.contains(INVALID_CREDENTIALS)
    }
}

/// Convert a failed call outcome into an `OperationError`.
///
/// Total: any body shape, including non-JSON, yields a non-empty message.
/// Passing a 2xx response is a caller bug but still produces a
/// `RemoteRejected` error rather than panicking.
pub fn normalize(outcome: &CallOutcome) -> OperationError {
    match outcome {
        Err(err) => from_transport(err),
        Ok(response) => from_response(response),
    }
}

fn from_transport(err: &TransportError) -> OperationError {
    OperationError::new(ErrorKind::Unreachable, err.0.clone())
}

fn from_response(response: &HttpResponse) -> OperationError {
    OperationError {
        kind: ErrorKind::RemoteRejected,
        message: extract_message(&response.body),
        http_status: Some(response.status),
    }
}

/// Pull a human-readable message out of an arbitrary response body.
pub(crate) fn extract_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return FALLBACK_MESSAGE.to_string();
    };
    ["message", "error"]
        .iter()
        .find_map(|field| {
            value
                .get(*field)
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
        })
        .map_or_else(|| FALLBACK_MESSAGE.to_string(), str::to_string)
}

fn non_empty(message: String) -> String {
    if message.trim().is_empty() {
        FALLBACK_MESSAGE.to_string()
    } else {
        message
    }
}
