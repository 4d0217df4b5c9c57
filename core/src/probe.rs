//! Ordered endpoint probing.
//!
//! Used when the authoritative route for an operation is unknown ahead of
//! time (admin bootstrap). Candidates are tried one at a time; a 404 means
//! "not this one", anything else is the backend's real answer.

use crate::error::{ErrorKind, OperationError};

/// Try `attempt` on each candidate in order.
///
/// - first success wins; later candidates are never attempted
/// - a 404 failure moves on to the next candidate
/// - any other failure stops probing and is returned unchanged
///
/// Exhausting the list yields `NoViableEndpoint` carrying the last 404's
/// message. Returns the winning candidate alongside its result.
pub fn probe<'c, C, R, F>(candidates: &'c [C], mut attempt: F) -> Result<(&'c C, R), OperationError>
where
    F: FnMut(&C) -> Result<R, OperationError>,
{
    let mut last_missing: Option<OperationError> = None;
    for candidate in candidates {
        match attempt(candidate) {
            Ok(result) => return Ok((candidate, result)),
            Err(err) if err.is_not_found() => last_missing = Some(err),
            Err(err) => return Err(err),
        }
    }
    let detail = last_missing
        .map(|err| err.message)
        .unwrap_or_else(|| "No candidate endpoints configured".to_string());
    Err(OperationError::new(
        ErrorKind::NoViableEndpoint,
        format!("No admin creation endpoint found on backend. Last error: {detail}"),
    ))
}
