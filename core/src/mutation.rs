//! Dual-verb mutation executor.
//!
//! Some resources accept partial updates under one verb on one deployment
//! and a full replace under another verb elsewhere. The executor sends the
//! primary verb and, only when the backend answers 404, resends the same
//! request once with the fallback verb.

use tracing::debug;

use crate::error::OperationError;
use crate::http::{send_checked, HttpMethod, HttpRequest, HttpResponse, Transport};

/// Run `attempt` with `primary`, then once with `fallback` if the primary
/// attempt failed with 404. At most two attempts; the fallback's outcome is
/// final whatever it is.
pub fn dual_verb<R, F>(
    primary: HttpMethod,
    fallback: HttpMethod,
    mut attempt: F,
) -> Result<R, OperationError>
where
    F: FnMut(HttpMethod) -> Result<R, OperationError>,
{
    match attempt(primary) {
        Err(err) if err.is_not_found() => {
            debug!(%primary, %fallback, "primary verb not found, retrying with fallback");
            attempt(fallback)
        }
        outcome => outcome,
    }
}

/// Send `request` with `primary`, falling back to `fallback` on 404. URL,
/// headers and body are reused unchanged; only the method differs.
pub fn execute<T: Transport + ?Sized>(
    transport: &mut T,
    request: HttpRequest,
    primary: HttpMethod,
    fallback: HttpMethod,
) -> Result<HttpResponse, OperationError> {
    dual_verb(primary, fallback, |method| {
        debug!(%method, path = %request.path, "sending mutation");
        send_checked(
            &mut *transport,
            HttpRequest {
                method,
                ..request.clone()
            },
        )
    })
}
