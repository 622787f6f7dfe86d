use axum::{
    extract::{Request, State},
    http::{header::ALLOW, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::{ApiError, ErrorVerbosityProvider, MethodNotAllowedError};

/// Middleware to replace the empty `405` responses of the router and of the static file
/// services with our [`ApiError`] envelope.
///
/// The `Allow` header of the original response is kept.
pub async fn method_not_allowed<S: ErrorVerbosityProvider>(
    State(state): State<S>,
    req: Request,
    next: Next,
) -> Response {
    let resp = next.run(req).await;

    if resp.status() != StatusCode::METHOD_NOT_ALLOWED {
        return resp;
    }

    let allow = resp.headers().get(ALLOW).cloned();
    let mut error_response =
        ApiError::from(MethodNotAllowedError::new(state.error_verbosity())).into_response();

    if let Some(allow) = allow {
        error_response.headers_mut().insert(ALLOW, allow);
    }

    error_response
}
