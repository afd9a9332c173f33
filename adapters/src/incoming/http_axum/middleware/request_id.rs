use axum::http::HeaderValue;
use axum::{extract::Request, middleware::Next, response::Response};
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Reuses the caller's `X-Request-Id` or mints one, and echoes it back.
/// Handler logs run inside a span carrying the id.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|header| header.to_str().ok())
        .filter(|id| !id.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), ToString::to_string);
    let header_value = HeaderValue::from_str(&request_id).ok();

    let method = request.method().clone();
    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %request.uri().path(),
    );

    if let Some(value) = header_value.clone() {
        request.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    let mut response = next.run(request).instrument(span.clone()).await;

    if let Some(value) = header_value {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    // Reads are too chatty to log at info.
    if !method.is_safe() {
        info!(parent: &span, status = %response.status(), "Editor request completed");
    }

    response
}
