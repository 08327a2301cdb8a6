//! Request context and request ID propagation.

use axum::body::Body;
use axum::http::header::HeaderName;
use axum::http::{HeaderMap, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;

/// Header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Per-request context derived from headers.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request ID for tracing/correlation.
    pub request_id: String,
}

impl RequestContext {
    fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            request_id: request_id_from_headers(headers)
                .unwrap_or_else(|| ulid::Ulid::new().to_string()),
        }
    }
}

fn request_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn add_request_id_header(response: &mut Response, request_id: &str) {
    if let Ok(value) = HeaderValue::from_str(request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
}

/// Middleware that injects a [`RequestContext`] and echoes the request ID.
///
/// A caller-supplied `X-Request-Id` is reused; otherwise a ULID is generated.
pub async fn context_middleware(req: Request<Body>, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();
    let ctx = parts
        .extensions
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_else(|| RequestContext::from_headers(&parts.headers));
    parts.extensions.insert(ctx.clone());

    let span = tracing::info_span!("request", request_id = %ctx.request_id);
    let mut response = next
        .run(Request::from_parts(parts, body))
        .instrument(span)
        .await;
    add_request_id_header(&mut response, &ctx.request_id);
    response
}
