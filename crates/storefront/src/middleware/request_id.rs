//! Request ID middleware for request tracing and correlation.
//!
//! Every request carries an `x-request-id`. An upstream value is reused when
//! it looks sane (short, visible ASCII); otherwise a UUID v4 is generated.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Upstream IDs longer than this are replaced.
const MAX_UPSTREAM_ID_LEN: usize = 128;

/// Ensure every request has a request ID and echo it in the response.
///
/// The ID is recorded in the current span's `request_id` field and set as a
/// Sentry tag.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|id| is_acceptable_upstream_id(id))
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

fn is_acceptable_upstream_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_UPSTREAM_ID_LEN
        && id.bytes().all(|b| b.is_ascii_graphic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_id_validation() {
        assert!(is_acceptable_upstream_id("cf-1234-abcd"));
        assert!(!is_acceptable_upstream_id(""));
        assert!(!is_acceptable_upstream_id("has space"));
        assert!(!is_acceptable_upstream_id(&"x".repeat(MAX_UPSTREAM_ID_LEN + 1)));
    }
}
