//! Security headers middleware for XSS, clickjacking, and isolation protection.
//!
//! The page needs exactly two script sources: our own `/static/js` files and
//! the pinned HTMX build on unpkg. Everything else stays locked down.

use axum::{
    extract::Request,
    http::{
        HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

use super::csp::CspNonce;

/// Origin of the HTMX script.
pub const HTMX_ORIGIN: &str = "https://unpkg.com";

/// Build the CSP header value for a request nonce.
///
/// ```text
/// default-src 'none';
/// script-src 'self' https://unpkg.com 'nonce-<nonce>';
/// style-src 'self';
/// img-src 'self' data:;
/// connect-src 'self';
/// base-uri 'self';
/// form-action 'self';
/// frame-ancestors 'none'
/// ```
#[must_use]
pub fn content_security_policy(nonce: Option<&str>) -> String {
    let nonce_source = nonce
        .filter(|n| !n.is_empty())
        .map(|n| format!(" 'nonce-{n}'"))
        .unwrap_or_default();
    format!(
        "default-src 'none'; \
         script-src 'self' {origin}{nonce_source}; \
         style-src 'self'; \
         img-src 'self' data:; \
         connect-src 'self'; \
         base-uri 'self'; \
         form-action 'self'; \
         frame-ancestors 'none'",
        origin = HTMX_ORIGIN,
    )
}

/// Add security headers to all responses.
///
/// Headers applied:
/// - `Content-Security-Policy` - see [`content_security_policy`]
/// - `X-Frame-Options: DENY` - Prevent clickjacking
/// - `X-Content-Type-Options: nosniff` - Prevent MIME sniffing
/// - `Referrer-Policy: no-referrer`
/// - `Cross-Origin-Opener-Policy: same-origin`
/// - `Cache-Control: no-store` - unless the handler set its own; cart
///   fragments are per-visitor and must never be cached
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let nonce = request.extensions().get::<CspNonce>().cloned();
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    let csp = content_security_policy(nonce.as_ref().map(CspNonce::value));
    match HeaderValue::from_str(&csp) {
        Ok(value) => {
            headers.insert(CONTENT_SECURITY_POLICY, value);
        }
        Err(e) => tracing::error!("Invalid CSP header value: {e}"),
    }

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("no-referrer"));
    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );
    headers
        .entry(CACHE_CONTROL)
        .or_insert_with(|| HeaderValue::from_static("no-store, max-age=0"));

    response
}
