//! Per-request CSP nonce.
//!
//! `csp_nonce_middleware` stores a fresh nonce in the request extensions.
//! Handlers that render full pages extract it as [`CspNonce`] and put it on
//! their `<script>` tags; `security_headers_middleware` reads the same value
//! back when it builds the `Content-Security-Policy` header.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;

/// Random bytes per nonce (128 bits).
const NONCE_BYTES: usize = 16;

/// A base64url-encoded script nonce, unique per request.
///
/// The URL-safe alphabet without padding never needs HTML escaping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CspNonce(String);

impl CspNonce {
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; NONCE_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

pub async fn csp_nonce_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(CspNonce::generate());
    next.run(request).await
}

/// Never rejects. Without the middleware the nonce is empty and the CSP
/// falls back to allowing only the listed script origins.
impl<S> FromRequestParts<S> for CspNonce
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(nonce) = parts.extensions.get::<Self>() {
            return Ok(nonce.clone());
        }
        tracing::warn!("csp_nonce_middleware is not installed; rendering without a nonce");
        Ok(Self(String::new()))
    }
}
