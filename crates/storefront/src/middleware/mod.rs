//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (added in `main`)
//! 2. CSP nonce (generate per-request nonce for inline scripts)
//! 3. Security headers (CSP built from the nonce, frame denial, etc.)
//! 4. `TraceLayer` (request span)
//! 5. Request ID (recorded into the request span)
//! 6. Session layer (tower-sessions with in-memory store)

pub mod csp;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use csp::{CspNonce, csp_nonce_middleware};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
