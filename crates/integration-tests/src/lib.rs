//! Integration tests for Bottega.
//!
//! The storefront router is driven in-process with `tower::ServiceExt::oneshot`;
//! no server or network is involved. [`TestClient`] carries the session
//! cookie between requests the way a browser would, and [`ManualClock`]
//! makes carousel autoplay deadlines deterministic.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bottega-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use bottega_core::AggregationPolicy;
use bottega_storefront::catalog::Catalog;
use bottega_storefront::config::StorefrontConfig;
use bottega_storefront::state::{AppState, Clock};
use tower::ServiceExt;

/// Catalog shared by the integration tests: three slides, two products.
pub const TEST_CATALOG: &str = r#"{
    "currency": "EUR",
    "slides": [
        { "image": "/static/images/slide-0.svg", "alt": "Zero" },
        { "image": "/static/images/slide-1.svg", "alt": "One" },
        { "image": "/static/images/slide-2.svg", "alt": "Two", "caption": "Last" }
    ],
    "products": [
        { "id": "p1", "name": "Widget", "price": "9.99" },
        { "id": "p2", "name": "Gadget", "price": 5 }
    ]
}"#;

/// Autoplay interval used by [`TestClient`].
pub const TEST_INTERVAL_MS: u64 = 4000;

/// A clock the test moves by hand.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Arc<AtomicU64>);

impl ManualClock {
    pub fn set(&self, now_ms: u64) {
        self.0.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: u64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Header value as a string, if present and valid.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Image of the slide marked active in a carousel fragment or page.
    #[must_use]
    pub fn active_slide(&self) -> Option<&str> {
        let start = self.body.find("carousel-slide active")?;
        let rest = self.body.get(start..)?;
        let src = rest.find("src=\"")? + "src=\"".len();
        let rest = rest.get(src..)?;
        let end = rest.find('"')?;
        rest.get(..end)
    }

    /// Text of the out-of-band `#cart-notice` region, if one is shown.
    #[must_use]
    pub fn cart_notice(&self) -> Option<&str> {
        let start = self.body.find(r#"id="cart-notice" class="cart-notice shown""#)?;
        let rest = self.body.get(start..)?;
        let open = rest.find('>')? + 1;
        let rest = rest.get(open..)?;
        let end = rest.find("</div>")?;
        rest.get(..end).map(str::trim)
    }

    /// The `#cart-panel` fragment, without the notice region that follows it.
    #[must_use]
    pub fn cart_panel(&self) -> Option<&str> {
        let start = self.body.find(r#"<div id="cart-panel""#)?;
        let rest = self.body.get(start..)?;
        let end = rest.find(r#"<div id="cart-notice""#).unwrap_or(rest.len());
        rest.get(..end)
    }
}

/// One browser-like visitor: a router plus a cookie jar of one.
pub struct TestClient {
    app: Router,
    clock: ManualClock,
    cookie: Option<String>,
}

impl TestClient {
    /// A visitor on a storefront using `policy` and the test catalog.
    ///
    /// # Panics
    ///
    /// Panics if the test catalog does not parse.
    #[must_use]
    pub fn new(policy: AggregationPolicy) -> Self {
        Self::with_catalog(policy, TEST_CATALOG)
    }

    /// A visitor on a storefront using `policy` and a catalog given as JSON.
    ///
    /// # Panics
    ///
    /// Panics if `catalog_json` does not parse.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn with_catalog(policy: AggregationPolicy, catalog_json: &str) -> Self {
        let config = StorefrontConfig {
            cart_policy: policy,
            carousel_interval_ms: TEST_INTERVAL_MS,
            ..StorefrontConfig::default()
        };
        let catalog = Catalog::from_json(catalog_json).unwrap();
        let clock = ManualClock::default();
        let state = AppState::with_clock(config, catalog, clock.clone());
        Self {
            app: bottega_storefront::app(state),
            clock,
            cookie: None,
        }
    }

    /// A second visitor on the same storefront, with no cookie.
    #[must_use]
    pub fn stranger(&self) -> Self {
        Self {
            app: self.app.clone(),
            clock: self.clock.clone(),
            cookie: None,
        }
    }

    #[must_use]
    pub const fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send("GET", uri, None).await
    }

    /// POST an `application/x-www-form-urlencoded` body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn post(&mut self, uri: &str, form: &str) -> TestResponse {
        self.send("POST", uri, Some(form)).await
    }

    #[allow(clippy::unwrap_used)]
    async fn send(&mut self, method: &str, uri: &str, form: Option<&str>) -> TestResponse {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let body = match form {
            Some(form) => {
                request = request.header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                );
                Body::from(form.to_owned())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            let pair = set_cookie.split(';').next().unwrap_or_default();
            self.cookie = Some(pair.to_owned());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }
}
