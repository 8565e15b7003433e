//! Application state shared across handlers.

use std::sync::Arc;

use bottega_core::{AutoScroller, AutoplayTimer, Cart, CartSession, Carousel};

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::models::CarouselSession;

/// Millisecond wall clock used for carousel autoplay deadlines.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// The real clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the immutable catalog. Carts are not stored here; each
/// visitor's cart lives in their session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    clock: Box<dyn Clock>,
}

impl AppState {
    /// Create a new application state using the system clock.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        Self::with_clock(config, catalog, SystemClock)
    }

    /// Create a new application state with a custom clock.
    #[must_use]
    pub fn with_clock(
        config: StorefrontConfig,
        catalog: Catalog,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                clock: Box::new(clock),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Current time in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.inner.clock.now_ms()
    }

    /// A fresh, empty cart using the configured policy and catalog currency.
    #[must_use]
    pub fn new_cart_session(&self) -> CartSession {
        CartSession::new(Cart::new(
            self.config().cart_policy,
            self.catalog().currency(),
        ))
    }

    /// A carousel on its first slide with a disarmed autoplay timer.
    #[must_use]
    pub fn new_carousel_session(&self) -> CarouselSession {
        CarouselSession {
            carousel: Carousel::new(self.catalog().slides().len()),
            timer: AutoplayTimer::new(self.config().carousel_interval_ms),
        }
    }

    /// The product strip scroller, sized by product count.
    #[must_use]
    pub fn new_scroller(&self) -> AutoScroller {
        #[allow(clippy::cast_precision_loss)] // catalog sizes are tiny
        let cards = self.catalog().products().len() as f64;
        AutoScroller::new(cards * crate::routes::home::CARD_WIDTH_PX, self.config().scroller_speed)
    }
}
