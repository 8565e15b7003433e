//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (carousel, product strip, cart)
//! GET  /health                 - Health check
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart panel fragment
//! GET  /cart/count             - Cart count badge (fragment)
//! POST /cart/add               - Add product `id` (returns panel, triggers cart-updated)
//! POST /cart/remove            - Remove product `id` (returns panel, triggers cart-updated)
//! POST /cart/toggle            - Show/hide the panel (returns panel)
//! POST /cart/checkout          - Simulated checkout (returns panel with notice)
//!
//! # Carousel (HTMX fragments)
//! POST /carousel/advance       - Next/previous slide (`?step=-1`), autoplay tick (`?auto=true`)
//! POST /carousel/go/{index}    - Jump to slide
//! ```

pub mod carousel;
pub mod cart;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/toggle", post(cart::toggle))
        .route("/checkout", post(cart::checkout))
}

/// Create the carousel routes router.
pub fn carousel_routes() -> Router<AppState> {
    Router::new()
        .route("/advance", post(carousel::advance))
        .route("/go/{index}", post(carousel::go))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Cart routes
        .nest("/cart", cart_routes())
        // Carousel routes
        .nest("/carousel", carousel_routes())
}
