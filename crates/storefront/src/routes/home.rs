//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use bottega_core::{AggregationPolicy, AutoScroller};
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::Product;
use crate::error::Result;
use crate::filters;
use crate::middleware::CspNonce;
use crate::routes::carousel::{self, CarouselView};
use crate::routes::cart::{self, CartView};
use crate::state::AppState;

/// Width of one product card plus its gap, in CSS pixels.
///
/// Must match `.product-card` in `main.css`.
pub const CARD_WIDTH_PX: f64 = 240.0;

// =============================================================================
// Views
// =============================================================================

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image: Option<String>,
    pub description: Option<String>,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: product.price.display(),
            image: product.image.clone(),
            description: product.description.clone(),
        }
    }
}

/// Initial state for the browser-side product strip scroller.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollerView {
    /// Pixels per animation frame.
    pub speed: String,
    /// Scrollable width in pixels.
    pub max_offset: String,
    /// Slider position, 0-100.
    pub range_value: u8,
}

impl From<&AutoScroller> for ScrollerView {
    fn from(scroller: &AutoScroller) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=100
        let range_value = (scroller.fraction() * 100.0).round().clamp(0.0, 100.0) as u8;
        Self {
            speed: format!("{:.2}", scroller.speed()),
            max_offset: format!("{:.0}", scroller.max_offset()),
            range_value,
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub products: Vec<ProductCardView>,
    pub carousel: CarouselView,
    pub scroller: ScrollerView,
    pub cart: CartView,
    /// Script nonce for the inline HTMX config.
    pub nonce: String,
    /// Active cart policy, shown as a hint next to the cart.
    pub policy: AggregationPolicy,
}

/// Display the home page.
#[instrument(skip(state, session, nonce))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
) -> Result<HomeTemplate> {
    let products = state
        .catalog()
        .products()
        .iter()
        .map(ProductCardView::from)
        .collect();

    Ok(HomeTemplate {
        products,
        carousel: carousel::start(&session, &state).await?,
        scroller: ScrollerView::from(&state.new_scroller()),
        cart: cart::current_view(&session, &state).await?,
        nonce: nonce.into_inner(),
        policy: state.config().cart_policy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroller_view_starts_at_zero() {
        let view = ScrollerView::from(&AutoScroller::new(4.0 * CARD_WIDTH_PX, 1.5));
        assert_eq!(view.range_value, 0);
        assert_eq!(view.speed, "1.50");
        assert_eq!(view.max_offset, "960");
    }

    #[test]
    fn test_scroller_view_tracks_seek() {
        let mut scroller = AutoScroller::new(1000.0, 1.0);
        scroller.seek_fraction(0.5);
        assert_eq!(ScrollerView::from(&scroller).range_value, 50);
    }
}
