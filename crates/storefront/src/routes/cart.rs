//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation loads the visitor's `CartSession`, runs it through a
//! `CartController` whose renderer rebuilds the whole panel view, stores the
//! session back and returns the freshly rendered panel fragment.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use bottega_core::{
    CartChange, CartController, CartRenderer, CartSession, CartSnapshot, Checkout, ProductId,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::keys;
use crate::state::AppState;

/// HTMX event fired after any cart mutation.
const CART_UPDATED_TRIGGER: (&str, &str) = ("HX-Trigger", "cart-updated");

/// Cart item display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u32,
    pub open: bool,
    pub checkout_enabled: bool,
    pub notice: Option<String>,
}

impl From<&CartSnapshot<'_>> for CartView {
    fn from(snapshot: &CartSnapshot<'_>) -> Self {
        Self {
            items: snapshot
                .lines
                .iter()
                .map(|line| CartItemView {
                    id: line.id().to_string(),
                    name: line.name().to_string(),
                    quantity: line.quantity(),
                    unit_price: line.unit_price().display(),
                    line_price: line.line_total().display(),
                })
                .collect(),
            total: snapshot.total.display(),
            item_count: snapshot.item_count,
            open: snapshot.panel.is_open(),
            checkout_enabled: snapshot.checkout_enabled(),
            notice: snapshot.notice.map(|notice| notice.message()),
        }
    }
}

/// Renderer that redraws the whole panel view on every call.
#[derive(Debug, Default)]
pub struct PanelRenderer {
    view: Option<CartView>,
}

impl PanelRenderer {
    /// The view from the most recent render.
    #[must_use]
    pub fn into_view(self) -> Option<CartView> {
        self.view
    }
}

impl CartRenderer for PanelRenderer {
    fn render(&mut self, snapshot: &CartSnapshot<'_>) {
        self.view = Some(CartView::from(snapshot));
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the visitor's cart, starting an empty one on first access.
pub(crate) async fn load_cart(session: &Session, state: &AppState) -> Result<CartSession> {
    Ok(session
        .get::<CartSession>(keys::CART)
        .await?
        .unwrap_or_else(|| state.new_cart_session()))
}

/// A controller over the visitor's cart, rendering into a fresh panel view.
async fn controller_for(
    session: &Session,
    state: &AppState,
) -> Result<CartController<PanelRenderer>> {
    Ok(CartController::new(
        load_cart(session, state).await?,
        PanelRenderer::default(),
    ))
}

/// Store the cart back and return the last rendered view.
async fn finish(session: &Session, controller: CartController<PanelRenderer>) -> Result<CartView> {
    let (cart_session, renderer) = controller.into_parts();
    session.insert(keys::CART, &cart_session).await?;
    renderer
        .into_view()
        .ok_or_else(|| AppError::Internal("cart operation did not render".to_string()))
}

/// Render the current cart without changing it.
pub(crate) async fn current_view(session: &Session, state: &AppState) -> Result<CartView> {
    let mut controller = controller_for(session, state).await?;
    controller.refresh();
    let (_, renderer) = controller.into_parts();
    renderer
        .into_view()
        .ok_or_else(|| AppError::Internal("cart refresh did not render".to_string()))
}

// =============================================================================
// Forms and Templates
// =============================================================================

/// Add/remove form data, posted from a product card or a cart line.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub id: String,
}

impl ProductForm {
    fn product_id(&self) -> Result<ProductId> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(AppError::BadRequest("missing product id".to_string()));
        }
        Ok(ProductId::new(id))
    }
}

/// Cart panel fragment template (for HTMX).
///
/// Also carries `#cart-notice` as an out-of-band swap, so a notice shows
/// even when the panel closes, and a stale one is cleared.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_update.html")]
pub struct CartPanelTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

fn updated(cart: CartView) -> Response {
    (
        AppendHeaders([CART_UPDATED_TRIGGER]),
        CartPanelTemplate { cart },
    )
        .into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Cart panel fragment.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<CartPanelTemplate> {
    Ok(CartPanelTemplate {
        cart: current_view(&session, &state).await?,
    })
}

/// Cart count badge fragment.
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<CartCountTemplate> {
    let cart_session = load_cart(&session, &state).await?;
    Ok(CartCountTemplate {
        count: cart_session.cart.item_count(),
    })
}

/// Add one unit of a catalog product and open the panel.
///
/// Name and price come from the catalog, never from the client.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let id = form.product_id()?;
    let product = state
        .catalog()
        .product(&id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let mut controller = controller_for(&session, &state).await?;
    let change = controller.add_item(id.clone(), product.name.clone(), product.price)?;
    tracing::info!(product_id = %id, ?change, "Added to cart");

    Ok(updated(finish(&session, controller).await?))
}

/// Remove a product according to the cart's policy.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let id = form.product_id()?;

    let mut controller = controller_for(&session, &state).await?;
    let change = controller.remove_item(&id);
    if change == CartChange::Unchanged {
        tracing::debug!(product_id = %id, "Remove ignored: product not in cart");
    } else {
        tracing::info!(product_id = %id, ?change, "Removed from cart");
    }

    Ok(updated(finish(&session, controller).await?))
}

/// Show or hide the cart panel.
#[instrument(skip(state, session))]
pub async fn toggle(State(state): State<AppState>, session: Session) -> Result<CartPanelTemplate> {
    let mut controller = controller_for(&session, &state).await?;
    controller.toggle_panel();
    Ok(CartPanelTemplate {
        cart: finish(&session, controller).await?,
    })
}

/// Simulated checkout: report the total and empty the cart.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Result<Response> {
    let mut controller = controller_for(&session, &state).await?;
    match controller.checkout() {
        Checkout::Empty => tracing::info!("Checkout requested on empty cart"),
        Checkout::Completed { total, item_count } => {
            let total = total.display();
            let items = item_count.to_string();
            tracing::info!(%total, item_count, "Checkout completed");
            add_breadcrumb(
                "cart",
                "Checked out",
                Some(&[("total", total.as_str()), ("item_count", items.as_str())]),
            );
        }
    }

    Ok(updated(finish(&session, controller).await?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bottega_core::{AggregationPolicy, Cart, CurrencyCode, Price};

    use super::*;

    fn controller(policy: AggregationPolicy) -> CartController<PanelRenderer> {
        let cart = Cart::new(policy, CurrencyCode::EUR);
        CartController::new(CartSession::new(cart), PanelRenderer::default())
    }

    fn widget_price() -> Price {
        Price::parse("9.99", CurrencyCode::EUR).unwrap()
    }

    #[test]
    fn test_view_for_merged_lines() {
        let mut ctl = controller(AggregationPolicy::Merge);
        ctl.add_item("p1".into(), "Widget", widget_price()).unwrap();
        ctl.add_item("p1".into(), "Widget", widget_price()).unwrap();

        let (_, renderer) = ctl.into_parts();
        let view = renderer.into_view().unwrap();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].quantity, 2);
        assert_eq!(view.items[0].unit_price, "€ 9.99");
        assert_eq!(view.items[0].line_price, "€ 19.98");
        assert_eq!(view.total, "€ 19.98");
        assert_eq!(view.item_count, 2);
        assert!(view.open);
        assert!(view.checkout_enabled);
        assert!(view.notice.is_none());
    }

    #[test]
    fn test_view_for_appended_lines() {
        let mut ctl = controller(AggregationPolicy::Append);
        ctl.add_item("p1".into(), "Widget", widget_price()).unwrap();
        ctl.add_item("p1".into(), "Widget", widget_price()).unwrap();

        let (_, renderer) = ctl.into_parts();
        let view = renderer.into_view().unwrap();
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.total, "€ 19.98");
        assert_eq!(view.item_count, 2);
    }

    #[test]
    fn test_empty_view_disables_checkout() {
        let mut ctl = controller(AggregationPolicy::Merge);
        ctl.checkout();
        let (_, renderer) = ctl.into_parts();
        let view = renderer.into_view().unwrap();
        assert!(!view.checkout_enabled);
        assert_eq!(view.total, "€ 0.00");
        assert_eq!(view.notice.as_deref(), Some("Your cart is empty!"));
    }

    #[test]
    fn test_panel_template_renders_lines() {
        let mut ctl = controller(AggregationPolicy::Merge);
        ctl.add_item("p1".into(), "Widget", widget_price()).unwrap();
        let (_, renderer) = ctl.into_parts();

        let html = CartPanelTemplate {
            cart: renderer.into_view().unwrap(),
        }
        .render()
        .unwrap();
        assert!(html.contains("Widget"));
        assert!(html.contains("1 x € 9.99"));
        assert!(html.contains("id=\"cart-panel\""));
        assert!(html.contains("cart-panel open"));
        assert!(html.contains(r#"id="cart-notice" class="cart-notice""#));
        assert!(!html.contains("cart-notice shown"));
    }

    #[test]
    fn test_checkout_notice_renders_outside_closed_panel() {
        let mut ctl = controller(AggregationPolicy::Merge);
        ctl.add_item("p1".into(), "Widget", widget_price()).unwrap();
        ctl.checkout();
        let (_, renderer) = ctl.into_parts();

        let html = CartPanelTemplate {
            cart: renderer.into_view().unwrap(),
        }
        .render()
        .unwrap();
        let (panel, rest) = html.split_once(r#"<div id="cart-notice""#).unwrap();
        assert!(!panel.contains("cart-panel open"));
        assert!(!panel.contains("Proceeding to checkout"));
        assert!(rest.contains("cart-notice shown"));
        assert!(rest.contains(r#"hx-swap-oob="true""#));
        assert!(rest.contains("Proceeding to checkout! Total to pay: € 9.99"));
    }
}
