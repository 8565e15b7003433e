//! Cart controller with an injected render step.
//!
//! The controller owns a [`CartSession`] (the cart plus whether its panel is
//! open) and calls [`CartRenderer::render`] once after every operation,
//! including operations that changed nothing. Renderers always receive the
//! complete cart and redraw it from scratch.

use serde::{Deserialize, Serialize};

use super::line::LineItem;
use super::store::{Cart, CartChange, CartError, Checkout};
use crate::types::{Price, ProductId};

/// Whether the cart panel is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PanelState {
    Open,
    #[default]
    Closed,
}

impl PanelState {
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Open => Self::Closed,
            Self::Closed => Self::Open,
        }
    }
}

/// A blocking message shown to the shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Checkout was requested on an empty cart.
    EmptyCart,
    /// Checkout went through for `total`.
    CheckoutComplete { total: Price },
}

impl Notice {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::EmptyCart => "Your cart is empty!".to_string(),
            Self::CheckoutComplete { total } => {
                format!("Proceeding to checkout! Total to pay: {}", total.display())
            }
        }
    }
}

/// Per-visitor cart state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSession {
    pub cart: Cart,
    #[serde(default)]
    pub panel: PanelState,
}

impl CartSession {
    #[must_use]
    pub const fn new(cart: Cart) -> Self {
        Self {
            cart,
            panel: PanelState::Closed,
        }
    }
}

/// Everything a renderer needs to draw the cart.
#[derive(Debug, Clone, Copy)]
pub struct CartSnapshot<'a> {
    pub lines: &'a [LineItem],
    pub total: Price,
    pub item_count: u32,
    pub panel: PanelState,
    pub notice: Option<Notice>,
}

impl CartSnapshot<'_> {
    /// The checkout control is disabled while the cart is empty.
    #[must_use]
    pub const fn checkout_enabled(&self) -> bool {
        !self.lines.is_empty()
    }
}

/// Receives a full snapshot of the cart after each operation.
pub trait CartRenderer {
    fn render(&mut self, snapshot: &CartSnapshot<'_>);
}

/// Drives a [`CartSession`] and re-renders it on every operation.
#[derive(Debug)]
pub struct CartController<R> {
    session: CartSession,
    renderer: R,
}

impl<R: CartRenderer> CartController<R> {
    pub const fn new(session: CartSession, renderer: R) -> Self {
        Self { session, renderer }
    }

    #[must_use]
    pub const fn session(&self) -> &CartSession {
        &self.session
    }

    #[must_use]
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Give back the session and renderer.
    pub fn into_parts(self) -> (CartSession, R) {
        (self.session, self.renderer)
    }

    /// Draw the current state without changing it.
    pub fn refresh(&mut self) {
        self.render(None);
    }

    /// Add one unit and open the panel.
    ///
    /// # Errors
    ///
    /// Returns the cart's error unchanged; nothing is rendered in that case.
    pub fn add_item(
        &mut self,
        id: ProductId,
        name: impl Into<String>,
        unit_price: Price,
    ) -> Result<CartChange, CartError> {
        let change = self.session.cart.add_item(id, name, unit_price)?;
        self.session.panel = PanelState::Open;
        self.render(None);
        Ok(change)
    }

    /// Remove according to the cart's policy. Unknown ids still re-render.
    pub fn remove_item(&mut self, id: &ProductId) -> CartChange {
        let change = self.session.cart.remove_item(id);
        self.render(None);
        change
    }

    /// Show or hide the cart panel.
    pub fn toggle_panel(&mut self) -> PanelState {
        self.session.panel = self.session.panel.toggled();
        self.render(None);
        self.session.panel
    }

    /// Check out: an empty cart only raises a notice; otherwise the total is
    /// reported, the cart is cleared and the panel closed.
    pub fn checkout(&mut self) -> Checkout {
        let outcome = self.session.cart.checkout();
        let notice = match outcome {
            Checkout::Empty => Notice::EmptyCart,
            Checkout::Completed { total, .. } => {
                self.session.panel = PanelState::Closed;
                Notice::CheckoutComplete { total }
            }
        };
        self.render(Some(notice));
        outcome
    }

    fn render(&mut self, notice: Option<Notice>) {
        let cart = &self.session.cart;
        let snapshot = CartSnapshot {
            lines: cart.lines(),
            total: cart.total(),
            item_count: cart.item_count(),
            panel: self.session.panel,
            notice,
        };
        self.renderer.render(&snapshot);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::AggregationPolicy;
    use crate::types::CurrencyCode;

    /// Records what each render call saw.
    #[derive(Default)]
    struct Recorder {
        frames: Vec<(usize, String, u32, PanelState, Option<Notice>)>,
    }

    impl CartRenderer for Recorder {
        fn render(&mut self, snapshot: &CartSnapshot<'_>) {
            self.frames.push((
                snapshot.lines.len(),
                snapshot.total.display(),
                snapshot.item_count,
                snapshot.panel,
                snapshot.notice,
            ));
        }
    }

    fn euros(amount: &str) -> Price {
        Price::parse(amount, CurrencyCode::EUR).unwrap()
    }

    fn controller(policy: AggregationPolicy) -> CartController<Recorder> {
        let cart = Cart::new(policy, CurrencyCode::EUR);
        CartController::new(CartSession::new(cart), Recorder::default())
    }

    #[test]
    fn test_add_renders_and_opens_panel() {
        let mut ctl = controller(AggregationPolicy::Merge);
        ctl.add_item("p1".into(), "Widget", euros("9.99")).unwrap();

        assert_eq!(ctl.session().panel, PanelState::Open);
        assert_eq!(ctl.renderer().frames.len(), 1);
        let last = ctl.renderer().frames.last().unwrap();
        assert_eq!(last.0, 1);
        assert_eq!(last.3, PanelState::Open);
    }

    #[test]
    fn test_remove_unknown_still_renders() {
        let mut ctl = controller(AggregationPolicy::Merge);
        let change = ctl.remove_item(&"missing".into());

        assert_eq!(change, CartChange::Unchanged);
        assert_eq!(ctl.renderer().frames.len(), 1);
        assert_eq!(ctl.renderer().frames[0].1, "€ 0.00");
    }

    #[test]
    fn test_checkout_reports_total_and_closes_panel() {
        let mut ctl = controller(AggregationPolicy::Merge);
        ctl.add_item("p1".into(), "Widget", euros("9.99")).unwrap();
        ctl.add_item("p1".into(), "Widget", euros("9.99")).unwrap();
        assert_eq!(ctl.renderer().frames.len(), 2);

        let outcome = ctl.checkout();
        assert!(matches!(outcome, Checkout::Completed { item_count: 2, .. }));
        assert_eq!(ctl.renderer().frames.len(), 3);
        assert_eq!(ctl.session().panel, PanelState::Closed);
        assert!(ctl.session().cart.is_empty());

        let (lines, total, count, panel, notice) = ctl.renderer().frames.last().unwrap();
        assert_eq!(*lines, 0);
        assert_eq!(total, "€ 0.00");
        assert_eq!(*count, 0);
        assert_eq!(*panel, PanelState::Closed);
        assert_eq!(
            notice.unwrap().message(),
            "Proceeding to checkout! Total to pay: € 19.98"
        );
    }

    #[test]
    fn test_checkout_empty_emits_notice_only() {
        let mut ctl = controller(AggregationPolicy::Append);
        ctl.toggle_panel();
        let before = ctl.session().clone();
        assert_eq!(ctl.renderer().frames.len(), 1);

        assert_eq!(ctl.checkout(), Checkout::Empty);
        assert_eq!(ctl.session(), &before);
        assert_eq!(ctl.renderer().frames.len(), 2);
        let last = ctl.renderer().frames.last().unwrap();
        assert_eq!(last.4, Some(Notice::EmptyCart));
        assert_eq!(last.3, PanelState::Open);
    }

    #[test]
    fn test_rejected_add_does_not_render() {
        let mut ctl = controller(AggregationPolicy::Merge);
        let huge = euros("40000000000000000000000000000");
        ctl.add_item("p1".into(), "Yacht", huge).unwrap();
        ctl.toggle_panel();

        let err = ctl.add_item("p1".into(), "Yacht", huge).unwrap_err();
        assert_eq!(err, CartError::Overflow { item: "p1".into() });
        assert_eq!(ctl.renderer().frames.len(), 2);
        assert_eq!(ctl.session().panel, PanelState::Closed);
    }

    #[test]
    fn test_toggle_flips_panel() {
        let mut ctl = controller(AggregationPolicy::Merge);
        assert_eq!(ctl.toggle_panel(), PanelState::Open);
        assert_eq!(ctl.toggle_panel(), PanelState::Closed);
        assert_eq!(ctl.renderer().frames.len(), 2);
    }
}
