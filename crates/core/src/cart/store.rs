//! The cart store and its state transitions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::line::LineItem;
use super::policy::AggregationPolicy;
use crate::types::{CurrencyCode, Price, ProductId};

/// Errors produced by cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("cannot add {item} priced in {item_currency:?} to a {cart_currency:?} cart")]
    CurrencyMismatch {
        item: ProductId,
        item_currency: CurrencyCode,
        cart_currency: CurrencyCode,
    },
    #[error("adding {item} would overflow the cart total")]
    Overflow { item: ProductId },
}

/// What a single add or remove did to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// A unit was added. `merged` is true when an existing line was bumped.
    Added { merged: bool },
    /// One unit was taken off a line that still has units left.
    Decremented,
    /// `count` lines were deleted.
    Removed { count: usize },
    /// Nothing matched.
    Unchanged,
}

/// Result of a checkout attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkout {
    /// The cart was empty and has not changed.
    Empty,
    /// The cart held `item_count` units worth `total` and is now empty.
    Completed { total: Price, item_count: u32 },
}

/// An ordered collection of line items in a single currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    policy: AggregationPolicy,
    currency: CurrencyCode,
    lines: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new(policy: AggregationPolicy, currency: CurrencyCode) -> Self {
        Self {
            policy,
            currency,
            lines: Vec::new(),
        }
    }

    #[must_use]
    pub const fn policy(&self) -> AggregationPolicy {
        self.policy
    }

    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    #[must_use]
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one unit of a product.
    ///
    /// Under `Merge` an existing line for `id` has its quantity bumped;
    /// otherwise (and always under `Append`) a new line is pushed.
    ///
    /// # Errors
    ///
    /// Returns `CartError::CurrencyMismatch` if `unit_price` is not in the
    /// cart's currency, and `CartError::Overflow` if one more unit would
    /// push the total out of range. The cart is unchanged on error.
    pub fn add_item(
        &mut self,
        id: ProductId,
        name: impl Into<String>,
        unit_price: Price,
    ) -> Result<CartChange, CartError> {
        if unit_price.currency_code() != self.currency {
            return Err(CartError::CurrencyMismatch {
                item: id,
                item_currency: unit_price.currency_code(),
                cart_currency: self.currency,
            });
        }
        // Every line total is bounded by the cart total, so this also covers
        // the bumped quantity under `Merge`.
        let next_total = self
            .checked_total()
            .and_then(|sum| sum.checked_add(unit_price.amount()));
        if next_total.is_none() {
            return Err(CartError::Overflow { item: id });
        }

        let existing = match self.policy {
            AggregationPolicy::Merge => self.lines.iter_mut().find(|line| line.id == id),
            AggregationPolicy::Append => None,
        };
        if let Some(line) = existing {
            line.quantity = line.quantity.saturating_add(1);
            return Ok(CartChange::Added { merged: true });
        }

        self.lines.push(LineItem::single(id, name.into(), unit_price));
        Ok(CartChange::Added { merged: false })
    }

    /// Remove a product.
    ///
    /// Under `Merge` one unit is taken off and the line is deleted when it
    /// held a single unit. Under `Append` every line for `id` is deleted.
    /// Unknown ids leave the cart untouched.
    pub fn remove_item(&mut self, id: &ProductId) -> CartChange {
        match self.policy {
            AggregationPolicy::Merge => {
                let Some(index) = self.lines.iter().position(|line| &line.id == id) else {
                    return CartChange::Unchanged;
                };
                match self.lines.get_mut(index) {
                    Some(line) if line.quantity > 1 => {
                        line.quantity -= 1;
                        CartChange::Decremented
                    }
                    _ => {
                        self.lines.remove(index);
                        CartChange::Removed { count: 1 }
                    }
                }
            }
            AggregationPolicy::Append => {
                let before = self.lines.len();
                self.lines.retain(|line| &line.id != id);
                match before - self.lines.len() {
                    0 => CartChange::Unchanged,
                    count => CartChange::Removed { count },
                }
            }
        }
    }

    /// Σ(unit price × quantity) over every line.
    ///
    /// `add_item` keeps this in range; a cart deserialized out of range
    /// saturates at [`Price::max`].
    #[must_use]
    pub fn total(&self) -> Price {
        self.checked_total()
            .and_then(|amount| Price::try_new(amount, self.currency).ok())
            .unwrap_or(Price::max(self.currency))
    }

    fn checked_total(&self) -> Option<Decimal> {
        self.lines.iter().try_fold(Decimal::ZERO, |sum, line| {
            line.unit_price
                .amount()
                .checked_mul(Decimal::from(line.quantity))?
                .checked_add(sum)
        })
    }

    /// Badge count: Σ(quantity). Under `Append` this is the number of lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0_u32, |sum, line| sum.saturating_add(line.quantity))
    }

    /// Empty the cart, reporting what it held.
    pub fn checkout(&mut self) -> Checkout {
        if self.lines.is_empty() {
            return Checkout::Empty;
        }
        let outcome = Checkout::Completed {
            total: self.total(),
            item_count: self.item_count(),
        };
        self.lines.clear();
        outcome
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn euros(amount: &str) -> Price {
        Price::parse(amount, CurrencyCode::EUR).unwrap()
    }

    fn merge_cart() -> Cart {
        Cart::new(AggregationPolicy::Merge, CurrencyCode::EUR)
    }

    fn append_cart() -> Cart {
        Cart::new(AggregationPolicy::Append, CurrencyCode::EUR)
    }

    #[test]
    fn test_merge_same_id_twice_tracks_quantity() {
        let mut cart = merge_cart();
        let first = cart.add_item("p1".into(), "Widget", euros("9.99")).unwrap();
        let second = cart.add_item("p1".into(), "Widget", euros("9.99")).unwrap();

        assert_eq!(first, CartChange::Added { merged: false });
        assert_eq!(second, CartChange::Added { merged: true });
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity(), 2);
        assert_eq!(cart.total().display(), "€ 19.98");
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_merge_remove_decrements_before_deleting() {
        let mut cart = merge_cart();
        cart.add_item("p1".into(), "Widget", euros("9.99")).unwrap();
        cart.add_item("p1".into(), "Widget", euros("9.99")).unwrap();

        assert_eq!(cart.remove_item(&"p1".into()), CartChange::Decremented);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity(), 1);

        assert_eq!(
            cart.remove_item(&"p1".into()),
            CartChange::Removed { count: 1 }
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut cart = merge_cart();
        cart.add_item("p1".into(), "Widget", euros("9.99")).unwrap();
        let before = cart.clone();

        assert_eq!(cart.remove_item(&"nope".into()), CartChange::Unchanged);
        assert_eq!(cart, before);

        let mut cart = append_cart();
        assert_eq!(cart.remove_item(&"nope".into()), CartChange::Unchanged);
    }

    #[test]
    fn test_merge_keeps_insertion_order() {
        let mut cart = merge_cart();
        cart.add_item("b".into(), "Bolt", euros("1.00")).unwrap();
        cart.add_item("a".into(), "Anchor", euros("2.00")).unwrap();
        cart.add_item("b".into(), "Bolt", euros("1.00")).unwrap();

        let ids: Vec<_> = cart.lines().iter().map(|l| l.id().as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_total_and_badge_follow_quantities() {
        let mut cart = merge_cart();
        cart.add_item("p1".into(), "Widget", euros("9.99")).unwrap();
        cart.add_item("p1".into(), "Widget", euros("9.99")).unwrap();
        cart.add_item("p2".into(), "Gadget", euros("0.50")).unwrap();
        cart.add_item("p1".into(), "Widget", euros("9.99")).unwrap();
        cart.remove_item(&"p1".into());

        let expected: Decimal = cart
            .lines()
            .iter()
            .map(|l| l.unit_price().amount() * Decimal::from(l.quantity()))
            .sum();
        assert_eq!(cart.total().amount(), expected);
        assert_eq!(cart.total().display(), "€ 20.48");
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_append_same_id_twice_keeps_two_lines() {
        let mut cart = append_cart();
        cart.add_item("p1".into(), "Widget", euros("9.99")).unwrap();
        let second = cart.add_item("p1".into(), "Widget", euros("9.99")).unwrap();

        assert_eq!(second, CartChange::Added { merged: false });
        assert_eq!(cart.lines().len(), 2);
        assert!(cart.lines().iter().all(|l| l.quantity() == 1));
        assert_eq!(cart.total().display(), "€ 19.98");
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_append_remove_drops_every_matching_line() {
        let mut cart = append_cart();
        cart.add_item("p1".into(), "Widget", euros("9.99")).unwrap();
        cart.add_item("p2".into(), "Gadget", euros("5.00")).unwrap();
        cart.add_item("p1".into(), "Widget", euros("9.99")).unwrap();

        assert_eq!(
            cart.remove_item(&"p1".into()),
            CartChange::Removed { count: 2 }
        );
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].id().as_str(), "p2");

        cart.remove_item(&"p2".into());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_checkout_empties_cart() {
        let mut cart = merge_cart();
        cart.add_item("p1".into(), "Widget", euros("9.99")).unwrap();
        cart.add_item("p1".into(), "Widget", euros("9.99")).unwrap();

        let outcome = cart.checkout();
        assert_eq!(
            outcome,
            Checkout::Completed {
                total: euros("19.98"),
                item_count: 2
            }
        );
        assert!(cart.is_empty());
        assert_eq!(cart.total().display(), "€ 0.00");
    }

    #[test]
    fn test_checkout_on_empty_cart_changes_nothing() {
        let mut cart = merge_cart();
        assert_eq!(cart.checkout(), Checkout::Empty);
        assert_eq!(cart, merge_cart());
    }

    #[test]
    fn test_add_rejects_other_currency() {
        let mut cart = merge_cart();
        let dollars = Price::parse("1.00", CurrencyCode::USD).unwrap();
        let err = cart.add_item("p1".into(), "Widget", dollars).unwrap_err();
        assert!(matches!(err, CartError::CurrencyMismatch { .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_rejects_total_overflow_under_both_policies() {
        let huge = euros("40000000000000000000000000000");
        for mut cart in [merge_cart(), append_cart()] {
            cart.add_item("p1".into(), "Yacht", huge).unwrap();
            let before = cart.clone();

            let err = cart.add_item("p1".into(), "Yacht", huge).unwrap_err();
            assert_eq!(err, CartError::Overflow { item: "p1".into() });
            assert_eq!(cart, before);
            assert_eq!(cart.total(), huge);

            // Small items still fit alongside.
            cart.add_item("p2".into(), "Gadget", euros("5.00")).unwrap();
            assert_eq!(cart.item_count(), 2);
        }
    }

    #[test]
    fn test_cart_roundtrips_through_json() {
        let mut cart = append_cart();
        cart.add_item("p1".into(), "Widget", euros("9.99")).unwrap();
        let json = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }
}
