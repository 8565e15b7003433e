//! Cart line items.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// One row in the cart.
///
/// `quantity` is always at least 1; a line that would drop to zero is
/// removed by the cart instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub(crate) id: ProductId,
    pub(crate) name: String,
    pub(crate) unit_price: Price,
    pub(crate) quantity: u32,
}

impl LineItem {
    pub(crate) const fn single(id: ProductId, name: String, unit_price: Price) -> Self {
        Self {
            id,
            name,
            unit_price,
            quantity: 1,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn unit_price(&self) -> Price {
        self.unit_price
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `unit_price × quantity`.
    ///
    /// `Cart::add_item` never lets a line grow out of range; a line that
    /// was deserialized out of range saturates at [`Price::max`].
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price
            .checked_times(self.quantity)
            .unwrap_or(Price::max(self.unit_price.currency_code()))
    }
}
