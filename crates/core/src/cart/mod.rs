//! Shopping cart state.
//!
//! The cart is an owned, ordered list of [`LineItem`]s. How repeated adds of
//! the same product are recorded is decided by its [`AggregationPolicy`]:
//!
//! - [`AggregationPolicy::Merge`] keeps one line per product and tracks a
//!   quantity; removing decrements one unit at a time.
//! - [`AggregationPolicy::Append`] records every add as its own line;
//!   removing drops every line for that product at once.
//!
//! Display is driven through [`CartController`], which re-renders the whole
//! cart via a [`CartRenderer`] after every operation.

mod controller;
mod line;
mod policy;
mod store;

pub use controller::{CartController, CartRenderer, CartSession, CartSnapshot, Notice, PanelState};
pub use line::LineItem;
pub use policy::AggregationPolicy;
pub use store::{Cart, CartChange, CartError, Checkout};
