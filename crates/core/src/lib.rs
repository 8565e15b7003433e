//! Bottega Core - Domain types for the storefront product page.
//!
//! This crate holds the state machines behind the product page:
//! - [`cart`] - Line items, the cart store and its aggregation policy
//! - [`carousel`] - Wrapping slide index with an autoplay deadline timer
//! - [`scroller`] - Continuous horizontal auto-scroll position
//!
//! # Architecture
//!
//! The core crate contains only types and state transitions - no I/O, no
//! clocks, no HTTP. Time is passed in as milliseconds by the caller, so every
//! transition is deterministic and testable.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod carousel;
pub mod cart;
pub mod scroller;
pub mod types;

pub use carousel::{AutoplayTimer, Carousel, CarouselError};
pub use cart::{
    AggregationPolicy, Cart, CartChange, CartController, CartError, CartRenderer, CartSession,
    CartSnapshot, Checkout, LineItem, Notice, PanelState,
};
pub use scroller::{AutoScroller, DEFAULT_SCROLL_SPEED};
pub use types::*;
