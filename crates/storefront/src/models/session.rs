//! Session-related types.
//!
//! Each visitor's cart and carousel position are kept in their session and
//! loaded, mutated and written back by the route handlers.

use bottega_core::{AutoplayTimer, Carousel};
use serde::{Deserialize, Serialize};

/// Carousel position plus its autoplay deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselSession {
    pub carousel: Carousel,
    pub timer: AutoplayTimer,
}

/// Session keys.
pub mod keys {
    /// Key for the visitor's `CartSession`.
    pub const CART: &str = "cart";

    /// Key for the visitor's `CarouselSession`.
    pub const CAROUSEL: &str = "carousel";
}
