//! Core types for Bottega.
//!
//! This module provides type-safe wrappers for product identifiers and prices.

pub mod id;
pub mod price;

pub use id::ProductId;
pub use price::{CurrencyCode, Price, PriceError};
