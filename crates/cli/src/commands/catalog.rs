//! Catalog validation command.
//!
//! # Usage
//!
//! ```bash
//! bottega-cli catalog check crates/storefront/content/catalog.json
//! ```

use std::path::Path;

use bottega_storefront::catalog::{Catalog, CatalogError};

/// Load a catalog and log a summary of what it contains.
///
/// # Errors
///
/// Returns the first `CatalogError` found (unreadable file, bad JSON,
/// invalid or negative price, empty or duplicate id).
pub fn check(path: &Path) -> Result<Catalog, CatalogError> {
    let catalog = Catalog::load(path)?;

    if catalog.slides().is_empty() {
        tracing::warn!("Catalog has no carousel slides");
    }
    if catalog.products().is_empty() {
        tracing::warn!("Catalog has no products");
    }

    for product in catalog.products() {
        tracing::info!(id = %product.id, name = %product.name, price = %product.price, "Product");
    }
    tracing::info!(
        path = %path.display(),
        currency = catalog.currency().code(),
        slides = catalog.slides().len(),
        products = catalog.products().len(),
        "Catalog OK"
    );

    Ok(catalog)
}
