//! Product catalog and carousel slides.
//!
//! The catalog is loaded once at startup from a JSON file and kept in memory.
//! Product prices are validated here: a non-numeric or negative price fails
//! the load instead of reaching the cart.
//!
//! ```json
//! {
//!   "currency": "EUR",
//!   "slides": [{ "image": "/static/images/hero-1.jpg", "alt": "Spring sale" }],
//!   "products": [{ "id": "p1", "name": "Widget", "price": "9.99" }]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use bottega_core::{CurrencyCode, Price, PriceError, ProductId};
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {message}")]
    Io { path: String, message: String },
    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("product {id}: {source}")]
    InvalidPrice {
        id: String,
        #[source]
        source: PriceError,
    },
    #[error("product id must not be empty (product #{0})")]
    EmptyId(usize),
    #[error("duplicate product id: {0}")]
    DuplicateProduct(String),
}

/// A sellable product shown as a card on the product page.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: Option<String>,
    pub description: Option<String>,
}

/// One carousel slide.
#[derive(Debug, Clone, Deserialize)]
pub struct Slide {
    pub image: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    currency: CurrencyCode,
    #[serde(default)]
    slides: Vec<Slide>,
    #[serde(default)]
    products: Vec<RawProduct>,
}

#[derive(Deserialize)]
struct RawProduct {
    id: String,
    name: String,
    price: RawAmount,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Prices may be written as `"9.99"` or `9.99`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Text(String),
    Number(serde_json::Number),
}

impl RawAmount {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

/// In-memory catalog. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Catalog {
    currency: CurrencyCode,
    slides: Arc<Vec<Slide>>,
    products: Arc<Vec<Product>>,
    by_id: Arc<HashMap<ProductId, usize>>,
}

impl Catalog {
    /// Load the catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails validation.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            products = catalog.products.len(),
            slides = catalog.slides.len(),
            currency = catalog.currency.code(),
            "Loaded catalog"
        );
        Ok(catalog)
    }

    /// Parse and validate catalog JSON.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed JSON, invalid prices, empty or
    /// duplicate product ids.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let currency = file.currency;

        let mut products = Vec::with_capacity(file.products.len());
        let mut by_id = HashMap::with_capacity(file.products.len());

        for (position, raw) in file.products.into_iter().enumerate() {
            let id = raw.id.trim().to_string();
            if id.is_empty() {
                return Err(CatalogError::EmptyId(position));
            }
            let price = Price::parse(&raw.price.into_string(), currency).map_err(|source| {
                CatalogError::InvalidPrice {
                    id: id.clone(),
                    source,
                }
            })?;
            let id = ProductId::new(id);
            if by_id.insert(id.clone(), products.len()).is_some() {
                return Err(CatalogError::DuplicateProduct(id.to_string()));
            }
            products.push(Product {
                id,
                name: raw.name,
                price,
                image: raw.image,
                description: raw.description,
            });
        }

        Ok(Self {
            currency,
            slides: Arc::new(file.slides),
            products: Arc::new(products),
            by_id: Arc::new(by_id),
        })
    }

    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    #[must_use]
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.by_id
            .get(id)
            .and_then(|&index| self.products.get(index))
    }
}
