//! Cart replay command.
//!
//! Runs a scripted sequence of cart operations through the same
//! `CartController` the storefront uses, logging every render.
//!
//! # Usage
//!
//! ```bash
//! bottega-cli cart replay --policy merge add:p1 add:p1 remove:p1 checkout
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use bottega_core::{
    AggregationPolicy, Cart, CartController, CartError, CartRenderer, CartSession, CartSnapshot,
    ProductId,
};
use bottega_storefront::catalog::{Catalog, CatalogError};
use thiserror::Error;

/// Errors that can occur during a replay.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("Unknown product in step {step}: {id}")]
    UnknownProduct { step: usize, id: ProductId },
}

/// One scripted cart operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Add(ProductId),
    Remove(ProductId),
    Toggle,
    Checkout,
}

/// Error for an unparseable operation.
#[derive(Debug, Error)]
#[error("Invalid operation '{0}'. Expected add:<id>, remove:<id>, toggle or checkout")]
pub struct InvalidOp(String);

impl FromStr for Op {
    type Err = InvalidOp;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let product = |id: &str| {
            let id = id.trim();
            if id.is_empty() {
                Err(InvalidOp(s.to_owned()))
            } else {
                Ok(ProductId::new(id))
            }
        };

        match s.split_once(':') {
            Some(("add", id)) => product(id).map(Self::Add),
            Some(("remove", id)) => product(id).map(Self::Remove),
            None if s == "toggle" => Ok(Self::Toggle),
            None if s == "checkout" => Ok(Self::Checkout),
            _ => Err(InvalidOp(s.to_owned())),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add(id) => write!(f, "add:{id}"),
            Self::Remove(id) => write!(f, "remove:{id}"),
            Self::Toggle => f.write_str("toggle"),
            Self::Checkout => f.write_str("checkout"),
        }
    }
}

/// Renderer that logs each snapshot and counts renders.
#[derive(Debug, Default)]
struct LogRenderer {
    renders: usize,
}

impl CartRenderer for LogRenderer {
    fn render(&mut self, snapshot: &CartSnapshot<'_>) {
        self.renders += 1;
        let lines: Vec<String> = snapshot
            .lines
            .iter()
            .map(|line| format!("{} x{}", line.id(), line.quantity()))
            .collect();
        tracing::info!(
            render = self.renders,
            lines = ?lines,
            items = snapshot.item_count,
            total = %snapshot.total,
            open = snapshot.panel.is_open(),
            notice = ?snapshot.notice.map(|n| n.message()),
            "Cart"
        );
    }
}

/// Replay `ops` against a fresh cart and return the final session.
///
/// # Errors
///
/// Returns `ReplayError` if the catalog cannot be loaded or an operation
/// names a product the catalog does not have.
pub fn replay(
    catalog_path: &Path,
    policy: AggregationPolicy,
    ops: &[Op],
) -> Result<CartSession, ReplayError> {
    let catalog = Catalog::load(catalog_path)?;
    run(&catalog, policy, ops)
}

fn run(
    catalog: &Catalog,
    policy: AggregationPolicy,
    ops: &[Op],
) -> Result<CartSession, ReplayError> {
    let session = CartSession::new(Cart::new(policy, catalog.currency()));
    let mut controller = CartController::new(session, LogRenderer::default());

    tracing::info!(%policy, steps = ops.len(), "Replaying cart");
    for (step, op) in ops.iter().enumerate() {
        tracing::info!(step = step + 1, %op, "Step");
        match op {
            Op::Add(id) => {
                let product = catalog.product(id).ok_or_else(|| ReplayError::UnknownProduct {
                    step: step + 1,
                    id: id.clone(),
                })?;
                controller.add_item(id.clone(), product.name.clone(), product.price)?;
            }
            Op::Remove(id) => {
                let change = controller.remove_item(id);
                tracing::debug!(?change, "Removed");
            }
            Op::Toggle => {
                let panel = controller.toggle_panel();
                tracing::debug!(?panel, "Toggled");
            }
            Op::Checkout => {
                let outcome = controller.checkout();
                tracing::debug!(?outcome, "Checked out");
            }
        }
    }

    let (session, _) = controller.into_parts();
    Ok(session)
}
