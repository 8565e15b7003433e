//! Product strip preview command.
//!
//! Steps the same `AutoScroller` the storefront seeds its strip from, frame
//! by frame, so a speed or catalog size can be checked without a browser.
//!
//! # Usage
//!
//! ```bash
//! bottega-cli scroller preview --speed 2 --viewport 960 --frames 600
//! bottega-cli scroller preview --frames 120 --pause-at 30 --pause-frames 20
//! ```

use std::path::Path;

use bottega_core::AutoScroller;
use bottega_storefront::catalog::{Catalog, CatalogError};
use bottega_storefront::routes::home::CARD_WIDTH_PX;

/// How to run a preview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewOptions {
    /// Pixels per frame.
    pub speed: f64,
    /// Visible width of the strip; the scrollable range is what is left over.
    pub viewport: f64,
    /// Animation frames to step.
    pub frames: u32,
    /// First frame the pointer hovers the strip, if any.
    pub pause_at: Option<u32>,
    /// How many frames the hover lasts.
    pub pause_frames: u32,
}

/// What the strip did over a preview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preview {
    pub scroller: AutoScroller,
    /// Times the strip reached the end and started over.
    pub wraps: u32,
    /// Frames spent paused under the pointer.
    pub paused_frames: u32,
}

/// Load a catalog and preview its product strip.
///
/// # Errors
///
/// Returns the `CatalogError` if the catalog cannot be loaded.
pub fn preview(catalog_path: &Path, options: &PreviewOptions) -> Result<Preview, CatalogError> {
    let catalog = Catalog::load(catalog_path)?;
    #[allow(clippy::cast_precision_loss)] // catalog sizes are tiny
    let strip_width = catalog.products().len() as f64 * CARD_WIDTH_PX;

    let preview = simulate(strip_width, options);
    tracing::info!(
        products = catalog.products().len(),
        strip_width,
        max_offset = preview.scroller.max_offset(),
        frames = options.frames,
        wraps = preview.wraps,
        paused_frames = preview.paused_frames,
        offset = preview.scroller.offset(),
        "Preview done"
    );
    Ok(preview)
}

fn simulate(strip_width: f64, options: &PreviewOptions) -> Preview {
    let mut scroller = AutoScroller::new(strip_width, options.speed);
    scroller.set_max_offset(strip_width - options.viewport);

    let hover = options
        .pause_at
        .map(|start| start..start.saturating_add(options.pause_frames));
    let mut wraps = 0_u32;
    let mut paused_frames = 0_u32;

    for frame in 1..=options.frames {
        scroller.hover(hover.as_ref().is_some_and(|range| range.contains(&frame)));
        let before = scroller.offset();
        let offset = scroller.tick();

        if scroller.is_paused() {
            paused_frames += 1;
        } else if offset < before {
            wraps += 1;
            tracing::debug!(frame, "Wrapped to start");
        }
        tracing::trace!(frame, offset, fraction = scroller.fraction(), "Frame");
    }

    Preview {
        scroller,
        wraps,
        paused_frames,
    }
}
