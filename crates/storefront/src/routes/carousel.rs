//! Carousel route handlers.
//!
//! The carousel fragment polls `POST /carousel/advance?auto=true` on an HTMX
//! `every` trigger. Manual navigation swaps in a new fragment, which restarts
//! the browser-side interval, and re-arms the server-side autoplay deadline;
//! autoplay ticks that still arrive before that deadline are ignored so the
//! slide does not jump right after a click.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::Slide;
use crate::error::Result;
use crate::models::{CarouselSession, keys};
use crate::state::AppState;

/// Autoplay ticks this much early are still honoured (request latency).
const AUTOPLAY_SLACK_MS: u64 = 250;

/// One slide as rendered.
#[derive(Debug, Clone)]
pub struct SlideView {
    pub index: usize,
    pub image: String,
    pub alt: String,
    pub caption: Option<String>,
    pub active: bool,
}

/// Carousel display data for templates.
#[derive(Debug, Clone)]
pub struct CarouselView {
    pub slides: Vec<SlideView>,
    pub current: usize,
    pub interval_ms: u64,
}

impl CarouselView {
    fn new(slides: &[Slide], carousel: &CarouselSession) -> Self {
        let current = carousel.carousel.current();
        Self {
            slides: slides
                .iter()
                .enumerate()
                .map(|(index, slide)| SlideView {
                    index,
                    image: slide.image.clone(),
                    alt: slide.alt.clone(),
                    caption: slide.caption.clone(),
                    active: index == current,
                })
                .collect(),
            current,
            interval_ms: carousel.timer.interval_ms(),
        }
    }

    /// Autoplay and the arrows only make sense with more than one slide.
    #[must_use]
    pub fn is_animated(&self) -> bool {
        self.slides.len() > 1
    }
}

/// Carousel fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/carousel.html")]
pub struct CarouselTemplate {
    pub carousel: CarouselView,
}

/// Query parameters for `POST /carousel/advance`.
#[derive(Debug, Deserialize)]
pub struct AdvanceQuery {
    #[serde(default = "default_step")]
    pub step: isize,
    #[serde(default)]
    pub auto: bool,
}

const fn default_step() -> isize {
    1
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the visitor's carousel, fitted to the current catalog.
async fn load_carousel(session: &Session, state: &AppState) -> Result<CarouselSession> {
    let mut carousel = session
        .get::<CarouselSession>(keys::CAROUSEL)
        .await?
        .unwrap_or_else(|| state.new_carousel_session());
    let slide_count = state.catalog().slides().len();
    if carousel.carousel.slide_count() != slide_count {
        carousel.carousel.resize(slide_count);
    }
    Ok(carousel)
}

async fn store(
    session: &Session,
    state: &AppState,
    carousel: &CarouselSession,
) -> Result<CarouselView> {
    session.insert(keys::CAROUSEL, carousel).await?;
    Ok(CarouselView::new(state.catalog().slides(), carousel))
}

/// Carousel view for a full page render; (re)starts autoplay.
pub(crate) async fn start(session: &Session, state: &AppState) -> Result<CarouselView> {
    let mut carousel = load_carousel(session, state).await?;
    carousel.timer.reset(state.now_ms());
    store(session, state, &carousel).await
}

// =============================================================================
// Handlers
// =============================================================================

/// Move the carousel by `step`, or take an autoplay tick when `auto` is set.
#[instrument(skip(state, session))]
pub async fn advance(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<AdvanceQuery>,
) -> Result<CarouselTemplate> {
    let mut carousel = load_carousel(&session, &state).await?;
    let now = state.now_ms();

    if query.auto {
        if !carousel.timer.is_armed() {
            carousel.timer.arm(now);
        } else if carousel.timer.poll(now, AUTOPLAY_SLACK_MS) {
            carousel.carousel.advance(1);
        } else {
            tracing::debug!("Ignoring early autoplay tick");
        }
    } else {
        carousel.carousel.advance(query.step);
        carousel.timer.reset(now);
    }

    Ok(CarouselTemplate {
        carousel: store(&session, &state, &carousel).await?,
    })
}

/// Jump to a slide (dot indicator).
#[instrument(skip(state, session))]
pub async fn go(
    State(state): State<AppState>,
    session: Session,
    Path(index): Path<usize>,
) -> Result<CarouselTemplate> {
    let mut carousel = load_carousel(&session, &state).await?;
    carousel.carousel.go_to(index)?;
    carousel.timer.reset(state.now_ms());

    Ok(CarouselTemplate {
        carousel: store(&session, &state, &carousel).await?,
    })
}
