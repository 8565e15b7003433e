//! Horizontal product strip that scrolls itself.
//!
//! Each animation frame moves the strip by `speed` pixels. Reaching the end
//! wraps back to the start, hovering pauses, and a range control mirrors the
//! position as a fraction of the scrollable width.

use serde::{Deserialize, Serialize};

/// Default scroll speed in pixels per frame.
pub const DEFAULT_SCROLL_SPEED: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutoScroller {
    offset: f64,
    max_offset: f64,
    speed: f64,
    paused: bool,
}

impl AutoScroller {
    /// A scroller at offset zero. Negative inputs are treated as zero.
    #[must_use]
    pub fn new(max_offset: f64, speed: f64) -> Self {
        Self {
            offset: 0.0,
            max_offset: max_offset.max(0.0),
            speed: speed.max(0.0),
            paused: false,
        }
    }

    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    #[must_use]
    pub const fn max_offset(&self) -> f64 {
        self.max_offset
    }

    #[must_use]
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Advance one frame. Returns the new offset.
    pub fn tick(&mut self) -> f64 {
        if self.paused || self.max_offset <= 0.0 {
            return self.offset;
        }
        self.offset += self.speed;
        if self.offset >= self.max_offset {
            self.offset = 0.0;
        }
        self.offset
    }

    /// Pointer entered (`true`) or left (`false`) the strip.
    pub const fn hover(&mut self, hovering: bool) {
        self.paused = hovering;
    }

    /// Position as a fraction in `[0, 1]`.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.max_offset <= 0.0 {
            return 0.0;
        }
        (self.offset / self.max_offset).clamp(0.0, 1.0)
    }

    /// Move to a fraction of the scrollable width (range control input).
    pub fn seek_fraction(&mut self, fraction: f64) -> f64 {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        self.offset = self.max_offset * fraction;
        self.offset
    }

    /// The strip was resized; keep the offset inside it.
    pub fn set_max_offset(&mut self, max_offset: f64) {
        self.max_offset = max_offset.max(0.0);
        if self.offset > self.max_offset {
            self.offset = 0.0;
        }
    }
}

impl Default for AutoScroller {
    fn default() -> Self {
        Self::new(0.0, DEFAULT_SCROLL_SPEED)
    }
}
