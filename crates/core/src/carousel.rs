//! Image carousel position and autoplay timing.
//!
//! The carousel is a wrapping index over `slide_count` slides. Autoplay is
//! modelled as a deadline: callers pass the current time in milliseconds, so
//! the same rules apply whether ticks come from a browser interval or a test.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default autoplay interval.
pub const DEFAULT_AUTOPLAY_INTERVAL_MS: u64 = 4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CarouselError {
    #[error("slide {index} is out of range (carousel has {slide_count} slides)")]
    OutOfRange { index: usize, slide_count: usize },
}

/// Current slide of a carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Carousel {
    slide_count: usize,
    current: usize,
}

impl Carousel {
    /// A carousel showing its first slide.
    #[must_use]
    pub const fn new(slide_count: usize) -> Self {
        Self {
            slide_count,
            current: 0,
        }
    }

    #[must_use]
    pub const fn slide_count(&self) -> usize {
        self.slide_count
    }

    /// Zero-based index of the visible slide.
    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Move by `step` slides, wrapping at both ends.
    pub fn advance(&mut self, step: isize) -> usize {
        if self.slide_count == 0 {
            return 0;
        }
        let count = i128::try_from(self.slide_count).unwrap_or(i128::MAX);
        let current = i128::try_from(self.current).unwrap_or(0);
        let next = (current + i128::try_from(step).unwrap_or(0)).rem_euclid(count);
        self.current = usize::try_from(next).unwrap_or(0);
        self.current
    }

    /// Jump straight to `index`.
    ///
    /// # Errors
    ///
    /// Returns `CarouselError::OutOfRange` when `index >= slide_count`.
    pub const fn go_to(&mut self, index: usize) -> Result<usize, CarouselError> {
        if index >= self.slide_count {
            return Err(CarouselError::OutOfRange {
                index,
                slide_count: self.slide_count,
            });
        }
        self.current = index;
        Ok(index)
    }

    /// Re-fit to a new slide count, keeping the index in range.
    pub const fn resize(&mut self, slide_count: usize) {
        self.slide_count = slide_count;
        if self.current >= slide_count {
            self.current = 0;
        }
    }
}

/// A cancelable, re-armable interval deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoplayTimer {
    interval_ms: u64,
    next_due_ms: Option<u64>,
}

impl AutoplayTimer {
    /// A disarmed timer.
    #[must_use]
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            next_due_ms: None,
        }
    }

    #[must_use]
    pub const fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    #[must_use]
    pub const fn next_due_ms(&self) -> Option<u64> {
        self.next_due_ms
    }

    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.next_due_ms.is_some()
    }

    /// Schedule the next tick one interval after `now_ms`.
    pub const fn arm(&mut self, now_ms: u64) {
        self.next_due_ms = Some(now_ms.saturating_add(self.interval_ms));
    }

    /// Cancel and re-arm; used after manual navigation.
    pub const fn reset(&mut self, now_ms: u64) {
        self.cancel();
        self.arm(now_ms);
    }

    pub const fn cancel(&mut self) {
        self.next_due_ms = None;
    }

    /// Fire if due, re-arming for the following interval.
    ///
    /// `slack_ms` tolerates ticks that arrive slightly early.
    pub const fn poll(&mut self, now_ms: u64, slack_ms: u64) -> bool {
        match self.next_due_ms {
            Some(due) if now_ms.saturating_add(slack_ms) >= due => {
                self.arm(now_ms);
                true
            }
            _ => false,
        }
    }
}

impl Default for AutoplayTimer {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOPLAY_INTERVAL_MS)
    }
}
