#![forbid(unsafe_code)]

//! Geometric primitives for a vertical scroll surface.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Safe-area insets of the viewport, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Insets {
    pub top: f64,
    pub bottom: f64,
}

impl Insets {
    #[inline]
    pub const fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }
}

/// The visible window of the scroll surface.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Viewport {
    /// Window height in pixels.
    pub height: f64,
    pub insets: Insets,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            height: 800.0,
            insets: Insets::default(),
        }
    }
}

impl Viewport {
    #[inline]
    pub const fn new(height: f64, insets: Insets) -> Self {
        Self { height, insets }
    }

    /// First usable y coordinate below the top inset.
    #[inline]
    pub fn usable_top(&self) -> f64 {
        self.insets.top
    }
}

/// A vertical interval `[top, bottom)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Span {
    /// Top edge (inclusive).
    pub top: f64,
    /// Bottom edge (exclusive).
    pub bottom: f64,
}

impl Span {
    #[inline]
    pub const fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    /// Span starting at `top` with the given height.
    #[inline]
    pub fn from_height(top: f64, height: f64) -> Self {
        Self::new(top, top + height)
    }

    #[inline]
    pub fn height(&self) -> f64 {
        (self.bottom - self.top).max(0.0)
    }

    /// Half-open containment: the top edge belongs to the span, the bottom
    /// edge belongs to whatever comes next.
    #[inline]
    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_is_half_open() {
        let span = Span::from_height(100.0, 50.0);
        assert!(span.contains(100.0));
        assert!(span.contains(149.999));
        assert!(!span.contains(150.0));
        assert!(!span.contains(99.999));
        assert_eq!(span.height(), 50.0);
    }

    #[test]
    fn adjacent_spans_do_not_overlap() {
        let a = Span::from_height(0.0, 40.0);
        let b = Span::from_height(a.bottom, 40.0);
        assert!(!(a.contains(40.0) && b.contains(40.0)));
        assert!(b.contains(40.0));
    }

    #[test]
    fn inverted_span_is_empty() {
        let span = Span::new(10.0, 5.0);
        assert_eq!(span.height(), 0.0);
        assert!(!span.contains(7.0));
    }
}
