//! Geometric primitives: boxes, points, the viewport and coordinate origins.
//!
//! Measured boxes coming out of [`crate::dom::Dom`] are in viewport (client)
//! space. An [`Origin`] describes the space the final style values are
//! written in.

use serde::{Deserialize, Serialize};

use crate::error::{AnchorageError, Result};

/// A 2D point in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// True when either dimension is zero or negative.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Distance, summed over all four edges, by which `self` sticks out of
    /// `outer`. Zero means `self` fits entirely.
    #[must_use]
    pub fn overflow(&self, outer: &Bounds) -> f64 {
        let left = (outer.x - self.x).max(0.0);
        let right = (self.right() - outer.right()).max(0.0);
        let top = (outer.y - self.y).max(0.0);
        let bottom = (self.bottom() - outer.bottom()).max(0.0);
        left + right + top + bottom
    }
}

/// Scroll offset and inner size of the window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Horizontal document scroll
    pub scroll_x: f64,
    /// Vertical document scroll
    pub scroll_y: f64,
    /// Inner width in pixels
    pub width: f64,
    /// Inner height in pixels
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width,
            height,
        }
    }

    #[must_use]
    pub const fn with_scroll(mut self, scroll_x: f64, scroll_y: f64) -> Self {
        self.scroll_x = scroll_x;
        self.scroll_y = scroll_y;
        self
    }

    /// Convert a viewport-space point to document space.
    #[must_use]
    pub fn to_document(&self, p: Point) -> Point {
        Point::new(p.x + self.scroll_x, p.y + self.scroll_y)
    }
}

/// Coordinate origin for writing final style values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Origin {
    /// Viewport-fixed; values are written with `position: fixed`.
    Fixed {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Relative to a container at `(left, top)` in document space; values are
    /// written with `position: absolute`.
    Relative { left: f64, top: f64 },
}

/// Final style values produced for one placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reposition {
    pub position: &'static str,
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
}

fn finite(value: f64, field: &'static str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AnchorageError::NonFinite { field })
    }
}

impl Origin {
    /// Origin covering a viewport rectangle.
    ///
    /// # Errors
    /// Returns [`AnchorageError::NonFinite`] if any input is NaN or infinite.
    pub fn fixed(x: f64, y: f64, width: f64, height: f64) -> Result<Self> {
        Ok(Self::Fixed {
            x: finite(x, "x")?,
            y: finite(y, "y")?,
            width: finite(width, "width")?,
            height: finite(height, "height")?,
        })
    }

    /// Origin anchored at a document-space point.
    ///
    /// # Errors
    /// Returns [`AnchorageError::NonFinite`] if any input is NaN or infinite.
    pub fn relative(left: f64, top: f64) -> Result<Self> {
        Ok(Self::Relative {
            left: finite(left, "left")?,
            top: finite(top, "top")?,
        })
    }

    /// Whether values are written with `position: fixed`.
    #[must_use]
    pub const fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed { .. })
    }

    /// The region available to layout, in this origin's layout space.
    #[must_use]
    pub fn view_box(&self, viewport: &Viewport) -> Bounds {
        match *self {
            Self::Fixed {
                x,
                y,
                width,
                height,
            } => Bounds::new(x, y, width, height),
            Self::Relative { .. } => Bounds::new(
                viewport.scroll_x,
                viewport.scroll_y,
                viewport.width,
                viewport.height,
            ),
        }
    }

    /// Convert a measured (viewport-space) box into this origin's layout
    /// space. Fixed layout happens in viewport space, relative layout in
    /// document space.
    #[must_use]
    pub fn to_layout(&self, client: Bounds, viewport: &Viewport) -> Bounds {
        match self {
            Self::Fixed { .. } => client,
            Self::Relative { .. } => client.translate(viewport.scroll_x, viewport.scroll_y),
        }
    }

    /// Turn a decided layout-space box into style values.
    ///
    /// `from_right` and `from_bottom` ask a fixed origin to attach the
    /// element by its right or bottom edge. Relative origins always write
    /// `left`/`top`.
    #[must_use]
    pub fn reposition(&self, decision: &Bounds, from_right: bool, from_bottom: bool) -> Reposition {
        match *self {
            Self::Fixed {
                x,
                y,
                width,
                height,
            } => {
                let (left, right) = if from_right {
                    (None, Some(x + width - decision.right()))
                } else {
                    (Some(decision.x - x), None)
                };
                let (top, bottom) = if from_bottom {
                    (None, Some(y + height - decision.bottom()))
                } else {
                    (Some(decision.y - y), None)
                };
                Reposition {
                    position: "fixed",
                    left,
                    top,
                    right,
                    bottom,
                }
            }
            Self::Relative { left, top } => Reposition {
                position: "absolute",
                left: Some(decision.x - left),
                top: Some(decision.y - top),
                right: None,
                bottom: None,
            },
        }
    }
}

/// Format a pixel value for a CSS property.
#[must_use]
pub fn px(value: f64) -> String {
    format!("{value}px")
}

/// Parse the leading integer of a CSS length like `"135px"`.
///
/// Mirrors `parseInt`: leading whitespace and sign are accepted, parsing
/// stops at the first non-digit, and anything unparsable yields `None`.
#[must_use]
pub fn parse_px(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(digits.len(), |(i, _)| i);
    digits.get(..end)?.parse::<i64>().ok().map(|n| sign * n)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_inside_is_zero() {
        let outer = Bounds::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(Bounds::new(10.0, 10.0, 20.0, 20.0).overflow(&outer), 0.0);
    }

    #[test]
    fn test_overflow_sums_edges() {
        let outer = Bounds::new(0.0, 0.0, 100.0, 100.0);
        // 10 past the right, 5 above the top
        let inner = Bounds::new(90.0, -5.0, 20.0, 20.0);
        assert_eq!(inner.overflow(&outer), 15.0);
    }

    #[test]
    fn test_origin_rejects_nan() {
        let err = Origin::relative(f64::NAN, 0.0).unwrap_err();
        assert!(matches!(err, AnchorageError::NonFinite { field: "left" }));
        assert!(Origin::fixed(0.0, 0.0, f64::INFINITY, 10.0).is_err());
    }

    #[test]
    fn test_relative_reposition_subtracts_container() {
        let origin = Origin::relative(100.0, 50.0).unwrap();
        let r = origin.reposition(&Bounds::new(130.0, 80.0, 10.0, 10.0), true, true);
        assert_eq!(r.position, "absolute");
        assert_eq!(r.left, Some(30.0));
        assert_eq!(r.top, Some(30.0));
        assert_eq!(r.right, None);
        assert_eq!(r.bottom, None);
    }

    #[test]
    fn test_fixed_reposition_from_right_and_bottom() {
        let origin = Origin::fixed(0.0, 0.0, 800.0, 600.0).unwrap();
        let r = origin.reposition(&Bounds::new(700.0, 500.0, 50.0, 40.0), true, true);
        assert_eq!(r.position, "fixed");
        assert_eq!(r.right, Some(50.0));
        assert_eq!(r.bottom, Some(60.0));
        assert_eq!(r.left, None);
        assert_eq!(r.top, None);
    }

    #[test]
    fn test_relative_layout_adds_scroll() {
        let origin = Origin::relative(0.0, 0.0).unwrap();
        let vp = Viewport::new(800.0, 600.0).with_scroll(0.0, 300.0);
        let b = origin.to_layout(Bounds::new(10.0, 20.0, 5.0, 5.0), &vp);
        assert_eq!(b, Bounds::new(10.0, 320.0, 5.0, 5.0));
        assert_eq!(origin.view_box(&vp), Bounds::new(0.0, 300.0, 800.0, 600.0));
    }

    #[test]
    fn test_parse_px() {
        assert_eq!(parse_px("135px"), Some(135));
        assert_eq!(parse_px(" -12.5px"), Some(-12));
        assert_eq!(parse_px("auto"), None);
        assert_eq!(parse_px(""), None);
    }
}
