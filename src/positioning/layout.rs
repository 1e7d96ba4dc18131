//! Placement directions and the simple fit-or-least-overflow layout.

use serde::{Deserialize, Serialize};

use crate::dom::Dom;
use crate::geometry::{px, Bounds, Reposition};

/// Where the floating element goes relative to the anchor box.
///
/// Compound directions name the quadrant the element extends into:
/// `SouthEast` sits below the anchor, aligned to its left edge, and grows
/// rightwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    SouthEast,
    SouthWest,
    NorthEast,
    NorthWest,
    South,
    North,
    East,
    West,
}

/// Default preference: the four corners, below before above.
pub const ALL_CORNERS: [Layout; 4] = [
    Layout::SouthEast,
    Layout::SouthWest,
    Layout::NorthEast,
    Layout::NorthWest,
];

/// Gap between the anchor box and the floating element.
///
/// `y` separates north/south placements, `x` separates east/west ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl Bubble {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Layout {
    /// Box the element would occupy for this direction.
    #[must_use]
    pub fn candidate(self, anchor: &Bounds, width: f64, height: f64, bubble: Bubble) -> Bounds {
        let below = anchor.bottom() + bubble.y;
        let above = anchor.y - height - bubble.y;
        let (x, y) = match self {
            Self::SouthEast => (anchor.x, below),
            Self::SouthWest => (anchor.right() - width, below),
            Self::NorthEast => (anchor.x, above),
            Self::NorthWest => (anchor.right() - width, above),
            Self::South => (anchor.center_x() - width / 2.0, below),
            Self::North => (anchor.center_x() - width / 2.0, above),
            Self::East => (anchor.right() + bubble.x, anchor.y),
            Self::West => (anchor.x - width - bubble.x, anchor.y),
        };
        Bounds::new(x, y, width, height)
    }

    /// Element is aligned on its right edge.
    #[must_use]
    pub const fn attaches_right(self) -> bool {
        matches!(self, Self::SouthWest | Self::NorthWest | Self::West)
    }

    /// Element is aligned on its bottom edge.
    #[must_use]
    pub const fn attaches_bottom(self) -> bool {
        matches!(self, Self::NorthEast | Self::NorthWest | Self::North)
    }
}

/// A chosen direction and the box it produces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub layout: Layout,
    pub bounds: Bounds,
}

/// Pick a placement for a `width` x `height` element.
///
/// Returns the first direction in `preference` that fits inside `bounds`.
/// If none fits, returns the one with the least total overflow; among equal
/// overflows the earliest in `preference` wins. `None` only for an empty
/// preference list.
#[must_use]
pub fn choose(
    anchor: &Bounds,
    width: f64,
    height: f64,
    bubble: Bubble,
    preference: &[Layout],
    bounds: &Bounds,
) -> Option<Decision> {
    let mut best: Option<(f64, Decision)> = None;
    for &layout in preference {
        let candidate = layout.candidate(anchor, width, height, bubble);
        let overflow = candidate.overflow(bounds);
        let decision = Decision {
            layout,
            bounds: candidate,
        };
        if overflow <= 0.0 {
            return Some(decision);
        }
        let better = match &best {
            Some((least, _)) => overflow < *least,
            None => true,
        };
        if better {
            best = Some((overflow, decision));
        }
    }
    best.map(|(_, decision)| decision)
}

/// Write `position` and the four directional properties. Unused directions
/// are removed so a flip never leaves a stale opposite edge behind.
pub(crate) fn write<D: Dom>(dom: &D, el: &D::Element, reposition: &Reposition) {
    dom.set_css(el, "position", reposition.position);
    let edges = [
        ("left", reposition.left),
        ("top", reposition.top),
        ("right", reposition.right),
        ("bottom", reposition.bottom),
    ];
    for (property, value) in edges {
        match value {
            Some(v) => dom.set_css(el, property, &px(v)),
            None => dom.remove_css(el, property),
        }
    }
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

    const ANCHOR: Bounds = Bounds::new(100.0, 100.0, 50.0, 20.0);

    #[test]
    fn test_candidates() {
        let b = Bubble::new(4.0, 2.0);
        assert_eq!(
            Layout::SouthEast.candidate(&ANCHOR, 30.0, 10.0, b),
            Bounds::new(100.0, 122.0, 30.0, 10.0)
        );
        assert_eq!(
            Layout::NorthWest.candidate(&ANCHOR, 30.0, 10.0, b),
            Bounds::new(120.0, 88.0, 30.0, 10.0)
        );
        assert_eq!(
            Layout::South.candidate(&ANCHOR, 30.0, 10.0, b),
            Bounds::new(110.0, 122.0, 30.0, 10.0)
        );
        assert_eq!(
            Layout::East.candidate(&ANCHOR, 30.0, 10.0, b),
            Bounds::new(154.0, 100.0, 30.0, 10.0)
        );
        assert_eq!(
            Layout::West.candidate(&ANCHOR, 30.0, 10.0, b),
            Bounds::new(66.0, 100.0, 30.0, 10.0)
        );
    }

    #[test]
    fn test_first_fitting_wins() {
        let bounds = Bounds::new(0.0, 0.0, 1000.0, 1000.0);
        let d = choose(
            &ANCHOR,
            30.0,
            10.0,
            Bubble::default(),
            &[Layout::NorthEast, Layout::SouthEast],
            &bounds,
        )
        .unwrap();
        assert_eq!(d.layout, Layout::NorthEast);
    }

    #[test]
    fn test_flips_when_preferred_overflows() {
        // Not enough room below the anchor
        let bounds = Bounds::new(0.0, 0.0, 1000.0, 130.0);
        let d = choose(&ANCHOR, 30.0, 40.0, Bubble::default(), &ALL_CORNERS, &bounds).unwrap();
        assert_eq!(d.layout, Layout::NorthEast);
    }

    #[test]
    fn test_least_overflow_tie_breaks_by_order() {
        // Nothing fits; both south options overflow the bottom by the same amount
        let bounds = Bounds::new(0.0, 90.0, 1000.0, 40.0);
        let d = choose(
            &ANCHOR,
            30.0,
            40.0,
            Bubble::default(),
            &[Layout::SouthWest, Layout::SouthEast],
            &bounds,
        )
        .unwrap();
        assert_eq!(d.layout, Layout::SouthWest);
    }

    #[test]
    fn test_least_overflow_picks_smallest() {
        // Above overflows by 30, below by 10
        let bounds = Bounds::new(0.0, 90.0, 1000.0, 60.0);
        let d = choose(
            &ANCHOR,
            30.0,
            40.0,
            Bubble::default(),
            &[Layout::NorthEast, Layout::SouthEast],
            &bounds,
        )
        .unwrap();
        assert_eq!(d.layout, Layout::SouthEast);
    }

    #[test]
    fn test_empty_preference() {
        let bounds = Bounds::new(0.0, 0.0, 10.0, 10.0);
        assert!(choose(&ANCHOR, 1.0, 1.0, Bubble::default(), &[], &bounds).is_none());
    }

    #[test]
    fn test_layout_names() {
        let parsed: Vec<Layout> = serde_json::from_str(r#"["southeast","north"]"#).unwrap();
        assert_eq!(parsed, vec![Layout::SouthEast, Layout::North]);
    }
}
