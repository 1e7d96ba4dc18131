//! Drag-to-resize bars over table rows and columns.
//!
//! - `bars`: draw, remove, hide and show the overlay bars for a table
//! - `drag`: pointer tracking that turns moves into deltas
//! - `manager`: the [`BarManager`] controller tying pointer input to bars and
//!   resize events

pub mod bars;
mod drag;
mod manager;

pub use drag::{DragUpdate, Dragger};
pub use manager::{
    AdjustHeight, AdjustWidth, Axis, BarEvents, BarManager, BarState, DragSession, StartAdjust,
};

use serde::{Deserialize, Serialize};

use crate::dom::Dom;
use crate::geometry::Point;

/// Text direction of the table. Column boundaries are the trailing edge of
/// each column: the right edge for `Ltr`, the left edge for `Rtl`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

/// Bar appearance and class naming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BarConfig {
    /// Bar thickness in pixels
    pub thickness: f64,
    /// Opacity applied to a bar while it is dragged
    pub drag_opacity: String,
    /// Prefix for every class the bars carry
    pub class_prefix: String,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            thickness: 7.0,
            drag_opacity: "0.2".to_string(),
            class_prefix: "anchorage-".to_string(),
        }
    }
}

impl BarConfig {
    fn class(&self, name: &str) -> String {
        format!("{}{name}", self.class_prefix)
    }

    /// Class carried by every bar.
    #[must_use]
    pub fn bar_class(&self) -> String {
        self.class("resizer-bar")
    }

    /// Class added while a bar is dragged.
    #[must_use]
    pub fn dragging_class(&self) -> String {
        self.class("resizer-bar-dragging")
    }

    #[must_use]
    pub fn rows_class(&self) -> String {
        self.class("resizer-rows")
    }

    #[must_use]
    pub fn cols_class(&self) -> String {
        self.class("resizer-cols")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum WireOrigin {
    Zero,
    ParentPosition,
}

/// Where bars live and which region is watched for pointer input.
///
/// Bars are appended to `parent` and positioned relative to the wire's
/// origin. Hover tracking happens on `view`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeWire<E> {
    pub parent: E,
    pub view: E,
    origin: WireOrigin,
}

impl<E: Clone + PartialEq> ResizeWire<E> {
    /// Bars and input share one element whose origin is the document's.
    pub fn only(element: E) -> Self {
        Self {
            parent: element.clone(),
            view: element,
            origin: WireOrigin::Zero,
        }
    }

    /// Bars go into `parent`, a document-positioned container outside
    /// `view`.
    pub fn body(view: E, parent: E) -> Self {
        Self {
            parent,
            view,
            origin: WireOrigin::Zero,
        }
    }

    /// Bars go into a positioned `parent`; bar coordinates are relative to
    /// wherever `parent` currently sits in the document.
    pub fn detached(view: E, parent: E) -> Self {
        Self {
            parent,
            view,
            origin: WireOrigin::ParentPosition,
        }
    }

    /// Document-space point that bar coordinates are relative to.
    pub fn origin<D: Dom<Element = E>>(&self, dom: &D) -> Point {
        match self.origin {
            WireOrigin::Zero => Point::default(),
            WireOrigin::ParentPosition => dom.absolute_position(&self.parent),
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
    use crate::dom::MemoryDom;
    use crate::geometry::{Bounds, Viewport};

    #[test]
    fn test_class_names_follow_prefix() {
        let config: BarConfig = serde_json::from_str(r#"{"classPrefix":"x-"}"#).unwrap();
        assert_eq!(config.thickness, 7.0);
        assert_eq!(config.bar_class(), "x-resizer-bar");
        assert_eq!(config.dragging_class(), "x-resizer-bar-dragging");
        assert_eq!(BarConfig::default().cols_class(), "anchorage-resizer-cols");
    }

    #[test]
    fn test_wire_origin() {
        let dom = MemoryDom::new(Viewport::new(800.0, 600.0).with_scroll(0.0, 40.0));
        let view = dom.create_in(dom.body(), "div");
        let overlay = dom.create_in(dom.body(), "div");
        dom.set_box(overlay, Bounds::new(30.0, 10.0, 10.0, 10.0));

        assert_eq!(ResizeWire::only(view).origin(&dom), Point::default());
        assert_eq!(ResizeWire::body(view, dom.body()).origin(&dom), Point::default());
        assert_eq!(
            ResizeWire::detached(view, overlay).origin(&dom),
            Point::new(30.0, 50.0)
        );
    }
}
