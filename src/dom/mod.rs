//! DOM capability layer.
//!
//! Positioning and the resize-bar controller never touch `web-sys`
//! directly. They work through the [`Dom`] trait, which has two
//! implementations:
//! - [`MemoryDom`]: an in-memory element tree with scripted geometry, used by
//!   tests and non-browser hosts
//! - `WebDom` (wasm32 only): the real document via `web-sys`
//!
//! Mutating methods take `&self`; both implementations hand out cheap element
//! handles that share the underlying node.

mod memory;
#[cfg(target_arch = "wasm32")]
mod web;

pub use memory::{MemoryDom, NodeId};
#[cfg(target_arch = "wasm32")]
pub use web::WebDom;

use std::fmt::Debug;

use crate::geometry::{Bounds, Point, Viewport};

/// Element, style, and geometry primitives consumed by the engine.
pub trait Dom {
    /// Element handle. Equality is node identity.
    type Element: Clone + PartialEq + Debug;

    // ---- Inline style ----

    /// Raw inline value of a CSS property, `None` when not set.
    fn css(&self, el: &Self::Element, property: &str) -> Option<String>;
    fn set_css(&self, el: &Self::Element, property: &str, value: &str);
    fn remove_css(&self, el: &Self::Element, property: &str);

    // ---- Attributes ----

    fn attr(&self, el: &Self::Element, name: &str) -> Option<String>;
    fn set_attr(&self, el: &Self::Element, name: &str, value: &str);
    fn remove_attr(&self, el: &Self::Element, name: &str);

    // ---- Classes ----

    fn has_class(&self, el: &Self::Element, class: &str) -> bool;
    fn add_class(&self, el: &Self::Element, class: &str);
    fn remove_class(&self, el: &Self::Element, class: &str);

    // ---- Tree ----

    /// Lowercase tag name.
    fn tag_name(&self, el: &Self::Element) -> String;
    fn parent(&self, el: &Self::Element) -> Option<Self::Element>;
    fn children(&self, el: &Self::Element) -> Vec<Self::Element>;
    fn create_element(&self, tag: &str) -> Option<Self::Element>;
    fn append_child(&self, parent: &Self::Element, child: &Self::Element);
    /// Detach `el` from its parent. No-op when already detached.
    fn remove(&self, el: &Self::Element);
    /// Whether `el` is connected to the document.
    fn is_attached(&self, el: &Self::Element) -> bool;

    // ---- Geometry ----

    /// Border box in viewport (client) space.
    fn bounding_box(&self, el: &Self::Element) -> Bounds;
    fn viewport(&self) -> Viewport;
    /// Rectangle of the current text selection if it lies inside `root`.
    fn selection_box(&self, root: &Self::Element) -> Option<Bounds>;

    /// Top-left corner of `el` in document space.
    fn absolute_position(&self, el: &Self::Element) -> Point {
        let b = self.bounding_box(el);
        self.viewport().to_document(Point::new(b.x, b.y))
    }

    /// Whether `ancestor` is `el` or one of its ancestors.
    fn contains(&self, ancestor: &Self::Element, el: &Self::Element) -> bool {
        let mut current = Some(el.clone());
        while let Some(node) = current {
            if &node == ancestor {
                return true;
            }
            current = self.parent(&node);
        }
        false
    }

    /// Nearest inclusive ancestor with the given tag name.
    fn closest_tag(&self, el: &Self::Element, tag: &str) -> Option<Self::Element> {
        let mut current = Some(el.clone());
        while let Some(node) = current {
            if self.tag_name(&node) == tag {
                return Some(node);
            }
            current = self.parent(&node);
        }
        None
    }

    /// All descendants of `root` (excluding `root`) carrying `class`, in
    /// document order.
    fn descendants_with_class(&self, root: &Self::Element, class: &str) -> Vec<Self::Element> {
        let mut found = Vec::new();
        let mut stack: Vec<Self::Element> = self.children(root).into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            if self.has_class(&node, class) {
                found.push(node.clone());
            }
            stack.extend(self.children(&node).into_iter().rev());
        }
        found
    }
}
