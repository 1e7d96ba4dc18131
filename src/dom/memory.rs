//! In-memory element tree implementing [`Dom`].
//!
//! Geometry is scripted: boxes are assigned with [`MemoryDom::set_box`]
//! rather than computed by a layout engine. Inline styles keep declaration
//! order so the serialized `style` attribute is stable.

use std::cell::RefCell;
use std::rc::Rc;

use super::Dom;
use crate::geometry::{Bounds, Viewport};

/// Handle to a node in a [`MemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Default)]
struct Node {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attrs: Vec<(String, String)>,
    styles: Vec<(String, String)>,
    classes: Vec<String>,
    rect: Bounds,
}

#[derive(Debug)]
struct Tree {
    nodes: Vec<Node>,
    viewport: Viewport,
    selection: Option<(NodeId, Bounds)>,
}

/// Shared, cloneable in-memory document.
///
/// Clones refer to the same tree.
#[derive(Debug, Clone)]
pub struct MemoryDom {
    tree: Rc<RefCell<Tree>>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new(Viewport::new(1024.0, 768.0))
    }
}

const DOCUMENT: NodeId = NodeId(0);
const BODY: NodeId = NodeId(1);

fn parse_style(text: &str) -> Vec<(String, String)> {
    text.split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

fn serialize_style(styles: &[(String, String)]) -> String {
    styles
        .iter()
        .map(|(name, value)| format!("{name}: {value};"))
        .collect::<Vec<_>>()
        .join(" ")
}

impl MemoryDom {
    /// Create a document with a `<body>` and the given window viewport.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        let document = Node {
            tag: "#document".to_string(),
            children: vec![BODY],
            ..Node::default()
        };
        let body = Node {
            tag: "body".to_string(),
            parent: Some(DOCUMENT),
            rect: Bounds::new(0.0, 0.0, viewport.width, viewport.height),
            ..Node::default()
        };
        Self {
            tree: Rc::new(RefCell::new(Tree {
                nodes: vec![document, body],
                viewport,
                selection: None,
            })),
        }
    }

    #[must_use]
    pub fn body(&self) -> NodeId {
        BODY
    }

    /// Create an element and append it to `parent`.
    pub fn create_in(&self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.new_node(tag);
        self.append_child(&parent, &id);
        id
    }

    /// Assign the viewport-space box of an element.
    pub fn set_box(&self, el: NodeId, rect: Bounds) {
        self.with_node_mut(el, |n| n.rect = rect);
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.tree.borrow_mut().viewport = viewport;
    }

    /// Place the text selection inside `root`, or clear it.
    pub fn set_selection(&self, selection: Option<(NodeId, Bounds)>) {
        self.tree.borrow_mut().selection = selection;
    }

    /// Number of nodes ever created, attached or not.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.tree.borrow().nodes.len()
    }

    fn new_node(&self, tag: &str) -> NodeId {
        let mut tree = self.tree.borrow_mut();
        let id = NodeId(tree.nodes.len());
        tree.nodes.push(Node {
            tag: tag.to_ascii_lowercase(),
            ..Node::default()
        });
        id
    }

    fn with_node<R>(&self, el: NodeId, f: impl FnOnce(&Node) -> R) -> Option<R> {
        self.tree.borrow().nodes.get(el.0).map(f)
    }

    fn with_node_mut(&self, el: NodeId, f: impl FnOnce(&mut Node)) {
        if let Some(node) = self.tree.borrow_mut().nodes.get_mut(el.0) {
            f(node);
        }
    }

    fn detach(&self, el: NodeId) {
        let mut tree = self.tree.borrow_mut();
        let parent = tree.nodes.get_mut(el.0).and_then(|n| n.parent.take());
        if let Some(parent) = parent {
            if let Some(p) = tree.nodes.get_mut(parent.0) {
                p.children.retain(|c| *c != el);
            }
        }
    }
}

impl Dom for MemoryDom {
    type Element = NodeId;

    fn css(&self, el: &NodeId, property: &str) -> Option<String> {
        self.with_node(*el, |n| {
            n.styles
                .iter()
                .find(|(name, _)| name == property)
                .map(|(_, value)| value.clone())
        })
        .flatten()
    }

    fn set_css(&self, el: &NodeId, property: &str, value: &str) {
        self.with_node_mut(*el, |n| {
            match n.styles.iter_mut().find(|(name, _)| name == property) {
                Some(entry) => entry.1 = value.to_string(),
                None => n.styles.push((property.to_string(), value.to_string())),
            }
        });
    }

    fn remove_css(&self, el: &NodeId, property: &str) {
        self.with_node_mut(*el, |n| n.styles.retain(|(name, _)| name != property));
    }

    fn attr(&self, el: &NodeId, name: &str) -> Option<String> {
        match name {
            "style" => self
                .with_node(*el, |n| {
                    (!n.styles.is_empty()).then(|| serialize_style(&n.styles))
                })
                .flatten(),
            "class" => self
                .with_node(*el, |n| (!n.classes.is_empty()).then(|| n.classes.join(" ")))
                .flatten(),
            _ => self
                .with_node(*el, |n| {
                    n.attrs
                        .iter()
                        .find(|(k, _)| k == name)
                        .map(|(_, v)| v.clone())
                })
                .flatten(),
        }
    }

    fn set_attr(&self, el: &NodeId, name: &str, value: &str) {
        self.with_node_mut(*el, |n| match name {
            "style" => n.styles = parse_style(value),
            "class" => {
                n.classes = value.split_whitespace().map(str::to_string).collect();
            }
            _ => match n.attrs.iter_mut().find(|(k, _)| k == name) {
                Some(entry) => entry.1 = value.to_string(),
                None => n.attrs.push((name.to_string(), value.to_string())),
            },
        });
    }

    fn remove_attr(&self, el: &NodeId, name: &str) {
        self.with_node_mut(*el, |n| match name {
            "style" => n.styles.clear(),
            "class" => n.classes.clear(),
            _ => n.attrs.retain(|(k, _)| k != name),
        });
    }

    fn has_class(&self, el: &NodeId, class: &str) -> bool {
        self.with_node(*el, |n| n.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    fn add_class(&self, el: &NodeId, class: &str) {
        self.with_node_mut(*el, |n| {
            if !n.classes.iter().any(|c| c == class) {
                n.classes.push(class.to_string());
            }
        });
    }

    fn remove_class(&self, el: &NodeId, class: &str) {
        self.with_node_mut(*el, |n| n.classes.retain(|c| c != class));
    }

    fn tag_name(&self, el: &NodeId) -> String {
        self.with_node(*el, |n| n.tag.clone()).unwrap_or_default()
    }

    fn parent(&self, el: &NodeId) -> Option<NodeId> {
        self.with_node(*el, |n| n.parent).flatten()
    }

    fn children(&self, el: &NodeId) -> Vec<NodeId> {
        self.with_node(*el, |n| n.children.clone())
            .unwrap_or_default()
    }

    fn create_element(&self, tag: &str) -> Option<NodeId> {
        Some(self.new_node(tag))
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) {
        self.detach(*child);
        let mut tree = self.tree.borrow_mut();
        if tree.nodes.get(parent.0).is_none() {
            return;
        }
        if let Some(c) = tree.nodes.get_mut(child.0) {
            c.parent = Some(*parent);
        }
        if let Some(p) = tree.nodes.get_mut(parent.0) {
            p.children.push(*child);
        }
    }

    fn remove(&self, el: &NodeId) {
        self.detach(*el);
    }

    fn is_attached(&self, el: &NodeId) -> bool {
        self.contains(&DOCUMENT, el)
    }

    fn bounding_box(&self, el: &NodeId) -> Bounds {
        self.with_node(*el, |n| n.rect).unwrap_or_default()
    }

    fn viewport(&self) -> Viewport {
        self.tree.borrow().viewport
    }

    fn selection_box(&self, root: &NodeId) -> Option<Bounds> {
        let (container, rect) = self.tree.borrow().selection?;
        self.contains(root, &container).then_some(rect)
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

    #[test]
    fn test_style_attribute_roundtrip_keeps_order() {
        let dom = MemoryDom::default();
        let el = dom.create_in(dom.body(), "div");
        dom.set_css(&el, "visibility", "visible");
        dom.set_css(&el, "left", "4px");
        let before = dom.attr(&el, "style");
        assert_eq!(before.as_deref(), Some("visibility: visible; left: 4px;"));

        dom.remove_attr(&el, "style");
        assert_eq!(dom.css(&el, "left"), None);
        dom.set_attr(&el, "style", before.as_deref().unwrap());
        assert_eq!(dom.attr(&el, "style"), before);
    }

    #[test]
    fn test_detached_element() {
        let dom = MemoryDom::default();
        let el = dom.create_element("div").unwrap();
        assert!(!dom.is_attached(&el));
        dom.append_child(&dom.body(), &el);
        assert!(dom.is_attached(&el));
        dom.remove(&el);
        assert!(!dom.is_attached(&el));
        assert!(dom.children(&dom.body()).is_empty());
    }

    #[test]
    fn test_closest_and_descendants() {
        let dom = MemoryDom::default();
        let table = dom.create_in(dom.body(), "TABLE");
        let tr = dom.create_in(table, "tr");
        let td = dom.create_in(tr, "td");
        dom.add_class(&td, "x");
        assert_eq!(dom.closest_tag(&td, "table"), Some(table));
        assert_eq!(dom.descendants_with_class(&dom.body(), "x"), vec![td]);
    }
}
