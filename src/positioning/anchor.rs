//! Anchor descriptors and the layout solver.
//!
//! The set of anchor kinds is closed: [`AnchorKind`] is matched once in
//! [`resolve`], which is the only place that knows how each kind measures
//! its anchor box.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::layout::{Bubble, Layout, ALL_CORNERS};
use super::PositioningConfig;
use crate::dom::Dom;
use crate::error::{AnchorageError, Result};
use crate::geometry::{Bounds, Origin};

/// Inline style properties applied after placement.
pub type Overrides = BTreeMap<String, String>;

type PlaceFn<D> = dyn Fn(
    &D,
    &<D as Dom>::Element,
    &Origin,
    &Anchoring<D>,
    &PositioningConfig,
    &<D as Dom>::Element,
);

/// Replacement for the default placement executor.
///
/// Called with `(dom, host, origin, anchoring, config, placee)`.
pub struct CustomPlacer<D: Dom>(Rc<PlaceFn<D>>);

impl<D: Dom> CustomPlacer<D> {
    pub fn new(
        f: impl Fn(&D, &D::Element, &Origin, &Anchoring<D>, &PositioningConfig, &D::Element) + 'static,
    ) -> Self {
        Self(Rc::new(f))
    }

    pub(crate) fn call(
        &self,
        dom: &D,
        host: &D::Element,
        origin: &Origin,
        anchoring: &Anchoring<D>,
        config: &PositioningConfig,
        placee: &D::Element,
    ) {
        (self.0)(dom, host, origin, anchoring, config, placee);
    }
}

impl<D: Dom> Clone for CustomPlacer<D> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<D: Dom> fmt::Debug for CustomPlacer<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomPlacer")
    }
}

/// What to align against.
#[derive(Debug, Clone, PartialEq)]
pub enum AnchorKind<E> {
    /// A free-standing box in viewport space (a point when zero-sized).
    Makeshift { bounds: Bounds },
    /// An element's border box. Unresolvable while the node is absent,
    /// detached, or zero-sized.
    Node { node: Option<E> },
    /// The current text selection inside `root` (the host when `None`).
    Selection { root: Option<E> },
}

/// A validated anchor descriptor.
#[derive(Debug)]
pub struct Anchor<D: Dom> {
    pub kind: AnchorKind<D::Element>,
    pub bubble: Bubble,
    pub layouts: Vec<Layout>,
    pub overrides: Overrides,
    pub placer: Option<CustomPlacer<D>>,
}

impl<D: Dom> Clone for Anchor<D> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            bubble: self.bubble,
            layouts: self.layouts.clone(),
            overrides: self.overrides.clone(),
            placer: self.placer.clone(),
        }
    }
}

impl<D: Dom> Anchor<D> {
    fn with_kind(kind: AnchorKind<D::Element>) -> Self {
        Self {
            kind,
            bubble: Bubble::default(),
            layouts: ALL_CORNERS.to_vec(),
            overrides: Overrides::new(),
            placer: None,
        }
    }

    #[must_use]
    pub fn makeshift(bounds: Bounds) -> Self {
        Self::with_kind(AnchorKind::Makeshift { bounds })
    }

    #[must_use]
    pub fn node(node: Option<D::Element>) -> Self {
        Self::with_kind(AnchorKind::Node { node })
    }

    #[must_use]
    pub fn selection(root: Option<D::Element>) -> Self {
        Self::with_kind(AnchorKind::Selection { root })
    }

    #[must_use]
    pub fn with_bubble(mut self, bubble: Bubble) -> Self {
        self.bubble = bubble;
        self
    }

    #[must_use]
    pub fn with_layouts(mut self, layouts: Vec<Layout>) -> Self {
        self.layouts = layouts;
        self
    }

    #[must_use]
    pub fn with_override(mut self, property: &str, value: &str) -> Self {
        self.overrides
            .insert(property.to_string(), value.to_string());
        self
    }

    #[must_use]
    pub fn with_placer(mut self, placer: CustomPlacer<D>) -> Self {
        self.placer = Some(placer);
        self
    }

    /// Build an anchor from a decoded [`AnchorInfo`]. `node` supplies the
    /// element for the `node` kind and is ignored otherwise.
    #[must_use]
    pub fn from_info(info: AnchorInfo, node: Option<D::Element>) -> Self {
        let kind = match info.kind {
            AnchorInfoKind::Makeshift(bounds) => AnchorKind::Makeshift { bounds },
            AnchorInfoKind::Node => AnchorKind::Node { node },
            AnchorInfoKind::Selection => AnchorKind::Selection { root: None },
        };
        Self {
            kind,
            bubble: info.bubble,
            layouts: info.layouts,
            overrides: info.overrides,
            placer: None,
        }
    }

    /// Check the descriptor's shape.
    ///
    /// # Errors
    /// Returns [`AnchorageError::SchemaValidation`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if let AnchorKind::Makeshift { bounds } = &self.kind {
            validate_bounds(bounds)?;
        }
        validate_common(&self.bubble, &self.overrides)
    }
}

fn validate_bounds(bounds: &Bounds) -> Result<()> {
    let fields = [
        ("x", bounds.x),
        ("y", bounds.y),
        ("width", bounds.width),
        ("height", bounds.height),
    ];
    for (field, value) in fields {
        if !value.is_finite() {
            return Err(AnchorageError::schema(field, "must be a finite number"));
        }
    }
    if bounds.width < 0.0 {
        return Err(AnchorageError::schema("width", "must not be negative"));
    }
    if bounds.height < 0.0 {
        return Err(AnchorageError::schema("height", "must not be negative"));
    }
    Ok(())
}

fn validate_common(bubble: &Bubble, overrides: &Overrides) -> Result<()> {
    if !bubble.is_finite() {
        return Err(AnchorageError::schema("bubble", "must be finite"));
    }
    if overrides.keys().any(|k| k.trim().is_empty()) {
        return Err(AnchorageError::schema(
            "overrides",
            "property names must not be empty",
        ));
    }
    Ok(())
}

/// Kind-specific part of an [`AnchorInfo`].
#[derive(Debug, Clone, PartialEq)]
pub enum AnchorInfoKind {
    Makeshift(Bounds),
    Node,
    Selection,
}

/// An anchor descriptor decoded from JSON, before element handles are
/// attached.
///
/// ```json
/// { "anchor": "makeshift", "x": 10, "y": 20, "layouts": ["southeast"] }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorInfo {
    pub kind: AnchorInfoKind,
    pub bubble: Bubble,
    pub layouts: Vec<Layout>,
    pub overrides: Overrides,
}

const COMMON_FIELDS: [&str; 3] = ["bubble", "layouts", "overrides"];
const MAKESHIFT_FIELDS: [&str; 4] = ["x", "y", "width", "height"];

fn field<T: DeserializeOwned>(obj: &Map<String, Value>, name: &str) -> Result<Option<T>> {
    obj.get(name)
        .map(|value| {
            serde_json::from_value(value.clone())
                .map_err(|e| AnchorageError::schema(name, e.to_string()))
        })
        .transpose()
}

fn required<T: DeserializeOwned>(obj: &Map<String, Value>, name: &str) -> Result<T> {
    field(obj, name)?.ok_or_else(|| AnchorageError::schema(name, "missing required field"))
}

impl AnchorInfo {
    /// Decode and validate a descriptor.
    ///
    /// # Errors
    /// Returns [`AnchorageError::SchemaValidation`] for a non-object value,
    /// an unknown `anchor` kind, unknown or mistyped fields, or bad numbers.
    pub fn from_value(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| AnchorageError::schema("anchor", "expected an object"))?;
        let kind_name: String = required(obj, "anchor")?;

        let extra: &[&str] = match kind_name.as_str() {
            "makeshift" => &MAKESHIFT_FIELDS,
            "node" | "selection" => &[],
            other => {
                return Err(AnchorageError::schema(
                    "anchor",
                    format!("unknown anchor kind `{other}`"),
                ))
            }
        };
        if let Some(unknown) = obj
            .keys()
            .find(|k| *k != "anchor" && !COMMON_FIELDS.contains(&k.as_str()) && !extra.contains(&k.as_str()))
        {
            return Err(AnchorageError::schema(unknown.as_str(), "unknown field"));
        }

        let kind = match kind_name.as_str() {
            "makeshift" => {
                let bounds = Bounds::new(
                    required(obj, "x")?,
                    required(obj, "y")?,
                    field(obj, "width")?.unwrap_or(0.0),
                    field(obj, "height")?.unwrap_or(0.0),
                );
                validate_bounds(&bounds)?;
                AnchorInfoKind::Makeshift(bounds)
            }
            "node" => AnchorInfoKind::Node,
            _ => AnchorInfoKind::Selection,
        };

        let info = Self {
            kind,
            bubble: field(obj, "bubble")?.unwrap_or_default(),
            layouts: field(obj, "layouts")?.unwrap_or_else(|| ALL_CORNERS.to_vec()),
            overrides: field(obj, "overrides")?.unwrap_or_default(),
        };
        validate_common(&info.bubble, &info.overrides)?;
        Ok(info)
    }

    /// Decode a descriptor from a JSON string.
    ///
    /// # Errors
    /// See [`AnchorInfo::from_value`]; malformed JSON is reported against the
    /// `anchor` field.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| AnchorageError::schema("anchor", e.to_string()))?;
        Self::from_value(&value)
    }
}

/// The solver's output for one positioning call. Never cached.
#[derive(Debug)]
pub struct Anchoring<D: Dom> {
    /// Anchor box in the origin's layout space.
    pub anchor_box: Bounds,
    pub bubble: Bubble,
    pub layouts: Vec<Layout>,
    pub overrides: Overrides,
    pub placer: Option<CustomPlacer<D>>,
}

/// Resolve `anchor` against the current document geometry.
///
/// Returns `None` when the anchor cannot be measured right now; callers skip
/// placement in that case.
pub fn resolve<D: Dom>(
    dom: &D,
    host: &D::Element,
    config: &PositioningConfig,
    anchor: &Anchor<D>,
    origin: &Origin,
) -> Option<Anchoring<D>> {
    let client = match &anchor.kind {
        AnchorKind::Makeshift { bounds } => Some(*bounds),
        AnchorKind::Node { node } => node
            .as_ref()
            .filter(|n| dom.is_attached(n))
            .map(|n| dom.bounding_box(n))
            .filter(|b| !b.is_empty()),
        AnchorKind::Selection { root } => dom.selection_box(root.as_ref().unwrap_or(host)),
    };
    let Some(client) = client else {
        tracing::debug!(use_fixed = config.use_fixed, "anchor unresolved");
        return None;
    };

    let anchor_box = origin.to_layout(client, &dom.viewport());
    tracing::trace!(?anchor_box, "anchor resolved");
    Some(Anchoring {
        anchor_box,
        bubble: anchor.bubble,
        layouts: anchor.layouts.clone(),
        overrides: anchor.overrides.clone(),
        placer: anchor.placer.clone(),
    })
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
    use crate::geometry::Viewport;

    fn schema_field(err: AnchorageError) -> String {
        match err {
            AnchorageError::SchemaValidation { field, .. } => field,
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_makeshift_from_json() {
        let info =
            AnchorInfo::from_json(r#"{"anchor":"makeshift","x":10,"y":20,"layouts":["north"]}"#)
                .unwrap();
        assert_eq!(
            info.kind,
            AnchorInfoKind::Makeshift(Bounds::new(10.0, 20.0, 0.0, 0.0))
        );
        assert_eq!(info.layouts, vec![Layout::North]);
    }

    #[test]
    fn test_defaults_to_corner_layouts() {
        let info = AnchorInfo::from_json(r#"{"anchor":"node"}"#).unwrap();
        assert_eq!(info.layouts, ALL_CORNERS.to_vec());
        assert_eq!(info.bubble, Bubble::default());
    }

    #[test]
    fn test_schema_errors_name_the_field() {
        let cases = [
            (r#"{"anchor":"makeshift","y":1}"#, "x"),
            (r#"{"anchor":"makeshift","x":"a","y":1}"#, "x"),
            (r#"{"anchor":"makeshift","x":1,"y":1,"width":-3}"#, "width"),
            (r#"{"anchor":"bogus"}"#, "anchor"),
            (r#"{"x":1}"#, "anchor"),
            (r#"{"anchor":"node","hotspot":1}"#, "hotspot"),
            (r#"{"anchor":"node","layouts":["up"]}"#, "layouts"),
            (r#"[1,2]"#, "anchor"),
        ];
        for (json, field) in cases {
            let err = AnchorInfo::from_json(json).unwrap_err();
            assert_eq!(schema_field(err), field, "for {json}");
        }
    }

    #[test]
    fn test_validate_rejects_nan_bubble() {
        let anchor: Anchor<MemoryDom> =
            Anchor::makeshift(Bounds::default()).with_bubble(Bubble::new(f64::NAN, 0.0));
        assert_eq!(schema_field(anchor.validate().unwrap_err()), "bubble");
    }

    #[test]
    fn test_node_anchor_misses() {
        let dom = MemoryDom::default();
        let host = dom.body();
        let config = PositioningConfig::default();
        let origin = Origin::relative(0.0, 0.0).unwrap();

        let absent: Anchor<MemoryDom> = Anchor::node(None);
        assert!(resolve(&dom, &host, &config, &absent, &origin).is_none());

        let detached = dom.create_element("span");
        dom.set_box(detached.unwrap(), Bounds::new(0.0, 0.0, 10.0, 10.0));
        assert!(resolve(&dom, &host, &config, &Anchor::node(detached), &origin).is_none());

        let zero = dom.create_in(host, "span");
        assert!(resolve(&dom, &host, &config, &Anchor::node(Some(zero)), &origin).is_none());
    }

    #[test]
    fn test_node_anchor_in_document_space() {
        let dom = MemoryDom::new(Viewport::new(800.0, 600.0).with_scroll(0.0, 100.0));
        let host = dom.body();
        let node = dom.create_in(host, "button");
        dom.set_box(node, Bounds::new(5.0, 10.0, 40.0, 20.0));
        let origin = Origin::relative(0.0, 0.0).unwrap();
        let anchoring = resolve(
            &dom,
            &host,
            &PositioningConfig::default(),
            &Anchor::node(Some(node)),
            &origin,
        )
        .unwrap();
        assert_eq!(anchoring.anchor_box, Bounds::new(5.0, 110.0, 40.0, 20.0));
    }

    #[test]
    fn test_selection_anchor_scoped_to_root() {
        let dom = MemoryDom::default();
        let host = dom.body();
        let editor = dom.create_in(host, "div");
        let other = dom.create_in(host, "div");
        let origin = Origin::fixed(0.0, 0.0, 1024.0, 768.0).unwrap();
        let config = PositioningConfig::default();
        let anchor: Anchor<MemoryDom> = Anchor::selection(Some(editor));

        assert!(resolve(&dom, &host, &config, &anchor, &origin).is_none());
        dom.set_selection(Some((other, Bounds::new(1.0, 1.0, 1.0, 1.0))));
        assert!(resolve(&dom, &host, &config, &anchor, &origin).is_none());
        dom.set_selection(Some((editor, Bounds::new(1.0, 2.0, 0.0, 14.0))));
        let anchoring = resolve(&dom, &host, &config, &anchor, &origin).unwrap();
        assert_eq!(anchoring.anchor_box, Bounds::new(1.0, 2.0, 0.0, 14.0));
    }
}
