//! Placement executor: applies an anchoring to a floating element.

use super::anchor::{resolve, Anchor, Anchoring};
use super::layout;
use super::PositioningConfig;
use crate::dom::Dom;
use crate::error::Result;
use crate::geometry::Origin;

/// Hides an element for the duration of a measurement.
///
/// Acquiring records the inline `visibility` and sets it to `hidden`; drop
/// puts back the recorded value, or removes the property if there was none.
pub struct HiddenMeasurement<'a, D: Dom> {
    dom: &'a D,
    el: &'a D::Element,
    previous: Option<String>,
}

impl<'a, D: Dom> HiddenMeasurement<'a, D> {
    pub fn acquire(dom: &'a D, el: &'a D::Element) -> Self {
        let previous = dom.css(el, "visibility");
        dom.set_css(el, "visibility", "hidden");
        Self { dom, el, previous }
    }
}

impl<D: Dom> Drop for HiddenMeasurement<'_, D> {
    fn drop(&mut self) {
        match self.previous.as_deref() {
            Some(value) => self.dom.set_css(self.el, "visibility", value),
            None => self.dom.remove_css(self.el, "visibility"),
        }
    }
}

/// Origin used for a positioning call: the viewport when fixed, otherwise
/// the host's document-space top-left.
///
/// # Errors
/// Returns `NonFinite` if the measured geometry is not finite.
pub fn origin_for<D: Dom>(dom: &D, host: &D::Element, config: &PositioningConfig) -> Result<Origin> {
    if config.use_fixed {
        let viewport = dom.viewport();
        Origin::fixed(0.0, 0.0, viewport.width, viewport.height)
    } else {
        let position = dom.absolute_position(host);
        Origin::relative(position.x, position.y)
    }
}

/// CSS `position` value the floating element ends up with.
#[must_use]
pub fn mode(config: &PositioningConfig) -> &'static str {
    if config.use_fixed {
        "fixed"
    } else {
        "absolute"
    }
}

/// Default executor: fit the placee around the anchor box and write its
/// position.
///
/// Fixed placement lays out against the viewport. Relative placement uses
/// `config.bounds` (document space) and falls back to the visible part of
/// the document.
pub fn place<D: Dom>(
    dom: &D,
    _host: &D::Element,
    origin: &Origin,
    anchoring: &Anchoring<D>,
    config: &PositioningConfig,
    placee: &D::Element,
) {
    let viewport = dom.viewport();
    let bounds = match config.bounds {
        Some(bounds) if !config.use_fixed => bounds,
        _ => origin.view_box(&viewport),
    };
    let size = dom.bounding_box(placee);

    match layout::choose(
        &anchoring.anchor_box,
        size.width,
        size.height,
        anchoring.bubble,
        &anchoring.layouts,
        &bounds,
    ) {
        Some(decision) => {
            tracing::debug!(layout = ?decision.layout, fixed = origin.is_fixed(), "placing");
            let reposition = origin.reposition(
                &decision.bounds,
                decision.layout.attaches_right(),
                decision.layout.attaches_bottom(),
            );
            layout::write(dom, placee, &reposition);
        }
        None => tracing::debug!("no layout candidates"),
    }

    for (property, value) in &anchoring.overrides {
        dom.set_css(placee, property, value);
    }
}

/// Position `placee` against `anchor`.
///
/// The placee is switched to `position: fixed` and hidden while the anchor
/// is measured. When the anchor cannot be resolved the placee's inline style
/// is restored exactly and nothing else changes. Otherwise the anchoring's
/// custom placer (or [`place`]) runs, `visibility` is restored, and a
/// leftover `position: fixed` with no directional property is removed.
///
/// # Errors
/// Returns `SchemaValidation` for a malformed anchor, before touching the
/// placee.
pub fn position<D: Dom>(
    dom: &D,
    host: &D::Element,
    config: &PositioningConfig,
    anchor: &Anchor<D>,
    placee: &D::Element,
) -> Result<()> {
    anchor.validate()?;
    let origin = origin_for(dom, host, config)?;

    let snapshot = dom.attr(placee, "style");
    dom.set_css(placee, "position", "fixed");

    let placed = {
        let _hidden = HiddenMeasurement::acquire(dom, placee);
        match resolve(dom, host, config, anchor, &origin) {
            Some(anchoring) => {
                match &anchoring.placer {
                    Some(placer) => placer.call(dom, host, &origin, &anchoring, config, placee),
                    None => place(dom, host, &origin, &anchoring, config, placee),
                }
                true
            }
            None => false,
        }
    };

    if !placed {
        match snapshot {
            Some(style) => dom.set_attr(placee, "style", &style),
            None => dom.remove_attr(placee, "style"),
        }
        return Ok(());
    }

    let directional = ["left", "top", "right", "bottom"]
        .iter()
        .any(|p| dom.css(placee, p).is_some());
    if !directional && dom.css(placee, "position").as_deref() == Some("fixed") {
        dom.remove_css(placee, "position");
    }
    Ok(())
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
    fn test_hidden_measurement_restores_on_drop() {
        let dom = MemoryDom::default();
        let el = dom.create_in(dom.body(), "div");
        dom.set_css(&el, "visibility", "visible");
        {
            let _guard = HiddenMeasurement::acquire(&dom, &el);
            assert_eq!(dom.css(&el, "visibility").as_deref(), Some("hidden"));
        }
        assert_eq!(dom.css(&el, "visibility").as_deref(), Some("visible"));

        dom.remove_css(&el, "visibility");
        drop(HiddenMeasurement::acquire(&dom, &el));
        assert_eq!(dom.css(&el, "visibility"), None);
    }

    #[test]
    fn test_origin_for_each_mode() {
        let dom = MemoryDom::new(Viewport::new(800.0, 600.0).with_scroll(10.0, 20.0));
        let host = dom.create_in(dom.body(), "div");
        dom.set_box(host, Bounds::new(5.0, 6.0, 100.0, 100.0));

        let fixed = origin_for(&dom, &host, &PositioningConfig::fixed()).unwrap();
        assert_eq!(fixed, Origin::fixed(0.0, 0.0, 800.0, 600.0).unwrap());
        let relative = origin_for(&dom, &host, &PositioningConfig::relative()).unwrap();
        assert_eq!(relative, Origin::relative(15.0, 26.0).unwrap());
    }
}
