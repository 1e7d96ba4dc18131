//! Positioning behaviour against an in-memory document.
//!
//! Geometry is scripted through `MemoryDom::set_box`; the default viewport is
//! 1024x768 with no scroll.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::rc::Rc;

use anchorage::dom::{Dom, MemoryDom, NodeId};
use anchorage::positioning::{
    mode, position, Anchor, AnchorInfo, Bubble, CustomPlacer, Layout, PositioningConfig,
};
use anchorage::{AnchorageError, Bounds, Viewport};
use test_case::test_case;

struct Scene {
    dom: MemoryDom,
    host: NodeId,
    placee: NodeId,
}

fn scene() -> Scene {
    let dom = MemoryDom::default();
    let host = dom.create_in(dom.body(), "div");
    dom.set_box(host, Bounds::new(0.0, 0.0, 1024.0, 768.0));
    let placee = dom.create_in(dom.body(), "div");
    dom.set_box(placee, Bounds::new(0.0, 0.0, 50.0, 20.0));
    Scene { dom, host, placee }
}

fn css(s: &Scene, property: &str) -> Option<String> {
    s.dom.css(&s.placee, property)
}

#[test]
fn test_fixed_makeshift_south_east() {
    let s = scene();
    let anchor = Anchor::makeshift(Bounds::new(100.0, 100.0, 0.0, 0.0))
        .with_layouts(vec![Layout::SouthEast]);
    position(&s.dom, &s.host, &PositioningConfig::fixed(), &anchor, &s.placee).unwrap();

    assert_eq!(css(&s, "position").as_deref(), Some("fixed"));
    assert_eq!(css(&s, "left").as_deref(), Some("100px"));
    assert_eq!(css(&s, "top").as_deref(), Some("100px"));
    assert_eq!(css(&s, "right"), None);
    assert_eq!(css(&s, "bottom"), None);
}

#[test]
fn test_relative_origin_uses_document_space() {
    let s = scene();
    s.dom
        .set_viewport(Viewport::new(1024.0, 768.0).with_scroll(0.0, 300.0));
    s.dom.set_box(s.host, Bounds::new(200.0, 150.0, 400.0, 400.0));
    let button = s.dom.create_in(s.host, "button");
    s.dom.set_box(button, Bounds::new(250.0, 200.0, 40.0, 10.0));

    let anchor = Anchor::node(Some(button)).with_layouts(vec![Layout::SouthEast]);
    position(&s.dom, &s.host, &PositioningConfig::relative(), &anchor, &s.placee).unwrap();

    // host sits at (200, 450) in the document, the button's bottom at 510
    assert_eq!(css(&s, "position").as_deref(), Some("absolute"));
    assert_eq!(css(&s, "left").as_deref(), Some("50px"));
    assert_eq!(css(&s, "top").as_deref(), Some("60px"));
}

#[test]
fn test_fixed_flip_attaches_by_bottom_edge() {
    let s = scene();
    let anchor = Anchor::makeshift(Bounds::new(100.0, 750.0, 10.0, 10.0))
        .with_layouts(vec![Layout::SouthEast, Layout::NorthEast]);
    position(&s.dom, &s.host, &PositioningConfig::fixed(), &anchor, &s.placee).unwrap();

    // south-east would hang 12px below the viewport; north-east ends at 750
    assert_eq!(css(&s, "left").as_deref(), Some("100px"));
    assert_eq!(css(&s, "bottom").as_deref(), Some("18px"));
    assert_eq!(css(&s, "top"), None);
}

#[test]
fn test_nothing_fits_takes_least_overflow() {
    let s = scene();
    s.dom.set_box(s.placee, Bounds::new(0.0, 0.0, 50.0, 400.0));
    let anchor = Anchor::makeshift(Bounds::new(100.0, 300.0, 10.0, 100.0))
        .with_layouts(vec![Layout::SouthEast, Layout::NorthEast]);
    position(&s.dom, &s.host, &PositioningConfig::fixed(), &anchor, &s.placee).unwrap();

    // below overflows by 400 - 368 = 32, above by 100
    assert_eq!(css(&s, "top").as_deref(), Some("400px"));
}

#[test]
fn test_missing_node_leaves_style_untouched() {
    let s = scene();
    s.dom.set_css(&s.placee, "color", "red");
    s.dom.set_css(&s.placee, "left", "5px");
    let before = s.dom.attr(&s.placee, "style");

    let detached = s.dom.create_element("span").unwrap();
    for anchor in [Anchor::node(None), Anchor::node(Some(detached))] {
        position(&s.dom, &s.host, &PositioningConfig::fixed(), &anchor, &s.placee).unwrap();
        assert_eq!(s.dom.attr(&s.placee, "style"), before);
    }
}

#[test]
fn test_missing_selection_on_unstyled_placee() {
    let s = scene();
    let anchor = Anchor::selection(None);
    position(&s.dom, &s.host, &PositioningConfig::fixed(), &anchor, &s.placee).unwrap();
    assert_eq!(s.dom.attr(&s.placee, "style"), None);
}

#[test]
fn test_selection_defaults_to_host() {
    let s = scene();
    let text = s.dom.create_in(s.host, "p");
    s.dom
        .set_selection(Some((text, Bounds::new(300.0, 40.0, 60.0, 16.0))));
    let anchor = Anchor::selection(None).with_layouts(vec![Layout::South]);
    position(&s.dom, &s.host, &PositioningConfig::fixed(), &anchor, &s.placee).unwrap();

    assert_eq!(css(&s, "left").as_deref(), Some("305px"));
    assert_eq!(css(&s, "top").as_deref(), Some("56px"));
}

#[test_case(None; "unset")]
#[test_case(Some("visible"); "visible")]
#[test_case(Some("collapse"); "collapse")]
fn test_visibility_restored(initial: Option<&str>) {
    let s = scene();
    if let Some(v) = initial {
        s.dom.set_css(&s.placee, "visibility", v);
    }
    let anchor = Anchor::makeshift(Bounds::new(10.0, 10.0, 5.0, 5.0));
    position(&s.dom, &s.host, &PositioningConfig::fixed(), &anchor, &s.placee).unwrap();
    assert_eq!(css(&s, "visibility").as_deref(), initial);
}

#[test]
fn test_placee_hidden_while_placer_runs() {
    let s = scene();
    let seen = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    let placer = CustomPlacer::<MemoryDom>::new(move |dom, _host, _origin, anchoring, _config, placee| {
        *sink.borrow_mut() = Some((dom.css(placee, "visibility"), anchoring.anchor_box));
        dom.set_css(placee, "top", "1px");
    });
    let anchor = Anchor::makeshift(Bounds::new(7.0, 8.0, 1.0, 1.0)).with_placer(placer);
    position(&s.dom, &s.host, &PositioningConfig::fixed(), &anchor, &s.placee).unwrap();

    let (visibility, anchor_box) = seen.borrow().clone().unwrap();
    assert_eq!(visibility.as_deref(), Some("hidden"));
    assert_eq!(anchor_box, Bounds::new(7.0, 8.0, 1.0, 1.0));
    // the placer wrote a direction, so the fixed position stays
    assert_eq!(css(&s, "position").as_deref(), Some("fixed"));
    assert_eq!(css(&s, "top").as_deref(), Some("1px"));
    assert_eq!(css(&s, "visibility"), None);
}

#[test]
fn test_stray_fixed_is_cleaned_up() {
    let s = scene();
    let anchor = Anchor::makeshift(Bounds::new(10.0, 10.0, 5.0, 5.0)).with_layouts(Vec::new());
    position(&s.dom, &s.host, &PositioningConfig::fixed(), &anchor, &s.placee).unwrap();
    assert_eq!(css(&s, "position"), None);
}

#[test]
fn test_overrides_and_bubble() {
    let s = scene();
    let anchor = Anchor::makeshift(Bounds::new(100.0, 100.0, 20.0, 10.0))
        .with_layouts(vec![Layout::SouthEast])
        .with_bubble(Bubble::new(0.0, 6.0))
        .with_override("z-index", "10");
    position(&s.dom, &s.host, &PositioningConfig::fixed(), &anchor, &s.placee).unwrap();
    assert_eq!(css(&s, "top").as_deref(), Some("116px"));
    assert_eq!(css(&s, "z-index").as_deref(), Some("10"));
}

#[test]
fn test_relative_bounds_from_config() {
    let s = scene();
    s.dom.set_box(s.host, Bounds::new(0.0, 0.0, 300.0, 300.0));
    let anchor = Anchor::makeshift(Bounds::new(100.0, 250.0, 10.0, 10.0))
        .with_layouts(vec![Layout::SouthEast, Layout::NorthEast]);
    let config = PositioningConfig::relative().with_bounds(Bounds::new(0.0, 0.0, 300.0, 270.0));
    position(&s.dom, &s.host, &config, &anchor, &s.placee).unwrap();
    // south-east ends at 280, past the configured bounds
    assert_eq!(css(&s, "top").as_deref(), Some("230px"));
}

#[test]
fn test_bad_anchor_rejected_before_touching_placee() {
    let s = scene();
    let anchor = Anchor::makeshift(Bounds::new(0.0, 0.0, f64::NAN, 1.0));
    let err = position(&s.dom, &s.host, &PositioningConfig::fixed(), &anchor, &s.placee)
        .unwrap_err();
    assert!(matches!(err, AnchorageError::SchemaValidation { ref field, .. } if field == "width"));
    assert_eq!(s.dom.attr(&s.placee, "style"), None);
}

#[test]
fn test_descriptor_drives_placement() {
    let s = scene();
    let info = AnchorInfo::from_json(
        r#"{"anchor":"makeshift","x":40,"y":60,"layouts":["east"],"overrides":{"max-width":"200px"}}"#,
    )
    .unwrap();
    let anchor = Anchor::<MemoryDom>::from_info(info, None);
    let config = PositioningConfig::from_json(r#"{"useFixed":true}"#).unwrap();
    position(&s.dom, &s.host, &config, &anchor, &s.placee).unwrap();
    assert_eq!(css(&s, "left").as_deref(), Some("40px"));
    assert_eq!(css(&s, "top").as_deref(), Some("60px"));
    assert_eq!(css(&s, "max-width").as_deref(), Some("200px"));
}

#[test_case(PositioningConfig::fixed(), "fixed")]
#[test_case(PositioningConfig::relative(), "absolute")]
#[test_case(PositioningConfig::default(), "absolute")]
fn test_mode(config: PositioningConfig, expected: &str) {
    assert_eq!(mode(&config), expected);
}
