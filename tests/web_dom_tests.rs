//! Browser-backed checks of `WebDom`. Run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use anchorage::dom::{Dom, WebDom};
use anchorage::positioning::{position, Anchor, Layout, PositioningConfig};
use anchorage::Bounds;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::Element;

wasm_bindgen_test_configure!(run_in_browser);

fn div_in_body() -> Element {
    let dom = WebDom;
    let document = web_sys::window().unwrap().document().unwrap();
    let el = dom.create_element("div").unwrap();
    let body: Element = document.body().unwrap().into();
    dom.append_child(&body, &el);
    el
}

#[wasm_bindgen_test]
fn style_class_and_attribute_primitives() {
    let dom = WebDom;
    let el = div_in_body();
    dom.set_css(&el, "left", "4px");
    assert_eq!(dom.css(&el, "left").as_deref(), Some("4px"));
    dom.remove_css(&el, "left");
    assert_eq!(dom.css(&el, "left"), None);

    dom.add_class(&el, "bar");
    assert!(dom.has_class(&el, "bar"));
    dom.set_attr(&el, "data-row", "3");
    assert_eq!(dom.attr(&el, "data-row").as_deref(), Some("3"));
    assert_eq!(dom.tag_name(&el), "div");
    assert!(dom.is_attached(&el));
    dom.remove(&el);
    assert!(!dom.is_attached(&el));
}

#[wasm_bindgen_test]
fn fixed_placement_in_browser() {
    let dom = WebDom;
    let host = div_in_body();
    let placee = div_in_body();
    dom.set_css(&placee, "width", "50px");
    dom.set_css(&placee, "height", "20px");

    let anchor = Anchor::<WebDom>::makeshift(Bounds::new(10.0, 10.0, 0.0, 0.0))
        .with_layouts(vec![Layout::SouthEast]);
    position(&dom, &host, &PositioningConfig::fixed(), &anchor, &placee).unwrap();

    assert_eq!(dom.css(&placee, "position").as_deref(), Some("fixed"));
    assert_eq!(dom.css(&placee, "left").as_deref(), Some("10px"));
    assert_eq!(dom.css(&placee, "top").as_deref(), Some("10px"));
    assert_eq!(dom.css(&placee, "visibility"), None);
}
