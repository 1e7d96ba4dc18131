//! [`Dom`] over the browser document via `web-sys`.

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use super::Dom;
use crate::geometry::{Bounds, Viewport};

/// The live browser document.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebDom;

fn style_of(el: &Element) -> Option<web_sys::CssStyleDeclaration> {
    el.dyn_ref::<HtmlElement>().map(HtmlElement::style)
}

impl Dom for WebDom {
    type Element = Element;

    fn css(&self, el: &Element, property: &str) -> Option<String> {
        let value = style_of(el)?.get_property_value(property).ok()?;
        (!value.is_empty()).then_some(value)
    }

    fn set_css(&self, el: &Element, property: &str, value: &str) {
        if let Some(style) = style_of(el) {
            let _ = style.set_property(property, value);
        }
    }

    fn remove_css(&self, el: &Element, property: &str) {
        if let Some(style) = style_of(el) {
            let _ = style.remove_property(property);
        }
    }

    fn attr(&self, el: &Element, name: &str) -> Option<String> {
        el.get_attribute(name)
    }

    fn set_attr(&self, el: &Element, name: &str, value: &str) {
        let _ = el.set_attribute(name, value);
    }

    fn remove_attr(&self, el: &Element, name: &str) {
        let _ = el.remove_attribute(name);
    }

    fn has_class(&self, el: &Element, class: &str) -> bool {
        el.class_list().contains(class)
    }

    fn add_class(&self, el: &Element, class: &str) {
        let _ = el.class_list().add_1(class);
    }

    fn remove_class(&self, el: &Element, class: &str) {
        let _ = el.class_list().remove_1(class);
    }

    fn tag_name(&self, el: &Element) -> String {
        el.tag_name().to_ascii_lowercase()
    }

    fn parent(&self, el: &Element) -> Option<Element> {
        el.parent_element()
    }

    fn children(&self, el: &Element) -> Vec<Element> {
        let list = el.children();
        (0..list.length()).filter_map(|i| list.item(i)).collect()
    }

    fn create_element(&self, tag: &str) -> Option<Element> {
        web_sys::window()?.document()?.create_element(tag).ok()
    }

    fn append_child(&self, parent: &Element, child: &Element) {
        let _ = parent.append_child(child);
    }

    fn remove(&self, el: &Element) {
        el.remove();
    }

    fn is_attached(&self, el: &Element) -> bool {
        el.is_connected()
    }

    fn bounding_box(&self, el: &Element) -> Bounds {
        let rect = el.get_bounding_client_rect();
        Bounds::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    fn viewport(&self) -> Viewport {
        let Some(window) = web_sys::window() else {
            return Viewport::default();
        };
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        Viewport::new(width, height).with_scroll(
            window.page_x_offset().unwrap_or(0.0),
            window.page_y_offset().unwrap_or(0.0),
        )
    }

    fn selection_box(&self, root: &Element) -> Option<Bounds> {
        let selection = web_sys::window()?.get_selection().ok()??;
        if selection.range_count() == 0 {
            return None;
        }
        let range = selection.get_range_at(0).ok()?;
        let container = range.common_ancestor_container().ok()?;
        if !root.contains(Some(&container)) {
            return None;
        }
        let rect = range.get_bounding_client_rect();
        Some(Bounds::new(
            rect.left(),
            rect.top(),
            rect.width(),
            rect.height(),
        ))
    }

    fn contains(&self, ancestor: &Element, el: &Element) -> bool {
        ancestor.contains(Some(el.as_ref()))
    }
}
