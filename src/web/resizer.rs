//! `TableResizer` JS export.
//!
//! Mouse listeners feed a shared [`BarManager`]. Resize events raised while
//! the manager is borrowed are queued and delivered to JS afterwards, so a
//! callback may call back into the resizer.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Object, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, EventTarget, MouseEvent};

use super::decode_or_default;
use crate::dom::WebDom;
use crate::error::AnchorageError;
use crate::geometry::Point;
use crate::resize::{BarConfig, BarManager, Direction, ResizeWire};

enum Outbound {
    Height { table: Element, delta: i64, row: usize },
    Width { table: Element, delta: i64, column: usize },
    Start,
}

#[derive(Default)]
struct Callbacks {
    adjust_height: Option<Function>,
    adjust_width: Option<Function>,
    start_adjust: Option<Function>,
}

type Pending = Rc<RefCell<Vec<Outbound>>>;

struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(MouseEvent)>,
}

/// Resize bars over the tables inside a view element.
///
/// ```javascript
/// const resizer = new TableResizer(view, null, "ltr", {});
/// resizer.onAdjustWidth(({ table, delta, column }) => { ... });
/// ```
#[wasm_bindgen]
pub struct TableResizer {
    manager: Rc<RefCell<BarManager<WebDom>>>,
    pending: Pending,
    callbacks: Rc<RefCell<Callbacks>>,
    listeners: Vec<Listener>,
}

fn target_element(event: &MouseEvent) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

fn page_point(event: &MouseEvent) -> Point {
    Point::new(f64::from(event.page_x()), f64::from(event.page_y()))
}

fn payload(table: &Element, delta: i64, key: &str, index: usize) -> JsValue {
    let object = Object::new();
    let _ = Reflect::set(&object, &"table".into(), table);
    let _ = Reflect::set(&object, &"delta".into(), &JsValue::from_f64(delta as f64));
    let _ = Reflect::set(&object, &key.into(), &JsValue::from_f64(index as f64));
    object.into()
}

/// Deliver queued events. Runs with no borrow of the manager held.
fn flush(pending: &Pending, callbacks: &Rc<RefCell<Callbacks>>) {
    let queued = std::mem::take(&mut *pending.borrow_mut());
    for event in queued {
        let (callback, arg) = {
            let cbs = callbacks.borrow();
            match event {
                Outbound::Height { table, delta, row } => (
                    cbs.adjust_height.clone(),
                    payload(&table, delta, "row", row),
                ),
                Outbound::Width {
                    table,
                    delta,
                    column,
                } => (
                    cbs.adjust_width.clone(),
                    payload(&table, delta, "column", column),
                ),
                Outbound::Start => (cbs.start_adjust.clone(), JsValue::UNDEFINED),
            }
        };
        if let Some(callback) = callback {
            if let Err(e) = callback.call1(&JsValue::NULL, &arg) {
                tracing::warn!(error = ?e, "resize callback threw");
            }
        }
    }
}

#[wasm_bindgen]
impl TableResizer {
    /// Attach resize bars to tables inside `view`.
    ///
    /// Without `parent` the bars go into `view` itself. A `parent` that is
    /// the document body is treated as document-positioned; any other
    /// `parent` is a positioned container and bars are offset by its
    /// position. `direction` is `"ltr"` (default) or `"rtl"`.
    ///
    /// # Errors
    /// Throws when `config` or `direction` is malformed or no document is
    /// available.
    #[wasm_bindgen(constructor)]
    pub fn new(
        view: Element,
        parent: Option<Element>,
        direction: Option<String>,
        config: JsValue,
    ) -> Result<TableResizer, JsValue> {
        console_error_panic_hook::set_once();

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| AnchorageError::Dom("no document".to_string()))?;
        let config: BarConfig = decode_or_default(config)?;
        let direction = match direction.as_deref() {
            None | Some("ltr") => Direction::Ltr,
            Some("rtl") => Direction::Rtl,
            Some(other) => {
                return Err(AnchorageError::Config(format!("unknown direction `{other}`")).into())
            }
        };
        let wire = match parent {
            None => ResizeWire::only(view.clone()),
            Some(p) if document.body().is_some_and(|b| AsRef::<Element>::as_ref(&b) == &p) => {
                ResizeWire::body(view.clone(), p)
            }
            Some(p) => ResizeWire::detached(view.clone(), p),
        };
        let parent_target: EventTarget = wire.parent.clone().into();

        let manager = BarManager::with_config(WebDom, wire, direction, config);
        let pending: Pending = Rc::new(RefCell::new(Vec::new()));
        {
            let events = manager.events();
            let queue = Rc::clone(&pending);
            events.adjust_height.on(move |e| {
                queue.borrow_mut().push(Outbound::Height {
                    table: e.table.clone(),
                    delta: e.delta,
                    row: e.row,
                });
            });
            let queue = Rc::clone(&pending);
            events.adjust_width.on(move |e| {
                queue.borrow_mut().push(Outbound::Width {
                    table: e.table.clone(),
                    delta: e.delta,
                    column: e.column,
                });
            });
            let queue = Rc::clone(&pending);
            events
                .start_adjust
                .on(move |_| queue.borrow_mut().push(Outbound::Start));
        }

        let mut resizer = TableResizer {
            manager: Rc::new(RefCell::new(manager)),
            pending,
            callbacks: Rc::new(RefCell::new(Callbacks::default())),
            listeners: Vec::new(),
        };

        let view_target: EventTarget = view.into();
        let document_target: EventTarget = document.into();

        resizer.listen(&parent_target, "mousedown", |m, event| {
            if let Some(target) = target_element(&event) {
                m.mouse_down(&target, page_point(&event));
            }
        });
        resizer.listen(&view_target, "mouseover", |m, event| {
            if let Some(target) = target_element(&event) {
                m.mouse_over(&target);
            }
        });
        resizer.listen(&view_target, "mouseout", |m, event| {
            if let Some(target) = target_element(&event) {
                m.mouse_out(&target);
            }
        });
        resizer.listen(&view_target, "dragstart", |m, event| {
            if m.drag_start() {
                event.prevent_default();
            }
        });
        resizer.listen(&document_target, "mousemove", |m, event| {
            m.mouse_move(page_point(&event));
        });
        resizer.listen(&document_target, "mouseup", |m, _event| m.mouse_up());

        Ok(resizer)
    }

    /// Remove all bars and listeners. The resizer is inert afterwards.
    pub fn destroy(&mut self) {
        self.with_manager(BarManager::destroy);
        self.unlisten();
    }

    /// Redraw the bars for `table`.
    pub fn refresh(&self, table: &Element) {
        self.with_manager(|m| m.refresh(table));
    }

    pub fn on(&self) {
        self.with_manager(BarManager::on);
    }

    pub fn off(&self) {
        self.with_manager(BarManager::off);
    }

    #[wasm_bindgen(js_name = "hideBars")]
    pub fn hide_bars(&self) {
        self.with_manager(|m| m.hide_bars());
    }

    #[wasm_bindgen(js_name = "showBars")]
    pub fn show_bars(&self) {
        self.with_manager(|m| m.show_bars());
    }

    /// `callback({ table, delta, row })` after a row bar is released.
    #[wasm_bindgen(js_name = "onAdjustHeight")]
    pub fn on_adjust_height(&self, callback: Function) {
        self.callbacks.borrow_mut().adjust_height = Some(callback);
    }

    /// `callback({ table, delta, column })` after a column bar is released.
    #[wasm_bindgen(js_name = "onAdjustWidth")]
    pub fn on_adjust_width(&self, callback: Function) {
        self.callbacks.borrow_mut().adjust_width = Some(callback);
    }

    #[wasm_bindgen(js_name = "onStartAdjust")]
    pub fn on_start_adjust(&self, callback: Function) {
        self.callbacks.borrow_mut().start_adjust = Some(callback);
    }
}

impl TableResizer {
    fn listen(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        handler: impl Fn(&mut BarManager<WebDom>, MouseEvent) + 'static,
    ) {
        let manager = Rc::clone(&self.manager);
        let pending = Rc::clone(&self.pending);
        let callbacks = Rc::clone(&self.callbacks);
        let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
            if let Ok(mut m) = manager.try_borrow_mut() {
                handler(&mut *m, event);
            }
            flush(&pending, &callbacks);
        }) as Box<dyn FnMut(MouseEvent)>);
        if target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .is_ok()
        {
            self.listeners.push(Listener {
                target: target.clone(),
                kind,
                closure,
            });
        }
    }

    fn unlisten(&mut self) {
        for listener in self.listeners.drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.kind,
                listener.closure.as_ref().unchecked_ref(),
            );
        }
    }

    fn with_manager(&self, f: impl FnOnce(&mut BarManager<WebDom>)) {
        if let Ok(mut m) = self.manager.try_borrow_mut() {
            f(&mut *m);
        }
        flush(&self.pending, &self.callbacks);
    }
}

impl Drop for TableResizer {
    fn drop(&mut self) {
        self.unlisten();
    }
}
