//! Resize-bar controller.
//!
//! Pointer events are fed in by the host (the browser binding or a test).
//! The controller keeps at most one [`DragSession`]; a mousedown on another
//! bar replaces the current one without emitting anything for it.

use super::bars;
use super::drag::Dragger;
use super::{BarConfig, Direction, ResizeWire};
use crate::dom::Dom;
use crate::events::Channel;
use crate::geometry::{parse_px, px, Point};

/// Style property a bar moves along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Row bars move vertically
    Top,
    /// Column bars move horizontally
    Left,
}

impl Axis {
    #[must_use]
    pub const fn property(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Left => "left",
        }
    }

    /// Attribute marking the coordinate a drag started from.
    #[must_use]
    pub const fn initial_attr(self) -> &'static str {
        match self {
            Self::Top => "data-initial-top",
            Self::Left => "data-initial-left",
        }
    }

    const fn index_attr(self) -> &'static str {
        match self {
            Self::Top => "data-row",
            Self::Left => "data-column",
        }
    }
}

/// One live drag of a bar.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession<E> {
    pub bar: E,
    pub axis: Axis,
    /// Bar coordinate when the drag started
    pub start: i64,
}

/// Observable controller state.
#[derive(Debug, Clone, PartialEq)]
pub enum BarState<E> {
    Idle,
    Hovering(E),
    Dragging(DragSession<E>),
}

/// A row should grow or shrink by `delta` pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustHeight<E> {
    pub table: E,
    pub delta: i64,
    pub row: usize,
}

/// A column should grow or shrink by `delta` pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustWidth<E> {
    pub table: E,
    pub delta: i64,
    pub column: usize,
}

/// A bar drag has started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartAdjust;

/// Channels emitted by a [`BarManager`].
#[derive(Debug)]
pub struct BarEvents<E> {
    pub adjust_height: Channel<AdjustHeight<E>>,
    pub adjust_width: Channel<AdjustWidth<E>>,
    pub start_adjust: Channel<StartAdjust>,
}

impl<E> Default for BarEvents<E> {
    fn default() -> Self {
        Self {
            adjust_height: Channel::new("adjustHeight"),
            adjust_width: Channel::new("adjustWidth"),
            start_adjust: Channel::new("startAdjust"),
        }
    }
}

impl<E> BarEvents<E> {
    fn clear(&self) {
        self.adjust_height.clear();
        self.adjust_width.clear();
        self.start_adjust.clear();
    }
}

/// Owns the resize bars of one wire and turns bar drags into resize events.
#[derive(Debug)]
pub struct BarManager<D: Dom> {
    dom: D,
    wire: ResizeWire<D::Element>,
    direction: Direction,
    config: BarConfig,
    dragger: Dragger<D::Element>,
    session: Option<DragSession<D::Element>>,
    hover_table: Option<D::Element>,
    destroyed: bool,
    events: BarEvents<D::Element>,
}

impl<D: Dom> BarManager<D> {
    pub fn new(dom: D, wire: ResizeWire<D::Element>, direction: Direction) -> Self {
        Self::with_config(dom, wire, direction, BarConfig::default())
    }

    pub fn with_config(
        dom: D,
        wire: ResizeWire<D::Element>,
        direction: Direction,
        config: BarConfig,
    ) -> Self {
        Self {
            dom,
            wire,
            direction,
            config,
            dragger: Dragger::new(),
            session: None,
            hover_table: None,
            destroyed: false,
            events: BarEvents::default(),
        }
    }

    #[must_use]
    pub fn events(&self) -> &BarEvents<D::Element> {
        &self.events
    }

    #[must_use]
    pub fn config(&self) -> &BarConfig {
        &self.config
    }

    #[must_use]
    pub fn wire(&self) -> &ResizeWire<D::Element> {
        &self.wire
    }

    #[must_use]
    pub fn session(&self) -> Option<&DragSession<D::Element>> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    #[must_use]
    pub fn state(&self) -> BarState<D::Element> {
        if let Some(session) = &self.session {
            return BarState::Dragging(session.clone());
        }
        match &self.hover_table {
            Some(table) => BarState::Hovering(table.clone()),
            None => BarState::Idle,
        }
    }

    /// Redraw the bars for `table` now, whatever the hover state.
    pub fn refresh(&self, table: &D::Element) {
        if self.destroyed {
            return;
        }
        bars::refresh(&self.dom, &self.wire, table, &self.config, self.direction);
    }

    /// Accept drag input again after [`BarManager::off`].
    pub fn on(&mut self) {
        if !self.destroyed {
            self.dragger.on();
        }
    }

    /// Ignore drag input until [`BarManager::on`]. A drag in progress is
    /// abandoned without an event.
    pub fn off(&mut self) {
        self.dragger.off();
        self.abandon_session();
    }

    pub fn hide_bars(&self) {
        bars::hide(&self.dom, &self.wire, &self.config);
    }

    pub fn show_bars(&self) {
        bars::show(&self.dom, &self.wire, &self.config);
    }

    /// Pointer entered `target` inside the view. Ignored while a bar is being
    /// dragged; the release redraws.
    pub fn mouse_over(&mut self, target: &D::Element) {
        if self.destroyed
            || self.session.is_some()
            || !self.dom.contains(&self.wire.view, target)
        {
            return;
        }
        if let Some(table) = self.dom.closest_tag(target, "table") {
            self.refresh(&table);
            self.hover_table = Some(table);
        }
    }

    /// Pointer left `target`. Leaving the table itself, or an idle bar,
    /// removes the bars. Nothing is removed while a bar is being dragged.
    pub fn mouse_out(&mut self, target: &D::Element) {
        if self.destroyed || self.session.is_some() {
            return;
        }
        let tag = self.dom.tag_name(target);
        let bar = tag == "div" && self.dom.has_class(target, &self.config.bar_class());
        if tag == "table" || bar {
            bars::destroy(&self.dom, &self.wire, &self.config);
            self.hover_table = None;
        }
    }

    /// Button pressed on `target` at `point`. Starts a drag when `target`
    /// is a bar.
    pub fn mouse_down(&mut self, target: &D::Element, point: Point) {
        if self.destroyed {
            return;
        }
        if bars::is_row_bar(&self.dom, target, &self.config) {
            self.start(target, Axis::Top, point);
        } else if bars::is_col_bar(&self.dom, target, &self.config) {
            self.start(target, Axis::Left, point);
        }
    }

    /// Pointer moved to `point`. Moves the dragged bar; nothing structural
    /// changes until the button is released.
    pub fn mouse_move(&mut self, point: Point) {
        if self.destroyed {
            return;
        }
        let Some(update) = self.dragger.track(point) else {
            return;
        };
        let Some(session) = &self.session else {
            return;
        };
        let delta = match session.axis {
            Axis::Top => update.y_delta,
            Axis::Left => update.x_delta,
        };
        let property = session.axis.property();
        let current = self.coordinate(&session.bar, property);
        self.dom
            .set_css(&session.bar, property, &px(current as f64 + delta));
    }

    /// Button released. Emits the resize for the dragged bar and redraws.
    pub fn mouse_up(&mut self) {
        if self.destroyed || !self.dragger.stop() {
            return;
        }
        let Some(session) = self.session.take() else {
            return;
        };
        let property = session.axis.property();
        let delta = self.coordinate(&session.bar, property) - session.start;
        self.dom.remove_attr(&session.bar, session.axis.initial_attr());

        let Some(table) = self.hover_table.clone() else {
            self.clear_dragging(&session.bar);
            return;
        };
        let index = self
            .dom
            .attr(&session.bar, session.axis.index_attr())
            .and_then(|v| v.trim().parse::<usize>().ok());

        tracing::debug!(axis = property, delta, ?index, "resize bar released");
        match (session.axis, index) {
            (Axis::Top, Some(row)) => self.events.adjust_height.trigger(&AdjustHeight {
                table: table.clone(),
                delta,
                row,
            }),
            (Axis::Left, Some(column)) => self.events.adjust_width.trigger(&AdjustWidth {
                table: table.clone(),
                delta,
                column,
            }),
            _ => {}
        }
        self.refresh(&table);
    }

    /// Native drag started inside the view. Returns whether the default
    /// action should be prevented, which is always while the controller is
    /// alive.
    #[must_use]
    pub fn drag_start(&self) -> bool {
        !self.destroyed
    }

    /// Tear down: drop any drag, remove all bars, and ignore every later
    /// input. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.dragger.destroy();
        self.abandon_session();
        self.hover_table = None;
        bars::destroy(&self.dom, &self.wire, &self.config);
        self.events.clear();
        self.destroyed = true;
        tracing::debug!("bar manager destroyed");
    }

    fn start(&mut self, bar: &D::Element, axis: Axis, point: Point) {
        if !self.dragger.is_enabled() {
            return;
        }
        if let Some(previous) = self.session.take() {
            if &previous.bar != bar {
                self.dom.remove_attr(&previous.bar, previous.axis.initial_attr());
                self.clear_dragging(&previous.bar);
            }
        }

        self.events.start_adjust.trigger(&StartAdjust);
        let start = self.coordinate(bar, axis.property());
        self.dom
            .set_attr(bar, axis.initial_attr(), &start.to_string());
        self.dom.add_class(bar, &self.config.dragging_class());
        self.dom.set_css(bar, "opacity", &self.config.drag_opacity);
        self.dragger.go(self.wire.parent.clone(), point);
        tracing::debug!(axis = axis.property(), start, "resize bar grabbed");
        self.session = Some(DragSession {
            bar: bar.clone(),
            axis,
            start,
        });
    }

    fn abandon_session(&mut self) {
        if let Some(session) = self.session.take() {
            self.dom.remove_attr(&session.bar, session.axis.initial_attr());
            self.clear_dragging(&session.bar);
        }
    }

    fn clear_dragging(&self, bar: &D::Element) {
        self.dom.remove_class(bar, &self.config.dragging_class());
        self.dom.remove_css(bar, "opacity");
    }

    fn coordinate(&self, el: &D::Element, property: &str) -> i64 {
        self.dom
            .css(el, property)
            .and_then(|v| parse_px(&v))
            .unwrap_or(0)
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
    use crate::dom::{MemoryDom, NodeId};
    use crate::geometry::Bounds;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Fixture {
        dom: MemoryDom,
        view: NodeId,
        table: NodeId,
        cell: NodeId,
    }

    /// A 2x2 table inside a view div; rows are 50px tall, columns 100px wide.
    fn fixture() -> Fixture {
        let dom = MemoryDom::default();
        let view = dom.create_in(dom.body(), "div");
        let table = dom.create_in(view, "table");
        dom.set_box(table, Bounds::new(10.0, 20.0, 200.0, 100.0));
        let mut cells = Vec::new();
        for r in 0..2_u8 {
            let y = 20.0 + 50.0 * f64::from(r);
            let tr = dom.create_in(table, "tr");
            dom.set_box(tr, Bounds::new(10.0, y, 200.0, 50.0));
            for c in 0..2_u8 {
                let td = dom.create_in(tr, "td");
                dom.set_box(td, Bounds::new(10.0 + 100.0 * f64::from(c), y, 100.0, 50.0));
                cells.push(td);
            }
        }
        Fixture {
            cell: cells[0],
            dom,
            view,
            table,
        }
    }

    fn manager(f: &Fixture) -> BarManager<MemoryDom> {
        BarManager::new(
            f.dom.clone(),
            ResizeWire::body(f.view, f.dom.body()),
            Direction::Ltr,
        )
    }

    fn bars_of(f: &Fixture, class: &str) -> Vec<NodeId> {
        f.dom.descendants_with_class(&f.dom.body(), class)
    }

    #[test]
    fn test_hover_draws_bars_and_leaving_table_removes_them() {
        let f = fixture();
        let mut m = manager(&f);
        m.mouse_over(&f.cell);
        assert_eq!(m.state(), BarState::Hovering(f.table));
        let rows = bars_of(&f, &m.config().rows_class());
        let cols = bars_of(&f, &m.config().cols_class());
        assert_eq!((rows.len(), cols.len()), (2, 2));
        assert_eq!(f.dom.attr(&rows[1], "data-row").as_deref(), Some("1"));

        m.mouse_out(&f.table);
        assert!(bars_of(&f, &m.config().bar_class()).is_empty());
        assert_eq!(m.state(), BarState::Idle);
    }

    #[test]
    fn test_hover_outside_view_is_ignored() {
        let f = fixture();
        let mut m = manager(&f);
        let outside = f.dom.create_in(f.dom.body(), "table");
        m.mouse_over(&outside);
        assert_eq!(m.state(), BarState::Idle);
    }

    #[test]
    fn test_drag_emits_height_delta_and_clears_marker() {
        let f = fixture();
        let mut m = manager(&f);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        m.events()
            .adjust_height
            .on(move |e: &AdjustHeight<NodeId>| sink.borrow_mut().push((e.delta, e.row)));
        let starts = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&starts);
        m.events()
            .start_adjust
            .on(move |_| *counter.borrow_mut() += 1);

        m.mouse_over(&f.cell);
        let bar = bars_of(&f, &m.config().rows_class())[0];
        f.dom.set_css(&bar, "top", "100px");
        m.mouse_down(&bar, Point::new(50.0, 100.0));
        assert_eq!(*starts.borrow(), 1);
        assert_eq!(f.dom.attr(&bar, "data-initial-top").as_deref(), Some("100"));
        assert!(f.dom.has_class(&bar, &m.config().dragging_class()));

        m.mouse_move(Point::new(50.0, 120.0));
        m.mouse_move(Point::new(50.0, 135.0));
        assert_eq!(f.dom.css(&bar, "top").as_deref(), Some("135px"));
        assert!(matches!(m.state(), BarState::Dragging(_)));

        m.mouse_up();
        assert_eq!(*seen.borrow(), vec![(35, 0)]);
        assert_eq!(f.dom.attr(&bar, "data-initial-top"), None);
        assert_eq!(m.session(), None);
        // bars are redrawn for the hovered table
        assert_eq!(bars_of(&f, &m.config().rows_class()).len(), 2);
    }

    #[test]
    fn test_hover_and_table_exit_keep_the_dragged_bar() {
        let f = fixture();
        let mut m = manager(&f);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        m.events()
            .adjust_height
            .on(move |e: &AdjustHeight<NodeId>| sink.borrow_mut().push(e.delta));

        m.mouse_over(&f.cell);
        let bar = bars_of(&f, &m.config().rows_class())[0];
        f.dom.set_css(&bar, "top", "66px");
        m.mouse_down(&bar, Point::new(0.0, 66.0));

        m.mouse_over(&f.cell);
        m.mouse_out(&f.table);
        assert!(f.dom.is_attached(&bar));
        assert_eq!(m.session().map(|s| s.bar), Some(bar));

        m.mouse_move(Point::new(0.0, 80.0));
        assert_eq!(f.dom.css(&bar, "top").as_deref(), Some("80px"));
        m.mouse_up();
        assert_eq!(*seen.borrow(), vec![14]);
        assert_eq!(m.state(), BarState::Hovering(f.table));
    }

    #[test]
    fn test_column_drag_emits_width() {
        let f = fixture();
        let mut m = manager(&f);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        m.events()
            .adjust_width
            .on(move |e: &AdjustWidth<NodeId>| sink.borrow_mut().push((e.delta, e.column)));

        m.mouse_over(&f.cell);
        let bar = bars_of(&f, &m.config().cols_class())[1];
        f.dom.set_css(&bar, "left", "200px");
        m.mouse_down(&bar, Point::new(200.0, 40.0));
        m.mouse_move(Point::new(180.0, 90.0));
        m.mouse_up();
        assert_eq!(*seen.borrow(), vec![(-20, 1)]);
    }

    #[test]
    fn test_second_mousedown_replaces_session() {
        let f = fixture();
        let mut m = manager(&f);
        let seen = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&seen);
        m.events()
            .adjust_height
            .on(move |_| *sink.borrow_mut() += 1);

        m.mouse_over(&f.cell);
        let bars = bars_of(&f, &m.config().rows_class());
        m.mouse_down(&bars[0], Point::default());
        m.mouse_down(&bars[1], Point::default());
        assert_eq!(f.dom.attr(&bars[0], "data-initial-top"), None);
        assert!(!f.dom.has_class(&bars[0], &m.config().dragging_class()));
        assert_eq!(m.session().map(|s| s.bar), Some(bars[1]));

        m.mouse_up();
        assert_eq!(*seen.borrow(), 1);
    }

    #[test]
    fn test_mouse_up_without_drag_is_silent() {
        let f = fixture();
        let mut m = manager(&f);
        let seen = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&seen);
        m.events()
            .adjust_height
            .on(move |_| *sink.borrow_mut() += 1);
        m.mouse_over(&f.cell);
        m.mouse_down(&f.cell, Point::default());
        m.mouse_up();
        assert_eq!(*seen.borrow(), 0);
    }

    #[test]
    fn test_off_abandons_drag() {
        let f = fixture();
        let mut m = manager(&f);
        m.mouse_over(&f.cell);
        let bar = bars_of(&f, &m.config().rows_class())[0];
        m.mouse_down(&bar, Point::default());
        m.off();
        assert_eq!(m.session(), None);
        assert_eq!(f.dom.attr(&bar, "data-initial-top"), None);
        m.mouse_down(&bar, Point::default());
        assert_eq!(m.session(), None);
        m.on();
        m.mouse_down(&bar, Point::default());
        assert!(m.session().is_some());
    }

    #[test]
    fn test_hide_and_show_bars() {
        let f = fixture();
        let mut m = manager(&f);
        m.mouse_over(&f.cell);
        m.hide_bars();
        let all = bars_of(&f, &m.config().bar_class());
        assert!(all
            .iter()
            .all(|b| f.dom.css(b, "display").as_deref() == Some("none")));
        m.show_bars();
        assert!(all.iter().all(|b| f.dom.css(b, "display").is_none()));
    }

    #[test]
    fn test_destroy_is_final_and_idempotent() {
        let f = fixture();
        let mut m = manager(&f);
        m.mouse_over(&f.cell);
        let bar = bars_of(&f, &m.config().rows_class())[0];
        m.mouse_down(&bar, Point::default());
        m.destroy();
        m.destroy();
        assert!(m.is_destroyed());
        assert!(!m.drag_start());
        assert!(bars_of(&f, &m.config().bar_class()).is_empty());
        assert_eq!(m.events().adjust_height.subscriber_count(), 0);

        m.mouse_over(&f.cell);
        assert!(bars_of(&f, &m.config().bar_class()).is_empty());
        assert_eq!(m.state(), BarState::Idle);
    }
}
