//! Resize bar placement and drag behaviour against an in-memory document.
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
use anchorage::geometry::{Bounds, Point, Viewport};
use anchorage::resize::{
    bars, AdjustHeight, AdjustWidth, BarConfig, BarManager, BarState, Direction, ResizeWire,
};
use test_case::test_case;

/// A table at (10, 20) with two 50px rows and three 60px columns. The second
/// row's first cell spans two columns.
fn table_in(dom: &MemoryDom, parent: NodeId) -> NodeId {
    let table = dom.create_in(parent, "table");
    dom.set_box(table, Bounds::new(10.0, 20.0, 180.0, 100.0));
    let tbody = dom.create_in(table, "tbody");
    for (r, spans) in [[1_u8, 1, 1].as_slice(), [2_u8, 1].as_slice()].iter().enumerate() {
        let y = 20.0 + 50.0 * f64::from(u8::try_from(r).unwrap());
        let tr = dom.create_in(tbody, "tr");
        dom.set_box(tr, Bounds::new(10.0, y, 180.0, 50.0));
        let mut x = 10.0;
        for &span in *spans {
            let td = dom.create_in(tr, "td");
            if span > 1 {
                dom.set_attr(&td, "colspan", &span.to_string());
            }
            let width = 60.0 * f64::from(span);
            dom.set_box(td, Bounds::new(x, y, width, 50.0));
            x += width;
        }
    }
    table
}

fn first_cell(dom: &MemoryDom, table: NodeId) -> NodeId {
    let tbody = dom.children(&table)[0];
    let tr = dom.children(&tbody)[0];
    dom.children(&tr)[0]
}

fn bars_with(dom: &MemoryDom, root: NodeId, class: &str) -> Vec<NodeId> {
    dom.descendants_with_class(&root, class)
}

#[test]
fn test_row_and_column_bar_geometry() {
    let dom = MemoryDom::default();
    let table = table_in(&dom, dom.body());
    let wire = ResizeWire::only(dom.body());
    let config = BarConfig::default();
    bars::refresh(&dom, &wire, &table, &config, Direction::Ltr);

    let rows = bars_with(&dom, dom.body(), &config.rows_class());
    assert_eq!(rows.len(), 2);
    assert_eq!(dom.css(&rows[0], "top").as_deref(), Some("66.5px"));
    assert_eq!(dom.css(&rows[0], "left").as_deref(), Some("10px"));
    assert_eq!(dom.css(&rows[0], "width").as_deref(), Some("180px"));
    assert_eq!(dom.css(&rows[0], "height").as_deref(), Some("7px"));
    assert_eq!(dom.css(&rows[0], "position").as_deref(), Some("absolute"));

    // every column has a single-span cell in the first row
    let cols = bars_with(&dom, dom.body(), &config.cols_class());
    let lefts: Vec<String> = cols.iter().filter_map(|c| dom.css(c, "left")).collect();
    assert_eq!(lefts, vec!["66.5px", "126.5px", "186.5px"]);
    let indices: Vec<String> = cols
        .iter()
        .filter_map(|c| dom.attr(c, "data-column"))
        .collect();
    assert_eq!(indices, vec!["0", "1", "2"]);
}

#[test_case(Direction::Ltr, 70.0; "ltr uses right edge")]
#[test_case(Direction::Rtl, 10.0; "rtl uses left edge")]
fn test_column_boundary_direction(direction: Direction, expected: f64) {
    let dom = MemoryDom::default();
    let table = table_in(&dom, dom.body());
    let found = bars::boundaries(&dom, &table, direction);
    let first_column = found.iter().find_map(|b| match b {
        bars::Boundary::Column { index: 0, x } => Some(*x),
        _ => None,
    });
    assert_eq!(first_column, Some(expected));
}

#[test]
fn test_scroll_moves_bars_into_document_space() {
    let dom = MemoryDom::default();
    dom.set_viewport(Viewport::new(1024.0, 768.0).with_scroll(0.0, 100.0));
    let table = table_in(&dom, dom.body());
    let wire = ResizeWire::only(dom.body());
    let config = BarConfig::default();
    bars::refresh(&dom, &wire, &table, &config, Direction::Ltr);
    let rows = bars_with(&dom, dom.body(), &config.rows_class());
    assert_eq!(dom.css(&rows[0], "top").as_deref(), Some("166.5px"));
}

#[test]
fn test_detached_wire_offsets_by_parent() {
    let dom = MemoryDom::default();
    let view = dom.create_in(dom.body(), "div");
    let overlay = dom.create_in(dom.body(), "div");
    dom.set_box(overlay, Bounds::new(50.0, 60.0, 500.0, 500.0));
    let table = table_in(&dom, view);
    let wire = ResizeWire::detached(view, overlay);
    let config = BarConfig::default();
    bars::refresh(&dom, &wire, &table, &config, Direction::Ltr);

    let rows = bars_with(&dom, overlay, &config.rows_class());
    assert_eq!(dom.css(&rows[0], "top").as_deref(), Some("6.5px"));
    assert_eq!(dom.css(&rows[0], "left").as_deref(), Some("-40px"));
    assert!(bars_with(&dom, view, &config.bar_class()).is_empty());
}

#[test]
fn test_detached_table_draws_nothing() {
    let dom = MemoryDom::default();
    let loose = dom.create_element("table").unwrap();
    let wire = ResizeWire::only(dom.body());
    let config = BarConfig::default();
    bars::refresh(&dom, &wire, &loose, &config, Direction::Ltr);
    assert!(bars_with(&dom, dom.body(), &config.bar_class()).is_empty());
}

#[test]
fn test_custom_class_prefix() {
    let dom = MemoryDom::default();
    let table = table_in(&dom, dom.body());
    let config = BarConfig {
        class_prefix: "ephox-snooker-".to_string(),
        ..BarConfig::default()
    };
    let mut manager = BarManager::with_config(
        dom.clone(),
        ResizeWire::only(dom.body()),
        Direction::Ltr,
        config,
    );
    manager.mouse_over(&first_cell(&dom, table));
    assert_eq!(
        bars_with(&dom, dom.body(), "ephox-snooker-resizer-rows").len(),
        2
    );
}

#[test]
fn test_drag_reports_integer_delta() {
    let dom = MemoryDom::default();
    let table = table_in(&dom, dom.body());
    let mut manager = BarManager::new(dom.clone(), ResizeWire::only(dom.body()), Direction::Ltr);
    let heights: Rc<RefCell<Vec<AdjustHeight<NodeId>>>> = Rc::default();
    let sink = Rc::clone(&heights);
    manager
        .events()
        .adjust_height
        .on(move |e| sink.borrow_mut().push(e.clone()));

    manager.mouse_over(&first_cell(&dom, table));
    let rows = bars_with(&dom, dom.body(), &manager.config().rows_class());
    let bar = rows[1];
    dom.set_css(&bar, "top", "100px");

    manager.mouse_down(&bar, Point::new(0.0, 500.0));
    assert_eq!(dom.attr(&bar, "data-initial-top").as_deref(), Some("100"));
    manager.mouse_move(Point::new(0.0, 535.0));
    manager.mouse_up();

    let heights = heights.borrow();
    assert_eq!(heights.len(), 1);
    assert_eq!(heights[0].delta, 35);
    assert_eq!(heights[0].row, 1);
    assert_eq!(heights[0].table, table);
    assert_eq!(dom.attr(&bar, "data-initial-top"), None);
    assert_eq!(manager.state(), BarState::Hovering(table));
}

#[test]
fn test_only_one_session_reports() {
    let dom = MemoryDom::default();
    let table = table_in(&dom, dom.body());
    let mut manager = BarManager::new(dom.clone(), ResizeWire::only(dom.body()), Direction::Ltr);
    let widths: Rc<RefCell<Vec<usize>>> = Rc::default();
    let sink = Rc::clone(&widths);
    manager
        .events()
        .adjust_width
        .on(move |e: &AdjustWidth<NodeId>| sink.borrow_mut().push(e.column));

    manager.mouse_over(&first_cell(&dom, table));
    let cols = bars_with(&dom, dom.body(), &manager.config().cols_class());
    manager.mouse_down(&cols[0], Point::new(70.0, 0.0));
    manager.mouse_down(&cols[2], Point::new(190.0, 0.0));
    manager.mouse_move(Point::new(200.0, 0.0));
    manager.mouse_up();
    manager.mouse_up();

    assert_eq!(*widths.borrow(), vec![2]);
    let marked = [cols[0], cols[2]]
        .iter()
        .filter(|b| dom.attr(b, "data-initial-left").is_some())
        .count();
    assert_eq!(marked, 0);
}

#[test]
fn test_dragged_bar_survives_mouse_out() {
    let dom = MemoryDom::default();
    let table = table_in(&dom, dom.body());
    let mut manager = BarManager::new(dom.clone(), ResizeWire::only(dom.body()), Direction::Ltr);
    manager.mouse_over(&first_cell(&dom, table));
    let rows = bars_with(&dom, dom.body(), &manager.config().rows_class());

    // leaving an idle bar clears the overlay
    manager.mouse_out(&rows[0]);
    assert!(bars_with(&dom, dom.body(), &manager.config().bar_class()).is_empty());

    manager.mouse_over(&first_cell(&dom, table));
    let rows = bars_with(&dom, dom.body(), &manager.config().rows_class());
    manager.mouse_down(&rows[0], Point::default());
    manager.mouse_out(&rows[0]);
    assert_eq!(
        bars_with(&dom, dom.body(), &manager.config().bar_class()).len(),
        5
    );

    // crossing cells and leaving the table mid-drag redraws nothing
    manager.mouse_over(&first_cell(&dom, table));
    manager.mouse_out(&table);
    assert!(dom.is_attached(&rows[0]));
    assert_eq!(
        bars_with(&dom, dom.body(), &manager.config().bar_class()).len(),
        5
    );
    assert!(matches!(manager.state(), BarState::Dragging(ref s) if s.bar == rows[0]));
}

#[test]
fn test_destroy_tears_everything_down() {
    let dom = MemoryDom::default();
    let table = table_in(&dom, dom.body());
    let mut manager = BarManager::new(dom.clone(), ResizeWire::only(dom.body()), Direction::Ltr);
    let fired = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&fired);
    manager
        .events()
        .adjust_height
        .on(move |_| *sink.borrow_mut() += 1);

    manager.mouse_over(&first_cell(&dom, table));
    let rows = bars_with(&dom, dom.body(), &manager.config().rows_class());
    manager.mouse_down(&rows[0], Point::default());
    manager.destroy();

    manager.mouse_move(Point::new(0.0, 40.0));
    manager.mouse_up();
    manager.refresh(&table);
    assert_eq!(*fired.borrow(), 0);
    assert!(bars_with(&dom, dom.body(), &manager.config().bar_class()).is_empty());
    assert_eq!(dom.attr(&rows[0], "data-initial-top"), None);
    assert_eq!(manager.state(), BarState::Idle);
}
