//! Drawing and removing resize bars.
//!
//! Bar positions are a pure function of the table's current geometry: every
//! refresh removes all bars under the wire's parent and draws them again.

use super::{BarConfig, Direction, ResizeWire};
use crate::dom::Dom;
use crate::geometry::{px, Bounds, Point};
use crate::table;

/// A row or column boundary in document space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Boundary {
    /// Bottom edge of row `index`
    Row { index: usize, y: f64 },
    /// Trailing edge of column `index`
    Column { index: usize, x: f64 },
}

fn document_box<D: Dom>(dom: &D, el: &D::Element) -> Bounds {
    let viewport = dom.viewport();
    dom.bounding_box(el)
        .translate(viewport.scroll_x, viewport.scroll_y)
}

/// Current row and column boundaries of `table`.
///
/// Column `c` is measured from the first cell that starts in `c` and spans
/// exactly one column; columns with no such cell get no boundary.
pub fn boundaries<D: Dom>(dom: &D, table: &D::Element, direction: Direction) -> Vec<Boundary> {
    let details = table::from_table(dom, table);

    let mut found: Vec<Boundary> = details
        .iter()
        .enumerate()
        .map(|(index, row)| Boundary::Row {
            index,
            y: document_box(dom, &row.element).bottom(),
        })
        .collect();

    let placed = table::grid(&details);
    for index in 0..table::column_count(&placed) {
        let cell = placed
            .iter()
            .find(|c| c.column == index && c.colspan == 1);
        if let Some(cell) = cell {
            let b = document_box(dom, &cell.element);
            let x = match direction {
                Direction::Ltr => b.right(),
                Direction::Rtl => b.x,
            };
            found.push(Boundary::Column { index, x });
        }
    }
    found
}

fn draw<D: Dom>(
    dom: &D,
    wire: &ResizeWire<D::Element>,
    config: &BarConfig,
    boundary: Boundary,
    table_box: &Bounds,
    origin: Point,
) {
    let Some(bar) = dom.create_element("div") else {
        return;
    };
    let half = config.thickness / 2.0;
    let (rect, attr, index, class) = match boundary {
        Boundary::Row { index, y } => (
            Bounds::new(
                table_box.x - origin.x,
                y - origin.y - half,
                table_box.width,
                config.thickness,
            ),
            "data-row",
            index,
            config.rows_class(),
        ),
        Boundary::Column { index, x } => (
            Bounds::new(
                x - origin.x - half,
                table_box.y - origin.y,
                config.thickness,
                table_box.height,
            ),
            "data-column",
            index,
            config.cols_class(),
        ),
    };
    dom.set_css(&bar, "position", "absolute");
    dom.set_css(&bar, "left", &px(rect.x));
    dom.set_css(&bar, "top", &px(rect.y));
    dom.set_css(&bar, "width", &px(rect.width));
    dom.set_css(&bar, "height", &px(rect.height));
    dom.set_attr(&bar, attr, &index.to_string());
    dom.add_class(&bar, &config.bar_class());
    dom.add_class(&bar, &class);
    dom.append_child(&wire.parent, &bar);
}

/// Remove existing bars and draw fresh ones for `table`.
pub fn refresh<D: Dom>(
    dom: &D,
    wire: &ResizeWire<D::Element>,
    table: &D::Element,
    config: &BarConfig,
    direction: Direction,
) {
    destroy(dom, wire, config);
    if !dom.is_attached(table) {
        return;
    }
    let origin = wire.origin(dom);
    let table_box = document_box(dom, table);
    let found = boundaries(dom, table, direction);
    tracing::trace!(count = found.len(), "drawing resize bars");
    for boundary in found {
        draw(dom, wire, config, boundary, &table_box, origin);
    }
}

/// Remove every bar under the wire's parent.
pub fn destroy<D: Dom>(dom: &D, wire: &ResizeWire<D::Element>, config: &BarConfig) {
    for bar in dom.descendants_with_class(&wire.parent, &config.bar_class()) {
        dom.remove(&bar);
    }
}

pub fn hide<D: Dom>(dom: &D, wire: &ResizeWire<D::Element>, config: &BarConfig) {
    for bar in dom.descendants_with_class(&wire.parent, &config.bar_class()) {
        dom.set_css(&bar, "display", "none");
    }
}

pub fn show<D: Dom>(dom: &D, wire: &ResizeWire<D::Element>, config: &BarConfig) {
    for bar in dom.descendants_with_class(&wire.parent, &config.bar_class()) {
        dom.remove_css(&bar, "display");
    }
}

#[must_use]
pub fn is_row_bar<D: Dom>(dom: &D, el: &D::Element, config: &BarConfig) -> bool {
    dom.has_class(el, &config.rows_class())
}

#[must_use]
pub fn is_col_bar<D: Dom>(dom: &D, el: &D::Element, config: &BarConfig) -> bool {
    dom.has_class(el, &config.cols_class())
}
