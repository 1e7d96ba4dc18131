//! Table structure lookup.
//!
//! Reads rows and cells out of a `<table>` element and lays them out on a
//! grid, taking `rowspan`/`colspan` into account. Nested tables are not
//! descended into.

use crate::dom::Dom;

/// Largest `colspan` a browser honours.
pub const MAX_COLSPAN: usize = 1000;
/// Largest `rowspan` a browser honours.
pub const MAX_ROWSPAN: usize = 65534;

/// One cell and its spans.
#[derive(Debug, Clone, PartialEq)]
pub struct Detail<E> {
    pub element: E,
    pub rowspan: usize,
    pub colspan: usize,
}

/// One row element with its cells.
#[derive(Debug, Clone, PartialEq)]
pub struct RowDetails<E> {
    pub element: E,
    pub cells: Vec<Detail<E>>,
}

/// A cell placed on the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell<E> {
    pub element: E,
    pub row: usize,
    pub column: usize,
    pub rowspan: usize,
    pub colspan: usize,
}

/// Row elements of `table`, in document order.
pub fn rows<D: Dom>(dom: &D, table: &D::Element) -> Vec<D::Element> {
    let mut found = Vec::new();
    for child in dom.children(table) {
        match dom.tag_name(&child).as_str() {
            "tr" => found.push(child),
            "thead" | "tbody" | "tfoot" => found.extend(
                dom.children(&child)
                    .into_iter()
                    .filter(|c| dom.tag_name(c) == "tr"),
            ),
            _ => {}
        }
    }
    found
}

/// Cell elements (`td`/`th`) of a row.
pub fn cells<D: Dom>(dom: &D, row: &D::Element) -> Vec<D::Element> {
    dom.children(row)
        .into_iter()
        .filter(|c| matches!(dom.tag_name(c).as_str(), "td" | "th"))
        .collect()
}

fn span<D: Dom>(dom: &D, cell: &D::Element, name: &str, max: usize) -> usize {
    dom.attr(cell, name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .map_or(1, |n| n.min(max))
}

fn detail<D: Dom>(dom: &D, cell: D::Element) -> Detail<D::Element> {
    Detail {
        rowspan: span(dom, &cell, "rowspan", MAX_ROWSPAN),
        colspan: span(dom, &cell, "colspan", MAX_COLSPAN),
        element: cell,
    }
}

/// Row details for every row of `table`.
pub fn from_table<D: Dom>(dom: &D, table: &D::Element) -> Vec<RowDetails<D::Element>> {
    rows(dom, table)
        .into_iter()
        .map(|row| {
            let cells = cells(dom, &row)
                .into_iter()
                .map(|c| detail(dom, c))
                .collect();
            RowDetails {
                element: row,
                cells,
            }
        })
        .collect()
}

/// Place every cell on the grid. Cells skip over positions still covered by
/// a `rowspan` from an earlier row.
#[must_use]
pub fn grid<E: Clone>(details: &[RowDetails<E>]) -> Vec<GridCell<E>> {
    // occupied[r] holds the covered column indices of row r
    let mut occupied: Vec<Vec<bool>> = vec![Vec::new(); details.len()];
    let mut placed = Vec::new();

    for (r, row) in details.iter().enumerate() {
        let mut column = 0;
        for cell in &row.cells {
            while occupied
                .get(r)
                .and_then(|cols| cols.get(column))
                .copied()
                .unwrap_or(false)
            {
                column += 1;
            }
            let end = column.saturating_add(cell.colspan);
            for covered_row in occupied.iter_mut().skip(r).take(cell.rowspan) {
                if covered_row.len() < end {
                    covered_row.resize(end, false);
                }
                for slot in covered_row.iter_mut().skip(column).take(cell.colspan) {
                    *slot = true;
                }
            }
            placed.push(GridCell {
                element: cell.element.clone(),
                row: r,
                column,
                rowspan: cell.rowspan,
                colspan: cell.colspan,
            });
            column = end;
        }
    }
    placed
}

/// Number of columns spanned by the grid.
#[must_use]
pub fn column_count<E>(cells: &[GridCell<E>]) -> usize {
    cells
        .iter()
        .map(|c| c.column.saturating_add(c.colspan))
        .max()
        .unwrap_or(0)
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

    fn build(dom: &MemoryDom, shape: &[&[(usize, usize)]]) -> NodeId {
        let table = dom.create_in(dom.body(), "table");
        let tbody = dom.create_in(table, "tbody");
        for row in shape {
            let tr = dom.create_in(tbody, "tr");
            for &(rowspan, colspan) in *row {
                let td = dom.create_in(tr, "td");
                if rowspan > 1 {
                    dom.set_attr(&td, "rowspan", &rowspan.to_string());
                }
                if colspan > 1 {
                    dom.set_attr(&td, "colspan", &colspan.to_string());
                }
            }
        }
        table
    }

    #[test]
    fn test_rows_across_groups_and_spans() {
        let dom = MemoryDom::default();
        let table = dom.create_in(dom.body(), "table");
        let thead = dom.create_in(table, "thead");
        let head_row = dom.create_in(thead, "tr");
        let th = dom.create_in(head_row, "th");
        dom.set_attr(&th, "colspan", "2");
        let bare = dom.create_in(table, "tr");
        dom.create_in(bare, "td");
        dom.create_in(bare, "td");

        let details = from_table(&dom, &table);
        assert_eq!(details.len(), 2);
        assert_eq!(details[0].element, head_row);
        assert_eq!(details[0].cells[0].colspan, 2);
        // a row directly under <table> still counts
        assert_eq!(details[1].element, bare);
        assert_eq!(details[1].cells.len(), 2);
    }

    #[test]
    fn test_bad_span_defaults_to_one() {
        let dom = MemoryDom::default();
        let table = build(&dom, &[&[(1, 1)]]);
        let td = cells(&dom, &rows(&dom, &table)[0])[0];
        dom.set_attr(&td, "colspan", "zero");
        assert_eq!(from_table(&dom, &table)[0].cells[0].colspan, 1);
        dom.set_attr(&td, "colspan", "0");
        assert_eq!(from_table(&dom, &table)[0].cells[0].colspan, 1);
    }

    #[test]
    fn test_grid_skips_rowspan_cover() {
        let dom = MemoryDom::default();
        // row 0: [A rowspan 2][B][C]
        // row 1:              [D][E]
        let table = build(&dom, &[&[(2, 1), (1, 1), (1, 1)], &[(1, 1), (1, 1)]]);
        let placed = grid(&from_table(&dom, &table));
        let row1: Vec<usize> = placed.iter().filter(|c| c.row == 1).map(|c| c.column).collect();
        assert_eq!(row1, vec![1, 2]);
        assert_eq!(column_count(&placed), 3);
    }

    #[test]
    fn test_oversized_spans_are_clamped() {
        let dom = MemoryDom::default();
        let table = build(&dom, &[&[(1, 1), (1, 1)]]);
        let tds = cells(&dom, &rows(&dom, &table)[0]);
        dom.set_attr(&tds[0], "colspan", "18446744073709551615");
        dom.set_attr(&tds[1], "rowspan", "2000000000");

        let details = from_table(&dom, &table);
        assert_eq!(details[0].cells[0].colspan, MAX_COLSPAN);
        assert_eq!(details[0].cells[1].rowspan, MAX_ROWSPAN);
        let placed = grid(&details);
        assert_eq!(placed[1].column, MAX_COLSPAN);
        assert_eq!(column_count(&placed), MAX_COLSPAN + 1);
    }
}
