//! anchorage - anchored positioning and table resize bars for the web
//!
//! Places floating UI (menus, toolbars, tooltips) next to an anchor and
//! drives drag-to-resize bars over table rows and columns:
//! - Anchors: a fixed rectangle, an element, or the current text selection
//! - Layout choice among preferred directions with a fit/overflow fallback
//! - Fixed (viewport) or absolute (document) placement without flicker
//! - Resize bars that report row height and column width deltas
//!
//! All DOM access goes through the [`dom::Dom`] trait, so the engine runs
//! against [`dom::MemoryDom`] natively and against the browser on wasm32.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { Positioner, TableResizer } from 'anchorage';
//! await init();
//! new Positioner().position(editor, menu, { anchor: "selection" }, { useFixed: true });
//! const resizer = new TableResizer(editorBody, null, "ltr", {});
//! resizer.onAdjustWidth(({ table, delta, column }) => resizeColumn(table, column, delta));
//! ```

pub mod dom;
pub mod error;
pub mod events;
pub mod geometry;
pub mod positioning;
pub mod resize;
pub mod table;

#[cfg(target_arch = "wasm32")]
pub mod web;

use wasm_bindgen::prelude::*;

pub use error::{AnchorageError, Result};
pub use geometry::{Bounds, Origin, Point, Viewport};
pub use positioning::{position, Anchor, AnchorInfo, Layout, PositioningConfig};
pub use resize::{BarConfig, BarManager, Direction, ResizeWire};

#[cfg(target_arch = "wasm32")]
pub use web::{Positioner, TableResizer};

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
