//! Browser bindings (wasm32 only).
//!
//! - [`Positioner`]: position a floating element against a JS anchor
//!   descriptor
//! - [`TableResizer`]: wire resize bars to live mouse events

mod positioner;
mod resizer;

pub use positioner::Positioner;
pub use resizer::TableResizer;

use wasm_bindgen::JsValue;

use crate::error::{AnchorageError, Result};

/// Decode an optional serde value from JS. `undefined` and `null` give the
/// default.
pub(crate) fn decode_or_default<T>(value: JsValue) -> Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| AnchorageError::Config(e.to_string()))
}
