//! `Positioner` JS export.

use wasm_bindgen::prelude::*;
use web_sys::Element;

use super::decode_or_default;
use crate::dom::WebDom;
use crate::error::AnchorageError;
use crate::positioning::{self, Anchor, AnchorInfo, PositioningConfig};

/// Places floating elements next to an anchor.
///
/// ```javascript
/// const positioner = new Positioner();
/// positioner.position(editor, menu, { anchor: "node", layouts: ["south"] }, { useFixed: true }, button);
/// ```
#[wasm_bindgen]
#[derive(Debug, Default)]
pub struct Positioner {
    dom: WebDom,
}

#[wasm_bindgen]
impl Positioner {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook::set_once();
        Self::default()
    }

    /// Position `placee` relative to `host` using the anchor descriptor.
    /// `node` is the anchor element when the descriptor's kind is `"node"`.
    ///
    /// # Errors
    /// Throws when the descriptor or config is malformed.
    pub fn position(
        &self,
        host: &Element,
        placee: &Element,
        anchor: JsValue,
        config: JsValue,
        node: Option<Element>,
    ) -> Result<(), JsValue> {
        let value: serde_json::Value = serde_wasm_bindgen::from_value(anchor)
            .map_err(|e| AnchorageError::schema("anchor", e.to_string()))?;
        let info = AnchorInfo::from_value(&value)?;
        let config: PositioningConfig = decode_or_default(config)?;
        let anchor = Anchor::<WebDom>::from_info(info, node);
        positioning::position(&self.dom, host, &config, &anchor, placee)?;
        Ok(())
    }

    /// CSS `position` value the config places with: `"fixed"` or
    /// `"absolute"`.
    ///
    /// # Errors
    /// Throws when the config is malformed.
    pub fn mode(&self, config: JsValue) -> Result<String, JsValue> {
        let config: PositioningConfig = decode_or_default(config)?;
        Ok(positioning::mode(&config).to_string())
    }
}
