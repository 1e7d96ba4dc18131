//! Structured error types for anchorage.
//!
//! Only programming and configuration mistakes are errors. An anchor that
//! cannot be measured right now is reported as `None` by the solver, never
//! through this type.

/// All errors that can occur while positioning or wiring resize bars.
#[derive(Debug, thiserror::Error)]
pub enum AnchorageError {
    /// An anchor descriptor did not match the expected shape.
    #[error("{context}: invalid field `{field}`: {message}")]
    SchemaValidation {
        /// Which descriptor was being validated.
        context: String,
        /// The offending field (or `anchor` for the discriminant itself).
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// A geometry input was NaN or infinite.
    #[error("non-finite value for `{field}`")]
    NonFinite {
        /// Name of the argument.
        field: &'static str,
    },

    /// Configuration could not be decoded.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A browser DOM call failed.
    #[error("DOM error: {0}")]
    Dom(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AnchorageError>;

impl AnchorageError {
    /// Build a schema error for the anchor descriptor.
    pub(crate) fn schema(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaValidation {
            context: crate::positioning::ANCHOR_CONTEXT.to_string(),
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl From<AnchorageError> for wasm_bindgen::JsValue {
    fn from(e: AnchorageError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
