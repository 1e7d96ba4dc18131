//! Anchored positioning for floating elements.
//!
//! This module handles:
//! - Decoding and validating anchor descriptors
//! - Resolving an anchor against live geometry into an [`Anchoring`]
//! - Choosing a placement direction that fits the available bounds
//! - Writing fixed or absolute position styles without visible flicker

mod anchor;
mod layout;
mod place;

pub use anchor::{
    resolve, Anchor, AnchorInfo, AnchorInfoKind, AnchorKind, Anchoring, CustomPlacer, Overrides,
};
pub use layout::{choose, Bubble, Decision, Layout, ALL_CORNERS};
pub use place::{mode, origin_for, place, position, HiddenMeasurement};

use serde::{Deserialize, Serialize};

use crate::error::{AnchorageError, Result};
use crate::geometry::Bounds;

/// Context string reported in anchor schema errors.
pub const ANCHOR_CONTEXT: &str = "positioning anchor.info";

/// Per-floating-element configuration, owned by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PositioningConfig {
    /// Place with `position: fixed` against the viewport instead of
    /// `position: absolute` against the host.
    pub use_fixed: bool,
    /// Layout bounds for relative placement, in document space. Defaults to
    /// the visible part of the document.
    pub bounds: Option<Bounds>,
}

impl PositioningConfig {
    #[must_use]
    pub const fn fixed() -> Self {
        Self {
            use_fixed: true,
            bounds: None,
        }
    }

    #[must_use]
    pub const fn relative() -> Self {
        Self {
            use_fixed: false,
            bounds: None,
        }
    }

    #[must_use]
    pub const fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Decode from JSON such as `{"useFixed": true}`.
    ///
    /// # Errors
    /// Returns [`AnchorageError::Config`] if the JSON does not match.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| AnchorageError::Config(e.to_string()))
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

    #[test]
    fn test_config_from_json() {
        let config = PositioningConfig::from_json(
            r#"{"useFixed":false,"bounds":{"x":0,"y":0,"width":300,"height":200}}"#,
        )
        .unwrap();
        assert!(!config.use_fixed);
        assert_eq!(config.bounds, Some(Bounds::new(0.0, 0.0, 300.0, 200.0)));
        assert_eq!(PositioningConfig::from_json("{}").unwrap(), PositioningConfig::default());
        assert!(matches!(
            PositioningConfig::from_json(r#"{"useFixed":"yes"}"#),
            Err(AnchorageError::Config(_))
        ));
    }
}
