use std::path::Path;

use crate::foundation::error::{CompareError, CompareResult};

/// Node type name the extension attaches to.
pub const DEFAULT_NODE_TYPE: &str = "Video_Compare_BMO";

/// Handle bar dimensions in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HandleStyle {
    pub bar_thickness_px: f64,
    pub diagonal_length_px: f64,
    pub diagonal_thickness_px: f64,
}

impl Default for HandleStyle {
    fn default() -> Self {
        Self {
            bar_thickness_px: 4.0,
            diagonal_length_px: 80.0,
            diagonal_thickness_px: 6.0,
        }
    }
}

/// View configuration, loadable from JSON. Missing keys take defaults.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ViewOpts {
    pub node_type: String,
    /// Widget size reported to the host as `[width, height]`.
    pub widget_size: [u32; 2],
    /// Divergence in seconds above which B is snapped to A's playback time.
    pub sync_tolerance_secs: f64,
    pub handle: HandleStyle,
}

impl Default for ViewOpts {
    fn default() -> Self {
        Self {
            node_type: DEFAULT_NODE_TYPE.to_string(),
            widget_size: [500, 420],
            sync_tolerance_secs: 0.1,
            handle: HandleStyle::default(),
        }
    }
}

impl ViewOpts {
    pub fn from_json_str(s: &str) -> CompareResult<Self> {
        let opts: Self =
            serde_json::from_str(s).map_err(|e| CompareError::serde(format!("view opts: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn from_path(path: &Path) -> CompareResult<Self> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| CompareError::validation(format!("read '{}': {e}", path.display())))?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> CompareResult<()> {
        if self.node_type.trim().is_empty() {
            return Err(CompareError::validation("node_type must be non-empty"));
        }
        if self.widget_size[0] == 0 || self.widget_size[1] == 0 {
            return Err(CompareError::validation("widget_size must be > 0"));
        }
        if !self.sync_tolerance_secs.is_finite() || self.sync_tolerance_secs < 0.0 {
            return Err(CompareError::validation(
                "sync_tolerance_secs must be finite and >= 0",
            ));
        }
        let h = &self.handle;
        for (name, v) in [
            ("bar_thickness_px", h.bar_thickness_px),
            ("diagonal_length_px", h.diagonal_length_px),
            ("diagonal_thickness_px", h.diagonal_thickness_px),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(CompareError::validation(format!(
                    "handle.{name} must be finite and > 0"
                )));
            }
        }
        Ok(())
    }
}
