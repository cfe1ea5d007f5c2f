use std::path::Path;

use anyhow::Context;

use crate::foundation::core::{DEFAULT_VIEWPORT, ViewportSize};
use crate::foundation::error::{SignVizError, SignVizResult};
use crate::render::compositor::CompositorConfig;
use crate::state::lighting::LightingMode;
use crate::state::sign::SignState;
use crate::state::zoom::CameraZoom;
use crate::viewport::gesture::GestureEvent;

/// Serializable session snapshot, with an optional gesture script replayed on load.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Scene {
    pub sign: SignState,
    pub lighting: LightingMode,
    pub viewport: ViewportSize,
    pub camera_zoom: CameraZoom,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub gestures: Vec<GestureEvent>,
    pub compositor: CompositorConfig,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            sign: SignState::default(),
            lighting: LightingMode::default(),
            viewport: DEFAULT_VIEWPORT,
            camera_zoom: CameraZoom::default(),
            gestures: Vec::new(),
            compositor: CompositorConfig::default(),
        }
    }
}

impl Scene {
    pub fn from_json(s: &str) -> SignVizResult<Self> {
        let scene: Self = serde_json::from_str(s)
            .map_err(|e| SignVizError::validation(format!("invalid scene json: {e}")))?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn from_json_path(path: &Path) -> SignVizResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read scene '{}'", path.display()))?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> SignVizResult<()> {
        if self.sign.image_src.trim().is_empty() {
            return Err(SignVizError::validation("sign imageSrc must not be empty"));
        }
        let cfg = &self.compositor;
        if !(cfg.max_display_width.is_finite() && cfg.max_display_width > 0.0) {
            return Err(SignVizError::validation(
                "compositor max_display_width must be positive",
            ));
        }
        if !(0.0..=1.0).contains(&cfg.night_overlay_opacity) {
            return Err(SignVizError::validation(
                "compositor night_overlay_opacity must be in [0, 1]",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/scene.rs"]
mod tests;
