use crate::foundation::error::{SignVizError, SignVizResult};

/// Lowest UI zoom level.
pub const MIN_ZOOM_LEVEL: f64 = 1.0;
/// Highest UI zoom level.
pub const MAX_ZOOM_LEVEL: f64 = 5.0;

/// Hardware zoom range reported by a camera track.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ZoomCapability {
    pub min: f64,
    pub max: f64,
}

impl ZoomCapability {
    /// Build a capability from optionally reported bounds.
    ///
    /// Missing or zero bounds fall back to `1.0`, matching how camera drivers report
    /// "no optical zoom".
    pub fn from_reported(min: Option<f64>, max: Option<f64>) -> SignVizResult<Self> {
        let pick = |v: Option<f64>| match v {
            Some(v) if v.is_finite() && v != 0.0 => v,
            _ => 1.0,
        };
        let (min, max) = (pick(min), pick(max));
        if min > max {
            return Err(SignVizError::camera(format!(
                "zoom capability min {min} exceeds max {max}"
            )));
        }
        Ok(Self { min, max })
    }
}

/// UI-facing camera zoom, independent of the sign scale.
///
/// Deserialized values go through the same clamp as [`CameraZoom::new`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct CameraZoom(f64);

impl From<f64> for CameraZoom {
    fn from(level: f64) -> Self {
        Self::new(level)
    }
}

impl From<CameraZoom> for f64 {
    fn from(zoom: CameraZoom) -> Self {
        zoom.0
    }
}

impl Default for CameraZoom {
    fn default() -> Self {
        Self(MIN_ZOOM_LEVEL)
    }
}

impl CameraZoom {
    /// Clamp a requested level into `[MIN_ZOOM_LEVEL, MAX_ZOOM_LEVEL]`.
    pub fn new(level: f64) -> Self {
        if !level.is_finite() {
            return Self::default();
        }
        Self(level.clamp(MIN_ZOOM_LEVEL, MAX_ZOOM_LEVEL))
    }

    pub fn level(self) -> f64 {
        self.0
    }

    /// Linear map of the UI level onto the hardware range.
    pub fn hardware_value(self, cap: ZoomCapability) -> f64 {
        let t = (self.0 - MIN_ZOOM_LEVEL) / (MAX_ZOOM_LEVEL - MIN_ZOOM_LEVEL);
        cap.min + (cap.max - cap.min) * t
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/zoom.rs"]
mod tests;
