use crate::assets::decode::Bitmap;
use crate::foundation::core::PixelSize;
use crate::foundation::error::SignVizResult;
use crate::state::zoom::{CameraZoom, ZoomCapability};

/// Message shown when the camera cannot be acquired.
pub const CAMERA_UNAVAILABLE_MSG: &str = "Unable to access camera. Please check permissions.";
/// Message shown when playback was blocked by an autoplay policy.
pub const AUTOPLAY_BLOCKED_MSG: &str = "Tap screen to start camera (Autoplay blocked)";

/// Which physical camera to prefer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Rear-facing.
    #[default]
    Environment,
    /// Front-facing.
    User,
}

/// Constraints passed to the camera provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StreamRequest {
    pub facing: FacingMode,
    pub ideal_width: u32,
    pub ideal_height: u32,
}

impl Default for StreamRequest {
    fn default() -> Self {
        Self {
            facing: FacingMode::Environment,
            ideal_width: 1920,
            ideal_height: 1080,
        }
    }
}

/// A live video stream owned by the capture surface.
pub trait CameraStream {
    /// Native resolution of the frames, once known.
    fn native_size(&self) -> Option<PixelSize>;

    /// Copy of the current frame at native resolution.
    fn snapshot(&self) -> Option<Bitmap>;

    /// Hardware zoom range, if the track exposes one.
    fn zoom_capability(&self) -> Option<ZoomCapability>;

    /// Apply a hardware zoom value inside [`CameraStream::zoom_capability`].
    fn apply_zoom(&mut self, value: f64) -> SignVizResult<()>;

    /// Start or resume playback. May be rejected by autoplay policies.
    fn play(&mut self) -> SignVizResult<()>;

    fn is_playing(&self) -> bool;

    /// Stop every track of the stream. Must be idempotent.
    fn stop(&mut self);
}

/// Acquires camera streams (permission prompts, device selection).
pub trait CameraProvider {
    fn open(&mut self, request: &StreamRequest) -> SignVizResult<Box<dyn CameraStream>>;
}

/// Lifecycle state of the capture surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraStatus {
    /// Stream acquired, playback not confirmed yet.
    Initializing,
    /// Frames are flowing.
    Active,
    /// Stream acquired but playback was rejected; a tap retries.
    AutoplayBlocked,
    /// No stream could be acquired. Terminal.
    Unavailable,
}

/// Owns the live stream for as long as the viewport exists.
///
/// Dropping the surface stops the stream, so the hardware is released on every exit path.
pub struct CaptureSurface {
    stream: Option<Box<dyn CameraStream>>,
    status: CameraStatus,
}

impl std::fmt::Debug for CaptureSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureSurface")
            .field("has_stream", &self.stream.is_some())
            .field("status", &self.status)
            .finish()
    }
}

impl CaptureSurface {
    /// Acquire a stream and try to start playback.
    ///
    /// Never fails: acquisition and playback problems are reported through
    /// [`CaptureSurface::status`] and [`CaptureSurface::error_message`].
    pub fn start(provider: &mut dyn CameraProvider, request: &StreamRequest) -> Self {
        let stream = match provider.open(request) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "camera acquisition failed");
                return Self {
                    stream: None,
                    status: CameraStatus::Unavailable,
                };
            }
        };
        let mut surface = Self {
            stream: Some(stream),
            status: CameraStatus::Initializing,
        };
        surface.try_play();
        surface
    }

    fn try_play(&mut self) {
        let Some(stream) = self.stream.as_mut() else {
            return;
        };
        match stream.play() {
            Ok(()) => self.status = CameraStatus::Active,
            Err(e) => {
                tracing::warn!(error = %e, "video play failed");
                self.status = CameraStatus::AutoplayBlocked;
            }
        }
    }

    pub fn status(&self) -> CameraStatus {
        self.status
    }

    /// User-facing message for the current status, if it is an error.
    pub fn error_message(&self) -> Option<&'static str> {
        match self.status {
            CameraStatus::Unavailable => Some(CAMERA_UNAVAILABLE_MSG),
            CameraStatus::AutoplayBlocked => Some(AUTOPLAY_BLOCKED_MSG),
            CameraStatus::Initializing | CameraStatus::Active => None,
        }
    }

    /// A tap on the viewport retries playback when the video is paused.
    pub fn tap(&mut self) {
        let paused = self.stream.as_ref().is_some_and(|s| !s.is_playing());
        if paused {
            self.try_play();
        }
    }

    /// Push the UI zoom level to the hardware; skipped when the track has no zoom.
    pub fn apply_zoom(&mut self, zoom: CameraZoom) {
        let Some(stream) = self.stream.as_mut() else {
            return;
        };
        let Some(cap) = stream.zoom_capability() else {
            tracing::debug!("track has no zoom capability");
            return;
        };
        let value = zoom.hardware_value(cap);
        if let Err(e) = stream.apply_zoom(value) {
            tracing::warn!(error = %e, value, "could not apply zoom constraint");
        }
    }

    pub fn native_size(&self) -> Option<PixelSize> {
        self.stream.as_ref().and_then(|s| s.native_size())
    }

    /// Read-only snapshot of the current frame.
    pub fn frame(&self) -> Option<Bitmap> {
        self.stream.as_ref().and_then(|s| s.snapshot())
    }

    /// Stop and release the stream.
    pub fn stop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            tracing::debug!("camera stream stopped");
        }
    }
}

impl Drop for CaptureSurface {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/camera/stream.rs"]
mod tests;
