use crate::assets::decode::Bitmap;
use crate::foundation::core::ViewportSize;
use crate::render::output::ProofImage;
use crate::state::lighting::LightingMode;
use crate::state::sign::SignState;

/// Why a single capture produced no output. None of these are fatal.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum CaptureAbort {
    #[error("no video frame available")]
    NoFrame,
    #[error("a capture is already in flight")]
    Busy,
    #[error("sign bitmap unavailable: {0}")]
    OverlayUnavailable(String),
    #[error("composite failed: {0}")]
    RenderFailed(String),
    #[error("proof delivery failed: {0}")]
    DeliveryFailed(String),
}

/// Result of one capture trigger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureOutcome {
    Emitted(ProofImage),
    Aborted(CaptureAbort),
}

impl CaptureOutcome {
    pub fn proof(&self) -> Option<&ProofImage> {
        match self {
            Self::Emitted(p) => Some(p),
            Self::Aborted(_) => None,
        }
    }

    pub fn abort_reason(&self) -> Option<&CaptureAbort> {
        match self {
            Self::Emitted(_) => None,
            Self::Aborted(a) => Some(a),
        }
    }
}

/// Inputs of one capture, frozen at trigger time.
///
/// Later gestures or lighting changes do not affect a job that is already running.
#[derive(Clone, Debug)]
pub struct CaptureJob {
    pub(crate) id: u64,
    pub frame: Bitmap,
    pub sign: SignState,
    pub lighting: LightingMode,
    pub viewport: ViewportSize,
}

impl CaptureJob {
    /// Source of the bitmap that has to be loaded before the job can finish.
    pub fn overlay_src(&self) -> &str {
        &self.sign.image_src
    }
}
