use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::assets::decode::Bitmap;
use crate::camera::stream::{CameraProvider, CameraStream, StreamRequest};
use crate::foundation::core::PixelSize;
use crate::foundation::error::{SignVizError, SignVizResult};
use crate::state::zoom::ZoomCapability;

/// Observable track state shared between a [`StillCamera`] and whoever created it.
#[derive(Debug, Default)]
pub struct TrackProbe {
    stopped: AtomicBool,
    zoom_bits: AtomicU64,
    zoom_set: AtomicBool,
}

impl TrackProbe {
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Last hardware zoom value applied to the track.
    pub fn applied_zoom(&self) -> Option<f64> {
        self.zoom_set
            .load(Ordering::SeqCst)
            .then(|| f64::from_bits(self.zoom_bits.load(Ordering::SeqCst)))
    }
}

/// A "camera" that serves one still image, for offline captures and tests.
#[derive(Debug)]
pub struct StillCamera {
    frame: Bitmap,
    zoom: Option<ZoomCapability>,
    block_autoplay: bool,
    playing: bool,
    probe: Arc<TrackProbe>,
}

impl StillCamera {
    pub fn new(frame: Bitmap) -> Self {
        Self {
            frame,
            zoom: None,
            block_autoplay: false,
            playing: false,
            probe: Arc::new(TrackProbe::default()),
        }
    }

    /// Expose a hardware zoom range.
    pub fn with_zoom(mut self, cap: ZoomCapability) -> Self {
        self.zoom = Some(cap);
        self
    }

    /// Reject the first `play()` call, as a browser autoplay policy would.
    pub fn with_autoplay_blocked(mut self) -> Self {
        self.block_autoplay = true;
        self
    }

    pub fn probe(&self) -> Arc<TrackProbe> {
        Arc::clone(&self.probe)
    }
}

impl CameraStream for StillCamera {
    fn native_size(&self) -> Option<PixelSize> {
        (!self.probe.is_stopped()).then_some(self.frame.size)
    }

    fn snapshot(&self) -> Option<Bitmap> {
        (!self.probe.is_stopped()).then(|| self.frame.clone())
    }

    fn zoom_capability(&self) -> Option<ZoomCapability> {
        self.zoom
    }

    fn apply_zoom(&mut self, value: f64) -> SignVizResult<()> {
        let cap = self
            .zoom
            .ok_or_else(|| SignVizError::camera("track does not support zoom"))?;
        if !(cap.min..=cap.max).contains(&value) {
            return Err(SignVizError::camera(format!(
                "zoom {value} outside [{}, {}]",
                cap.min, cap.max
            )));
        }
        self.probe.zoom_bits.store(value.to_bits(), Ordering::SeqCst);
        self.probe.zoom_set.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn play(&mut self) -> SignVizResult<()> {
        if self.block_autoplay {
            self.block_autoplay = false;
            return Err(SignVizError::camera("play() rejected by autoplay policy"));
        }
        self.playing = true;
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn stop(&mut self) {
        self.playing = false;
        self.probe.stopped.store(true, Ordering::SeqCst);
    }
}

/// Hands out a single [`StillCamera`], or simulates a permission denial.
#[derive(Debug)]
pub struct StillCameraProvider {
    camera: Option<StillCamera>,
}

impl StillCameraProvider {
    pub fn new(camera: StillCamera) -> Self {
        Self {
            camera: Some(camera),
        }
    }

    /// A provider whose `open` always fails, like a denied permission prompt.
    pub fn denied() -> Self {
        Self { camera: None }
    }
}

impl CameraProvider for StillCameraProvider {
    fn open(&mut self, request: &StreamRequest) -> SignVizResult<Box<dyn CameraStream>> {
        tracing::debug!(?request, "opening still camera");
        match self.camera.take() {
            Some(cam) => Ok(Box::new(cam)),
            None => Err(SignVizError::camera("permission denied")),
        }
    }
}
