use std::path::Path;

use crate::assets::decode::Bitmap;
use crate::assets::source::{BitmapLoader, upload_to_data_uri};
use crate::camera::stream::CaptureSurface;
use crate::foundation::core::{Vec2, ViewportSize};
use crate::foundation::error::SignVizResult;
use crate::generate::service::{
    Generated, GenerationTracker, PendingGeneration, SignGenerator, generate, spawn_generation,
};
use crate::render::compositor::{CompositeRequest, Compositor, CompositorConfig};
use crate::render::output::{ProofImage, ProofSink, unix_timestamp_ms};
use crate::session::capture::{CaptureAbort, CaptureJob, CaptureOutcome};
use crate::session::scene::Scene;
use crate::state::lighting::LightingMode;
use crate::state::sign::{SignState, SignStateMachine};
use crate::state::zoom::CameraZoom;
use crate::viewport::gesture::{GestureEvent, ViewportMapper};

/// Everything one user session owns: the sign, the lighting preset, the camera zoom, gesture
/// tracking and the compositor.
#[derive(Debug)]
pub struct Session {
    sign: SignStateMachine,
    lighting: LightingMode,
    zoom: CameraZoom,
    mapper: ViewportMapper,
    viewport: ViewportSize,
    compositor: Compositor,
    generations: GenerationTracker,
    next_capture: u64,
    in_flight: Option<u64>,
}

impl Session {
    /// Fresh session with the default sign, daylight and no camera zoom.
    pub fn new(viewport: ViewportSize) -> Self {
        Self::with_config(viewport, CompositorConfig::default())
    }

    pub fn with_config(viewport: ViewportSize, cfg: CompositorConfig) -> Self {
        Self {
            sign: SignStateMachine::default(),
            lighting: LightingMode::default(),
            zoom: CameraZoom::default(),
            mapper: ViewportMapper::new(),
            viewport,
            compositor: Compositor::new(cfg),
            generations: GenerationTracker::default(),
            next_capture: 0,
            in_flight: None,
        }
    }

    /// Restore a session from a scene, replaying its gesture script in order.
    pub fn from_scene(scene: &Scene) -> SignVizResult<Self> {
        scene.validate()?;
        let mut session = Self::with_config(scene.viewport, scene.compositor);
        session.sign = SignStateMachine::new(scene.sign.clone());
        session.lighting = scene.lighting;
        session.zoom = scene.camera_zoom;
        for event in &scene.gestures {
            session.handle_gesture(event);
        }
        tracing::debug!(
            gestures = scene.gestures.len(),
            scale = session.sign().scale,
            "session restored from scene"
        );
        Ok(session)
    }

    pub fn sign(&self) -> &SignState {
        self.sign.state()
    }

    pub fn lighting(&self) -> LightingMode {
        self.lighting
    }

    pub fn camera_zoom(&self) -> CameraZoom {
        self.zoom
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn compositor_config(&self) -> &CompositorConfig {
        self.compositor.config()
    }

    pub fn is_capturing(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Snapshot of the current state as a scene (without a gesture script).
    pub fn scene(&self) -> Scene {
        Scene {
            sign: self.sign().clone(),
            lighting: self.lighting,
            viewport: self.viewport,
            camera_zoom: self.zoom,
            gestures: Vec::new(),
            compositor: *self.compositor.config(),
        }
    }

    /// Layout changed; later gestures and captures use the new size.
    pub fn set_viewport(&mut self, viewport: ViewportSize) {
        self.viewport = viewport;
    }

    pub fn handle_gesture(&mut self, event: &GestureEvent) -> &SignState {
        if let Some(update) = self.mapper.handle(event, self.sign.state()) {
            self.sign.apply_update(update);
        }
        self.sign.state()
    }

    pub fn translate(&mut self, delta: Vec2) -> &SignState {
        self.sign.translate(delta)
    }

    pub fn set_scale(&mut self, scale: f64) -> &SignState {
        self.sign.set_scale(scale)
    }

    pub fn nudge_scale(&mut self, step: f64) -> &SignState {
        self.sign.nudge_scale(step)
    }

    pub fn set_rotation(&mut self, rotation: f64) -> &SignState {
        self.sign.set_rotation(rotation)
    }

    /// Swap the sign image; geometry resets.
    pub fn replace_sign_image(&mut self, image_src: impl Into<String>) -> &SignState {
        self.sign.replace_image(image_src)
    }

    /// Use a local image file as the sign.
    pub fn upload(&mut self, path: &Path) -> SignVizResult<&SignState> {
        let uri = upload_to_data_uri(path)?;
        tracing::info!(path = %path.display(), "sign uploaded");
        Ok(self.sign.replace_image(uri))
    }

    pub fn toggle_lighting(&mut self) -> LightingMode {
        self.lighting.toggle()
    }

    pub fn set_lighting(&mut self, lighting: LightingMode) {
        self.lighting = lighting;
    }

    /// Store the UI zoom level and push it to the camera track.
    pub fn set_camera_zoom(&mut self, level: f64, surface: &mut CaptureSurface) -> CameraZoom {
        self.zoom = CameraZoom::new(level);
        surface.apply_zoom(self.zoom);
        self.zoom
    }

    /// Push the stored zoom level to a (re)started camera track.
    pub fn apply_camera_zoom(&self, surface: &mut CaptureSurface) {
        surface.apply_zoom(self.zoom);
    }

    /// Generate a sign in the foreground. The result still has to be passed to
    /// [`Session::select_generated`].
    pub fn generate(
        &mut self,
        service: &mut dyn SignGenerator,
        prompt: &str,
    ) -> SignVizResult<Option<Generated>> {
        if prompt.trim().is_empty() {
            return Ok(None);
        }
        let ticket = self.generations.issue();
        generate(service, ticket, prompt)
    }

    /// Generate a sign on a worker thread.
    pub fn spawn_generation<G>(&mut self, service: G, prompt: &str) -> Option<PendingGeneration>
    where
        G: SignGenerator + Send + 'static,
    {
        if prompt.trim().is_empty() {
            return None;
        }
        Some(spawn_generation(service, &mut self.generations, prompt))
    }

    /// Apply a generated sign. Results from superseded requests and results without an image
    /// are ignored; returns whether the sign changed.
    pub fn select_generated(&mut self, generated: &Generated) -> bool {
        if !self.generations.is_latest(generated.ticket) {
            tracing::debug!(ticket = generated.ticket.0, "stale generation result dropped");
            return false;
        }
        let Some(uri) = generated.image_uri.as_deref() else {
            return false;
        };
        self.sign.replace_image(uri);
        true
    }

    /// Freeze the inputs of a capture. Only one capture may be in flight at a time.
    pub fn begin_capture(&mut self, surface: &CaptureSurface) -> Result<CaptureJob, CaptureAbort> {
        if self.in_flight.is_some() {
            return Err(CaptureAbort::Busy);
        }
        let frame = surface.frame().ok_or(CaptureAbort::NoFrame)?;
        self.next_capture += 1;
        let id = self.next_capture;
        self.in_flight = Some(id);
        Ok(CaptureJob {
            id,
            frame,
            sign: self.sign().clone(),
            lighting: self.lighting,
            viewport: self.viewport,
        })
    }

    /// Give up on a job without producing output.
    pub fn cancel_capture(&mut self, job: CaptureJob) {
        if self.in_flight == Some(job.id) {
            self.in_flight = None;
        }
    }

    /// Composite a job once its overlay bitmap has been loaded (or has failed to load).
    pub fn finish_capture(
        &mut self,
        job: CaptureJob,
        overlay: SignVizResult<Bitmap>,
    ) -> Result<ProofImage, CaptureAbort> {
        if self.in_flight != Some(job.id) {
            return Err(CaptureAbort::Busy);
        }
        self.in_flight = None;
        let overlay = overlay.map_err(|e| CaptureAbort::OverlayUnavailable(e.to_string()))?;
        let frame = self
            .compositor
            .composite(CompositeRequest {
                frame: &job.frame,
                overlay: &overlay,
                sign: &job.sign,
                lighting: job.lighting,
                viewport: job.viewport,
            })
            .map_err(|e| CaptureAbort::RenderFailed(e.to_string()))?;
        ProofImage::from_frame(&frame, unix_timestamp_ms())
            .map_err(|e| CaptureAbort::RenderFailed(e.to_string()))
    }

    /// Trigger a capture end to end: snapshot, load the sign, composite, deliver.
    #[tracing::instrument(level = "info", skip_all, fields(lighting = ?self.lighting))]
    pub fn capture(
        &mut self,
        surface: &CaptureSurface,
        loader: &mut dyn BitmapLoader,
        sink: &mut dyn ProofSink,
    ) -> CaptureOutcome {
        let outcome = self.run_capture(surface, loader, sink);
        match &outcome {
            CaptureOutcome::Emitted(p) => {
                tracing::info!(width = p.width, height = p.height, "capture emitted");
            }
            CaptureOutcome::Aborted(reason) => {
                tracing::warn!(%reason, "capture aborted");
            }
        }
        outcome
    }

    fn run_capture(
        &mut self,
        surface: &CaptureSurface,
        loader: &mut dyn BitmapLoader,
        sink: &mut dyn ProofSink,
    ) -> CaptureOutcome {
        let job = match self.begin_capture(surface) {
            Ok(job) => job,
            Err(reason) => return CaptureOutcome::Aborted(reason),
        };
        let overlay = loader.load(job.overlay_src());
        let proof = match self.finish_capture(job, overlay) {
            Ok(p) => p,
            Err(reason) => return CaptureOutcome::Aborted(reason),
        };
        if let Err(e) = sink.deliver(&proof) {
            return CaptureOutcome::Aborted(CaptureAbort::DeliveryFailed(e.to_string()));
        }
        CaptureOutcome::Emitted(proof)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/live.rs"]
mod tests;
