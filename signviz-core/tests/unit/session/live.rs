use super::*;
use crate::assets::decode::Bitmap;
use crate::camera::still::{StillCamera, StillCameraProvider};
use crate::camera::stream::StreamRequest;
use crate::foundation::core::Point;
use crate::foundation::error::SignVizError;
use crate::generate::service::{GenerationTicket, InlineImage};
use crate::render::output::MemorySink;
use crate::state::zoom::ZoomCapability;

fn solid(w: u32, h: u32, px: [u8; 4]) -> Bitmap {
    Bitmap::from_rgba_image(image::RgbaImage::from_pixel(w, h, image::Rgba(px))).unwrap()
}

struct FixedLoader(Option<Bitmap>);

impl BitmapLoader for FixedLoader {
    fn load(&mut self, uri: &str) -> SignVizResult<Bitmap> {
        self.0
            .clone()
            .ok_or_else(|| SignVizError::decode(format!("no bitmap for {uri}")))
    }
}

fn surface_with(frame: Bitmap) -> CaptureSurface {
    let mut provider = StillCameraProvider::new(StillCamera::new(frame));
    CaptureSurface::start(&mut provider, &StreamRequest::default())
}

fn viewport() -> ViewportSize {
    ViewportSize::new(64.0, 36.0).unwrap()
}

#[test]
fn starts_with_default_sign() {
    let s = Session::new(viewport());
    assert_eq!(s.sign().id, "default");
    assert_eq!(s.sign().image_src, "https://picsum.photos/400/200");
    assert_eq!(s.lighting(), LightingMode::Day);
    assert_eq!(s.camera_zoom().level(), 1.0);
}

#[test]
fn gestures_route_through_state_machine() {
    let mut s = Session::new(viewport());
    s.handle_gesture(&GestureEvent::MouseDown {
        at: Point::new(10.0, 10.0),
    });
    s.handle_gesture(&GestureEvent::MouseMove {
        at: Point::new(25.0, 5.0),
        buttons: 1,
    });
    assert_eq!(s.sign().position, Vec2::new(15.0, -5.0));
    s.handle_gesture(&GestureEvent::MouseUp);

    s.handle_gesture(&GestureEvent::Wheel { delta_y: -100_000.0 });
    assert_eq!(s.sign().scale, 5.0);
    assert_eq!(s.nudge_scale(-10.0).scale, 0.1);
}

#[test]
fn capture_emits_native_size_png() {
    let mut s = Session::new(viewport());
    s.toggle_lighting();
    let surface = surface_with(solid(64, 36, [200, 200, 200, 255]));
    let mut loader = FixedLoader(Some(solid(20, 10, [255, 0, 0, 255])));
    let mut sink = MemorySink::default();

    let outcome = s.capture(&surface, &mut loader, &mut sink);
    let proof = outcome.proof().expect("emitted");
    assert_eq!((proof.width, proof.height), (64, 36));
    assert_eq!(sink.proofs.len(), 1);
    assert!(proof.file_name().starts_with("signviz-proof-"));
    assert!(!s.is_capturing());
}

#[test]
fn capture_without_frame_aborts_silently() {
    let mut s = Session::new(viewport());
    let surface = CaptureSurface::start(&mut StillCameraProvider::denied(), &StreamRequest::default());
    let mut loader = FixedLoader(Some(solid(4, 4, [0, 0, 0, 255])));
    let mut sink = MemorySink::default();

    let outcome = s.capture(&surface, &mut loader, &mut sink);
    assert_eq!(outcome.abort_reason(), Some(&CaptureAbort::NoFrame));
    assert!(sink.proofs.is_empty());
}

#[test]
fn overlay_failure_emits_nothing_and_frees_the_slot() {
    let mut s = Session::new(viewport());
    let surface = surface_with(solid(64, 36, [0, 0, 0, 255]));
    let mut sink = MemorySink::default();

    let outcome = s.capture(&surface, &mut FixedLoader(None), &mut sink);
    assert!(matches!(
        outcome.abort_reason(),
        Some(CaptureAbort::OverlayUnavailable(_))
    ));
    assert!(sink.proofs.is_empty());
    assert!(!s.is_capturing());
}

#[test]
fn overlapping_captures_are_rejected() {
    let mut s = Session::new(viewport());
    let surface = surface_with(solid(64, 36, [0, 0, 0, 255]));

    let job = s.begin_capture(&surface).unwrap();
    assert_eq!(s.begin_capture(&surface).unwrap_err(), CaptureAbort::Busy);

    // gestures after the trigger do not leak into the running job
    s.set_rotation(90.0);
    assert_eq!(job.sign.rotation, 0.0);

    let proof = s
        .finish_capture(job, Ok(solid(8, 8, [0, 255, 0, 255])))
        .unwrap();
    assert_eq!(proof.width, 64);

    let job = s.begin_capture(&surface).unwrap();
    s.cancel_capture(job);
    assert!(!s.is_capturing());
}

#[test]
fn camera_zoom_is_clamped_and_pushed_to_the_track() {
    let cam = StillCamera::new(solid(8, 8, [0, 0, 0, 255]))
        .with_zoom(ZoomCapability::from_reported(Some(1.0), Some(9.0)).unwrap());
    let probe = cam.probe();
    let mut surface = CaptureSurface::start(&mut StillCameraProvider::new(cam), &StreamRequest::default());

    let mut s = Session::new(viewport());
    assert_eq!(s.set_camera_zoom(3.0, &mut surface).level(), 3.0);
    assert_eq!(probe.applied_zoom(), Some(5.0));
    assert_eq!(s.set_camera_zoom(42.0, &mut surface).level(), 5.0);
    assert_eq!(probe.applied_zoom(), Some(9.0));
    // sign scale is untouched by camera zoom
    assert_eq!(s.sign().scale, 1.0);
}

struct Canned;

impl SignGenerator for Canned {
    fn complete_text(&mut self, _prompt: &str) -> SignVizResult<String> {
        Ok("Hot Coffee".into())
    }

    fn generate_image(&mut self, _prompt: &str) -> SignVizResult<Option<InlineImage>> {
        Ok(Some(InlineImage {
            mime: "image/png".into(),
            data_b64: "AAAA".into(),
        }))
    }
}

#[test]
fn only_latest_generation_is_selected() {
    let mut s = Session::new(viewport());
    s.set_scale(2.0);
    let first = s.generate(&mut Canned, "coffee").unwrap().unwrap();
    let second = s.generate(&mut Canned, "tea").unwrap().unwrap();

    assert!(!s.select_generated(&first));
    assert_eq!(s.sign().scale, 2.0);

    assert!(s.select_generated(&second));
    assert_eq!(s.sign().image_src, "data:image/png;base64,AAAA");
    assert_eq!(s.sign().scale, 1.0);

    assert_eq!(s.generate(&mut Canned, "  ").unwrap(), None);
    let without_image = Generated {
        ticket: GenerationTicket(99),
        concept: "x".into(),
        image_uri: None,
    };
    assert!(!s.select_generated(&without_image));
}

#[test]
fn scene_replays_gestures() {
    let scene = Scene {
        gestures: vec![
            GestureEvent::TouchStart {
                touches: vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
            },
            GestureEvent::TouchMove {
                touches: vec![Point::new(0.0, 0.0), Point::new(150.0, 0.0)],
            },
            GestureEvent::TouchEnd,
        ],
        ..Scene::default()
    };
    let s = Session::from_scene(&scene).unwrap();
    assert!((s.sign().scale - 1.5).abs() < 1e-12);
    assert_eq!(s.scene().gestures.len(), 0);
}

#[test]
fn degenerate_viewport_aborts_capture() {
    // valid but so small that the cover multiplier overflows
    let tiny = ViewportSize::new(1e-310, 1e-310).unwrap();
    let mut s = Session::new(tiny);
    let surface = surface_with(solid(64, 36, [0, 0, 0, 255]));
    let mut loader = FixedLoader(Some(solid(8, 8, [255, 255, 255, 255])));
    let mut sink = MemorySink::default();

    let outcome = s.capture(&surface, &mut loader, &mut sink);
    assert!(matches!(
        outcome.abort_reason(),
        Some(CaptureAbort::RenderFailed(_))
    ));
    assert!(sink.proofs.is_empty());
    assert!(!s.is_capturing());
}

#[test]
fn scene_zoom_reaches_the_track() {
    let cam = StillCamera::new(solid(8, 8, [0, 0, 0, 255]))
        .with_zoom(ZoomCapability::from_reported(Some(1.0), Some(9.0)).unwrap());
    let probe = cam.probe();
    let mut surface = CaptureSurface::start(&mut StillCameraProvider::new(cam), &StreamRequest::default());

    let scene = Scene::from_json(r#"{ "cameraZoom": 3 }"#).unwrap();
    let s = Session::from_scene(&scene).unwrap();
    s.apply_camera_zoom(&mut surface);
    assert_eq!(probe.applied_zoom(), Some(5.0));
}
