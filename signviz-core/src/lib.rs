//! SignViz places a user-controlled sign image over a live camera feed and bakes the result
//! into a proof image.
//!
//! # Pipeline overview
//!
//! 1. **Interact**: pointer events (`GestureEvent`) are mapped to `SignUpdate`s and merged by
//!    the `SignStateMachine`, which clamps scale and wraps rotation.
//! 2. **Snapshot**: a capture freezes the current camera frame, sign, lighting and viewport.
//! 3. **Load**: the sign bitmap is resolved through a `BitmapLoader` before any drawing.
//! 4. **Composite**: the `Compositor` maps screen space onto the frame with a cover fit and
//!    draws the sign with its lighting shadow at the frame's native resolution.
//! 5. **Emit**: the raster becomes a PNG `ProofImage` handed to a `ProofSink`.
//!
//! Pixels are premultiplied RGBA8 everywhere except in the encoded PNG.
#![forbid(unsafe_code)]

mod assets;
mod camera;
mod foundation;
mod generate;
mod render;
mod session;
mod state;
mod viewport;

pub use assets::decode::{Bitmap, decode_image};
pub use assets::source::{
    BitmapLoader, BitmapUri, UriBitmapLoader, data_uri, data_uri_from_base64, parse_bitmap_uri,
    upload_mime_for, upload_to_data_uri,
};
pub use camera::still::{StillCamera, StillCameraProvider, TrackProbe};
pub use camera::stream::{
    AUTOPLAY_BLOCKED_MSG, CAMERA_UNAVAILABLE_MSG, CameraProvider, CameraStatus, CameraStream,
    CaptureSurface, FacingMode, StreamRequest,
};
pub use foundation::core::{
    Affine, DEFAULT_VIEWPORT, PixelSize, Point, Rect, Rgba8Premul, Vec2, ViewportSize,
};
pub use foundation::error::{SignVizError, SignVizResult};
pub use foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};
pub use generate::service::{
    EMPTY_CONCEPT_FALLBACK, FAILED_CONCEPT_FALLBACK, Generated, GenerationTicket,
    GenerationTracker, InlineImage, PendingGeneration, SignGenerator, concept_prompt, generate,
    generate_concept, generate_image, image_prompt, spawn_generation,
};
pub use render::blur::{blur_rgba8_premul, shadow_blur_kernel};
pub use render::composite::{
    PixelRect, copy_region, fill_over_in_place, over_in_place, over_region_in_place,
};
pub use render::compositor::{
    CompositeRequest, Compositor, CompositorConfig, FrameRGBA, ShadowStyle, SignPlacement,
};
pub use render::output::{
    APP_NAME, DirectorySink, MemorySink, ProofImage, ProofSink, encode_png, proof_file_name,
    unix_timestamp_ms,
};
pub use session::capture::{CaptureAbort, CaptureJob, CaptureOutcome};
pub use session::live::Session;
pub use session::scene::Scene;
pub use state::lighting::LightingMode;
pub use state::sign::{
    DEFAULT_SIGN_ID, DEFAULT_SIGN_SRC, MAX_SCALE, MIN_SCALE, SignState, SignStateMachine,
    SignUpdate, clamp_scale, wrap_rotation,
};
pub use state::zoom::{CameraZoom, MAX_ZOOM_LEVEL, MIN_ZOOM_LEVEL, ZoomCapability};
pub use viewport::cover::{CoverMapping, cover_multiplier};
pub use viewport::gesture::{
    GestureEvent, GestureSession, ViewportMapper, WHEEL_SCALE_PER_UNIT, pinch_scale, wheel_scale,
};
pub use viewport::preview::{
    MAX_DISPLAY_WIDTH, clamped_display_size, preview_affine, sign_transform_css,
};
