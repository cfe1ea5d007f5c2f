use crate::foundation::core::{Affine, PixelSize, Point, Vec2, ViewportSize};
use crate::state::sign::SignState;

/// Width cap applied to the sign when it is displayed (`max-width: 300px`).
pub const MAX_DISPLAY_WIDTH: f64 = 300.0;

/// Unscaled on-screen size of a bitmap: its natural size, shrunk to `max_width` with the
/// aspect ratio preserved.
pub fn clamped_display_size(natural: PixelSize, max_width: f64) -> (f64, f64) {
    let w = f64::from(natural.width);
    let h = f64::from(natural.height);
    if w > max_width {
        let ratio = w / h;
        (max_width, max_width / ratio)
    } else {
        (w, h)
    }
}

/// CSS transform string for the live overlay element.
pub fn sign_transform_css(sign: &SignState) -> String {
    format!(
        "translate(-50%, -50%) translate({}px, {}px) scale({}) rotate({}deg)",
        sign.position.x, sign.position.y, sign.scale, sign.rotation
    )
}

/// Screen-space transform of the live overlay, mapping display-size local coordinates
/// (origin top-left of the sign box) onto viewport pixels.
pub fn preview_affine(viewport: ViewportSize, sign: &SignState, display: (f64, f64)) -> Affine {
    let center = Point::new(viewport.width() / 2.0, viewport.height() / 2.0) + sign.position;
    Affine::translate(center.to_vec2())
        * Affine::scale(sign.scale)
        * Affine::rotate(sign.rotation.to_radians())
        * Affine::translate(Vec2::new(-display.0 / 2.0, -display.1 / 2.0))
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/preview.rs"]
mod tests;
