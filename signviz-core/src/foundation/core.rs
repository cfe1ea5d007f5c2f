use crate::foundation::error::{SignVizError, SignVizResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Size of the on-screen viewport in CSS pixels.
///
/// Fractional values are allowed; layout engines report sub-pixel box sizes. Both extents are
/// always finite and positive, including after deserialization.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "ViewportExtent")]
pub struct ViewportSize {
    width: f64,
    height: f64,
}

/// Unchecked wire form of [`ViewportSize`].
#[derive(serde::Deserialize)]
struct ViewportExtent {
    width: f64,
    height: f64,
}

impl TryFrom<ViewportExtent> for ViewportSize {
    type Error = SignVizError;

    fn try_from(raw: ViewportExtent) -> Result<Self, Self::Error> {
        Self::new(raw.width, raw.height)
    }
}

/// Portrait phone viewport used when nothing else is known.
pub const DEFAULT_VIEWPORT: ViewportSize = ViewportSize {
    width: 360.0,
    height: 640.0,
};

impl ViewportSize {
    /// Build a viewport size, rejecting non-finite or non-positive extents.
    pub fn new(width: f64, height: f64) -> SignVizResult<Self> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(SignVizError::validation(format!(
                "viewport size must be positive and finite, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Width in CSS pixels.
    pub fn width(self) -> f64 {
        self.width
    }

    /// Height in CSS pixels.
    pub fn height(self) -> f64 {
        self.height
    }

    /// Width over height.
    pub fn aspect(self) -> f64 {
        self.width / self.height
    }
}

/// Native pixel size of a raster source (video frame, overlay bitmap).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelSize {
    /// Build a pixel size, rejecting empty extents.
    pub fn new(width: u32, height: u32) -> SignVizResult<Self> {
        if width == 0 || height == 0 {
            return Err(SignVizError::validation(format!(
                "pixel size must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Width over height.
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Center point in pixel coordinates.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Length of a tightly packed RGBA8 buffer of this size.
    pub fn rgba8_len(self) -> SignVizResult<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| SignVizError::validation("rgba8 buffer size overflow"))
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Premultiply a straight-alpha color.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Bytes in `[r, g, b, a]` order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
