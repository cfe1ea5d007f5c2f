use crate::foundation::core::{PixelSize, Point, Rect, Vec2, ViewportSize};

/// Factor converting a screen-pixel offset into a source-pixel offset when the source is
/// displayed with `object-fit: cover` inside the viewport.
///
/// When the viewport is relatively wider than the source, the source fills the width and the
/// overflow is cropped vertically; otherwise it fills the height and is cropped horizontally.
pub fn cover_multiplier(viewport: ViewportSize, source: PixelSize) -> f64 {
    let scale_factor = if viewport.aspect() > source.aspect() {
        viewport.width() / f64::from(source.width)
    } else {
        viewport.height() / f64::from(source.height)
    };
    1.0 / scale_factor
}

/// Screen <-> source mapping for a cover-fit source centered in the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverMapping {
    viewport: ViewportSize,
    source: PixelSize,
    multiplier: f64,
}

impl CoverMapping {
    pub fn new(viewport: ViewportSize, source: PixelSize) -> Self {
        Self {
            viewport,
            source,
            multiplier: cover_multiplier(viewport, source),
        }
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn source(&self) -> PixelSize {
        self.source
    }

    /// Source pixels per screen pixel.
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Convert a screen-space offset (relative to the viewport center) into source pixels.
    pub fn offset_to_source(&self, offset: Vec2) -> Vec2 {
        offset * self.multiplier
    }

    /// Source-pixel position of a sign placed at `position` from the viewport center.
    ///
    /// The viewport center always lands on the source center under cover fit.
    pub fn anchor(&self, position: Vec2) -> Point {
        self.source.center() + self.offset_to_source(position)
    }

    /// Map an absolute viewport point (origin top-left) into source pixels.
    pub fn screen_to_source(&self, p: Point) -> Point {
        let center = Point::new(self.viewport.width() / 2.0, self.viewport.height() / 2.0);
        self.anchor(p - center)
    }

    /// Region of the source that is visible on screen after cropping.
    pub fn visible_source_rect(&self) -> Rect {
        let w = self.viewport.width() * self.multiplier;
        let h = self.viewport.height() * self.multiplier;
        Rect::from_center_size(self.source.center(), (w, h))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/cover.rs"]
mod tests;
