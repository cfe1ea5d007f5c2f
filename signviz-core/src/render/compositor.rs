use std::sync::Arc;

use crate::assets::decode::Bitmap;
use crate::foundation::core::{Affine, PixelSize, Point, Rect, Rgba8Premul, Vec2, ViewportSize};
use crate::foundation::error::{SignVizError, SignVizResult};
use crate::foundation::math::mul_div255_u8;
use crate::render::blur::{blur_rgba8_premul, shadow_blur_kernel};
use crate::render::composite::{PixelRect, copy_region, fill_over_in_place, over_region_in_place};
use crate::state::lighting::LightingMode;
use crate::state::sign::SignState;
use crate::viewport::cover::CoverMapping;
use crate::viewport::preview::{MAX_DISPLAY_WIDTH, clamped_display_size};

/// A composited frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

/// Shadow or glow drawn behind the sign.
///
/// `blur` and `offset` are in sign-local units: they go through the same uniform scale as the
/// sign itself.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShadowStyle {
    /// Straight-alpha RGBA.
    pub color: [u8; 4],
    pub blur: f64,
    #[serde(default)]
    pub offset: Vec2,
}

impl ShadowStyle {
    /// Cyan neon glow used at night.
    pub fn night_glow() -> Self {
        Self {
            color: [0x00, 0xea, 0xff, 0xff],
            blur: 20.0,
            offset: Vec2::ZERO,
        }
    }

    /// Soft dark drop shadow used by day.
    pub fn day_drop() -> Self {
        Self {
            color: [0, 0, 0, 128],
            blur: 10.0,
            offset: Vec2::new(2.0, 4.0),
        }
    }

    /// Divide blur and offset by the sign scale so the final thickness does not change as the
    /// sign is zoomed.
    pub fn scale_corrected(self, sign_scale: f64) -> Self {
        let k = 1.0 / sign_scale;
        Self {
            blur: self.blur * k,
            offset: self.offset * k,
            ..self
        }
    }

    fn premul_color(self) -> Rgba8Premul {
        let [r, g, b, a] = self.color;
        Rgba8Premul::from_straight_rgba(r, g, b, a)
    }
}

/// Tunables of the capture raster.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompositorConfig {
    /// Display-time width cap of the sign, in screen pixels.
    pub max_display_width: f64,
    /// Opacity of the black overlay composited at night.
    pub night_overlay_opacity: f32,
    pub day_shadow: ShadowStyle,
    pub night_shadow: ShadowStyle,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            max_display_width: MAX_DISPLAY_WIDTH,
            night_overlay_opacity: 0.4,
            day_shadow: ShadowStyle::day_drop(),
            night_shadow: ShadowStyle::night_glow(),
        }
    }
}

impl CompositorConfig {
    pub fn shadow_for(&self, lighting: LightingMode) -> ShadowStyle {
        match lighting {
            LightingMode::Day => self.day_shadow,
            LightingMode::Night => self.night_shadow,
        }
    }
}

/// Where and how the sign lands in the output raster.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SignPlacement {
    /// Source pixels per screen pixel.
    pub multiplier: f64,
    /// Output-space position of the sign center.
    pub anchor: Point,
    /// Pre-scale draw size after the display width cap.
    pub draw_size: (f64, f64),
    /// Uniform scale applied after rotation: `sign.scale * multiplier`.
    pub device_scale: f64,
    /// Maps overlay bitmap pixels to output pixels.
    pub transform: Affine,
    /// Shadow after scale correction, in sign-local units.
    pub shadow: ShadowStyle,
    natural: PixelSize,
}

impl SignPlacement {
    pub fn compute(
        cfg: &CompositorConfig,
        output: PixelSize,
        viewport: ViewportSize,
        sign: &SignState,
        overlay: PixelSize,
        lighting: LightingMode,
    ) -> Self {
        let mapping = CoverMapping::new(viewport, output);
        let multiplier = mapping.multiplier();
        let anchor = mapping.anchor(sign.position);
        let draw_size = clamped_display_size(overlay, cfg.max_display_width);
        let device_scale = sign.scale * multiplier;

        let fit = Affine::scale_non_uniform(
            draw_size.0 / f64::from(overlay.width),
            draw_size.1 / f64::from(overlay.height),
        );
        let transform = Affine::translate(anchor.to_vec2())
            * Affine::rotate(sign.rotation.to_radians())
            * Affine::scale(device_scale)
            * Affine::translate(Vec2::new(-draw_size.0 / 2.0, -draw_size.1 / 2.0))
            * fit;

        Self {
            multiplier,
            anchor,
            draw_size,
            device_scale,
            transform,
            shadow: cfg.shadow_for(lighting).scale_corrected(sign.scale),
            natural: overlay,
        }
    }

    /// Whether the placement maps the sign onto a finite, non-empty area.
    pub fn is_drawable(&self) -> bool {
        let finite = self.multiplier.is_finite()
            && self.device_scale.is_finite()
            && self.anchor.is_finite()
            && self.transform.is_finite();
        finite && self.device_scale > 0.0 && self.draw_size.0 > 0.0 && self.draw_size.1 > 0.0
    }

    /// Shadow blur in output pixels.
    pub fn device_shadow_blur(&self) -> f64 {
        self.shadow.blur * self.device_scale
    }

    /// Shadow offset in output pixels. Offsets stay axis-aligned under rotation.
    pub fn device_shadow_offset(&self) -> Vec2 {
        self.shadow.offset * self.device_scale
    }

    /// Output-space bounding box of the drawn bitmap.
    pub fn bounds(&self) -> Rect {
        let local = Rect::new(
            0.0,
            0.0,
            f64::from(self.natural.width),
            f64::from(self.natural.height),
        );
        self.transform.transform_rect_bbox(local)
    }
}

/// Everything a capture needs, snapshotted at trigger time.
#[derive(Clone, Copy, Debug)]
pub struct CompositeRequest<'a> {
    pub frame: &'a Bitmap,
    pub overlay: &'a Bitmap,
    pub sign: &'a SignState,
    pub lighting: LightingMode,
    pub viewport: ViewportSize,
}

/// Bakes the live overlay into a raster at the video's native resolution.
pub struct Compositor {
    cfg: CompositorConfig,
    ctx: Option<vello_cpu::RenderContext>,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor").field("cfg", &self.cfg).finish()
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(CompositorConfig::default())
    }
}

impl Compositor {
    pub fn new(cfg: CompositorConfig) -> Self {
        Self { cfg, ctx: None }
    }

    pub fn config(&self) -> &CompositorConfig {
        &self.cfg
    }

    /// Run the full capture raster pass.
    ///
    /// The result is only returned once every layer is in place; on error nothing is emitted.
    pub fn composite(&mut self, req: CompositeRequest<'_>) -> SignVizResult<FrameRGBA> {
        let size = req.frame.size;
        let mut out = req.frame.rgba8_premul.as_ref().clone();
        if out.len() != size.rgba8_len()? {
            return Err(SignVizError::render("frame buffer does not match its size"));
        }

        if req.lighting.is_night() {
            fill_over_in_place(
                &mut out,
                Rgba8Premul::from_straight_rgba(0, 0, 0, 255),
                self.cfg.night_overlay_opacity,
            )?;
        }

        let placement = SignPlacement::compute(
            &self.cfg,
            size,
            req.viewport,
            req.sign,
            req.overlay.size,
            req.lighting,
        );
        if !placement.is_drawable() {
            return Err(SignVizError::render(format!(
                "degenerate sign placement (multiplier {}, draw size {:?})",
                placement.multiplier, placement.draw_size
            )));
        }
        tracing::debug!(
            multiplier = placement.multiplier,
            anchor_x = placement.anchor.x,
            anchor_y = placement.anchor.y,
            device_scale = placement.device_scale,
            "sign placement"
        );

        let layer = self.rasterize_sign(size, &placement, req.overlay)?;
        let (radius, sigma) = shadow_blur_kernel(placement.device_shadow_blur());
        let offset = placement.device_shadow_offset();
        let region = affected_region(placement.bounds(), radius, offset, size);
        if region.is_empty() {
            return Ok(frame(size, out));
        }

        let shadow = shadow_layer(
            &layer,
            size.width,
            region,
            offset,
            placement.shadow.premul_color(),
        );
        let shadow = blur_rgba8_premul(&shadow, region.width(), region.height(), radius, sigma)?;
        over_region_in_place(&mut out, size.width, region, &shadow)?;

        let sign_px = copy_region(&layer, size.width, region);
        over_region_in_place(&mut out, size.width, region, &sign_px)?;

        Ok(frame(size, out))
    }

    /// Draw the transformed sign alone into a transparent full-size layer.
    fn rasterize_sign(
        &mut self,
        size: PixelSize,
        placement: &SignPlacement,
        overlay: &Bitmap,
    ) -> SignVizResult<Vec<u8>> {
        let w: u16 = size
            .width
            .try_into()
            .map_err(|_| SignVizError::render("frame width exceeds u16"))?;
        let h: u16 = size
            .height
            .try_into()
            .map_err(|_| SignVizError::render("frame height exceeds u16"))?;
        let paint = image_paint(overlay)?;

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(placement.transform));
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(overlay.size.width),
            f64::from(overlay.size.height),
        ));
        ctx.flush();

        let mut layer = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut layer);
        self.ctx = Some(ctx);
        Ok(layer.data_as_u8_slice().to_vec())
    }
}

fn frame(size: PixelSize, data: Vec<u8>) -> FrameRGBA {
    FrameRGBA {
        width: size.width,
        height: size.height,
        data,
        premultiplied: true,
    }
}

/// Pixels that the sign or its shadow can touch, clipped to the raster.
fn affected_region(bounds: Rect, radius: u32, offset: Vec2, size: PixelSize) -> PixelRect {
    let pad = f64::from(radius) + offset.x.abs().max(offset.y.abs()) + 1.0;
    let r = bounds.inflate(pad, pad);
    let clip = |v: f64, max: u32| -> u32 {
        if v.is_nan() {
            return 0;
        }
        v.clamp(0.0, f64::from(max)) as u32
    };
    PixelRect {
        x0: clip(r.x0.floor(), size.width),
        y0: clip(r.y0.floor(), size.height),
        x1: clip(r.x1.ceil(), size.width),
        y1: clip(r.y1.ceil(), size.height),
    }
}

/// Tinted, offset copy of the layer's alpha over `region`, ready to blur.
fn shadow_layer(
    layer: &[u8],
    width: u32,
    region: PixelRect,
    offset: Vec2,
    color: Rgba8Premul,
) -> Vec<u8> {
    let (ox, oy) = (offset.x.round() as i64, offset.y.round() as i64);
    let height = (layer.len() / 4 / width.max(1) as usize) as i64;
    let color = color.to_array();
    let mut out = vec![0u8; region.width() as usize * region.height() as usize * 4];
    for (i, px) in out.chunks_exact_mut(4).enumerate() {
        let x = i64::from(region.x0) + (i % region.width() as usize) as i64 - ox;
        let y = i64::from(region.y0) + (i / region.width() as usize) as i64 - oy;
        if x < 0 || y < 0 || x >= i64::from(width) || y >= height {
            continue;
        }
        let a = u16::from(layer[((y as usize) * width as usize + x as usize) * 4 + 3]);
        for c in 0..4 {
            px[c] = mul_div255_u8(u16::from(color[c]), a);
        }
    }
    out
}

fn image_paint(bmp: &Bitmap) -> SignVizResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(&bmp.rgba8_premul, bmp.size.width, bmp.size.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> SignVizResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| SignVizError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| SignVizError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(SignVizError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
