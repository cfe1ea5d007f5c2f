use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{SignVizError, SignVizResult};
use crate::foundation::math::mul_div255_u8;

pub type PremulRgba8 = [u8; 4];

/// Porter-Duff source-over of premultiplied pixels, with `src` scaled by `opacity`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> SignVizResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(SignVizError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Composite a uniform color over every pixel of `dst`.
pub fn fill_over_in_place(dst: &mut [u8], color: Rgba8Premul, opacity: f32) -> SignVizResult<()> {
    if !dst.len().is_multiple_of(4) {
        return Err(SignVizError::render(
            "fill_over_in_place expects an rgba8 buffer",
        ));
    }
    let src = color.to_array();
    for d in dst.chunks_exact_mut(4) {
        let out = over([d[0], d[1], d[2], d[3]], src, opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Pixel-aligned rectangle inside a raster, `x1`/`y1` exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl PixelRect {
    pub fn width(self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    pub fn height(self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    pub fn is_empty(self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Copy a region out of a full raster into a tightly packed buffer.
pub fn copy_region(src: &[u8], src_width: u32, region: PixelRect) -> Vec<u8> {
    let row = region.width() as usize * 4;
    let mut out = Vec::with_capacity(row * region.height() as usize);
    for y in region.y0..region.y1 {
        let start = (y as usize * src_width as usize + region.x0 as usize) * 4;
        out.extend_from_slice(&src[start..start + row]);
    }
    out
}

/// Source-over a tightly packed region buffer onto a full raster.
pub fn over_region_in_place(
    dst: &mut [u8],
    dst_width: u32,
    region: PixelRect,
    src: &[u8],
) -> SignVizResult<()> {
    let row = region.width() as usize * 4;
    if src.len() != row * region.height() as usize {
        return Err(SignVizError::render(
            "over_region_in_place expects src matching the region size",
        ));
    }
    for (ry, src_row) in src.chunks_exact(row.max(4)).enumerate() {
        let y = region.y0 as usize + ry;
        let start = (y * dst_width as usize + region.x0 as usize) * 4;
        over_in_place(&mut dst[start..start + row], src_row, 1.0)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
