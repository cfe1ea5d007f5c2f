use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::PixelSize;
use crate::foundation::error::{SignVizError, SignVizResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// A decoded bitmap ready for compositing, stored as premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq)]
pub struct Bitmap {
    pub size: PixelSize,
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl Bitmap {
    /// Wrap already-premultiplied pixels, checking the buffer length.
    pub fn from_premul(size: PixelSize, rgba8_premul: Vec<u8>) -> SignVizResult<Self> {
        if rgba8_premul.len() != size.rgba8_len()? {
            return Err(SignVizError::validation(format!(
                "bitmap buffer length {} does not match {}x{}",
                rgba8_premul.len(),
                size.width,
                size.height
            )));
        }
        Ok(Self {
            size,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Build from a straight-alpha `image` buffer.
    pub fn from_rgba_image(img: image::RgbaImage) -> SignVizResult<Self> {
        let (width, height) = img.dimensions();
        let size = PixelSize::new(width, height)?;
        let mut data = img.into_raw();
        premultiply_rgba8_in_place(&mut data);
        Self::from_premul(size, data)
    }

    /// Natural width in pixels.
    pub fn natural_width(&self) -> u32 {
        self.size.width
    }

    /// Natural height in pixels.
    pub fn natural_height(&self) -> u32 {
        self.size.height
    }
}

/// Decode any format supported by `image` into a premultiplied [`Bitmap`].
pub fn decode_image(bytes: &[u8]) -> SignVizResult<Bitmap> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Bitmap::from_rgba_image(dyn_img.to_rgba8())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
