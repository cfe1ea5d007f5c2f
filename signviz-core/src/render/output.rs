use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::assets::source::data_uri;
use crate::foundation::error::{SignVizError, SignVizResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;
use crate::render::compositor::FrameRGBA;

/// Prefix used in proof file names.
pub const APP_NAME: &str = "signviz";

/// `<app>-proof-<unix-ms>.png`
pub fn proof_file_name(app: &str, timestamp_ms: u64) -> String {
    format!("{app}-proof-{timestamp_ms}.png")
}

/// Milliseconds since the unix epoch, saturating on clock errors.
pub fn unix_timestamp_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Encode a composited frame as a straight-alpha PNG.
pub fn encode_png(frame: &FrameRGBA) -> SignVizResult<Vec<u8>> {
    let mut rgba = frame.data.clone();
    if frame.premultiplied {
        unpremultiply_rgba8_in_place(&mut rgba);
    }
    let img = image::RgbaImage::from_raw(frame.width, frame.height, rgba)
        .ok_or_else(|| SignVizError::render("frame buffer does not match its dimensions"))?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

/// A finished capture, ready for display or download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofImage {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
    pub captured_at_ms: u64,
}

impl ProofImage {
    pub fn from_frame(frame: &FrameRGBA, captured_at_ms: u64) -> SignVizResult<Self> {
        Ok(Self {
            width: frame.width,
            height: frame.height,
            png: encode_png(frame)?,
            captured_at_ms,
        })
    }

    /// `data:image/png;base64,...`
    pub fn data_uri(&self) -> String {
        data_uri("image/png", &self.png)
    }

    pub fn file_name(&self) -> String {
        proof_file_name(APP_NAME, self.captured_at_ms)
    }
}

/// Receives finished proofs.
pub trait ProofSink {
    fn deliver(&mut self, proof: &ProofImage) -> SignVizResult<()>;
}

/// Writes each proof into a directory under its conventional file name.
#[derive(Clone, Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, in delivery order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ProofSink for DirectorySink {
    fn deliver(&mut self, proof: &ProofImage) -> SignVizResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;
        let path = self.dir.join(proof.file_name());
        std::fs::write(&path, &proof.png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        tracing::info!(path = %path.display(), "proof written");
        self.written.push(path);
        Ok(())
    }
}

/// Keeps proofs in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    pub proofs: Vec<ProofImage>,
}

impl ProofSink for MemorySink {
    fn deliver(&mut self, proof: &ProofImage) -> SignVizResult<()> {
        self.proofs.push(proof.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/output.rs"]
mod tests;
