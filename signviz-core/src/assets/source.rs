use std::path::{Path, PathBuf};

use anyhow::Context;
use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::assets::decode::{Bitmap, decode_image};
use crate::foundation::error::{SignVizError, SignVizResult};

/// Where an overlay bitmap lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BitmapUri<'a> {
    /// `data:<mime>;base64,<payload>`
    Data { mime: &'a str, payload: &'a str },
    /// `http://` or `https://`
    Remote(&'a str),
    /// Local path, optionally `file://`-prefixed.
    File(&'a Path),
}

/// Classify a sign image source.
pub fn parse_bitmap_uri(uri: &str) -> SignVizResult<BitmapUri<'_>> {
    let uri = uri.trim();
    if uri.is_empty() {
        return Err(SignVizError::validation("empty image source"));
    }
    if let Some(rest) = uri.strip_prefix("data:") {
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| SignVizError::validation("data URI is missing ','"))?;
        let Some(mime) = meta.strip_suffix(";base64") else {
            return Err(SignVizError::validation(
                "only base64-encoded data URIs are supported",
            ));
        };
        return Ok(BitmapUri::Data { mime, payload });
    }
    if uri.starts_with("http://") || uri.starts_with("https://") {
        return Ok(BitmapUri::Remote(uri));
    }
    let path = uri.strip_prefix("file://").unwrap_or(uri);
    Ok(BitmapUri::File(Path::new(path)))
}

/// Encode raw bytes as a base64 data URI.
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Wrap an already base64-encoded payload (as returned by image generators) in a data URI.
pub fn data_uri_from_base64(mime: &str, payload_b64: &str) -> String {
    format!("data:{mime};base64,{payload_b64}")
}

/// Mime type accepted for sign uploads, by file extension.
pub fn upload_mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Read an uploaded image file into a data URI suitable for `SignState::image_src`.
pub fn upload_to_data_uri(path: &Path) -> SignVizResult<String> {
    let mime = upload_mime_for(path).ok_or_else(|| {
        SignVizError::validation(format!(
            "unsupported upload type '{}' (expected png, jpeg or webp)",
            path.display()
        ))
    })?;
    let bytes =
        std::fs::read(path).with_context(|| format!("read upload '{}'", path.display()))?;
    Ok(data_uri(mime, &bytes))
}

/// Resolves an image source to a decoded bitmap.
///
/// Loading happens before the sign is drawn; a capture never emits output for a sign whose
/// bitmap failed to load.
pub trait BitmapLoader {
    fn load(&mut self, uri: &str) -> SignVizResult<Bitmap>;
}

/// Loader for data URIs, local files and (with the `remote` feature) HTTP URLs.
///
/// The most recently decoded bitmap is kept so repeated captures of the same sign skip the
/// decode.
#[derive(Debug, Default)]
pub struct UriBitmapLoader {
    root: PathBuf,
    last: Option<(String, Bitmap)>,
}

impl UriBitmapLoader {
    /// Relative file paths are resolved against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            last: None,
        }
    }

    fn fetch_bytes(&self, uri: &BitmapUri<'_>) -> SignVizResult<Vec<u8>> {
        match uri {
            BitmapUri::Data { payload, .. } => STANDARD
                .decode(payload.as_bytes())
                .map_err(|e| SignVizError::decode(format!("invalid base64 payload: {e}"))),
            BitmapUri::File(p) => {
                let full = if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    self.root.join(p)
                };
                std::fs::read(&full).map_err(|e| {
                    SignVizError::decode(format!("failed to read '{}': {e}", full.display()))
                })
            }
            BitmapUri::Remote(url) => fetch_remote(url),
        }
    }
}

impl BitmapLoader for UriBitmapLoader {
    fn load(&mut self, uri: &str) -> SignVizResult<Bitmap> {
        if let Some((cached, bmp)) = &self.last
            && cached == uri
        {
            return Ok(bmp.clone());
        }
        let parsed = parse_bitmap_uri(uri)?;
        let bytes = self.fetch_bytes(&parsed)?;
        let bmp = decode_image(&bytes)?;
        tracing::debug!(
            width = bmp.size.width,
            height = bmp.size.height,
            "decoded sign bitmap"
        );
        self.last = Some((uri.to_string(), bmp.clone()));
        Ok(bmp)
    }
}

#[cfg(feature = "remote")]
fn fetch_remote(url: &str) -> SignVizResult<Vec<u8>> {
    let resp = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| SignVizError::decode(format!("fetch '{url}': {e}")))?;
    let bytes = resp
        .bytes()
        .map_err(|e| SignVizError::decode(format!("read body of '{url}': {e}")))?;
    Ok(bytes.to_vec())
}

#[cfg(not(feature = "remote"))]
fn fetch_remote(url: &str) -> SignVizResult<Vec<u8>> {
    Err(SignVizError::decode(format!(
        "cannot fetch '{url}': built without the `remote` feature"
    )))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
