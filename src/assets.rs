use std::{path::Path, sync::Arc};

use crate::error::{FrameryError, FrameryResult};

/// A decoded raster image in premultiplied RGBA8.
///
/// Owned by the caller for its full lifetime; the render path only reads
/// dimensions and pixel data.
#[derive(Clone, Debug)]
pub struct SourceImage {
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl SourceImage {
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> FrameryResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4));
        if expected != Some(rgba8_premul.len()) {
            return Err(FrameryError::geometry(
                "source image byte length does not match width*height*4",
            ));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Premultiplied pixel at (x, y); coordinates are clamped to the edges.
    pub fn pixel_clamped(&self, x: i64, y: i64) -> [u8; 4] {
        let x = x.clamp(0, i64::from(self.width) - 1) as usize;
        let y = y.clamp(0, i64::from(self.height) - 1) as usize;
        let idx = (y * self.width as usize + x) * 4;
        let px = &self.rgba8_premul[idx..idx + 4];
        [px[0], px[1], px[2], px[3]]
    }
}

/// Decode an encoded image (PNG, JPEG, ...) into premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> FrameryResult<SourceImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| FrameryError::asset_load(format!("decode image: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    SourceImage::from_premul(width, height, rgba8_premul)
}

/// One-shot load-and-decode from disk. Failure is reported once and never
/// retried; the caller reverts any speculative state change.
pub fn load_image(path: &Path) -> FrameryResult<SourceImage> {
    let bytes = std::fs::read(path)
        .map_err(|e| FrameryError::asset_load(format!("read '{}': {e}", path.display())))?;
    decode_image(&bytes)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}
