use std::{io::Cursor, path::Path};

use anyhow::Context as _;
use image::ImageEncoder as _;

use crate::{
    error::{FrameryError, FrameryResult},
    surface::Surface,
};

/// Deterministic name for the user's download action.
pub const DEFAULT_EXPORT_FILENAME: &str = "photoframe.png";

/// Any structurally valid PNG of a real export is far larger than this;
/// a payload below it means the encode silently went wrong.
const MIN_PLAUSIBLE_PNG_LEN: usize = 64;

/// Serialize a rendered surface to PNG bytes.
///
/// Fails distinguishably instead of handing back a usable-looking but
/// empty payload: zero-dimension surfaces, fully blank surfaces, and
/// implausibly small outputs are all `Encode` errors.
pub fn encode_png(surface: &Surface) -> FrameryResult<Vec<u8>> {
    if surface.width() == 0 || surface.height() == 0 {
        return Err(FrameryError::encode(format!(
            "surface has zero dimension ({}x{})",
            surface.width(),
            surface.height()
        )));
    }
    if surface.is_blank() {
        return Err(FrameryError::encode(
            "refusing to encode a fully blank surface",
        ));
    }

    let straight = unpremultiply_rgba8(surface.data());

    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(Cursor::new(&mut out))
        .write_image(
            &straight,
            surface.width(),
            surface.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| FrameryError::encode(format!("png encode: {e}")))?;

    if out.len() < MIN_PLAUSIBLE_PNG_LEN {
        return Err(FrameryError::encode(format!(
            "png payload implausibly small ({} bytes)",
            out.len()
        )));
    }
    Ok(out)
}

/// Encode and persist in one step.
pub fn write_png(surface: &Surface, path: &Path) -> FrameryResult<()> {
    let bytes = encode_png(surface)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, &bytes).with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// PNG carries straight alpha; internal buffers are premultiplied.
fn unpremultiply_rgba8(premul: &[u8]) -> Vec<u8> {
    let mut out = premul.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        px[0] = (((px[0] as u16) * 255 + a / 2) / a).min(255) as u8;
        px[1] = (((px[1] as u16) * 255 + a / 2) / a).min(255) as u8;
        px[2] = (((px[2] as u16) * 255 + a / 2) / a).min(255) as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn painted_surface(width: u32, height: u32) -> Surface {
        let mut s = Surface::new(width, height).unwrap();
        for px in s.data_mut().chunks_exact_mut(4) {
            px.copy_from_slice(&[180, 90, 45, 255]);
        }
        s
    }

    #[test]
    fn encode_produces_a_decodable_png() {
        let surface = painted_surface(16, 16);
        let bytes = encode_png(&surface).unwrap();

        assert!(bytes.len() >= MIN_PLAUSIBLE_PNG_LEN);
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']);

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 16);
        assert_eq!(decoded.height(), 16);
    }

    #[test]
    fn encode_rejects_zero_dimensions() {
        let surface = Surface::new(0, 1920).unwrap();
        let err = encode_png(&surface).unwrap_err();
        assert!(matches!(err, FrameryError::Encode(_)));
    }

    #[test]
    fn encode_rejects_blank_surface() {
        let surface = Surface::new(64, 64).unwrap();
        let err = encode_png(&surface).unwrap_err();
        assert!(matches!(err, FrameryError::Encode(_)));
    }

    #[test]
    fn unpremultiply_inverts_half_alpha() {
        // 64 premul at alpha 128 unpremultiplies back to ~128 straight.
        let straight = unpremultiply_rgba8(&[64, 64, 64, 128]);
        assert_eq!(straight[3], 128);
        assert!((i16::from(straight[0]) - 128).abs() <= 1);
    }

    #[test]
    fn write_png_creates_the_file() {
        let dir = std::path::PathBuf::from("target").join("encode_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("out.png");
        let _ = std::fs::remove_file(&path);

        write_png(&painted_surface(8, 8), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.len() >= MIN_PLAUSIBLE_PNG_LEN);
    }
}
