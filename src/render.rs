use crate::{
    assets::SourceImage,
    catalog::Frame,
    compose,
    error::{FrameryError, FrameryResult},
    plan::{Adjustments, solve},
    surface::Surface,
};

/// Fixed export resolution, a 9:16 portrait.
pub const EXPORT_WIDTH: u32 = 1080;
pub const EXPORT_HEIGHT: u32 = 1920;

/// Render one preview pass into `surface` at whatever size it currently
/// has. The same geometry runs for every resolution; only the surface size
/// differs between preview and export.
///
/// With no image the surface is left cleared (the caller presents its own
/// placeholder). With an image but no frame the image is contain-fitted to
/// the full surface. With both, the image is solved against the frame's
/// bounding box and painted through the polygon window.
#[tracing::instrument(skip_all)]
pub fn render_preview(
    surface: &mut Surface,
    frame: Option<&Frame>,
    image: Option<&SourceImage>,
    adjustments: &Adjustments,
) -> FrameryResult<()> {
    surface.clear();

    let Some(image) = image else {
        return Ok(());
    };

    match frame {
        Some(frame) => {
            let dest = frame
                .bounding_box
                .to_pixels(surface.width(), surface.height());
            let plan = solve(image.width, image.height, dest, adjustments);
            tracing::debug!(?plan, "preview draw plan");
            compose::paint_clipped(surface, image, frame, &plan)
        }
        None => compose::paint_contained(surface, image),
    }
}

/// Render the fixed-resolution export: the clipped user image first, then
/// the frame artwork stretched over the whole surface. Reversing that
/// order would hide the user image entirely.
#[tracing::instrument(skip_all)]
pub fn render_export(
    frame: &Frame,
    image: &SourceImage,
    artwork: &SourceImage,
    adjustments: &Adjustments,
) -> FrameryResult<Surface> {
    let mut surface = Surface::new(EXPORT_WIDTH, EXPORT_HEIGHT)?;

    let dest = frame.bounding_box.to_pixels(EXPORT_WIDTH, EXPORT_HEIGHT);
    let plan = solve(image.width, image.height, dest, adjustments);
    tracing::debug!(?plan, "export draw plan");

    compose::paint_clipped(&mut surface, image, frame, &plan)?;
    compose::paint_overlay(&mut surface, artwork)?;
    Ok(surface)
}

/// Guard for the export path: all three assets must be present before
/// [`render_export`] may run.
pub fn require_export_assets<'a>(
    frame: Option<&'a Frame>,
    image: Option<&'a SourceImage>,
    artwork: Option<&'a SourceImage>,
) -> FrameryResult<(&'a Frame, &'a SourceImage, &'a SourceImage)> {
    let frame = frame.ok_or_else(|| FrameryError::missing_asset("no frame selected"))?;
    let image = image.ok_or_else(|| FrameryError::missing_asset("no image loaded"))?;
    let artwork = artwork.ok_or_else(|| {
        FrameryError::missing_asset(format!("artwork for frame '{}' not loaded", frame.id))
    })?;
    Ok((frame, image, artwork))
}
