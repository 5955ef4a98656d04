use crate::{
    assets::SourceImage,
    catalog::{Frame, FrameCatalog},
    error::{FrameryError, FrameryResult},
    plan::Adjustments,
    render,
    surface::Surface,
};

/// Mutable editing state: the selected frame, the loaded images and the
/// current adjustments. The render path never reads this directly; every
/// render call receives an explicit snapshot, so geometry stays a pure
/// function of its arguments.
pub struct Session {
    catalog: FrameCatalog,
    selected: Option<String>,
    artwork: Option<SourceImage>,
    image: Option<SourceImage>,
    adjustments: Adjustments,
}

impl Session {
    pub fn new(catalog: FrameCatalog) -> Self {
        Self {
            catalog,
            selected: None,
            artwork: None,
            image: None,
            adjustments: Adjustments::default(),
        }
    }

    pub fn catalog(&self) -> &FrameCatalog {
        &self.catalog
    }

    pub fn selected_frame(&self) -> Option<&Frame> {
        self.selected.as_deref().and_then(|id| self.catalog.get(id))
    }

    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    pub fn adjustments(&self) -> Adjustments {
        self.adjustments
    }

    /// Select a frame and load its artwork through `load_artwork`.
    ///
    /// The selection is speculative until the artwork load succeeds: on
    /// failure the previous selection and artwork are restored exactly and
    /// the load error is surfaced. Re-selecting the current frame is a
    /// no-op. The load runs once; it is never retried here.
    pub fn select_frame(
        &mut self,
        id: &str,
        load_artwork: impl FnOnce(&Frame) -> FrameryResult<SourceImage>,
    ) -> FrameryResult<()> {
        if self.selected.as_deref() == Some(id) {
            return Ok(());
        }
        let Some(frame) = self.catalog.get(id) else {
            return Err(FrameryError::validation(format!("unknown frame id '{id}'")));
        };
        let frame = frame.clone();

        let prev_selected = self.selected.replace(id.to_string());
        let prev_artwork = self.artwork.take();

        match load_artwork(&frame) {
            Ok(artwork) => {
                tracing::debug!(frame = %id, "frame selected");
                self.artwork = Some(artwork);
                Ok(())
            }
            Err(err) => {
                self.selected = prev_selected;
                self.artwork = prev_artwork;
                Err(err)
            }
        }
    }

    pub fn clear_frame(&mut self) {
        self.selected = None;
        self.artwork = None;
    }

    pub fn set_image(&mut self, image: SourceImage) {
        self.image = Some(image);
    }

    pub fn clear_image(&mut self) {
        self.image = None;
    }

    pub fn set_adjustments(&mut self, adjustments: Adjustments) {
        self.adjustments = adjustments;
    }

    /// Fit/zoom/pan back to defaults; selection and images stay.
    pub fn reset_adjustments(&mut self) {
        self.adjustments = Adjustments::default();
    }

    /// Back to the initial state: nothing selected, nothing loaded.
    pub fn reset(&mut self) {
        self.clear_frame();
        self.clear_image();
        self.reset_adjustments();
    }

    pub fn can_export(&self) -> bool {
        self.selected_frame().is_some() && self.image.is_some() && self.artwork.is_some()
    }

    /// Render the current state into a caller-owned preview surface.
    pub fn render_preview(&self, surface: &mut Surface) -> FrameryResult<()> {
        render::render_preview(
            surface,
            self.selected_frame(),
            self.image.as_ref(),
            &self.adjustments,
        )
    }

    /// Render the fixed-resolution export surface. Rejected with
    /// `MissingAsset` unless a frame, its artwork and an image are all
    /// present; no partial export is produced.
    pub fn export(&self) -> FrameryResult<Surface> {
        let (frame, image, artwork) = render::require_export_assets(
            self.selected_frame(),
            self.image.as_ref(),
            self.artwork.as_ref(),
        )?;
        render::render_export(frame, image, artwork, &self.adjustments)
    }
}
