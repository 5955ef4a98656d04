use kurbo::Rect;

/// How the image relates to the window's bounding box before zoom/pan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Whole image visible at zoom 100; scale = min of the axis ratios.
    #[default]
    Contain,
    /// Window fully covered at zoom 100; scale = max of the axis ratios.
    Cover,
}

/// User-chosen fit/zoom/pan snapshot for one render call.
///
/// Zoom is a percentage (100 = neutral); pan is a signed percentage of the
/// currently sampled region, typically in -100..100 but not hard-clamped.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Adjustments {
    pub fit: FitMode,
    pub zoom_percent: f64,
    pub pan_x_percent: f64,
    pub pan_y_percent: f64,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            fit: FitMode::Contain,
            zoom_percent: 100.0,
            pan_x_percent: 0.0,
            pan_y_percent: 0.0,
        }
    }
}

/// Resolved sampling rectangles for one paint: `src` in source-image pixel
/// space, `dest` in target-surface pixel space.
///
/// Invariants after [`solve`]: `src` lies fully inside the image bounds and
/// its size never exceeds the image size. Recomputed on every render, never
/// cached across resolution changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawPlan {
    pub src: Rect,
    pub dest: Rect,
}

impl DrawPlan {
    /// Nothing drawable: a zero-area source or destination. Renders skip
    /// the layer instead of erroring.
    pub fn is_degenerate(&self) -> bool {
        self.src.width() <= 0.0
            || self.src.height() <= 0.0
            || self.dest.width() <= 0.0
            || self.dest.height() <= 0.0
    }
}

/// Compute which slice of the source image to sample into `dest_bbox`.
///
/// The destination is always `dest_bbox` verbatim; fit, zoom and pan only
/// decide the source slice. Positive pan-x shifts visible content rightward
/// within the window, which means sampling further left. Degenerate inputs
/// (non-positive zoom, zero-area destination, empty image) yield a
/// zero-area source rather than an error or a division by zero.
pub fn solve(image_width: u32, image_height: u32, dest_bbox: Rect, adj: &Adjustments) -> DrawPlan {
    let img_w = f64::from(image_width);
    let img_h = f64::from(image_height);
    let zoom = adj.zoom_percent / 100.0;

    let degenerate_input = img_w <= 0.0
        || img_h <= 0.0
        || dest_bbox.width() <= 0.0
        || dest_bbox.height() <= 0.0
        || !zoom.is_finite()
        || zoom <= 0.0;
    if degenerate_input {
        return DrawPlan {
            src: Rect::ZERO,
            dest: dest_bbox,
        };
    }

    let scale = match adj.fit {
        FitMode::Contain => (dest_bbox.width() / img_w).min(dest_bbox.height() / img_h),
        FitMode::Cover => (dest_bbox.width() / img_w).max(dest_bbox.height() / img_h),
    };

    // Pre-zoom footprint that would exactly fill the destination, then
    // shrunk (zoom > 100) or grown (zoom < 100) by the zoom factor.
    let sampled_w = dest_bbox.width() / scale / zoom;
    let sampled_h = dest_bbox.height() / scale / zoom;

    // Center, then pan as a fraction of the sampled size (pre-cap, so the
    // pan basis is the size the user actually sees).
    let panned_x = (img_w - sampled_w) / 2.0 - adj.pan_x_percent / 100.0 * sampled_w;
    let panned_y = (img_h - sampled_h) / 2.0 - adj.pan_y_percent / 100.0 * sampled_h;

    // Cap at the image size, then clamp the origin into what remains; the
    // cap keeps the clamp range non-inverted for extreme zoom-out.
    let src_w = sampled_w.min(img_w);
    let src_h = sampled_h.min(img_h);
    let src_x = panned_x.clamp(0.0, img_w - src_w);
    let src_y = panned_y.clamp(0.0, img_h - src_h);

    DrawPlan {
        src: Rect::new(src_x, src_y, src_x + src_w, src_y + src_h),
        dest: dest_bbox,
    }
}
