use kurbo::{Point, Rect};

use crate::{
    assets::SourceImage,
    catalog::Frame,
    error::{FrameryError, FrameryResult},
    plan::DrawPlan,
    surface::Surface,
};

pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied RGBA8.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

/// Winding number of `p` with respect to the closed polygon `pts`.
/// Nonzero means inside, matching canvas path-clip semantics; the vertex
/// order (and with it the winding) comes straight from the catalog.
fn winding_number(pts: &[Point], p: Point) -> i32 {
    let mut wn = 0i32;
    for i in 0..pts.len() {
        let a = pts[i];
        let b = pts[(i + 1) % pts.len()];
        if a.y <= p.y {
            if b.y > p.y && is_left(a, b, p) > 0.0 {
                wn += 1;
            }
        } else if b.y <= p.y && is_left(a, b, p) < 0.0 {
            wn -= 1;
        }
    }
    wn
}

fn is_left(a: Point, b: Point, p: Point) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (p.x - a.x) * (b.y - a.y)
}

/// Bilinear sample of a premultiplied image at continuous pixel
/// coordinates, clamping at the edges.
fn sample_bilinear(image: &SourceImage, x: f64, y: f64) -> PremulRgba8 {
    let fx = x - 0.5;
    let fy = y - 0.5;
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;
    let (xi, yi) = (x0 as i64, y0 as i64);

    let p00 = image.pixel_clamped(xi, yi);
    let p10 = image.pixel_clamped(xi + 1, yi);
    let p01 = image.pixel_clamped(xi, yi + 1);
    let p11 = image.pixel_clamped(xi + 1, yi + 1);

    let mut out = [0u8; 4];
    for i in 0..4 {
        let top = f64::from(p00[i]) * (1.0 - tx) + f64::from(p10[i]) * tx;
        let bot = f64::from(p01[i]) * (1.0 - tx) + f64::from(p11[i]) * tx;
        out[i] = (top * (1.0 - ty) + bot * ty).round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Paint `plan`'s source slice into its destination rectangle, restricted
/// to pixels whose centers fall inside `clip` (when given). The mask lives
/// only for this call, so no clip state can leak into later renders.
fn paint_sampled(
    surface: &mut Surface,
    image: &SourceImage,
    plan: &DrawPlan,
    clip: Option<&[Point]>,
) -> FrameryResult<()> {
    if plan.is_degenerate() {
        tracing::warn!(?plan, "degenerate draw plan, skipping layer");
        return Ok(());
    }
    if let Some(pts) = clip
        && pts.len() < 3
    {
        return Err(FrameryError::geometry(
            "clip polygon needs at least 3 points",
        ));
    }

    let dest = plan.dest;
    let src = plan.src;

    // Walk only pixels that can be affected: the destination rectangle,
    // narrowed by the clip polygon's bounds, intersected with the surface.
    let (mut min_x, mut min_y) = (dest.x0, dest.y0);
    let (mut max_x, mut max_y) = (dest.x1, dest.y1);
    if let Some(pts) = clip {
        let cx0 = pts.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let cy0 = pts.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let cx1 = pts.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let cy1 = pts.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        min_x = min_x.max(cx0);
        min_y = min_y.max(cy0);
        max_x = max_x.min(cx1);
        max_y = max_y.min(cy1);
    }

    let px0 = min_x.floor().max(0.0) as u32;
    let py0 = min_y.floor().max(0.0) as u32;
    let px1 = (max_x.ceil().max(0.0) as u32).min(surface.width());
    let py1 = (max_y.ceil().max(0.0) as u32).min(surface.height());

    for py in py0..py1 {
        for px in px0..px1 {
            let center = Point::new(f64::from(px) + 0.5, f64::from(py) + 0.5);
            if center.x < dest.x0
                || center.x >= dest.x1
                || center.y < dest.y0
                || center.y >= dest.y1
            {
                continue;
            }
            if let Some(pts) = clip
                && winding_number(pts, center) == 0
            {
                continue;
            }

            let u = (center.x - dest.x0) / dest.width();
            let v = (center.y - dest.y0) / dest.height();
            let sample =
                sample_bilinear(image, src.x0 + u * src.width(), src.y0 + v * src.height());

            let d = surface.pixel_mut(px, py);
            let blended = over([d[0], d[1], d[2], d[3]], sample);
            d.copy_from_slice(&blended);
        }
    }
    Ok(())
}

/// Paint `image` through `frame`'s window: the clip polygon is scaled to
/// the surface's current pixel size, so preview and export share the same
/// shape regardless of absolute resolution.
pub fn paint_clipped(
    surface: &mut Surface,
    image: &SourceImage,
    frame: &Frame,
    plan: &DrawPlan,
) -> FrameryResult<()> {
    let clip = frame.scaled_clip(surface.width(), surface.height());
    paint_sampled(surface, image, plan, Some(&clip))
}

/// No-frame fallback: scale the whole image to fit the surface, centered
/// and unclipped, letterboxed on the shorter axis.
pub fn paint_contained(surface: &mut Surface, image: &SourceImage) -> FrameryResult<()> {
    let full = Rect::new(
        0.0,
        0.0,
        f64::from(surface.width()),
        f64::from(surface.height()),
    );
    let plan = DrawPlan {
        src: Rect::new(0.0, 0.0, f64::from(image.width), f64::from(image.height)),
        dest: contain_dest(image, full),
    };
    paint_sampled(surface, image, &plan, None)
}

fn contain_dest(image: &SourceImage, full: Rect) -> Rect {
    let (iw, ih) = (f64::from(image.width), f64::from(image.height));
    if iw <= 0.0 || ih <= 0.0 || full.width() <= 0.0 || full.height() <= 0.0 {
        return Rect::ZERO;
    }
    let scale = (full.width() / iw).min(full.height() / ih);
    let w = iw * scale;
    let h = ih * scale;
    let x = full.x0 + (full.width() - w) / 2.0;
    let y = full.y0 + (full.height() - h) / 2.0;
    Rect::new(x, y, x + w, y + h)
}

/// Stretch `artwork` over the entire surface, unclipped. Export paints this
/// after the user image; the ordering is what hides everything outside the
/// window.
pub fn paint_overlay(surface: &mut Surface, artwork: &SourceImage) -> FrameryResult<()> {
    let plan = DrawPlan {
        src: Rect::new(0.0, 0.0, f64::from(artwork.width), f64::from(artwork.height)),
        dest: Rect::new(
            0.0,
            0.0,
            f64::from(surface.width()),
            f64::from(surface.height()),
        ),
    };
    paint_sampled(surface, artwork, &plan, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::NormBBox;

    fn solid_image(width: u32, height: u32, px: [u8; 4]) -> SourceImage {
        let data = px.repeat((width * height) as usize);
        SourceImage::from_premul(width, height, data).unwrap()
    }

    fn diamond_frame() -> Frame {
        Frame {
            id: "diamond".to_string(),
            clip_polygon: vec![[0.5, 0.0], [1.0, 0.5], [0.5, 1.0], [0.0, 0.5]],
            bounding_box: NormBBox {
                x: 0.0,
                y: 0.0,
                width: 1.0,
                height: 1.0,
            },
            artwork: None,
        }
    }

    #[test]
    fn over_opaque_src_replaces_dst() {
        assert_eq!(over([0, 0, 0, 255], [200, 10, 10, 255]), [200, 10, 10, 255]);
    }

    #[test]
    fn over_transparent_src_is_noop() {
        assert_eq!(over([7, 8, 9, 255], [0, 0, 0, 0]), [7, 8, 9, 255]);
    }

    #[test]
    fn winding_handles_both_orientations() {
        let cw: Vec<Point> = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        let ccw: Vec<Point> = cw.iter().rev().copied().collect();
        let inside = Point::new(5.0, 5.0);
        let outside = Point::new(15.0, 5.0);
        assert_ne!(winding_number(&cw, inside), 0);
        assert_ne!(winding_number(&ccw, inside), 0);
        assert_eq!(winding_number(&cw, outside), 0);
        assert_eq!(winding_number(&ccw, outside), 0);
    }

    #[test]
    fn bilinear_on_uniform_image_is_identity() {
        let img = solid_image(8, 8, [40, 80, 120, 255]);
        for (x, y) in [(0.5, 0.5), (3.7, 2.2), (7.9, 7.9)] {
            assert_eq!(sample_bilinear(&img, x, y), [40, 80, 120, 255]);
        }
    }

    #[test]
    fn clipped_paint_stays_inside_the_polygon() {
        let mut surface = Surface::new(40, 40).unwrap();
        let img = solid_image(40, 40, [255, 0, 0, 255]);
        let frame = diamond_frame();
        let plan = DrawPlan {
            src: Rect::new(0.0, 0.0, 40.0, 40.0),
            dest: Rect::new(0.0, 0.0, 40.0, 40.0),
        };

        paint_clipped(&mut surface, &img, &frame, &plan).unwrap();

        // Center of the diamond is painted, the square's corners are not.
        assert_eq!(surface.pixel(20, 20), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(39, 0), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(0, 39), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(39, 39), Some([0, 0, 0, 0]));
    }

    #[test]
    fn clip_shape_scales_with_surface_resolution() {
        let img = solid_image(16, 16, [0, 255, 0, 255]);
        let frame = diamond_frame();

        let mut small = Surface::new(20, 20).unwrap();
        let plan_small = DrawPlan {
            src: Rect::new(0.0, 0.0, 16.0, 16.0),
            dest: Rect::new(0.0, 0.0, 20.0, 20.0),
        };
        paint_clipped(&mut small, &img, &frame, &plan_small).unwrap();

        let mut large = Surface::new(40, 40).unwrap();
        let plan_large = DrawPlan {
            src: Rect::new(0.0, 0.0, 16.0, 16.0),
            dest: Rect::new(0.0, 0.0, 40.0, 40.0),
        };
        paint_clipped(&mut large, &img, &frame, &plan_large).unwrap();

        // A pixel well inside the window at both scales, and one well
        // outside at both scales.
        assert_eq!(small.pixel(10, 10), Some([0, 255, 0, 255]));
        assert_eq!(large.pixel(20, 20), Some([0, 255, 0, 255]));
        assert_eq!(small.pixel(1, 1), Some([0, 0, 0, 0]));
        assert_eq!(large.pixel(2, 2), Some([0, 0, 0, 0]));
    }

    #[test]
    fn degenerate_plan_paints_nothing() {
        let mut surface = Surface::new(10, 10).unwrap();
        let img = solid_image(4, 4, [255, 255, 255, 255]);
        let frame = diamond_frame();
        let plan = DrawPlan {
            src: Rect::ZERO,
            dest: Rect::new(0.0, 0.0, 10.0, 10.0),
        };
        paint_clipped(&mut surface, &img, &frame, &plan).unwrap();
        assert!(surface.is_blank());
    }

    #[test]
    fn contained_fallback_letterboxes_a_wide_image() {
        let mut surface = Surface::new(40, 40).unwrap();
        let img = solid_image(20, 10, [9, 9, 9, 255]); // 2:1, surface 1:1
        paint_contained(&mut surface, &img).unwrap();

        // Scaled to 40x20, centered vertically: rows 10..30 painted.
        assert_eq!(surface.pixel(20, 20), Some([9, 9, 9, 255]));
        assert_eq!(surface.pixel(20, 5), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(20, 35), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(0, 20), Some([9, 9, 9, 255]));
    }

    #[test]
    fn overlay_covers_the_full_surface() {
        let mut surface = Surface::new(12, 12).unwrap();
        let under = solid_image(12, 12, [255, 0, 0, 255]);
        paint_contained(&mut surface, &under).unwrap();

        let art = solid_image(3, 3, [0, 0, 255, 255]);
        paint_overlay(&mut surface, &art).unwrap();

        for (x, y) in [(0, 0), (11, 0), (6, 6), (0, 11), (11, 11)] {
            assert_eq!(surface.pixel(x, y), Some([0, 0, 255, 255]));
        }
    }

    #[test]
    fn transparent_overlay_lets_the_window_show_through() {
        let mut surface = Surface::new(10, 10).unwrap();
        let under = solid_image(10, 10, [0, 200, 0, 255]);
        paint_contained(&mut surface, &under).unwrap();

        let art = solid_image(10, 10, [0, 0, 0, 0]); // fully transparent window
        paint_overlay(&mut surface, &art).unwrap();
        assert_eq!(surface.pixel(5, 5), Some([0, 200, 0, 255]));
    }
}
