use std::path::Path;

use anyhow::Context as _;
use kurbo::{Point, Rect};

use crate::error::{FrameryError, FrameryResult};

/// Normalized bounding box in [0,1] of the frame image's own dimensions,
/// origin top-left, y downward.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NormBBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NormBBox {
    /// Scale to pixel coordinates of a `width`×`height` surface.
    pub fn to_pixels(self, width: u32, height: u32) -> Rect {
        let (w, h) = (f64::from(width), f64::from(height));
        Rect::new(
            self.x * w,
            self.y * h,
            (self.x + self.width) * w,
            (self.y + self.height) * h,
        )
    }
}

/// One catalog entry: a decorative frame with a polygonal window.
///
/// `clip_polygon` is an ordered vertex list; insertion order defines edge
/// order and path winding and must not be reordered. Several ids may map to
/// congruent geometry; the catalog does not deduplicate.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Frame {
    pub id: String,
    #[serde(rename = "clipPolygon")]
    pub clip_polygon: Vec<[f64; 2]>,
    #[serde(rename = "boundingBox")]
    pub bounding_box: NormBBox,
    /// Path to the frame's full-resolution artwork, relative to the
    /// catalog's assets root. Required for export, not for preview.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork: Option<String>,
}

const BBOX_EPSILON: f64 = 1e-6;

impl Frame {
    pub fn validate(&self) -> FrameryResult<()> {
        if self.id.trim().is_empty() {
            return Err(FrameryError::validation("frame id must be non-empty"));
        }
        if self.clip_polygon.len() < 3 {
            return Err(FrameryError::validation(format!(
                "frame '{}' clip polygon needs at least 3 points, got {}",
                self.id,
                self.clip_polygon.len()
            )));
        }
        for &[x, y] in &self.clip_polygon {
            if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
                return Err(FrameryError::validation(format!(
                    "frame '{}' clip point ({x}, {y}) is outside [0,1]",
                    self.id
                )));
            }
        }

        let b = self.bounding_box;
        if b.width <= 0.0 || b.height <= 0.0 {
            return Err(FrameryError::validation(format!(
                "frame '{}' bounding box must have positive size",
                self.id
            )));
        }
        if b.x < 0.0 || b.y < 0.0 || b.x + b.width > 1.0 + BBOX_EPSILON || b.y + b.height > 1.0 + BBOX_EPSILON {
            return Err(FrameryError::validation(format!(
                "frame '{}' bounding box exceeds [0,1]",
                self.id
            )));
        }

        // The solver samples against the bbox while the clip uses the
        // polygon; a bbox that does not circumscribe the polygon would
        // silently mis-register the composite, so reject it here.
        for &[x, y] in &self.clip_polygon {
            let inside = x >= b.x - BBOX_EPSILON
                && x <= b.x + b.width + BBOX_EPSILON
                && y >= b.y - BBOX_EPSILON
                && y <= b.y + b.height + BBOX_EPSILON;
            if !inside {
                return Err(FrameryError::validation(format!(
                    "frame '{}' clip point ({x}, {y}) lies outside its bounding box",
                    self.id
                )));
            }
        }
        Ok(())
    }

    /// Clip polygon scaled to pixel coordinates of a `width`×`height`
    /// surface, preserving vertex order.
    pub fn scaled_clip(&self, width: u32, height: u32) -> Vec<Point> {
        let (w, h) = (f64::from(width), f64::from(height));
        self.clip_polygon
            .iter()
            .map(|&[x, y]| Point::new(x * w, y * h))
            .collect()
    }
}

/// Ordered frame catalog, loaded once at startup and never mutated.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct FrameCatalog {
    frames: Vec<Frame>,
}

impl FrameCatalog {
    /// The catalog shipped with the crate.
    pub fn builtin() -> Self {
        let catalog: Self = serde_json::from_str(include_str!("catalog/builtin.json"))
            .expect("builtin catalog is valid JSON");
        catalog
            .validate()
            .expect("builtin catalog passes validation");
        catalog
    }

    pub fn from_json_str(json: &str) -> FrameryResult<Self> {
        let catalog: Self = serde_json::from_str(json)
            .map_err(|e| FrameryError::validation(format!("parse frame catalog: {e}")))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_path(path: &Path) -> FrameryResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read frame catalog '{}'", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> FrameryResult<()> {
        let mut seen = std::collections::BTreeSet::new();
        for frame in &self.frames {
            frame.validate()?;
            if !seen.insert(frame.id.as_str()) {
                return Err(FrameryError::validation(format!(
                    "duplicate frame id '{}'",
                    frame.id
                )));
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Frame> {
        self.frames.iter().find(|f| f.id == id)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
