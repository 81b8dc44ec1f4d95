use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest width or height (exclusive, in pixels) a mask may have.
pub const MIN_MASK_SIZE: f32 = 5.0;

/// Axis-aligned box in source-image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// One recognized word with its box and engine confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub bbox: BBox,
    #[serde(default)]
    pub confidence: f32,
}

impl Word {
    pub fn new(text: impl Into<String>, bbox: BBox, confidence: f32) -> Self {
        Self { text: text.into(), bbox, confidence }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("Degenerate mask region: {width}x{height} (both sides must exceed {min}px)")]
    Degenerate { width: f32, height: f32, min: f32 },
}

/// A rectangle the compositor paints over. Always wider and taller than the
/// configured minimum, which itself never drops below [`MIN_MASK_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaskRegion {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl MaskRegion {
    pub fn from_bbox(bbox: &BBox) -> Result<Self, GeometryError> {
        Self::from_bbox_with_min(bbox, MIN_MASK_SIZE)
    }

    pub fn from_bbox_with_min(bbox: &BBox, min: f32) -> Result<Self, GeometryError> {
        let min = min.max(MIN_MASK_SIZE);
        let (width, height) = (bbox.width(), bbox.height());
        // NaN coordinates fail both comparisons and are rejected too.
        if !(width > min && height > min) {
            return Err(GeometryError::Degenerate { width, height, min });
        }
        Ok(Self { x0: bbox.x0, y0: bbox.y0, x1: bbox.x1, y1: bbox.y1 })
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

impl TryFrom<BBox> for MaskRegion {
    type Error = GeometryError;

    fn try_from(bbox: BBox) -> Result<Self, Self::Error> {
        MaskRegion::from_bbox(&bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_region_is_rejected() {
        let err = MaskRegion::from_bbox(&BBox::new(10.0, 10.0, 13.0, 30.0)).unwrap_err();
        assert!(matches!(err, GeometryError::Degenerate { .. }));
    }

    #[test]
    fn ten_by_ten_region_is_accepted() {
        let mask = MaskRegion::from_bbox(&BBox::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        assert_eq!(mask.width(), 10.0);
        assert_eq!(mask.height(), 10.0);
    }

    #[test]
    fn exactly_five_pixels_is_rejected() {
        assert!(MaskRegion::from_bbox(&BBox::new(0.0, 0.0, 5.0, 40.0)).is_err());
    }

    #[test]
    fn inverted_box_is_rejected() {
        assert!(MaskRegion::from_bbox(&BBox::new(50.0, 50.0, 10.0, 10.0)).is_err());
    }

    #[test]
    fn custom_minimum_never_goes_below_default() {
        let bbox = BBox::new(0.0, 0.0, 4.0, 4.0);
        assert!(MaskRegion::from_bbox_with_min(&bbox, 0.0).is_err());
        let bbox = BBox::new(0.0, 0.0, 12.0, 12.0);
        assert!(MaskRegion::from_bbox_with_min(&bbox, 15.0).is_err());
    }

    #[test]
    fn word_deserializes_without_confidence() {
        let w: Word =
            serde_json::from_str(r#"{"text":"DOB","bbox":{"x0":1,"y0":2,"x1":30,"y1":20}}"#).unwrap();
        assert_eq!(w.text, "DOB");
        assert_eq!(w.confidence, 0.0);
        assert_eq!(w.bbox.height(), 18.0);
    }
}
