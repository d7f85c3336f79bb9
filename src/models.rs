use serde::{Deserialize, Serialize};

use crate::error::{DetectError, Result};

/// Upper bound of the normalized coordinate scale.
pub const NORMALIZED_SCALE: f32 = 1000.0;

/// Item bounds on a resolution-independent 0-1000 scale.
///
/// Serialized with the `ymin`/`xmin`/`ymax`/`xmax` names used by the
/// cropping tools that consume these boxes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    #[serde(rename = "ymin")]
    pub top: f32,
    #[serde(rename = "xmin")]
    pub left: f32,
    #[serde(rename = "ymax")]
    pub bottom: f32,
    #[serde(rename = "xmax")]
    pub right: f32,
}

impl BoundingBox {
    pub fn new(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self { top, left, bottom, right }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Vertical center, used for row clustering
    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }

    pub fn center_x(&self) -> f32 {
        (self.left + self.right) / 2.0
    }

    /// True when `0 <= left < right <= 1000` and `0 <= top < bottom <= 1000`
    pub fn is_well_formed(&self) -> bool {
        (0.0..NORMALIZED_SCALE).contains(&self.left)
            && self.left < self.right
            && self.right <= NORMALIZED_SCALE
            && (0.0..NORMALIZED_SCALE).contains(&self.top)
            && self.top < self.bottom
            && self.bottom <= NORMALIZED_SCALE
    }

    /// Map back to source pixels for an image of the given size.
    ///
    /// Edges are floored/ceiled so the pixel rectangle always covers the
    /// normalized one.
    pub fn to_pixels(&self, width: u32, height: u32) -> PixelRect {
        let w = width as f32;
        let h = height as f32;

        let x = ((self.left * w / NORMALIZED_SCALE).floor().max(0.0) as u32).min(width.saturating_sub(1));
        let y = ((self.top * h / NORMALIZED_SCALE).floor().max(0.0) as u32).min(height.saturating_sub(1));
        let max_x = ((self.right * w / NORMALIZED_SCALE).ceil() as u32).clamp(x + 1, width.max(x + 1));
        let max_y = ((self.bottom * h / NORMALIZED_SCALE).ceil() as u32).clamp(y + 1, height.max(y + 1));

        PixelRect {
            x,
            y,
            width: max_x - x,
            height: max_y - y,
        }
    }
}

/// Axis-aligned rectangle in source-pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Convert to the 0-1000 scale using the image dimensions as divisors
    pub fn normalize(&self, image_width: u32, image_height: u32) -> BoundingBox {
        let w = image_width as f32;
        let h = image_height as f32;
        BoundingBox {
            top: self.y as f32 * NORMALIZED_SCALE / h,
            left: self.x as f32 * NORMALIZED_SCALE / w,
            bottom: (self.y + self.height) as f32 * NORMALIZED_SCALE / h,
            right: (self.x + self.width) as f32 * NORMALIZED_SCALE / w,
        }
    }
}

/// User-selected crop region, normalized to [0, 1] of the source image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CropRect {
    /// The whole image
    pub fn full() -> Self {
        Self { x: 0.0, y: 0.0, width: 1.0, height: 1.0 }
    }

    pub fn validate(&self) -> Result<()> {
        let values = [self.x, self.y, self.width, self.height];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(DetectError::InvalidCrop(format!("non-finite value in {:?}", self)));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(DetectError::InvalidCrop(format!(
                "empty crop {}x{}",
                self.width, self.height
            )));
        }
        if self.x < 0.0 || self.y < 0.0 || self.x + self.width > 1.0 + f32::EPSILON
            || self.y + self.height > 1.0 + f32::EPSILON
        {
            return Err(DetectError::InvalidCrop(format!(
                "crop {:?} extends outside the unit square",
                self
            )));
        }
        Ok(())
    }

    /// Pixel region for an image of the given size, at least 1x1
    pub fn to_pixels(&self, width: u32, height: u32) -> Result<PixelRect> {
        self.validate()?;
        if width == 0 || height == 0 {
            return Err(DetectError::InvalidInput { width, height });
        }

        let x = ((self.x * width as f32).round() as u32).min(width.saturating_sub(1));
        let y = ((self.y * height as f32).round() as u32).min(height.saturating_sub(1));
        let w = ((self.width * width as f32).round() as u32).clamp(1, width - x);
        let h = ((self.height * height as f32).round() as u32).clamp(1, height - y);

        Ok(PixelRect { x, y, width: w, height: h })
    }
}

impl std::str::FromStr for CropRect {
    type Err = DetectError;

    /// Parse `x,y,width,height`
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<f32> = s
            .split(',')
            .map(|p| p.trim().parse::<f32>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| DetectError::InvalidCrop(format!("'{}': {}", s, e)))?;

        let [x, y, width, height] = parts[..] else {
            return Err(DetectError::InvalidCrop(format!(
                "expected x,y,width,height but got '{}'",
                s
            )));
        };

        let crop = Self { x, y, width, height };
        crop.validate()?;
        Ok(crop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_uses_image_dimensions() {
        let rect = PixelRect { x: 50, y: 20, width: 100, height: 40 };
        let b = rect.normalize(200, 80);
        assert_eq!(b, BoundingBox::new(250.0, 250.0, 750.0, 750.0));
        assert!(b.is_well_formed());
    }

    #[test]
    fn full_frame_rect_touches_scale_bounds() {
        let rect = PixelRect { x: 0, y: 0, width: 640, height: 480 };
        let b = rect.normalize(640, 480);
        assert_eq!(b, BoundingBox::new(0.0, 0.0, 1000.0, 1000.0));
        assert!(b.is_well_formed());
    }

    #[test]
    fn to_pixels_covers_normalized_box() {
        let b = BoundingBox::new(250.0, 250.0, 750.0, 750.0);
        assert_eq!(
            b.to_pixels(200, 80),
            PixelRect { x: 50, y: 20, width: 100, height: 40 }
        );
    }

    #[test]
    fn degenerate_boxes_are_not_well_formed() {
        assert!(!BoundingBox::new(10.0, 10.0, 10.0, 20.0).is_well_formed());
        assert!(!BoundingBox::new(10.0, 30.0, 20.0, 20.0).is_well_formed());
        assert!(!BoundingBox::new(-1.0, 0.0, 20.0, 20.0).is_well_formed());
        assert!(!BoundingBox::new(0.0, 0.0, 20.0, 1000.5).is_well_formed());
    }

    #[test]
    fn serializes_with_extent_names() {
        let b = BoundingBox::new(1.0, 2.0, 3.0, 4.0);
        let json = serde_json::to_string(&b).unwrap();
        assert_eq!(json, r#"{"ymin":1.0,"xmin":2.0,"ymax":3.0,"xmax":4.0}"#);
    }

    #[test]
    fn parses_crop_rect() {
        let crop: CropRect = "0.1, 0.2, 0.5, 0.5".parse().unwrap();
        assert_eq!(crop, CropRect { x: 0.1, y: 0.2, width: 0.5, height: 0.5 });
        assert_eq!(
            crop.to_pixels(100, 100).unwrap(),
            PixelRect { x: 10, y: 20, width: 50, height: 50 }
        );
    }

    #[test]
    fn rejects_bad_crops() {
        assert!("0.1,0.2,0.5".parse::<CropRect>().is_err());
        assert!("a,b,c,d".parse::<CropRect>().is_err());
        assert!("0.6,0,0.5,1".parse::<CropRect>().is_err());
        assert!("0,0,0,1".parse::<CropRect>().is_err());
    }
}
