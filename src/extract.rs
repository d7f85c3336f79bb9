//! Caller-side image handling around the detector: cropping the sheet to the
//! user's selection before detection, and copying each detected item out of
//! the sheet afterwards. The detector itself never crops.

use image::DynamicImage;

use crate::error::{DetectError, Result};
use crate::models::{BoundingBox, CropRect};

/// Padding in pixels added around each extracted item
pub const DEFAULT_PADDING: u32 = 3;

/// Crop to a normalized region of the image
pub fn crop_to_region(img: &DynamicImage, crop: &CropRect) -> Result<DynamicImage> {
    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(DetectError::InvalidInput { width, height });
    }

    let rect = crop.to_pixels(width, height)?;
    Ok(img.crop_imm(rect.x, rect.y, rect.width, rect.height))
}

/// Copy each box out of `img`, grown by `padding` pixels and clamped to the
/// image. Output order matches `boxes`.
pub fn extract_items(img: &DynamicImage, boxes: &[BoundingBox], padding: u32) -> Vec<DynamicImage> {
    let (width, height) = (img.width(), img.height());

    boxes
        .iter()
        .map(|b| {
            let px = b.to_pixels(width, height);
            let x = px.x.saturating_sub(padding);
            let y = px.y.saturating_sub(padding);
            let max_x = (px.x + px.width).saturating_add(padding).min(width);
            let max_y = (px.y + px.height).saturating_add(padding).min(height);

            img.crop_imm(x, y, (max_x - x).max(1), (max_y - y).max(1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};

    fn quadrant_image() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(100, 50, |x, y| {
            Rgb([if x < 50 { 255 } else { 0 }, if y < 25 { 255 } else { 0 }, 0])
        }))
    }

    #[test]
    fn crop_maps_normalized_region_to_pixels() {
        let img = quadrant_image();
        let crop = CropRect { x: 0.5, y: 0.5, width: 0.5, height: 0.5 };
        let cropped = crop_to_region(&img, &crop).unwrap();
        assert_eq!(cropped.dimensions(), (50, 25));
        assert_eq!(cropped.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn crop_rejects_out_of_range_region() {
        let img = quadrant_image();
        let crop = CropRect { x: 0.8, y: 0.0, width: 0.5, height: 1.0 };
        assert!(matches!(crop_to_region(&img, &crop), Err(DetectError::InvalidCrop(_))));
    }

    #[test]
    fn extracted_items_are_padded_and_clamped() {
        let img = quadrant_image();
        let boxes = [
            // 10..30 x 10..20 in pixels
            BoundingBox::new(200.0, 100.0, 400.0, 300.0),
            // touches the bottom-right corner
            BoundingBox::new(800.0, 900.0, 1000.0, 1000.0),
        ];

        let items = extract_items(&img, &boxes, DEFAULT_PADDING);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].dimensions(), (26, 16));
        assert_eq!(items[1].dimensions(), (13, 13));
    }

    #[test]
    fn zero_padding_matches_box() {
        let img = quadrant_image();
        let items = extract_items(&img, &[BoundingBox::new(0.0, 0.0, 500.0, 500.0)], 0);
        assert_eq!(items[0].dimensions(), (50, 25));
    }
}
