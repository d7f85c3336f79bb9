use crate::detection::contours::Region;
use crate::models::BoundingBox;

/// Keep regions whose enclosed area lies strictly inside
/// `(min_ratio * A, max_ratio * A)` where `A` is the image area.
///
/// The floor rejects speckles; the ceiling rejects an outline that has
/// swallowed the whole sheet.
pub fn filter_by_area(
    regions: &[Region],
    image_width: u32,
    image_height: u32,
    min_ratio: f64,
    max_ratio: f64,
) -> Vec<Region> {
    let image_area = image_width as f64 * image_height as f64;
    let min_area = image_area * min_ratio;
    let max_area = image_area * max_ratio;

    regions
        .iter()
        .filter(|r| r.area > min_area && r.area < max_area)
        .copied()
        .collect()
}

/// Convert surviving regions to the 0-1000 scale, in the order given
pub fn normalize_regions(regions: &[Region], image_width: u32, image_height: u32) -> Vec<BoundingBox> {
    regions
        .iter()
        .map(|r| r.rect.normalize(image_width, image_height))
        .collect()
}
