use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;

use crate::models::PixelRect;

/// Summary of one outermost contour.
///
/// The traced points are dropped as soon as the enclosed area and bounding
/// rectangle have been computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    /// Area enclosed by the contour polygon, in pixels
    pub area: f64,
    /// Axis-aligned bounding rectangle of the contour points
    pub rect: PixelRect,
}

/// Find outermost contours in a binary mask (non-zero = foreground).
///
/// Holes, and anything nested inside a hole of another region, are ignored.
/// Regions come out in border-following discovery order (row-major by the
/// first pixel of each border).
pub fn find_outer_regions(mask: &GrayImage) -> Vec<Region> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .filter_map(|c| {
            let rect = bounding_rect(&c.points)?;
            Some(Region {
                area: polygon_area(&c.points),
                rect,
            })
        })
        .collect()
}

/// Absolute area enclosed by a closed polygon (shoelace formula)
pub fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let twice: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64)
        .sum();

    twice.unsigned_abs() as f64 / 2.0
}

/// Smallest pixel rectangle containing every point (inclusive of edge pixels)
pub fn bounding_rect(points: &[Point<i32>]) -> Option<PixelRect> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);

    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    Some(PixelRect {
        x: min_x.max(0) as u32,
        y: min_y.max(0) as u32,
        width: (max_x - min_x + 1) as u32,
        height: (max_y - min_y + 1) as u32,
    })
}
