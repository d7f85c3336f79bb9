//! Canny-style edge extraction on an already smoothed plane.
//!
//! `imageproc::edges::canny` blurs its input again before taking gradients,
//! which washes out the faint card-on-paper boundaries this detector exists
//! to find. Gradients come from imageproc's 3x3 Sobel operators; suppression
//! and hysteresis are done here on the L1 magnitude `|gx| + |gy|`.

use image::{GrayImage, Luma};
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

/// Foreground value in binary masks
pub const EDGE: u8 = 255;

/// tan(22.5°) and tan(67.5°), the sector boundaries for gradient direction
const TAN_22_5: f32 = 0.414_213_57;
const TAN_67_5: f32 = 2.414_213_7;

/// Binary edge mask (255 = edge) using non-maximum suppression and
/// hysteresis between `low_threshold` and `high_threshold`.
pub fn detect_edges(img: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    let (width, height) = img.dimensions();
    let gx = horizontal_sobel(img);
    let gy = vertical_sobel(img);

    let w = width as usize;
    let h = height as usize;
    let magnitude: Vec<f32> = gx
        .pixels()
        .zip(gy.pixels())
        .map(|(x, y)| (x[0] as f32).abs() + (y[0] as f32).abs())
        .collect();

    let mag_at = |x: i64, y: i64| -> f32 {
        if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
            0.0
        } else {
            magnitude[y as usize * w + x as usize]
        }
    };

    // 0 = suppressed, 1 = weak candidate, 2 = strong
    let mut class = vec![0u8; w * h];
    let mut stack = Vec::new();

    for y in 0..h {
        for x in 0..w {
            let m = magnitude[y * w + x];
            if m <= low_threshold {
                continue;
            }

            let dx = gx.get_pixel(x as u32, y as u32)[0] as f32;
            let dy = gy.get_pixel(x as u32, y as u32)[0] as f32;
            let (ax, ay) = (dx.abs(), dy.abs());
            let (xi, yi) = (x as i64, y as i64);

            // Neighbours along the gradient; the first must be strictly smaller
            // so that plateaus keep exactly one pixel.
            let (before, after) = if ay <= ax * TAN_22_5 {
                (mag_at(xi - 1, yi), mag_at(xi + 1, yi))
            } else if ay >= ax * TAN_67_5 {
                (mag_at(xi, yi - 1), mag_at(xi, yi + 1))
            } else if (dx > 0.0) == (dy > 0.0) {
                (mag_at(xi - 1, yi - 1), mag_at(xi + 1, yi + 1))
            } else {
                (mag_at(xi + 1, yi - 1), mag_at(xi - 1, yi + 1))
            };

            if m > before && m >= after {
                if m > high_threshold {
                    class[y * w + x] = 2;
                    stack.push((x, y));
                } else {
                    class[y * w + x] = 1;
                }
            }
        }
    }

    // Hysteresis: grow strong edges through 8-connected weak candidates
    let mut out = GrayImage::new(width, height);
    for &(x, y) in &stack {
        out.put_pixel(x as u32, y as u32, Luma([EDGE]));
    }
    while let Some((x, y)) = stack.pop() {
        for ny in y.saturating_sub(1)..=(y + 1).min(h - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                let idx = ny * w + nx;
                if class[idx] == 1 {
                    class[idx] = 2;
                    out.put_pixel(nx as u32, ny as u32, Luma([EDGE]));
                    stack.push((nx, ny));
                }
            }
        }
    }

    out
}
