use image::{DynamicImage, GrayImage};
use imageproc::filter::separable_filter_equal;

/// Binomial approximation of a 5x5 Gaussian (sigma ~1.1), applied separably
const GAUSSIAN_5: [f32; 5] = [0.0625, 0.25, 0.375, 0.25, 0.0625];

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Smooth with a fixed 5x5 Gaussian kernel, replicating border pixels.
///
/// The kernel is deliberately not configurable: it is wide enough to suppress
/// paper grain and sensor noise but narrow enough to keep card edges sharp.
pub fn apply_blur(img: &GrayImage) -> GrayImage {
    separable_filter_equal(img, &GAUSSIAN_5)
}
