use image::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::morphology::{close, dilate};

/// Thicken edges and bridge gaps so each item yields one closed outline.
///
/// `Norm::LInf` with radius 1 is a 3x3 all-ones structuring element, so
/// radius `k` is the same as `k` successive 3x3 dilations. Pixels outside the
/// image never count as foreground while dilating, and never count as
/// background while eroding.
pub fn close_gaps(edges: &GrayImage, dilate_iterations: u8, close_iterations: u8) -> GrayImage {
    let dilated = if dilate_iterations > 0 {
        dilate(edges, Norm::LInf, dilate_iterations)
    } else {
        edges.clone()
    };

    if close_iterations > 0 {
        close(&dilated, Norm::LInf, close_iterations)
    } else {
        dilated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn count_foreground(img: &GrayImage) -> usize {
        img.pixels().filter(|p| p[0] > 0).count()
    }

    #[test]
    fn single_pixel_grows_to_5x5_block() {
        let mut img = GrayImage::new(11, 11);
        img.put_pixel(5, 5, Luma([255]));
        let closed = close_gaps(&img, 2, 1);
        assert_eq!(count_foreground(&closed), 25);
        assert!(closed.get_pixel(3, 3)[0] > 0);
        assert_eq!(closed.get_pixel(2, 5)[0], 0);
    }

    #[test]
    fn bridges_small_gaps_in_a_line() {
        let mut img = GrayImage::new(30, 9);
        for x in (2..28).filter(|x| x % 5 != 0) {
            img.put_pixel(x, 4, Luma([255]));
        }
        let closed = close_gaps(&img, 2, 1);
        for x in 2..28 {
            assert!(closed.get_pixel(x, 4)[0] > 0, "gap left at x={}", x);
        }
    }

    #[test]
    fn zero_iterations_is_identity() {
        let mut img = GrayImage::new(5, 5);
        img.put_pixel(2, 2, Luma([255]));
        assert_eq!(close_gaps(&img, 0, 0), img);
    }
}
