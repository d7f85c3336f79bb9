pub mod preprocessing;
pub mod edges;
pub mod morphology;
pub mod contours;
pub mod filter;
pub mod ordering;

use std::path::PathBuf;
use std::time::Duration;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::debug::DebugConfig;
use crate::error::{DetectError, Result};
use crate::models::BoundingBox;
use contours::Region;

/// Finds rectangular items on a scanned sheet and returns them in reading order.
///
/// The pipeline keeps no state between calls; every intermediate buffer lives
/// only for the duration of [`DetectionPipeline::detect`]. One instance can be
/// shared across threads to process different images concurrently.
#[derive(Debug, Clone)]
pub struct DetectionPipeline {
    /// Hysteresis thresholds on the L1 Sobel magnitude, 8-bit intensity scale.
    /// Kept low so items close in colour to the paper still get an outline.
    pub low_threshold: f32,
    pub high_threshold: f32,
    /// 3x3 dilations applied to the edge map before closing
    pub dilate_iterations: u8,
    pub close_iterations: u8,
    /// Exclusive area band, as fractions of the image area
    pub min_area_ratio: f64,
    pub max_area_ratio: f64,
    /// Row tolerance as a fraction of the mean box height
    pub row_threshold_factor: f32,
    debug: Option<DebugConfig>,
}

impl DetectionPipeline {
    pub fn new() -> Self {
        Self {
            low_threshold: 10.0,
            high_threshold: 100.0,
            dilate_iterations: 2,
            close_iterations: 1,
            min_area_ratio: 0.001,
            max_area_ratio: 0.98,
            row_threshold_factor: ordering::DEFAULT_ROW_THRESHOLD_FACTOR,
            debug: None,
        }
    }

    /// Write every intermediate buffer to `output_dir`, which must be empty or missing
    pub fn with_debug(mut self, output_dir: impl Into<PathBuf>) -> Result<Self> {
        self.debug = Some(DebugConfig::new(output_dir)?);
        Ok(self)
    }

    /// Run the full pipeline on an already cropped image.
    ///
    /// An empty result is not an error: it means no item survived filtering.
    pub fn detect(&self, img: &DynamicImage) -> Result<Vec<BoundingBox>> {
        let (width, height) = check_dimensions(img)?;

        let regions = self.find_regions(img)?;
        let kept = filter::filter_by_area(
            &regions,
            width,
            height,
            self.min_area_ratio,
            self.max_area_ratio,
        );
        debug!(
            kept = kept.len(),
            rejected = regions.len() - kept.len(),
            "filtered regions by area"
        );

        let boxes = filter::normalize_regions(&kept, width, height);
        let ordered = ordering::sort_reading_order_with(&boxes, self.row_threshold_factor);

        if let Some(debug_config) = &self.debug {
            debug_config.save_boxes(5, img, &ordered)?;
        }

        if ordered.is_empty() {
            warn!(width, height, "no items found on sheet");
        } else {
            info!(items = ordered.len(), "detected items");
        }

        Ok(ordered)
    }

    /// Check backend readiness once, waiting at most `timeout`, then detect
    pub fn detect_with_backend(
        &self,
        img: &DynamicImage,
        backend: &Backend,
        timeout: Duration,
    ) -> Result<Vec<BoundingBox>> {
        backend.wait_ready(timeout)?;
        self.detect(img)
    }

    /// Every outermost region before the area filter, in discovery order
    pub fn find_regions(&self, img: &DynamicImage) -> Result<Vec<Region>> {
        check_dimensions(img)?;

        debug!("converting to grayscale");
        let gray = preprocessing::to_grayscale(img);

        debug!("applying 5x5 gaussian blur");
        let blurred = preprocessing::apply_blur(&gray);

        debug!(
            low = self.low_threshold,
            high = self.high_threshold,
            "detecting edges"
        );
        let edges = edges::detect_edges(&blurred, self.low_threshold, self.high_threshold);

        debug!(
            dilate = self.dilate_iterations,
            close = self.close_iterations,
            "closing gaps in edge map"
        );
        let mask = morphology::close_gaps(&edges, self.dilate_iterations, self.close_iterations);

        if let Some(debug_config) = &self.debug {
            debug_config.save_input(img)?;
            debug_config.save_stage(1, "grayscale", &gray)?;
            debug_config.save_stage(2, "blurred", &blurred)?;
            debug_config.save_stage(3, "edges", &edges)?;
            debug_config.save_stage(4, "closed", &mask)?;
        }

        let regions = contours::find_outer_regions(&mask);
        debug!(regions = regions.len(), "found outer contours");

        Ok(regions)
    }
}

impl Default for DetectionPipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn check_dimensions(img: &DynamicImage) -> Result<(u32, u32)> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(DetectError::InvalidInput { width, height });
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn rejects_zero_sized_images() {
        let pipeline = DetectionPipeline::new();
        let empty = DynamicImage::ImageLuma8(GrayImage::new(0, 10));
        assert!(matches!(
            pipeline.detect(&empty),
            Err(DetectError::InvalidInput { width: 0, height: 10 })
        ));
    }

    #[test]
    fn blank_sheet_is_an_empty_result() {
        let pipeline = DetectionPipeline::new();
        let blank = DynamicImage::ImageLuma8(GrayImage::from_pixel(64, 48, Luma([230])));
        assert_eq!(pipeline.detect(&blank).unwrap(), vec![]);
    }

    #[test]
    fn unavailable_backend_is_not_an_empty_result() {
        let pipeline = DetectionPipeline::new();
        let blank = DynamicImage::ImageLuma8(GrayImage::from_pixel(16, 16, Luma([0])));
        let (backend, _loader) = Backend::pending();

        let err = pipeline
            .detect_with_backend(&blank, &backend, Duration::from_millis(10))
            .unwrap_err();
        assert!(matches!(err, DetectError::BackendUnavailable { .. }));
    }
}
