use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, Rgb};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use tracing::debug;

use crate::error::{DetectError, Result};
use crate::models::BoundingBox;

const BOX_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Where intermediate stage buffers are written
#[derive(Clone, Debug)]
pub struct DebugConfig {
    pub output_dir: PathBuf,
}

impl DebugConfig {
    /// The directory must be empty or non-existent
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();

        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(DetectError::Debug(format!(
                    "debug directory is not empty: {}",
                    output_dir.display()
                )));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        Ok(Self { output_dir })
    }

    pub fn dir(&self) -> &Path {
        &self.output_dir
    }

    /// Save one stage's output as `NN_<name>.png`
    pub fn save_stage(&self, index: usize, name: &str, img: &GrayImage) -> Result<()> {
        let path = self.stage_path(index, name);
        img.save(&path)?;
        debug!(path = %path.display(), "saved stage output");
        Ok(())
    }

    pub fn save_input(&self, img: &DynamicImage) -> Result<()> {
        let path = self.stage_path(0, "input");
        img.to_rgb8().save(&path)?;
        debug!(path = %path.display(), "saved stage output");
        Ok(())
    }

    /// Outline every box on a copy of the input
    pub fn save_boxes(&self, index: usize, img: &DynamicImage, boxes: &[BoundingBox]) -> Result<()> {
        let mut canvas = img.to_rgb8();
        let (width, height) = canvas.dimensions();

        for b in boxes {
            let px = b.to_pixels(width, height);
            let rect = Rect::at(px.x as i32, px.y as i32).of_size(px.width, px.height);
            draw_hollow_rect_mut(&mut canvas, rect, BOX_COLOR);
        }

        let path = self.stage_path(index, "boxes");
        canvas.save(&path)?;
        debug!(path = %path.display(), boxes = boxes.len(), "saved stage output");
        Ok(())
    }

    fn stage_path(&self, index: usize, name: &str) -> PathBuf {
        let file = format!("{:02}_{}.png", index, name.to_lowercase().replace(' ', "_"));
        self.output_dir.join(file)
    }
}
