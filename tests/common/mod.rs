mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from sheetcut for tests
pub use sheetcut::{BoundingBox, DetectionPipeline, PixelRect};
