pub mod backend;
pub mod debug;
pub mod detection;
pub mod error;
pub mod extract;
pub mod models;

pub use backend::{Backend, BackendLoader, DEFAULT_READY_TIMEOUT};
pub use detection::DetectionPipeline;
pub use detection::ordering::{sort_reading_order, RowCluster};
pub use error::{DetectError, Result};
pub use models::{BoundingBox, CropRect, PixelRect};
