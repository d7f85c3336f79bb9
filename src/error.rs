use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DetectError>;

#[derive(Debug, Error)]
pub enum DetectError {
    /// The image has no pixels to work on
    #[error("invalid input image: {width}x{height} (both dimensions must be positive)")]
    InvalidInput { width: u32, height: u32 },

    /// The vision backend never became ready, or reported a failure while loading.
    /// Distinct from an empty detection result.
    #[error("vision backend unavailable after {waited:?}: {reason}")]
    BackendUnavailable { waited: Duration, reason: String },

    #[error("invalid crop region: {0}")]
    InvalidCrop(String),

    #[error("debug output: {0}")]
    Debug(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl DetectError {
    /// Whether waiting longer for the backend could change the outcome
    pub fn is_retryable(&self) -> bool {
        matches!(self, DetectError::BackendUnavailable { .. })
    }
}
