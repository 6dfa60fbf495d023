use std::path::PathBuf;

use thiserror::Error;

/// Failures the scanner reports explicitly instead of crashing on
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("no rectified document to save yet")]
    NoRectifiedFrame,

    #[error("document corners are degenerate, no perspective transform exists")]
    DegenerateCorners,

    #[error("debug directory is not empty: {}", .0.display())]
    NotEmpty(PathBuf),

    #[error("camera error: {0}")]
    Camera(String),
}
