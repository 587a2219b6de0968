use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("Invalid quality value: {0}. Must be between 1 and 95")]
    InvalidQuality(u8),

    #[error("Invalid max {0}: must be a positive number of pixels")]
    InvalidDimension(&'static str),

    #[error("Failed to create output directory: {0}")]
    DirectoryCreation(PathBuf),
}

pub type Result<T> = std::result::Result<T, TranscodeError>;
