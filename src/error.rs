//! Error types for the head scroll library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// `OpenCV` operation failed
    #[cfg(feature = "camera")]
    #[error("OpenCV error: {0}")]
    OpenCV(#[from] opencv::Error),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding failed
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// The frame source could not deliver a frame this tick
    #[error("Frame unavailable: {0}")]
    FrameUnavailable(String),

    /// The frame source has no more frames and will never deliver again
    #[error("Frame source closed")]
    SourceClosed,

    /// Pixel buffer does not match the frame dimensions
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// Camera access was refused
    #[error("Camera permission denied")]
    CameraPermissionDenied,

    /// No camera device matched the request
    #[error("No camera found: {0}")]
    CameraNotFound(String),

    /// Opening the camera took longer than allowed
    #[error("Camera did not become ready within {0} ms")]
    CameraTimeout(u64),

    /// Any other camera failure
    #[error("Camera error: {0}")]
    Camera(String),

    /// Scroll injection failed
    #[error("Scroll control error: {0}")]
    ScrollControl(String),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic I/O error with description
    #[error("I/O error: {0}")]
    IoError(String),
}

impl Error {
    /// Whether the error only costs the current tick.
    ///
    /// Everything except a closed source is absorbed by the tracking loop.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        !matches!(self, Self::SourceClosed)
    }
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
