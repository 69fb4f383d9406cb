//! Error types for the face overlay library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or encoding failed
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Geometry table could not be parsed or references invalid landmarks
    #[error("Geometry error: {0}")]
    GeometryError(String),

    /// Camera could not be acquired (permission or hardware)
    #[error("Camera acquisition error: {0}")]
    CameraAcquisition(String),

    /// Landmark detector failed to initialize
    #[error("Detector initialization error: {0}")]
    DetectorInit(String),

    /// Landmark detector failed on a single frame
    #[error("Detection error: {0}")]
    Detection(String),

    /// JSON or YAML (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic I/O error with description
    #[error("I/O error: {0}")]
    IoError(String),
}

/// Application-specific error type (alias for main Error type)
pub type AppError = Error;

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
