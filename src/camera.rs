//! Camera collaborator boundary.
//!
//! Acquisition, device selection and stream lifecycle live outside the
//! core; the session only asks a [`CameraSource`] to start or stop and reads
//! back the native frame size.

use crate::{Error, Result};
use image::RgbaImage;
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Which physical camera to request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Front (selfie) camera
    #[default]
    User,
    /// Rear camera
    Environment,
}

impl FacingMode {
    /// The other camera
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::User => Self::Environment,
            Self::Environment => Self::User,
        }
    }
}

impl fmt::Display for FacingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Environment => write!(f, "environment"),
        }
    }
}

/// Stream constraints sent to the camera (ideal values, not guarantees)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRequest {
    pub facing_mode: FacingMode,
    pub ideal_width: u32,
    pub ideal_height: u32,
}

/// Native frame dimensions reported once the stream's metadata is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    pub width: u32,
    pub height: u32,
}

/// A raw captured frame in RGBA
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    image: RgbaImage,
}

impl VideoFrame {
    #[must_use]
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Transparent frame of the given size
    #[must_use]
    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(RgbaImage::new(width, height))
    }

    /// Decode a frame from an image file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or decoded.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(image::open(path)?.to_rgba8()))
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Whether the frame has no pixels (metadata not loaded yet)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    #[must_use]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

/// A camera that can be started with constraints and stopped
pub trait CameraSource {
    /// Acquire a stream and report its native frame size
    ///
    /// # Errors
    ///
    /// Returns `Error::CameraAcquisition` when permission is denied or no device matches.
    fn start(&mut self, request: &CaptureRequest) -> Result<StreamInfo>;

    /// Stop every track of the current stream; a no-op when idle
    fn stop(&mut self);

    /// Whether a stream is currently active
    fn is_active(&self) -> bool;
}

/// Camera that serves one still image, for offline compositing
#[derive(Debug, Clone)]
pub struct StillImageCamera {
    frame: VideoFrame,
    active: bool,
}

impl StillImageCamera {
    #[must_use]
    pub fn new(frame: VideoFrame) -> Self {
        Self { frame, active: false }
    }

    #[must_use]
    pub fn frame(&self) -> &VideoFrame {
        &self.frame
    }
}

impl CameraSource for StillImageCamera {
    fn start(&mut self, request: &CaptureRequest) -> Result<StreamInfo> {
        if self.frame.is_empty() {
            return Err(Error::CameraAcquisition("Still image has no pixels".to_string()));
        }
        info!(
            "Serving still image {}x{} (requested {} camera at {}x{})",
            self.frame.width(),
            self.frame.height(),
            request.facing_mode,
            request.ideal_width,
            request.ideal_height
        );
        self.active = true;
        Ok(StreamInfo {
            width: self.frame.width(),
            height: self.frame.height(),
        })
    }

    fn stop(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CaptureRequest {
        CaptureRequest {
            facing_mode: FacingMode::User,
            ideal_width: 1280,
            ideal_height: 720,
        }
    }

    #[test]
    fn test_facing_mode_toggle() {
        assert_eq!(FacingMode::User.toggled(), FacingMode::Environment);
        assert_eq!(FacingMode::Environment.toggled(), FacingMode::User);
        assert_eq!(FacingMode::User.to_string(), "user");
    }

    #[test]
    fn test_still_camera_reports_native_size() {
        let mut camera = StillImageCamera::new(VideoFrame::blank(320, 240));
        let info = camera.start(&request()).unwrap();
        assert_eq!(info, StreamInfo { width: 320, height: 240 });
        assert!(camera.is_active());
        camera.stop();
        assert!(!camera.is_active());
    }

    #[test]
    fn test_still_camera_rejects_empty_image() {
        let mut camera = StillImageCamera::new(VideoFrame::blank(0, 0));
        assert!(matches!(camera.start(&request()), Err(Error::CameraAcquisition(_))));
        assert!(!camera.is_active());
    }
}
