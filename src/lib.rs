//! Facial landmark overlay compositor.
//!
//! This library draws live visual effects over a mirrored camera feed from
//! the 468/478-point face mesh produced by an external landmark detector:
//! - Geometry tables naming the anatomical connections between landmarks
//! - A dimension reconciler sizing the drawing surface against the native
//!   frame, the page container and the device orientation
//! - An effect renderer for the `mesh`, `contour`, `irises` and `fun` styles
//! - A frame compositor that clears, blits and draws one frame per detector
//!   callback
//!
//! Rendering is expressed as a list of [`draw::DrawCommand`] values so it can
//! be inspected directly or replayed onto any [`draw::Canvas`], such as the
//! raster [`raster::ImageCanvas`].
//!
//! # Examples
//!
//! ## Composing a Frame
//!
//! ```
//! use face_overlay::camera::VideoFrame;
//! use face_overlay::compositor::{compose, FrameContext};
//! use face_overlay::effects::{EffectMode, EffectRenderer, RenderConfig};
//! use face_overlay::landmarks::{DetectionResult, FaceLandmarkSet, LandmarkPoint};
//! use face_overlay::surface::reconcile;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let face = FaceLandmarkSet::new(vec![LandmarkPoint::new(0.5, 0.5, 0.0); 478])?;
//! let detection = DetectionResult::new(vec![face]);
//! let frame = VideoFrame::blank(1280, 720);
//!
//! // Size the surface for a 640px wide container in landscape
//! let surface = reconcile(1280, 720, 640.0, false, false);
//!
//! let config = RenderConfig::default();
//! let ctx = FrameContext {
//!     mode: EffectMode::Contour,
//!     config: &config,
//!     now_ms: 0.0,
//! };
//! let commands = compose(&frame, &detection, surface.as_ref(), &EffectRenderer::default(), &ctx);
//!
//! // Clear, video blit, then one stroke per contour region
//! assert_eq!(commands.len(), 2 + 6);
//! # Ok(())
//! # }
//! ```
//!
//! ## Running a Session
//!
//! ```no_run
//! use face_overlay::camera::{StillImageCamera, VideoFrame};
//! use face_overlay::clock::SystemClock;
//! use face_overlay::config::Config;
//! use face_overlay::detector::RecordedDetector;
//! use face_overlay::raster::ImageCanvas;
//! use face_overlay::session::Session;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let frame = VideoFrame::from_file("frame.png")?;
//! let camera = StillImageCamera::new(frame.clone());
//! let detector = RecordedDetector::from_file("landmarks.json")?;
//!
//! let mut session = Session::new(camera, detector, &Config::default(), Box::new(SystemClock))?;
//! session.start()?;
//!
//! let mut canvas = ImageCanvas::default();
//! session.render_frame(&frame, &mut canvas);
//! canvas.save("overlay.png")?;
//! # Ok(())
//! # }
//! ```

/// Facial landmark data delivered by the detector
pub mod landmarks;

/// Connection tables between landmark indices
pub mod geometry;

/// Surface sizing and presentation transform
pub mod surface;

/// Drawing commands and the canvas abstraction
pub mod draw;

/// Visual effect styles and their renderer
pub mod effects;

/// Per-frame composition of video and effects
pub mod compositor;

/// Raster canvas backed by an image buffer
pub mod raster;

/// Camera collaborator boundary
pub mod camera;

/// Landmark detector collaborator boundary
pub mod detector;

/// Injectable time source
pub mod clock;

/// Session lifecycle and signal handling
pub mod session;

/// Numeric conversion and color utilities
pub mod utils;

/// Error types and result handling
pub mod error;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
