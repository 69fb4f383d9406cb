//! Session context: owns the collaborators and every piece of mutable
//! state the overlay needs between frames.
//!
//! A session starts idle. `start` initializes the detector once, acquires
//! the camera and subscribes to layout signals; `switch_camera` and `stop`
//! unsubscribe before the stream is torn down. Frames are pushed in by the
//! host and rendered synchronously.

use crate::camera::{CameraSource, CaptureRequest, FacingMode, StreamInfo, VideoFrame};
use crate::clock::Clock;
use crate::compositor::{FrameCompositor, FrameContext};
use crate::config::{CaptureConfig, Config};
use crate::detector::{DetectorOptions, LandmarkDetector};
use crate::draw::{Canvas, DrawCommand};
use crate::effects::{EffectMode, EffectRenderer, RenderConfig};
use crate::landmarks::DetectionResult;
use crate::surface::{Orientation, SurfaceState, Viewport};
use crate::{Error, Result};
use log::{debug, info, warn};
use std::sync::Arc;

/// Status shown before anything has started
pub const STATUS_IDLE: &str = "Camera off";

/// Orientation change waiting for the viewport to settle
#[derive(Debug, Clone, Copy)]
struct PendingOrientation {
    viewport: Viewport,
    due_ms: f64,
}

/// One overlay session
pub struct Session<C: CameraSource, D: LandmarkDetector> {
    camera: C,
    detector: D,
    clock: Box<dyn Clock>,
    capture: CaptureConfig,
    detector_options: DetectorOptions,
    settle_ms: f64,
    facing_mode: FacingMode,
    effect: EffectMode,
    render_config: RenderConfig,
    compositor: FrameCompositor,
    stream: Option<StreamInfo>,
    detector_ready: bool,
    subscribed: bool,
    pending_orientation: Option<PendingOrientation>,
    status: String,
}

impl<C: CameraSource, D: LandmarkDetector> std::fmt::Debug for Session<C, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("facing_mode", &self.facing_mode)
            .field("effect", &self.effect)
            .field("stream", &self.stream)
            .field("detector_ready", &self.detector_ready)
            .field("subscribed", &self.subscribed)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl<C: CameraSource, D: LandmarkDetector> Session<C, D> {
    /// Create an idle session from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the geometry
    /// asset cannot be loaded.
    pub fn new(camera: C, detector: D, config: &Config, clock: Box<dyn Clock>) -> Result<Self> {
        config.validate()?;
        let tables = config.load_geometry()?;
        info!(
            "Creating session with {} tessellation connections",
            tables.tessellation().len()
        );

        let viewport = Viewport::new(
            config.display.container_width,
            Orientation::Landscape,
            config.display.platform_quirk,
        );
        let renderer = EffectRenderer::new(Arc::new(tables));

        #[allow(clippy::cast_precision_loss)]
        let settle_ms = config.display.orientation_settle_ms as f64;

        Ok(Self {
            camera,
            detector,
            clock,
            capture: config.capture.clone(),
            detector_options: config.detector,
            settle_ms,
            facing_mode: config.capture.facing_mode,
            effect: config.render.effect,
            render_config: config.render.style(),
            compositor: FrameCompositor::new(renderer, viewport),
            stream: None,
            detector_ready: false,
            subscribed: false,
            pending_orientation: None,
            status: STATUS_IDLE.to_string(),
        })
    }

    /// Load the detector model; later calls are no-ops once it succeeded
    ///
    /// # Errors
    ///
    /// Returns `Error::DetectorInit` and updates the status if loading fails.
    pub fn initialize_detector(&mut self) -> Result<()> {
        if self.detector_ready {
            return Ok(());
        }

        info!("Initializing landmark detector");
        match self.detector.initialize(&self.detector_options) {
            Ok(()) => {
                self.detector_ready = true;
                self.status = "Face detector ready".to_string();
                Ok(())
            }
            Err(e) => {
                let message = match e {
                    Error::DetectorInit(message) => message,
                    other => other.to_string(),
                };
                self.status = format!("Face detector failed to load: {message}");
                warn!("{}", self.status);
                Err(Error::DetectorInit(message))
            }
        }
    }

    /// Initialize the detector if needed and acquire the camera
    ///
    /// # Errors
    ///
    /// Returns `Error::DetectorInit` or `Error::CameraAcquisition`; the
    /// session stays idle and nothing is retried.
    pub fn start(&mut self) -> Result<StreamInfo> {
        if let Some(stream) = self.stream {
            debug!("Start requested while already running");
            return Ok(stream);
        }

        self.initialize_detector()?;
        self.acquire()
    }

    /// Stop the current stream and reacquire with the other facing mode
    ///
    /// Layout signals are ignored from before the old stream is stopped
    /// until the new one is confirmed active.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` without touching the camera when no
    /// stream is running, or `Error::CameraAcquisition` if the new stream
    /// cannot be acquired; the session is then idle.
    pub fn switch_camera(&mut self) -> Result<StreamInfo> {
        if self.stream.is_none() {
            debug!("Switch requested while stopped");
            return Err(Error::InvalidInput("No camera is running".to_string()));
        }

        self.unsubscribe();
        self.camera.stop();
        self.stream = None;

        self.facing_mode = self.facing_mode.toggled();
        info!("Switching to {} camera", self.facing_mode);
        self.compositor.invalidate_surface();

        self.initialize_detector()?;
        self.acquire()
    }

    /// Stop the stream and ignore layout signals until the next start
    pub fn stop(&mut self) {
        self.unsubscribe();
        if self.stream.take().is_some() {
            info!("Stopping camera");
        }
        self.camera.stop();
        self.status = STATUS_IDLE.to_string();
    }

    fn acquire(&mut self) -> Result<StreamInfo> {
        let request = CaptureRequest {
            facing_mode: self.facing_mode,
            ideal_width: self.capture.ideal_width,
            ideal_height: self.capture.ideal_height,
        };

        match self.camera.start(&request) {
            Ok(stream) => {
                info!(
                    "Camera started: {} facing, {}x{}",
                    self.facing_mode, stream.width, stream.height
                );
                self.stream = Some(stream);
                self.subscribed = true;
                self.status = format!("Camera on ({})", self.facing_mode);
                Ok(stream)
            }
            Err(e) => {
                let message = match e {
                    Error::CameraAcquisition(message) => message,
                    other => other.to_string(),
                };
                self.status = format!("Could not access camera: {message}");
                warn!("{}", self.status);
                Err(Error::CameraAcquisition(message))
            }
        }
    }

    fn unsubscribe(&mut self) {
        self.subscribed = false;
        self.pending_orientation = None;
    }

    /// Host resize signal; applied to the next frame
    pub fn notify_resize(&mut self, viewport: Viewport) {
        if !self.subscribed {
            debug!("Ignoring resize while unsubscribed");
            return;
        }
        self.compositor.set_viewport(viewport);
    }

    /// Host orientation-change signal; applied once the settle delay passes
    pub fn notify_orientation_change(&mut self, viewport: Viewport) {
        if !self.subscribed {
            debug!("Ignoring orientation change while unsubscribed");
            return;
        }
        self.pending_orientation = Some(PendingOrientation {
            viewport,
            due_ms: self.clock.now_ms() + self.settle_ms,
        });
    }

    /// Apply a settled orientation change; returns whether one was applied
    pub fn poll(&mut self) -> bool {
        match self.pending_orientation {
            Some(pending) if self.clock.now_ms() >= pending.due_ms => {
                self.pending_orientation = None;
                debug!("Orientation settled: {:?}", pending.viewport.orientation);
                self.compositor.set_viewport(pending.viewport);
                true
            }
            _ => false,
        }
    }

    /// Run detection on a frame and build its draw commands
    ///
    /// Returns no commands while stopped, when detection fails for this
    /// frame, or while the frame has no dimensions.
    pub fn process_frame(&mut self, frame: &VideoFrame) -> Vec<DrawCommand> {
        if self.stream.is_none() || !self.detector_ready {
            return Vec::new();
        }
        self.poll();

        let detection = match self.detector.send(frame) {
            Ok(detection) => detection,
            Err(e) => {
                warn!("Dropping frame: {}", e);
                return Vec::new();
            }
        };

        let ctx = FrameContext {
            mode: self.effect,
            config: &self.render_config,
            now_ms: self.clock.now_ms(),
        };
        self.compositor.on_frame(frame, detection, &ctx)
    }

    /// Process a frame and draw it onto `canvas`; returns the command count
    pub fn render_frame(&mut self, frame: &VideoFrame, canvas: &mut dyn Canvas) -> usize {
        let commands = self.process_frame(frame);
        crate::draw::replay(&commands, canvas, frame);
        commands.len()
    }

    #[must_use]
    pub fn effect(&self) -> EffectMode {
        self.effect
    }

    /// Select the effect; takes effect on the next frame
    pub fn set_effect(&mut self, effect: EffectMode) {
        if self.effect != effect {
            info!("Effect changed to {}", effect);
            self.effect = effect;
        }
        self.status = format!("Effect '{effect}' applied");
    }

    #[must_use]
    pub fn render_config(&self) -> &RenderConfig {
        &self.render_config
    }

    /// Replace the style values read on every frame
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the thickness is not positive.
    pub fn set_render_config(&mut self, config: RenderConfig) -> Result<()> {
        config.validate()?;
        self.render_config = config;
        Ok(())
    }

    /// Last detection result, read-only
    #[must_use]
    pub fn detected_faces(&self) -> Option<&DetectionResult> {
        self.compositor.last_detection()
    }

    #[must_use]
    pub fn surface(&self) -> Option<&SurfaceState> {
        self.compositor.surface()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.compositor.viewport()
    }

    /// User-facing status line
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.stream.is_some()
    }

    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    #[must_use]
    pub fn is_detector_ready(&self) -> bool {
        self.detector_ready
    }

    #[must_use]
    pub fn facing_mode(&self) -> FacingMode {
        self.facing_mode
    }

    #[must_use]
    pub fn camera(&self) -> &C {
        &self.camera
    }

    #[must_use]
    pub fn detector(&self) -> &D {
        &self.detector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::StillImageCamera;
    use crate::clock::FixedClock;
    use crate::detector::RecordedDetector;
    use std::rc::Rc;

    fn session(clock: Rc<FixedClock>) -> Session<StillImageCamera, RecordedDetector> {
        Session::new(
            StillImageCamera::new(VideoFrame::blank(1280, 720)),
            RecordedDetector::default(),
            &Config::default(),
            Box::new(clock),
        )
        .unwrap()
    }

    #[test]
    fn test_starts_idle() {
        let session = session(Rc::new(FixedClock::new(0.0)));
        assert!(!session.is_running());
        assert!(!session.is_subscribed());
        assert_eq!(session.status(), STATUS_IDLE);
        assert!(session.detected_faces().is_none());
    }

    #[test]
    fn test_frames_ignored_until_started() {
        let mut session = session(Rc::new(FixedClock::new(0.0)));
        assert!(session.process_frame(&VideoFrame::blank(1280, 720)).is_empty());

        session.start().unwrap();
        assert!(!session.process_frame(&VideoFrame::blank(1280, 720)).is_empty());
        assert_eq!(session.detected_faces().map(DetectionResult::face_count), Some(0));
    }

    #[test]
    fn test_status_follows_detector_and_effect() {
        let mut session = session(Rc::new(FixedClock::new(0.0)));
        session.initialize_detector().unwrap();
        assert_eq!(session.status(), "Face detector ready");

        session.set_effect(EffectMode::Fun);
        assert_eq!(session.status(), "Effect 'fun' applied");
        assert_eq!(session.effect(), EffectMode::Fun);
    }

    #[test]
    fn test_orientation_change_waits_for_settle_delay() {
        let clock = Rc::new(FixedClock::new(1000.0));
        let mut session = session(Rc::clone(&clock));
        session.start().unwrap();

        let portrait = Viewport::new(400.0, Orientation::Portrait, true);
        session.notify_orientation_change(portrait);
        assert!(!session.poll());
        clock.advance(299.0);
        assert!(!session.poll());
        clock.advance(1.0);
        assert!(session.poll());
        assert_eq!(session.viewport(), portrait);
        assert!(!session.poll());
    }

    #[test]
    fn test_stop_drops_pending_orientation() {
        let clock = Rc::new(FixedClock::new(0.0));
        let mut session = session(Rc::clone(&clock));
        session.start().unwrap();
        let before = session.viewport();

        session.notify_orientation_change(Viewport::new(400.0, Orientation::Portrait, true));
        session.stop();
        clock.advance(1000.0);
        assert!(!session.poll());
        assert_eq!(session.viewport(), before);
    }
}
