//! Dimension reconciliation between the native video frame, the page
//! container and the device orientation.
//!
//! The pixel buffer always matches the native frame so normalized landmarks
//! map one-to-one onto pixels. Only the presentation (CSS) size and
//! transform depend on the container, the orientation and the platform's
//! fixed-landscape capture quirk.

use crate::constants::QUIRK_ROTATION_DEGREES;
use crate::draw::Point2;
use crate::landmarks::LandmarkPoint;
use crate::utils::scale_by_ratio;
use log::debug;
use serde::Serialize;

/// Physical device orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    #[default]
    Landscape,
}

impl Orientation {
    /// Portrait when the viewport is taller than it is wide
    #[must_use]
    pub fn from_viewport(width: f32, height: f32) -> Self {
        if height > width {
            Self::Portrait
        } else {
            Self::Landscape
        }
    }

    #[must_use]
    pub fn is_portrait(self) -> bool {
        self == Self::Portrait
    }
}

/// Whether the user agent belongs to the platform family whose camera
/// always reports landscape frames (iPhone, iPad, iPod)
#[must_use]
pub fn has_fixed_landscape_capture(user_agent: &str) -> bool {
    ["iPhone", "iPad", "iPod"].iter().any(|device| user_agent.contains(device))
}

/// Host-provided layout inputs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Available CSS width of the canvas container
    pub container_width: f32,
    pub orientation: Orientation,
    /// Camera always reports landscape frames regardless of device rotation
    pub platform_quirk: bool,
}

impl Viewport {
    #[must_use]
    pub fn new(container_width: f32, orientation: Orientation, platform_quirk: bool) -> Self {
        Self {
            container_width,
            orientation,
            platform_quirk,
        }
    }
}

/// Presentation transform applied to the displayed image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PresentationTransform {
    /// Rotation in degrees; non-zero only when compensating the capture quirk
    pub rotation_degrees: i32,
    /// Horizontal selfie mirror
    pub mirrored: bool,
}

impl PresentationTransform {
    /// CSS `transform` value for the canvas element
    ///
    /// The mirror is realized in the pixel buffer by the video blit, so only
    /// the rotation appears here.
    #[must_use]
    pub fn css(&self) -> String {
        if self.rotation_degrees == 0 {
            "none".to_string()
        } else {
            format!("rotate({}deg)", self.rotation_degrees)
        }
    }
}

/// Derived canvas state for the current source frame and layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SurfaceState {
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub css_width: f32,
    pub css_height: f32,
    pub transform: PresentationTransform,
}

impl SurfaceState {
    /// Map a normalized landmark to surface pixels, honouring the mirror
    ///
    /// Landmarks pass through the same mirror as the video blit, so the
    /// overlay lines up with the mirrored picture instead of landing at
    /// the raw `x * width` position.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn project(&self, point: &LandmarkPoint) -> Point2 {
        let x = if self.transform.mirrored { 1.0 - point.x } else { point.x };
        Point2::new(x * self.pixel_width as f32, point.y * self.pixel_height as f32)
    }

    /// Whether this state was derived for a frame of the given native size
    #[must_use]
    pub fn matches_frame(&self, width: u32, height: u32) -> bool {
        self.pixel_width == width && self.pixel_height == height
    }
}

/// Compute the surface state for a native frame and layout
///
/// Returns `None` when either native dimension is zero: no frame has
/// arrived yet, so there is nothing to size against.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn reconcile(
    native_width: u32,
    native_height: u32,
    container_width: f32,
    is_portrait: bool,
    platform_quirk: bool,
) -> Option<SurfaceState> {
    if native_width == 0 || native_height == 0 {
        return None;
    }

    let container = if container_width.is_finite() && container_width > 0.0 {
        container_width
    } else {
        native_width as f32
    };

    let compensate = platform_quirk && is_portrait && native_width > native_height;

    let (css_width, css_height, rotation_degrees) = if compensate {
        // Landscape buffer shown rotated: the container width becomes the
        // pre-rotation height and the width shrinks by the inverse aspect.
        (scale_by_ratio(container, native_height, native_width)?, container, QUIRK_ROTATION_DEGREES)
    } else {
        (container, scale_by_ratio(container, native_height, native_width)?, 0)
    };

    let state = SurfaceState {
        pixel_width: native_width,
        pixel_height: native_height,
        css_width,
        css_height,
        transform: PresentationTransform {
            rotation_degrees,
            mirrored: true,
        },
    };
    debug!(
        "Reconciled surface: buffer {}x{}, display {:.1}x{:.1}, transform {}",
        state.pixel_width,
        state.pixel_height,
        state.css_width,
        state.css_height,
        state.transform.css()
    );
    Some(state)
}

/// Holds the current surface state and recomputes it when stale
#[derive(Debug, Clone)]
pub struct DimensionReconciler {
    viewport: Viewport,
    state: Option<SurfaceState>,
}

impl DimensionReconciler {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport, state: None }
    }

    #[must_use]
    pub fn state(&self) -> Option<&SurfaceState> {
        self.state.as_ref()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Whether the state is unset or derived for a different frame size
    #[must_use]
    pub fn is_stale(&self, native_width: u32, native_height: u32) -> bool {
        self.state
            .map_or(true, |state| !state.matches_frame(native_width, native_height))
    }

    /// Replace the layout inputs; the next frame recomputes the state
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.viewport != viewport {
            self.viewport = viewport;
            self.state = None;
        }
    }

    /// Forget the current state (e.g. after a camera switch)
    pub fn invalidate(&mut self) {
        self.state = None;
    }

    /// Recompute the state for a native frame size
    ///
    /// Either replaces the state entirely or, for zero dimensions, leaves
    /// it untouched and returns `None`.
    pub fn update(&mut self, native_width: u32, native_height: u32) -> Option<SurfaceState> {
        let state = reconcile(
            native_width,
            native_height,
            self.viewport.container_width,
            self.viewport.orientation.is_portrait(),
            self.viewport.platform_quirk,
        )?;
        self.state = Some(state);
        Some(state)
    }

    /// Current state for the frame size, recomputing only when stale
    pub fn ensure(&mut self, native_width: u32, native_height: u32) -> Option<SurfaceState> {
        if self.is_stale(native_width, native_height) {
            self.update(native_width, native_height)
        } else {
            self.state
        }
    }
}
