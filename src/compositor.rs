//! Frame compositor: per detector callback, clear the surface, blit the
//! mirrored video frame and draw the selected effect over every face.

use crate::camera::VideoFrame;
use crate::draw::{Canvas, CommandRecorder, DrawCommand};
use crate::effects::{EffectMode, EffectRenderer, RenderConfig};
use crate::landmarks::DetectionResult;
use crate::surface::{DimensionReconciler, SurfaceState, Viewport};
use log::debug;

/// Per-frame inputs pulled from the session
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub mode: EffectMode,
    pub config: &'a RenderConfig,
    pub now_ms: f64,
}

/// Build the draw commands for one frame
///
/// Pure: the same inputs always yield the same commands. Returns an empty
/// list when `surface` is `None`.
#[must_use]
pub fn compose(
    frame: &VideoFrame,
    detection: &DetectionResult,
    surface: Option<&SurfaceState>,
    renderer: &EffectRenderer,
    ctx: &FrameContext<'_>,
) -> Vec<DrawCommand> {
    let Some(surface) = surface else {
        return Vec::new();
    };

    let mut recorder = CommandRecorder::new();
    recorder.clear(surface.pixel_width, surface.pixel_height);
    recorder.draw_video(frame, surface.transform.mirrored);

    for face in &detection.multi_face_landmarks {
        renderer.render(face, ctx.mode, ctx.config, surface, &mut recorder, ctx.now_ms);
    }

    recorder.into_commands()
}

/// Stateful compositor: owns the surface state and the last detection snapshot
#[derive(Debug, Clone)]
pub struct FrameCompositor {
    renderer: EffectRenderer,
    reconciler: DimensionReconciler,
    last_detection: Option<DetectionResult>,
}

impl FrameCompositor {
    #[must_use]
    pub fn new(renderer: EffectRenderer, viewport: Viewport) -> Self {
        Self {
            renderer,
            reconciler: DimensionReconciler::new(viewport),
            last_detection: None,
        }
    }

    /// Process one detector callback and return the commands for the frame
    ///
    /// Reconciles the surface first if it is unset or sized for another
    /// frame. A zero-sized frame with no known surface produces no commands.
    pub fn on_frame(&mut self, frame: &VideoFrame, detection: DetectionResult, ctx: &FrameContext<'_>) -> Vec<DrawCommand> {
        let surface = self.reconciler.ensure(frame.width(), frame.height());
        if surface.is_none() {
            debug!("Skipping frame: video dimensions not available yet");
        }

        let commands = compose(frame, &detection, surface.as_ref(), &self.renderer, ctx);
        self.last_detection = Some(detection);
        commands
    }

    /// Process a frame and draw it straight onto `canvas`
    pub fn render_frame(
        &mut self,
        frame: &VideoFrame,
        detection: DetectionResult,
        ctx: &FrameContext<'_>,
        canvas: &mut dyn Canvas,
    ) -> usize {
        let commands = self.on_frame(frame, detection, ctx);
        crate::draw::replay(&commands, canvas, frame);
        commands.len()
    }

    /// Latest detection result, read-only
    #[must_use]
    pub fn last_detection(&self) -> Option<&DetectionResult> {
        self.last_detection.as_ref()
    }

    #[must_use]
    pub fn surface(&self) -> Option<&SurfaceState> {
        self.reconciler.state()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.reconciler.viewport()
    }

    /// Apply new layout inputs; takes effect on the next frame
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.reconciler.set_viewport(viewport);
    }

    /// Drop the surface state so the next frame re-derives it
    pub fn invalidate_surface(&mut self) {
        self.reconciler.invalidate();
    }

    #[must_use]
    pub fn renderer(&self) -> &EffectRenderer {
        &self.renderer
    }
}
