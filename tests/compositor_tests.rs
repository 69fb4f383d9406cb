//! Frame compositor integration tests


use face_overlay::camera::VideoFrame;
use face_overlay::compositor::{compose, FrameCompositor, FrameContext};
use face_overlay::draw::{replay, CommandRecorder, DrawCommand};
use face_overlay::effects::{EffectMode, EffectRenderer, RenderConfig};
use face_overlay::landmarks::DetectionResult;
use face_overlay::raster::ImageCanvas;
use face_overlay::surface::{Orientation, Viewport};
use test_helpers::*;

fn ctx(mode: EffectMode, config: &RenderConfig) -> FrameContext<'_> {
    FrameContext {
        mode,
        config,
        now_ms: 5000.0,
    }
}

#[test]
fn test_compose_is_idempotent() {
    let frame = VideoFrame::blank(1280, 720);
    let detection = random_detection(11, 1, 478);
    let surface = landscape_surface();
    let renderer = EffectRenderer::default();
    let config = RenderConfig::default();

    for mode in EffectMode::ALL {
        let first = compose(&frame, &detection, Some(&surface), &renderer, &ctx(mode, &config));
        let second = compose(&frame, &detection, Some(&surface), &renderer, &ctx(mode, &config));
        assert_eq!(first, second, "mode {mode}");
    }
}

#[test]
fn test_no_faces_still_presents_video() {
    let frame = VideoFrame::blank(1280, 720);
    let config = RenderConfig::default();
    let commands = compose(
        &frame,
        &DetectionResult::empty(),
        Some(&landscape_surface()),
        &EffectRenderer::default(),
        &ctx(EffectMode::Mesh, &config),
    );
    assert_eq!(commands.len(), 2);
    assert!(matches!(commands[0], DrawCommand::Clear { width: 1280, height: 720 }));
    assert!(matches!(commands[1], DrawCommand::DrawVideo { mirrored: true, .. }));
}

#[test]
fn test_unknown_surface_draws_nothing() {
    let frame = VideoFrame::blank(1280, 720);
    let config = RenderConfig::default();
    let commands = compose(
        &frame,
        &random_detection(1, 1, 468),
        None,
        &EffectRenderer::default(),
        &ctx(EffectMode::Contour, &config),
    );
    assert!(commands.is_empty());
}

#[test]
fn test_every_face_shares_the_effect() {
    let mut compositor = FrameCompositor::new(
        EffectRenderer::default(),
        Viewport::new(640.0, Orientation::Landscape, false),
    );
    let config = RenderConfig::default();
    let commands = compositor.on_frame(
        &VideoFrame::blank(1280, 720),
        random_detection(2, 3, 478),
        &ctx(EffectMode::Irises, &config),
    );
    // Two irises per face: 6 fills + 2 outlines
    assert_eq!(commands.len(), 2 + 3 * 8);
}

#[test]
fn test_snapshot_tracks_latest_result_only() {
    let mut compositor = FrameCompositor::new(
        EffectRenderer::default(),
        Viewport::new(640.0, Orientation::Landscape, false),
    );
    let config = RenderConfig::default();
    let frame = VideoFrame::blank(320, 180);

    compositor.on_frame(&frame, random_detection(1, 2, 468), &ctx(EffectMode::None, &config));
    compositor.on_frame(&frame, DetectionResult::empty(), &ctx(EffectMode::None, &config));
    assert_eq!(compositor.last_detection(), Some(&DetectionResult::empty()));
}

#[test]
fn test_surface_resizes_with_source_frames() {
    let mut compositor = FrameCompositor::new(
        EffectRenderer::default(),
        Viewport::new(640.0, Orientation::Landscape, false),
    );
    let config = RenderConfig::default();
    compositor.on_frame(&VideoFrame::blank(1280, 720), DetectionResult::empty(), &ctx(EffectMode::Mesh, &config));
    assert_eq!(compositor.surface().map(|s| s.css_height), Some(360.0));

    compositor.on_frame(&VideoFrame::blank(640, 480), DetectionResult::empty(), &ctx(EffectMode::Mesh, &config));
    assert_eq!(compositor.surface().map(|s| s.pixel_width), Some(640));
    assert_eq!(compositor.surface().map(|s| s.css_height), Some(480.0));
}

#[test]
fn test_replay_matches_direct_rendering() {
    let frame = VideoFrame::blank(320, 180);
    let config = RenderConfig::default();
    let mut compositor = FrameCompositor::new(
        EffectRenderer::default(),
        Viewport::new(320.0, Orientation::Landscape, false),
    );
    let commands = compositor.on_frame(&frame, random_detection(4, 1, 478), &ctx(EffectMode::Fun, &config));

    let mut recorder = CommandRecorder::new();
    replay(&commands, &mut recorder, &frame);
    assert_eq!(recorder.commands(), commands.as_slice());
}

#[test]
fn test_rasterized_frame_has_overlay_pixels() {
    let frame = VideoFrame::blank(320, 180);
    let config = RenderConfig {
        thickness: 3.0,
        ..RenderConfig::default()
    };
    let mut compositor = FrameCompositor::new(
        EffectRenderer::default(),
        Viewport::new(320.0, Orientation::Landscape, false),
    );
    let mut canvas = ImageCanvas::default();
    let drawn = compositor.render_frame(
        &frame,
        random_detection(5, 1, 478),
        &ctx(EffectMode::Contour, &config),
        &mut canvas,
    );

    assert_eq!(drawn, 8);
    assert_eq!((canvas.width(), canvas.height()), (320, 180));
    let green = canvas
        .image()
        .pixels()
        .filter(|p| p.0[1] == 255 && p.0[0] == 0)
        .count();
    assert!(green > 0);
}
