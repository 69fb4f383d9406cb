//! Effect renderer behaviour per mode


use face_overlay::draw::{CommandRecorder, DrawCommand};
use face_overlay::effects::{
    fun_glow_radius, fun_point_hsl, fun_point_size, Density, EffectMode, EffectRenderer, RenderConfig,
};
use face_overlay::geometry::GeometryTables;
use face_overlay::utils::color::Color;
use proptest::prelude::*;
use std::sync::Arc;
use test_helpers::*;

fn render(renderer: &EffectRenderer, mode: EffectMode, config: &RenderConfig, count: usize) -> CommandRecorder {
    let face = random_face(&mut seeded_rng(7), count);
    let mut recorder = CommandRecorder::new();
    renderer.render(&face, mode, config, &landscape_surface(), &mut recorder, 1234.0);
    recorder
}

#[test]
fn test_contour_draws_six_strokes_and_no_fills() {
    let recorder = render(&EffectRenderer::default(), EffectMode::Contour, &RenderConfig::default(), 468);
    assert_eq!(recorder.connector_calls(), 6);
    assert_eq!(recorder.fill_calls(), 0);
}

#[test]
fn test_contour_face_oval_is_thicker() {
    let config = RenderConfig {
        thickness: 2.0,
        ..RenderConfig::default()
    };
    let recorder = render(&EffectRenderer::default(), EffectMode::Contour, &config, 468);
    let widths: Vec<f32> = recorder
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::StrokeConnectors { width, .. } => Some(*width),
            _ => None,
        })
        .collect();
    assert_eq!(widths[0], 3.0);
    assert!(widths[1..].iter().all(|w| *w == 2.0));
}

fn mesh_segment_count(renderer: &EffectRenderer, density: Density) -> usize {
    let config = RenderConfig {
        density,
        ..RenderConfig::default()
    };
    let recorder = render(renderer, EffectMode::Mesh, &config, 468);
    recorder
        .commands()
        .iter()
        .find_map(|c| match c {
            DrawCommand::StrokeConnectors { segments, .. } => Some(segments.len()),
            _ => None,
        })
        .unwrap()
}

#[test]
fn test_mesh_density_is_monotonic() {
    let renderer = EffectRenderer::default();

    let sparse = mesh_segment_count(&renderer, Density::Sparse);
    let medium = mesh_segment_count(&renderer, Density::Medium);
    let dense = mesh_segment_count(&renderer, Density::Dense);
    assert!(sparse <= medium && medium <= dense);
    assert_eq!(dense, 2556);
    assert_eq!(medium, 1278);
    assert_eq!(sparse, 512);
}

#[test]
fn test_mesh_uses_loaded_tessellation() {
    let tables = GeometryTables::with_tessellation(random_tessellation(3, 40)).unwrap();
    let renderer = EffectRenderer::new(Arc::new(tables));
    assert_eq!(mesh_segment_count(&renderer, Density::Dense), 40);
    assert_eq!(mesh_segment_count(&renderer, Density::Medium), 20);
    assert_eq!(mesh_segment_count(&renderer, Density::Sparse), 8);
}

#[test]
fn test_mesh_dots_are_translucent() {
    let config = RenderConfig::default();
    let recorder = render(&EffectRenderer::default(), EffectMode::Mesh, &config, 478);
    assert_eq!(recorder.connector_calls(), 1);
    assert_eq!(recorder.fill_calls(), 478);
    let dot = recorder.commands().iter().find_map(|c| match c {
        DrawCommand::FillCircle { color, radius, .. } => Some((*color, *radius)),
        _ => None,
    });
    assert_eq!(dot, Some((config.color.with_alpha(0x20), 0.8)));
}

#[test]
fn test_irises_without_refined_landmarks_draw_nothing() {
    let recorder = render(&EffectRenderer::default(), EffectMode::Irises, &RenderConfig::default(), 468);
    assert!(recorder.commands().is_empty());
}

#[test]
fn test_irises_draw_order() {
    let recorder = render(&EffectRenderer::default(), EffectMode::Irises, &RenderConfig::default(), 478);
    let kinds: Vec<&str> = recorder
        .commands()
        .iter()
        .map(|c| match c {
            DrawCommand::FillCircle { color, .. } if *color == Color::WHITE => "white",
            DrawCommand::FillCircle { color, .. } if *color == Color::BLACK => "pupil",
            DrawCommand::StrokeCircle { .. } => "outline",
            _ => "other",
        })
        .collect();
    assert_eq!(
        kinds,
        ["white", "outline", "white", "outline", "pupil", "pupil", "white", "white"]
    );
}

#[test]
fn test_iris_radius_scales_with_surface_width() {
    let recorder = render(&EffectRenderer::default(), EffectMode::Irises, &RenderConfig::default(), 478);
    match &recorder.commands()[0] {
        DrawCommand::FillCircle { radius, .. } => assert!((radius - 1280.0 * 0.018).abs() < 1e-3),
        other => panic!("unexpected first command {other:?}"),
    }
}

#[test]
fn test_fun_glows_need_irises() {
    let with = render(&EffectRenderer::default(), EffectMode::Fun, &RenderConfig::default(), 478);
    let without = render(&EffectRenderer::default(), EffectMode::Fun, &RenderConfig::default(), 468);

    let glows = |r: &CommandRecorder| {
        r.commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::RadialGlow { .. }))
            .count()
    };
    assert_eq!(glows(&with), 2);
    assert_eq!(glows(&without), 0);
    assert_eq!(without.connector_calls(), 1);
    assert_eq!(without.fill_calls(), 468);
}

#[test]
fn test_none_mode_draws_nothing() {
    let recorder = render(&EffectRenderer::default(), EffectMode::None, &RenderConfig::default(), 478);
    assert!(recorder.commands().is_empty());
}

#[test]
fn test_rendering_is_deterministic() {
    for mode in EffectMode::ALL {
        let a = render(&EffectRenderer::default(), mode, &RenderConfig::default(), 478);
        let b = render(&EffectRenderer::default(), mode, &RenderConfig::default(), 478);
        assert_eq!(a.commands(), b.commands(), "mode {mode}");
    }
}

proptest! {
    #[test]
    fn prop_fun_color_stays_in_range(index in 0usize..478, t in 0.0f64..1.0e9) {
        let (h, s, l) = fun_point_hsl(index, 478, t);
        prop_assert!((0.0..360.0).contains(&h));
        prop_assert!((40.0..=100.0).contains(&s));
        prop_assert!((40.0..=60.0).contains(&l));
    }

    #[test]
    fn prop_fun_point_size_has_floor(z in -1.0f32..1.0) {
        prop_assert!(fun_point_size(z) >= 1.0);
    }

    #[test]
    fn prop_fun_glow_radius_pulses_within_bounds(t in 0.0f64..1.0e9) {
        let r = fun_glow_radius(t);
        prop_assert!((15.0..=25.0).contains(&r));
    }
}
