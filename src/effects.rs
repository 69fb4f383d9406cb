//! Effect rendering: turns one face's landmarks into draw calls for the
//! selected visual style.

use crate::constants::{
    DENSE_STRIDE, FACE_OVAL_WIDTH_RATIO, FUN_GLOW_ALPHA, FUN_GLOW_BASE_RADIUS, FUN_GLOW_PERIOD_MS, FUN_GLOW_PULSE,
    FUN_HUE_PERIOD_MS, FUN_LIGHTNESS_AMPLITUDE, FUN_LIGHTNESS_BASE, FUN_LIGHTNESS_PERIOD_MS, FUN_OUTLINE_ALPHA,
    FUN_OUTLINE_WIDTH, FUN_POINT_BASE_SIZE, FUN_POINT_DEPTH_SCALE, FUN_POINT_MIN_SIZE, FUN_SATURATION_AMPLITUDE,
    FUN_SATURATION_BASE, FUN_SATURATION_PERIOD_MS, HIGHLIGHT_OFFSET_RATIO, HIGHLIGHT_RADIUS_RATIO,
    IRIS_OUTLINE_WIDTH_RATIO, IRIS_RADIUS_RATIO, MEDIUM_STRIDE, MESH_DOT_ALPHA, MESH_DOT_RADIUS_RATIO,
    PUPIL_RADIUS_RATIO, SPARSE_STRIDE,
};
use crate::draw::{Canvas, Segment};
use crate::geometry::{Connection, ContourRegion, GeometryTables, FACE_OVAL};
use crate::landmarks::FaceLandmarkSet;
use crate::surface::SurfaceState;
use crate::utils::color::Color;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Visual style drawn over each face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectMode {
    /// Subsampled tessellation plus landmark dots
    #[default]
    Mesh,
    /// Face outline, eyebrows, eyes and lips
    Contour,
    /// Cartoon eyes on the iris centers
    Irises,
    /// Animated iridescent point cloud with glowing eyes
    Fun,
    /// Video only
    None,
}

impl EffectMode {
    pub const ALL: [Self; 5] = [Self::Mesh, Self::Contour, Self::Irises, Self::Fun, Self::None];
}

impl FromStr for EffectMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mesh" => Ok(Self::Mesh),
            "contour" => Ok(Self::Contour),
            "irises" | "iris" => Ok(Self::Irises),
            "fun" => Ok(Self::Fun),
            "none" => Ok(Self::None),
            _ => Err(Error::InvalidInput(format!("Unknown effect: {s}"))),
        }
    }
}

impl fmt::Display for EffectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mesh => "mesh",
            Self::Contour => "contour",
            Self::Irises => "irises",
            Self::Fun => "fun",
            Self::None => "none",
        };
        f.write_str(name)
    }
}

/// Mesh density control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    Sparse,
    #[default]
    Medium,
    Dense,
}

impl Density {
    /// Keep every n-th tessellation connection
    #[must_use]
    pub fn stride(self) -> usize {
        match self {
            Self::Sparse => SPARSE_STRIDE,
            Self::Medium => MEDIUM_STRIDE,
            Self::Dense => DENSE_STRIDE,
        }
    }
}

impl FromStr for Density {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sparse" => Ok(Self::Sparse),
            "medium" => Ok(Self::Medium),
            "dense" => Ok(Self::Dense),
            _ => Err(Error::InvalidInput(format!("Unknown density: {s}"))),
        }
    }
}

/// Style values pulled from the UI each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub density: Density,
    pub color: Color,
    /// Stroke thickness in surface pixels
    pub thickness: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            density: Density::Medium,
            color: Color::rgb(0, 255, 0),
            thickness: 1.0,
        }
    }
}

impl RenderConfig {
    /// Validate style values
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the thickness is not a positive finite number.
    pub fn validate(&self) -> Result<()> {
        if !(self.thickness.is_finite() && self.thickness > 0.0) {
            return Err(Error::ConfigError(format!(
                "Thickness must be a positive number, got {}",
                self.thickness
            )));
        }
        Ok(())
    }
}

/// Draws one effect for one face
#[derive(Debug, Clone)]
pub struct EffectRenderer {
    tables: Arc<GeometryTables>,
}

impl Default for EffectRenderer {
    fn default() -> Self {
        Self::new(Arc::new(GeometryTables::builtin()))
    }
}

impl EffectRenderer {
    #[must_use]
    pub fn new(tables: Arc<GeometryTables>) -> Self {
        Self { tables }
    }

    #[must_use]
    pub fn tables(&self) -> &GeometryTables {
        &self.tables
    }

    /// Draw `mode` for one face onto `canvas`
    ///
    /// `now_ms` only affects [`EffectMode::Fun`]. Missing optional landmarks
    /// (irises) silently drop the features that need them.
    pub fn render(
        &self,
        face: &FaceLandmarkSet,
        mode: EffectMode,
        config: &RenderConfig,
        surface: &SurfaceState,
        canvas: &mut dyn Canvas,
        now_ms: f64,
    ) {
        match mode {
            EffectMode::Mesh => self.draw_mesh(face, config, surface, canvas),
            EffectMode::Contour => draw_contour(face, config, surface, canvas),
            EffectMode::Irises => draw_irises(face, config, surface, canvas),
            EffectMode::Fun => draw_fun(face, surface, canvas, now_ms),
            EffectMode::None => {}
        }
    }

    fn draw_mesh(&self, face: &FaceLandmarkSet, config: &RenderConfig, surface: &SurfaceState, canvas: &mut dyn Canvas) {
        let connections = self.tables.mesh_subset(config.density);
        canvas.stroke_connectors(&segments(face, &connections, surface), config.color, config.thickness);

        let dot_color = config.color.with_alpha(MESH_DOT_ALPHA);
        let radius = config.thickness * MESH_DOT_RADIUS_RATIO;
        for point in face {
            canvas.fill_circle(surface.project(point), radius, dot_color);
        }
    }
}

/// Project connections to pixel segments, skipping indices the face lacks
fn segments(face: &FaceLandmarkSet, connections: &[Connection], surface: &SurfaceState) -> Vec<Segment> {
    connections
        .iter()
        .filter_map(|&(a, b)| {
            let from = surface.project(face.get(a)?);
            let to = surface.project(face.get(b)?);
            Some(Segment { from, to })
        })
        .collect()
}

fn draw_contour(face: &FaceLandmarkSet, config: &RenderConfig, surface: &SurfaceState, canvas: &mut dyn Canvas) {
    for region in ContourRegion::ALL {
        let width = if region == ContourRegion::FaceOval {
            config.thickness * FACE_OVAL_WIDTH_RATIO
        } else {
            config.thickness
        };
        canvas.stroke_connectors(&segments(face, region.connections(), surface), config.color, width);
    }
}

#[allow(clippy::cast_precision_loss)]
fn draw_irises(face: &FaceLandmarkSet, config: &RenderConfig, surface: &SurfaceState, canvas: &mut dyn Canvas) {
    let Some((left, right)) = face.iris_centers() else {
        return;
    };

    let radius = surface.pixel_width as f32 * IRIS_RADIUS_RATIO;
    let centers = [surface.project(&left), surface.project(&right)];

    for center in centers {
        canvas.fill_circle(center, radius, Color::WHITE);
        canvas.stroke_circle(center, radius, config.color, config.thickness * IRIS_OUTLINE_WIDTH_RATIO);
    }
    for center in centers {
        canvas.fill_circle(center, radius * PUPIL_RADIUS_RATIO, Color::BLACK);
    }
    for center in centers {
        let offset = -radius * HIGHLIGHT_OFFSET_RATIO;
        canvas.fill_circle(center.offset(offset, offset), radius * HIGHLIGHT_RADIUS_RATIO, Color::WHITE);
    }
}

/// Hue, saturation and lightness of landmark `index` out of `total` at `now_ms`
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn fun_point_hsl(index: usize, total: usize, now_ms: f64) -> (f64, f64, f64) {
    let fraction = if total == 0 { 0.0 } else { index as f64 / total as f64 };
    let hue = (fraction * 360.0 + now_ms / FUN_HUE_PERIOD_MS).rem_euclid(360.0);
    let saturation = FUN_SATURATION_BASE + (now_ms / FUN_SATURATION_PERIOD_MS).sin() * FUN_SATURATION_AMPLITUDE;
    let lightness = FUN_LIGHTNESS_BASE + (now_ms / FUN_LIGHTNESS_PERIOD_MS).sin() * FUN_LIGHTNESS_AMPLITUDE;
    (hue, saturation, lightness)
}

/// Dot radius for a landmark depth; closer points (smaller z) are larger
#[must_use]
pub fn fun_point_size(z: f32) -> f32 {
    let size = FUN_POINT_BASE_SIZE - z * FUN_POINT_DEPTH_SCALE;
    if size.is_finite() {
        size.max(FUN_POINT_MIN_SIZE)
    } else {
        FUN_POINT_MIN_SIZE
    }
}

/// Pulsing glow radius at `now_ms`
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn fun_glow_radius(now_ms: f64) -> f32 {
    (FUN_GLOW_BASE_RADIUS + (now_ms / FUN_GLOW_PERIOD_MS).sin() * FUN_GLOW_PULSE) as f32
}

fn draw_fun(face: &FaceLandmarkSet, surface: &SurfaceState, canvas: &mut dyn Canvas, now_ms: f64) {
    let outline = Color::WHITE.with_opacity(FUN_OUTLINE_ALPHA);
    canvas.stroke_connectors(&segments(face, FACE_OVAL, surface), outline, FUN_OUTLINE_WIDTH);

    let total = face.len();
    for (i, point) in face.iter().enumerate() {
        let (h, s, l) = fun_point_hsl(i, total, now_ms);
        canvas.fill_circle(surface.project(point), fun_point_size(point.z), Color::from_hsl(h, s, l));
    }

    if let Some((left, right)) = face.iris_centers() {
        let radius = fun_glow_radius(now_ms);
        canvas.radial_glow(surface.project(&left), radius, Color::CYAN.with_opacity(FUN_GLOW_ALPHA));
        canvas.radial_glow(surface.project(&right), radius, Color::MAGENTA.with_opacity(FUN_GLOW_ALPHA));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{CommandRecorder, DrawCommand};
    use crate::landmarks::LandmarkPoint;
    use crate::surface::reconcile;

    fn face(n: usize) -> FaceLandmarkSet {
        let points = (0..n)
            .map(|i| LandmarkPoint::new(0.3 + (i % 10) as f32 * 0.04, 0.3 + (i / 10) as f32 * 0.008, -0.01))
            .collect();
        FaceLandmarkSet::new(points).unwrap()
    }

    fn surface() -> SurfaceState {
        reconcile(1280, 720, 640.0, false, false).unwrap()
    }

    fn render(mode: EffectMode, face: &FaceLandmarkSet, now_ms: f64) -> CommandRecorder {
        let mut recorder = CommandRecorder::new();
        EffectRenderer::default().render(face, mode, &RenderConfig::default(), &surface(), &mut recorder, now_ms);
        recorder
    }

    #[test]
    fn test_mode_parsing() {
        for mode in EffectMode::ALL {
            assert_eq!(mode.to_string().parse::<EffectMode>().unwrap(), mode);
        }
        assert_eq!("IRISES".parse::<EffectMode>().unwrap(), EffectMode::Irises);
        assert!("sparkles".parse::<EffectMode>().is_err());
    }

    #[test]
    fn test_density_strides() {
        assert_eq!(Density::Sparse.stride(), 5);
        assert_eq!(Density::Medium.stride(), 2);
        assert_eq!(Density::Dense.stride(), 1);
        assert!("thick".parse::<Density>().is_err());
    }

    #[test]
    fn test_render_config_validation() {
        assert!(RenderConfig::default().validate().is_ok());
        for thickness in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let config = RenderConfig { thickness, ..RenderConfig::default() };
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn test_none_draws_nothing() {
        assert!(render(EffectMode::None, &face(478), 0.0).commands().is_empty());
    }

    #[test]
    fn test_mesh_draws_one_dot_per_landmark() {
        let recorder = render(EffectMode::Mesh, &face(468), 0.0);
        assert_eq!(recorder.connector_calls(), 1);
        assert_eq!(recorder.fill_calls(), 468);

        let DrawCommand::FillCircle { radius, color, .. } = &recorder.commands()[1] else {
            panic!("expected a dot after the connectors");
        };
        assert!((radius - 0.8).abs() < 1e-6);
        assert_eq!(color.a, 0x20);
    }

    #[test]
    fn test_contour_face_oval_is_thicker() {
        let recorder = render(EffectMode::Contour, &face(468), 0.0);
        let widths: Vec<f32> = recorder
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::StrokeConnectors { width, .. } => Some(*width),
                _ => None,
            })
            .collect();
        assert_eq!(widths, vec![1.5, 1.0, 1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_irises_layers() {
        let recorder = render(EffectMode::Irises, &face(478), 0.0);
        // Two discs, two outlines, two pupils, two highlights
        assert_eq!(recorder.commands().len(), 8);

        let radius = 1280.0 * 0.018;
        let DrawCommand::FillCircle { radius: iris, .. } = recorder.commands()[0] else {
            panic!("expected iris disc");
        };
        assert!((iris - radius).abs() < 1e-4);
        let DrawCommand::FillCircle { radius: pupil, color, .. } = recorder.commands()[4] else {
            panic!("expected pupil");
        };
        assert!((pupil - radius * 0.4).abs() < 1e-4);
        assert_eq!(color, Color::BLACK);
    }

    #[test]
    fn test_iris_highlight_sits_up_and_left() {
        let recorder = render(EffectMode::Irises, &face(478), 0.0);
        let centers: Vec<_> = recorder
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillCircle { center, .. } => Some(*center),
                _ => None,
            })
            .collect();
        let (iris, highlight) = (centers[0], centers[4]);
        assert!(highlight.x < iris.x);
        assert!(highlight.y < iris.y);
    }

    #[test]
    fn test_fun_helpers_bounds() {
        for t in [0.0, 1234.5, 9.9e12] {
            for i in [0, 100, 477] {
                let (h, s, l) = fun_point_hsl(i, 478, t);
                assert!((0.0..360.0).contains(&h));
                assert!((40.0..=100.0).contains(&s));
                assert!((40.0..=60.0).contains(&l));
            }
            let r = fun_glow_radius(t);
            assert!((15.0..=25.0).contains(&r));
        }
        assert_eq!(fun_point_size(1.0), 1.0);
        assert!((fun_point_size(-0.05) - 4.0).abs() < 1e-6);
        assert_eq!(fun_point_size(f32::NAN), 1.0);
    }

    #[test]
    fn test_fun_without_irises_skips_glows() {
        let recorder = render(EffectMode::Fun, &face(468), 1000.0);
        assert_eq!(recorder.connector_calls(), 1);
        assert!(!recorder
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::RadialGlow { .. })));
    }
}
