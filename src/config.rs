//! Configuration management for the face overlay application

use crate::camera::FacingMode;
use crate::constants::{
    DEFAULT_CAPTURE_HEIGHT, DEFAULT_CAPTURE_WIDTH, DEFAULT_CONTAINER_WIDTH, DEFAULT_ORIENTATION_SETTLE_MS,
};
use crate::detector::DetectorOptions;
use crate::effects::{Density, EffectMode, RenderConfig};
use crate::geometry::GeometryTables;
use crate::utils::color::Color;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Effect and style configuration
    pub render: RenderSettings,

    /// Camera request configuration
    pub capture: CaptureConfig,

    /// Landmark detector options
    pub detector: DetectorOptions,

    /// Display and layout configuration
    pub display: DisplayConfig,

    /// Geometry asset configuration
    pub geometry: GeometryConfig,
}

/// Initial effect and style values
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Effect selected at startup
    pub effect: EffectMode,

    /// Mesh density
    pub density: Density,

    /// Stroke color (`#rrggbb`)
    pub color: Color,

    /// Stroke thickness in pixels
    pub thickness: f32,
}

/// Camera request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Camera to open first
    pub facing_mode: FacingMode,

    /// Ideal capture width
    pub ideal_width: u32,

    /// Ideal capture height
    pub ideal_height: u32,
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// CSS width available to the canvas
    pub container_width: f32,

    /// Camera always reports landscape frames (compensate in portrait)
    pub platform_quirk: bool,

    /// Delay before re-reading dimensions after an orientation change
    pub orientation_settle_ms: u64,
}

/// Geometry asset configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Tessellation asset overriding the built-in face mesh
    pub tessellation: Option<PathBuf>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        let style = RenderConfig::default();
        Self {
            effect: EffectMode::default(),
            density: style.density,
            color: style.color,
            thickness: style.thickness,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            facing_mode: FacingMode::User,
            ideal_width: DEFAULT_CAPTURE_WIDTH,
            ideal_height: DEFAULT_CAPTURE_HEIGHT,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            container_width: DEFAULT_CONTAINER_WIDTH,
            platform_quirk: false,
            orientation_settle_ms: DEFAULT_ORIENTATION_SETTLE_MS,
        }
    }
}

impl RenderSettings {
    /// Style portion as a per-frame render config
    #[must_use]
    pub fn style(&self) -> RenderConfig {
        RenderConfig {
            density: self.density,
            color: self.color,
            thickness: self.thickness,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| Error::IoError(e.to_string()))?;

        Ok(())
    }

    /// Build the geometry tables named by the configuration
    pub fn load_geometry(&self) -> Result<GeometryTables> {
        match &self.geometry.tessellation {
            Some(path) => GeometryTables::from_tessellation_file(path),
            None => Ok(GeometryTables::builtin()),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        // Validate render style
        self.render.style().validate()?;

        // Validate detector thresholds
        if !(0.0..=1.0).contains(&self.detector.min_detection_confidence) {
            return Err(Error::ConfigError(
                "Minimum detection confidence must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.detector.min_tracking_confidence) {
            return Err(Error::ConfigError(
                "Minimum tracking confidence must be between 0.0 and 1.0".to_string(),
            ));
        }
        if self.detector.max_num_faces == 0 {
            return Err(Error::ConfigError("Maximum number of faces must be at least 1".to_string()));
        }

        // Validate capture request
        if self.capture.ideal_width == 0 || self.capture.ideal_height == 0 {
            return Err(Error::ConfigError("Ideal capture size must be greater than 0".to_string()));
        }

        // Validate display settings
        if !(self.display.container_width.is_finite() && self.display.container_width > 0.0) {
            return Err(Error::ConfigError("Container width must be greater than 0".to_string()));
        }

        // Validate geometry asset exists
        if let Some(path) = &self.geometry.tessellation {
            if !path.exists() {
                return Err(Error::ConfigError(format!(
                    "Tessellation asset not found: {}",
                    path.display()
                )));
            }
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r##"# Face Overlay Configuration

# Effect and style
render:
  effect: "mesh"          # mesh, contour, irises, fun, none
  density: "medium"       # sparse, medium, dense
  color: "#00ff00"
  thickness: 1.0

# Camera request
capture:
  facing_mode: "user"     # user, environment
  ideal_width: 1280
  ideal_height: 720

# Landmark detector
detector:
  max_num_faces: 1
  refine_landmarks: true
  min_detection_confidence: 0.5
  min_tracking_confidence: 0.5

# Display settings
display:
  container_width: 640.0
  platform_quirk: false
  orientation_settle_ms: 300

# Geometry assets
geometry:
  tessellation: null
"##;
