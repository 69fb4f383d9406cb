//! Constants used throughout the application

/// Number of landmarks in the base face mesh
pub const NUM_FACE_LANDMARKS: usize = 468;

/// Number of landmarks when iris refinement is enabled
pub const NUM_REFINED_LANDMARKS: usize = 478;

/// Semantic landmark indices for the iris centers (refined sets only)
pub const LEFT_IRIS_CENTER: usize = 468;
pub const RIGHT_IRIS_CENTER: usize = 473;

/// Mesh subsampling strides per density
pub const SPARSE_STRIDE: usize = 5;
pub const MEDIUM_STRIDE: usize = 2;
pub const DENSE_STRIDE: usize = 1;

/// Mesh landmark dot radius as a fraction of stroke thickness
pub const MESH_DOT_RADIUS_RATIO: f32 = 0.8;

/// Alpha applied to mesh landmark dots (0x20 of 0xff)
pub const MESH_DOT_ALPHA: u8 = 0x20;

/// Face outline stroke width as a multiple of stroke thickness
pub const FACE_OVAL_WIDTH_RATIO: f32 = 1.5;

/// Iris disc radius as a fraction of the surface pixel width
pub const IRIS_RADIUS_RATIO: f32 = 0.018;

/// Iris sub-feature ratios relative to the iris radius
pub const PUPIL_RADIUS_RATIO: f32 = 0.4;
pub const HIGHLIGHT_RADIUS_RATIO: f32 = 0.1;
pub const HIGHLIGHT_OFFSET_RATIO: f32 = 0.2;

/// Iris outline width as a fraction of stroke thickness
pub const IRIS_OUTLINE_WIDTH_RATIO: f32 = 0.5;

/// Fun effect: face outline stroke width in pixels
pub const FUN_OUTLINE_WIDTH: f32 = 3.0;

/// Fun effect: face outline alpha
pub const FUN_OUTLINE_ALPHA: f32 = 0.8;

/// Fun effect: hue drift divisor (ms per degree)
pub const FUN_HUE_PERIOD_MS: f64 = 100.0;

/// Fun effect: saturation oscillator (base, amplitude, divisor in ms)
pub const FUN_SATURATION_BASE: f64 = 70.0;
pub const FUN_SATURATION_AMPLITUDE: f64 = 30.0;
pub const FUN_SATURATION_PERIOD_MS: f64 = 1000.0;

/// Fun effect: lightness oscillator (base, amplitude, divisor in ms)
pub const FUN_LIGHTNESS_BASE: f64 = 50.0;
pub const FUN_LIGHTNESS_AMPLITUDE: f64 = 10.0;
pub const FUN_LIGHTNESS_PERIOD_MS: f64 = 1500.0;

/// Fun effect: point size as a function of depth, `max(MIN, BASE - z * SCALE)`
pub const FUN_POINT_BASE_SIZE: f32 = 3.0;
pub const FUN_POINT_DEPTH_SCALE: f32 = 20.0;
pub const FUN_POINT_MIN_SIZE: f32 = 1.0;

/// Fun effect: pulsing iris glow radius (base, amplitude, divisor in ms)
pub const FUN_GLOW_BASE_RADIUS: f64 = 20.0;
pub const FUN_GLOW_PULSE: f64 = 5.0;
pub const FUN_GLOW_PERIOD_MS: f64 = 500.0;

/// Fun effect: glow center alpha
pub const FUN_GLOW_ALPHA: f32 = 0.8;

/// Ideal capture resolution requested from the camera
pub const DEFAULT_CAPTURE_WIDTH: u32 = 1280;
pub const DEFAULT_CAPTURE_HEIGHT: u32 = 720;

/// Default CSS width of the canvas container
pub const DEFAULT_CONTAINER_WIDTH: f32 = 640.0;

/// Delay before recomputing dimensions after an orientation change
pub const DEFAULT_ORIENTATION_SETTLE_MS: u64 = 300;

/// Rotation applied to the presentation when compensating fixed-landscape capture
pub const QUIRK_ROTATION_DEGREES: i32 = -90;

/// Default detector thresholds
pub const DEFAULT_MIN_DETECTION_CONFIDENCE: f32 = 0.5;
pub const DEFAULT_MIN_TRACKING_CONFIDENCE: f32 = 0.5;
