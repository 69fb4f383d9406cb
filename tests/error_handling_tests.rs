//! Error handling tests for all modules

use face_overlay::{
    config::Config,
    detector::RecordedDetector,
    effects::{Density, EffectMode, RenderConfig},
    error::{AppError, Result},
    geometry::{parse_connections, GeometryTables},
    landmarks::{DetectionResult, FaceLandmarkSet, LandmarkPoint},
    utils::{color::Color, safe_cast::*},
};
use std::path::PathBuf;

fn temp_file(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("face_overlay_{}_{name}", std::process::id()));
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_landmark_set_size_errors() {
    for count in [0, 1, 467, 469, 477, 479] {
        let result = FaceLandmarkSet::new(vec![LandmarkPoint::default(); count]);
        match result {
            Err(AppError::InvalidInput(msg)) => assert!(msg.contains(&count.to_string())),
            other => panic!("Expected InvalidInput for {count} points, got {other:?}"),
        }
    }
}

#[test]
fn test_detection_json_errors() {
    assert!(matches!(
        DetectionResult::from_json("not json"),
        Err(AppError::Serialization(_))
    ));

    // Wrong landmark count inside an otherwise valid payload
    let json = r#"{"multiFaceLandmarks": [[{"x": 0.1, "y": 0.2, "z": 0.0}]]}"#;
    assert!(DetectionResult::from_json(json).is_err());

    // Missing key means no faces
    assert_eq!(DetectionResult::from_json("{}").unwrap().face_count(), 0);
}

#[test]
fn test_geometry_errors() {
    assert!(matches!(
        GeometryTables::with_tessellation(Vec::new()),
        Err(AppError::GeometryError(_))
    ));
    assert!(matches!(
        GeometryTables::with_tessellation(vec![(0, 478)]),
        Err(AppError::GeometryError(_))
    ));

    match parse_connections("1 2\n3\n") {
        Err(AppError::GeometryError(msg)) => assert!(msg.contains('2'), "line number in {msg}"),
        other => panic!("Expected GeometryError, got {other:?}"),
    }
    assert!(parse_connections("a b").is_err());

    assert!(GeometryTables::from_tessellation_file("/nonexistent/tessellation.txt").is_err());
}

#[test]
fn test_tessellation_asset_round_trip() -> Result<()> {
    let path = temp_file("tessellation.txt", "# comment\n10 338\n338,297\n\n297 332\n");
    let tables = GeometryTables::from_tessellation_file(&path)?;
    assert_eq!(tables.tessellation(), &[(10, 338), (338, 297), (297, 332)]);
    std::fs::remove_file(path)?;
    Ok(())
}

#[test]
fn test_option_parsing_errors() {
    assert!("sparkles".parse::<EffectMode>().is_err());
    assert!("thick".parse::<Density>().is_err());
    assert!("#12".parse::<Color>().is_err());
    assert!("00ff00".parse::<Color>().is_err());
    assert!("#gg0000".parse::<Color>().is_err());
}

#[test]
fn test_render_config_errors() {
    for thickness in [0.0, -1.0, f32::NAN, f32::INFINITY] {
        let config = RenderConfig {
            thickness,
            ..RenderConfig::default()
        };
        assert!(matches!(config.validate(), Err(AppError::ConfigError(_))));
    }
}

#[test]
fn test_config_file_errors() {
    assert!(matches!(
        Config::from_file("/nonexistent/config.yaml"),
        Err(AppError::IoError(_))
    ));

    let path = temp_file("bad_config.yaml", "render: [1, 2\n");
    assert!(matches!(Config::from_file(&path), Err(AppError::ConfigError(_))));
    std::fs::remove_file(path).unwrap();
}

#[test]
fn test_config_round_trip() -> Result<()> {
    let mut config = Config::default();
    config.render.effect = EffectMode::Irises;
    config.render.color = Color::rgb(255, 0, 128);
    config.display.platform_quirk = true;

    let path = std::env::temp_dir().join(format!("face_overlay_{}_config.yaml", std::process::id()));
    config.to_file(&path)?;
    let loaded = Config::from_file(&path)?;
    std::fs::remove_file(&path)?;

    assert_eq!(loaded.render.effect, EffectMode::Irises);
    assert_eq!(loaded.render.color, Color::rgb(255, 0, 128));
    assert!(loaded.display.platform_quirk);
    Ok(())
}

#[test]
fn test_recording_errors() {
    assert!(RecordedDetector::from_file("/nonexistent/landmarks.json").is_err());

    let path = temp_file("bad_recording.json", "[{\"multiFaceLandmarks\": 5}]");
    assert!(matches!(
        RecordedDetector::from_file(&path),
        Err(AppError::Serialization(_))
    ));
    std::fs::remove_file(path).unwrap();
}

#[test]
fn test_safe_cast_non_finite() {
    assert_eq!(f32_to_i32_clamp(f32::NAN, -5, 5), -5);
    assert_eq!(unit_to_u8(f32::NAN), 0);
}
