//! Per-frame landmark data handed over by the external detector.
//!
//! Points are normalized against the source frame: `x` and `y` lie in
//! `[0, 1]`, `z` is an unscaled relative depth (smaller is closer).

use crate::constants::{LEFT_IRIS_CENTER, NUM_FACE_LANDMARKS, NUM_REFINED_LANDMARKS, RIGHT_IRIS_CENTER};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A single tracked facial reference point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LandmarkPoint {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl LandmarkPoint {
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Index-addressed landmarks for one detected face
///
/// Always holds exactly 468 points, or 478 when iris refinement is on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LandmarkPoint>", into = "Vec<LandmarkPoint>")]
pub struct FaceLandmarkSet {
    points: Vec<LandmarkPoint>,
}

impl FaceLandmarkSet {
    /// Wrap detector output, checking the landmark count
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` unless `points` holds 468 or 478 entries.
    pub fn new(points: Vec<LandmarkPoint>) -> Result<Self> {
        match points.len() {
            NUM_FACE_LANDMARKS | NUM_REFINED_LANDMARKS => Ok(Self { points }),
            n => Err(Error::InvalidInput(format!(
                "Face landmark set must contain {NUM_FACE_LANDMARKS} or {NUM_REFINED_LANDMARKS} points, got {n}"
            ))),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LandmarkPoint> {
        self.points.get(index)
    }

    #[must_use]
    pub fn points(&self) -> &[LandmarkPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LandmarkPoint> {
        self.points.iter()
    }

    /// Whether the set carries refined iris landmarks
    #[must_use]
    pub fn has_irises(&self) -> bool {
        self.points.len() == NUM_REFINED_LANDMARKS
    }

    /// Left and right iris centers, if refinement was enabled upstream
    #[must_use]
    pub fn iris_centers(&self) -> Option<(LandmarkPoint, LandmarkPoint)> {
        let left = self.points.get(LEFT_IRIS_CENTER)?;
        let right = self.points.get(RIGHT_IRIS_CENTER)?;
        Some((*left, *right))
    }
}

impl TryFrom<Vec<LandmarkPoint>> for FaceLandmarkSet {
    type Error = Error;

    fn try_from(points: Vec<LandmarkPoint>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<FaceLandmarkSet> for Vec<LandmarkPoint> {
    fn from(set: FaceLandmarkSet) -> Self {
        set.points
    }
}

impl<'a> IntoIterator for &'a FaceLandmarkSet {
    type Item = &'a LandmarkPoint;
    type IntoIter = std::slice::Iter<'a, LandmarkPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// One detector callback payload: zero or more faces
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    #[serde(default)]
    pub multi_face_landmarks: Vec<FaceLandmarkSet>,
}

impl DetectionResult {
    #[must_use]
    pub fn new(multi_face_landmarks: Vec<FaceLandmarkSet>) -> Self {
        Self { multi_face_landmarks }
    }

    /// Result with no detected faces
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.multi_face_landmarks.len()
    }

    /// Parse a detection result from JSON (`{"multiFaceLandmarks": [...]}`)
    ///
    /// # Errors
    ///
    /// Returns `Error::Serialization` for malformed JSON or landmark sets of the wrong size.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(format!("Failed to parse detection result: {e}")))
    }
}
