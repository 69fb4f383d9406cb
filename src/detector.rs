//! Landmark detector collaborator boundary.
//!
//! The face-mesh model itself is external. The session initializes it once
//! and then sends raw frames; each call yields the detection result that
//! the model would deliver to its result callback.

use crate::camera::VideoFrame;
use crate::constants::{DEFAULT_MIN_DETECTION_CONFIDENCE, DEFAULT_MIN_TRACKING_CONFIDENCE};
use crate::landmarks::DetectionResult;
use crate::{Error, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;

/// Options forwarded to the face-mesh model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorOptions {
    /// Maximum number of faces to track
    pub max_num_faces: usize,
    /// Emit the 10 iris landmarks (478-point sets)
    pub refine_landmarks: bool,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            max_num_faces: 1,
            refine_landmarks: true,
            min_detection_confidence: DEFAULT_MIN_DETECTION_CONFIDENCE,
            min_tracking_confidence: DEFAULT_MIN_TRACKING_CONFIDENCE,
        }
    }
}

/// An external face-landmark detector
pub trait LandmarkDetector {
    /// Load the model; called once before the first frame
    ///
    /// # Errors
    ///
    /// Returns `Error::DetectorInit` if the model cannot be loaded.
    fn initialize(&mut self, options: &DetectorOptions) -> Result<()>;

    /// Run detection on one frame
    ///
    /// # Errors
    ///
    /// Returns `Error::Detection` if processing this frame failed.
    fn send(&mut self, frame: &VideoFrame) -> Result<DetectionResult>;
}

/// Detector that replays previously recorded results in order
///
/// Once the recording is exhausted the last result repeats, or an empty
/// result is returned if nothing was recorded.
#[derive(Debug, Clone, Default)]
pub struct RecordedDetector {
    pending: VecDeque<DetectionResult>,
    last: Option<DetectionResult>,
    options: Option<DetectorOptions>,
}

impl RecordedDetector {
    #[must_use]
    pub fn new(results: Vec<DetectionResult>) -> Self {
        Self {
            pending: results.into(),
            last: None,
            options: None,
        }
    }

    /// Load a recording: a single result object or a JSON array of results
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid recording.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::IoError(format!("{}: {e}", path.display())))?;

        let results = if content.trim_start().starts_with('[') {
            serde_json::from_str::<Vec<DetectionResult>>(&content)
                .map_err(|e| Error::Serialization(format!("Failed to parse recording: {e}")))?
        } else {
            vec![DetectionResult::from_json(&content)?]
        };

        info!("Loaded {} recorded detection results from {}", results.len(), path.display());
        Ok(Self::new(results))
    }

    /// Options the detector was initialized with
    #[must_use]
    pub fn options(&self) -> Option<&DetectorOptions> {
        self.options.as_ref()
    }
}

impl LandmarkDetector for RecordedDetector {
    fn initialize(&mut self, options: &DetectorOptions) -> Result<()> {
        self.options = Some(*options);
        Ok(())
    }

    fn send(&mut self, _frame: &VideoFrame) -> Result<DetectionResult> {
        if self.options.is_none() {
            return Err(Error::Detection("Detector used before initialization".to_string()));
        }

        let max_faces = self.options.map_or(usize::MAX, |o| o.max_num_faces);
        let mut result = match self.pending.pop_front() {
            Some(result) => {
                self.last = Some(result.clone());
                result
            }
            None => self.last.clone().unwrap_or_default(),
        };
        result.multi_face_landmarks.truncate(max_faces);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{FaceLandmarkSet, LandmarkPoint};

    fn result(faces: usize) -> DetectionResult {
        let face = FaceLandmarkSet::new(vec![LandmarkPoint::default(); 468]).unwrap();
        DetectionResult::new(vec![face; faces])
    }

    #[test]
    fn test_requires_initialization() {
        let mut detector = RecordedDetector::new(vec![result(1)]);
        assert!(matches!(detector.send(&VideoFrame::blank(2, 2)), Err(Error::Detection(_))));
    }

    #[test]
    fn test_replays_then_repeats_last() {
        let mut detector = RecordedDetector::new(vec![result(0), result(1)]);
        detector.initialize(&DetectorOptions::default()).unwrap();
        let frame = VideoFrame::blank(2, 2);

        assert_eq!(detector.send(&frame).unwrap().face_count(), 0);
        assert_eq!(detector.send(&frame).unwrap().face_count(), 1);
        assert_eq!(detector.send(&frame).unwrap().face_count(), 1);
    }

    #[test]
    fn test_caps_faces_at_option_limit() {
        let mut detector = RecordedDetector::new(vec![result(3)]);
        detector.initialize(&DetectorOptions::default()).unwrap();
        assert_eq!(detector.send(&VideoFrame::blank(2, 2)).unwrap().face_count(), 1);
    }

    #[test]
    fn test_empty_recording_yields_no_faces() {
        let mut detector = RecordedDetector::default();
        detector.initialize(&DetectorOptions::default()).unwrap();
        assert_eq!(detector.send(&VideoFrame::blank(2, 2)).unwrap(), DetectionResult::empty());
    }
}
