//! Geometry tables: named sets of landmark-index pairs describing facial
//! regions of the 468/478-point face mesh.
//!
//! Left and right follow the subject's point of view.

use crate::constants::NUM_REFINED_LANDMARKS;
use crate::effects::Density;
use crate::{Error, Result};
use log::info;
use std::path::Path;

mod tessellation;

pub use tessellation::TESSELLATION;

/// An edge between two landmark indices
pub type Connection = (usize, usize);

pub const FACE_OVAL: &[Connection] = &[
    (10, 338), (338, 297), (297, 332), (332, 284), (284, 251), (251, 389),
    (389, 356), (356, 454), (454, 323), (323, 361), (361, 288), (288, 397),
    (397, 365), (365, 379), (379, 378), (378, 400), (400, 377), (377, 152),
    (152, 148), (148, 176), (176, 149), (149, 150), (150, 136), (136, 172),
    (172, 58), (58, 132), (132, 93), (93, 234), (234, 127), (127, 162),
    (162, 21), (21, 54), (54, 103), (103, 67), (67, 109), (109, 10),
];

pub const LIPS: &[Connection] = &[
    (61, 146), (146, 91), (91, 181), (181, 84), (84, 17), (17, 314),
    (314, 405), (405, 321), (321, 375), (375, 291), (61, 185), (185, 40),
    (40, 39), (39, 37), (37, 0), (0, 267), (267, 269), (269, 270),
    (270, 409), (409, 291), (78, 95), (95, 88), (88, 178), (178, 87),
    (87, 14), (14, 317), (317, 402), (402, 318), (318, 324), (324, 308),
    (78, 191), (191, 80), (80, 81), (81, 82), (82, 13), (13, 312),
    (312, 311), (311, 310), (310, 415), (415, 308),
];

pub const LEFT_EYE: &[Connection] = &[
    (263, 249), (249, 390), (390, 373), (373, 374), (374, 380), (380, 381),
    (381, 382), (382, 362), (263, 466), (466, 388), (388, 387), (387, 386),
    (386, 385), (385, 384), (384, 398), (398, 362),
];

pub const RIGHT_EYE: &[Connection] = &[
    (33, 7), (7, 163), (163, 144), (144, 145), (145, 153), (153, 154),
    (154, 155), (155, 133), (33, 246), (246, 161), (161, 160), (160, 159),
    (159, 158), (158, 157), (157, 173), (173, 133),
];

pub const LEFT_EYEBROW: &[Connection] = &[
    (276, 283), (283, 282), (282, 295), (295, 285), (300, 293), (293, 334),
    (334, 296), (296, 336),
];

pub const RIGHT_EYEBROW: &[Connection] = &[
    (46, 53), (53, 52), (52, 65), (65, 55), (70, 63), (63, 105),
    (105, 66), (66, 107),
];

/// Iris rings; only present in refined (478-point) sets
pub const LEFT_IRIS: &[Connection] = &[(474, 475), (475, 476), (476, 477), (477, 474)];
pub const RIGHT_IRIS: &[Connection] = &[(469, 470), (470, 471), (471, 472), (472, 469)];

/// Anatomical region drawn by the contour effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContourRegion {
    FaceOval,
    LeftEyebrow,
    RightEyebrow,
    LeftEye,
    RightEye,
    Lips,
}

impl ContourRegion {
    /// All contour regions in drawing order
    pub const ALL: [Self; 6] = [
        Self::FaceOval,
        Self::LeftEyebrow,
        Self::RightEyebrow,
        Self::LeftEye,
        Self::RightEye,
        Self::Lips,
    ];

    #[must_use]
    pub fn connections(self) -> &'static [Connection] {
        match self {
            Self::FaceOval => FACE_OVAL,
            Self::LeftEyebrow => LEFT_EYEBROW,
            Self::RightEyebrow => RIGHT_EYEBROW,
            Self::LeftEye => LEFT_EYE,
            Self::RightEye => RIGHT_EYE,
            Self::Lips => LIPS,
        }
    }
}

/// Shared, read-only connection tables used by every frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometryTables {
    tessellation: Vec<Connection>,
}

impl Default for GeometryTables {
    fn default() -> Self {
        Self::builtin()
    }
}

impl GeometryTables {
    /// Tables using the embedded face mesh [`TESSELLATION`]
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            tessellation: TESSELLATION.to_vec(),
        }
    }

    /// Tables with an explicit tessellation
    ///
    /// # Errors
    ///
    /// Returns `Error::GeometryError` if the table is empty or references an index
    /// outside the refined landmark range.
    pub fn with_tessellation(tessellation: Vec<Connection>) -> Result<Self> {
        if tessellation.is_empty() {
            return Err(Error::GeometryError("Tessellation table is empty".to_string()));
        }
        if let Some(&(a, b)) = tessellation
            .iter()
            .find(|&&(a, b)| a >= NUM_REFINED_LANDMARKS || b >= NUM_REFINED_LANDMARKS)
        {
            return Err(Error::GeometryError(format!(
                "Connection ({a}, {b}) references a landmark beyond index {}",
                NUM_REFINED_LANDMARKS - 1
            )));
        }
        Ok(Self { tessellation })
    }

    /// Load a tessellation asset from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails to parse.
    pub fn from_tessellation_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading face tessellation from: {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(format!("{}: {e}", path.display())))?;
        let tables = Self::with_tessellation(parse_connections(&content)?)?;
        info!("Loaded {} tessellation connections", tables.tessellation.len());
        Ok(tables)
    }

    #[must_use]
    pub fn tessellation(&self) -> &[Connection] {
        &self.tessellation
    }

    /// Stride-subsampled tessellation for a mesh density
    ///
    /// Keeps every connection whose position in the table is a multiple of the stride.
    #[must_use]
    pub fn mesh_subset(&self, density: Density) -> Vec<Connection> {
        self.tessellation
            .iter()
            .step_by(density.stride())
            .copied()
            .collect()
    }
}

/// Parse a connection list: one pair per line, separated by whitespace or a comma.
///
/// Blank lines and `#` comments are ignored.
///
/// # Errors
///
/// Returns `Error::GeometryError` with the offending line number on malformed input.
pub fn parse_connections(text: &str) -> Result<Vec<Connection>> {
    let mut connections = Vec::new();

    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .collect();

        let [a, b] = fields.as_slice() else {
            return Err(Error::GeometryError(format!(
                "Line {}: expected two landmark indices, got '{line}'",
                line_no + 1
            )));
        };

        let parse = |field: &str| {
            field.parse::<usize>().map_err(|_| {
                Error::GeometryError(format!("Line {}: invalid landmark index '{field}'", line_no + 1))
            })
        };
        connections.push((parse(*a)?, parse(*b)?));
    }

    Ok(connections)
}
