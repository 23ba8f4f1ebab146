use anyhow::{Context, Result};
use emojify_vision::{FaceDetector, FaceObservation};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Probability reported by detectors that skipped a classification.
pub const UNCOMPUTED_PROBABILITY: f32 = -1.0;

fn uncomputed() -> f32 {
    UNCOMPUTED_PROBABILITY
}

/// Face record as written by an external detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceRecord {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default = "uncomputed")]
    pub smiling: f32,
    #[serde(default = "uncomputed")]
    pub left_eye_open: f32,
    #[serde(default = "uncomputed")]
    pub right_eye_open: f32,
}

impl From<&FaceRecord> for FaceObservation {
    fn from(r: &FaceRecord) -> Self {
        FaceObservation {
            position: (r.x, r.y),
            width: r.width,
            height: r.height,
            smiling: r.smiling,
            left_eye_open: r.left_eye_open,
            right_eye_open: r.right_eye_open,
        }
    }
}

pub fn parse_records(raw: &str) -> Result<Vec<FaceObservation>> {
    let records: Vec<FaceRecord> = serde_json::from_str(raw)?;
    Ok(records.iter().map(FaceObservation::from).collect())
}

pub fn load_records(path: &Path) -> Result<Vec<FaceObservation>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    parse_records(&raw).with_context(|| format!("parsing face records {}", path.display()))
}

/// Detector backed by a JSON file of face records produced offline.
pub struct FaceFile {
    path: PathBuf,
}

impl FaceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FaceDetector for FaceFile {
    fn detect(&mut self, _img: &DynamicImage) -> Result<Vec<FaceObservation>> {
        load_records(&self.path)
    }
}
