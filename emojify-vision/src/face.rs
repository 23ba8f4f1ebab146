use anyhow::Result;
use image::DynamicImage;

use crate::expression::{Expression, Thresholds};

/// One detected face: bounding box in image pixels plus expression probabilities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceObservation {
    pub position: (f32, f32), // top-left x, y
    pub width: f32,
    pub height: f32,
    pub smiling: f32,
    pub left_eye_open: f32,
    pub right_eye_open: f32,
}

impl FaceObservation {
    pub fn classify(&self, thresholds: &Thresholds) -> Expression {
        thresholds.classify(self.smiling, self.left_eye_open, self.right_eye_open)
    }
}

/// Source of face observations for an image.
///
/// The pipeline never runs a model itself; anything that can turn a picture
/// into face records (an ONNX model, a sidecar file, a test fixture) plugs in
/// here and is handed to [`crate::Pipeline::detect_and_process`].
pub trait FaceDetector {
    fn detect(&mut self, img: &DynamicImage) -> Result<Vec<FaceObservation>>;
}

/// Fixed list of faces, returned for every image.
impl FaceDetector for Vec<FaceObservation> {
    fn detect(&mut self, _img: &DynamicImage) -> Result<Vec<FaceObservation>> {
        Ok(self.clone())
    }
}
