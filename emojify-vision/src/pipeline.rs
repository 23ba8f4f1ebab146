use anyhow::{Context, Result};
use image::DynamicImage;

use crate::catalog::OverlayCatalog;
use crate::composite::{self, DEFAULT_SCALE_FACTOR};
use crate::error::CompositeError;
use crate::expression::{Expression, Thresholds};
use crate::face::{FaceDetector, FaceObservation};

/// Something the caller should surface to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    NoFacesDetected,
    /// The face at `face` classified to an expression with no overlay.
    NoOverlayForCategory { face: usize, expression: Expression },
    /// Compositing the face at `face` failed; its slot was skipped.
    CompositeFailed { face: usize, error: CompositeError },
}

/// What happened to a single face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceReport {
    pub face: FaceObservation,
    pub expression: Expression,
    pub applied: bool,
}

#[derive(Debug, Clone)]
pub struct Outcome {
    pub image: DynamicImage,
    pub faces: Vec<FaceReport>,
    pub signals: Vec<Signal>,
}

impl Outcome {
    pub fn applied(&self) -> usize {
        self.faces.iter().filter(|f| f.applied).count()
    }
}

/// Full pipeline: classify each face → pick overlay → composite
pub struct Pipeline {
    pub catalog: OverlayCatalog,
    pub thresholds: Thresholds,
    pub scale_factor: f32,
}

impl Pipeline {
    pub fn new(catalog: OverlayCatalog) -> Self {
        Self {
            catalog,
            thresholds: Thresholds::default(),
            scale_factor: DEFAULT_SCALE_FACTOR,
        }
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_scale_factor(mut self, scale_factor: f32) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Overlay every face onto `background`, in order.
    ///
    /// Each face draws onto the previous face's result, so later overlays sit
    /// on top where boxes overlap. A face that cannot be drawn leaves the
    /// running image untouched and is reported in [`Outcome::signals`].
    pub fn process(&self, background: &DynamicImage, faces: &[FaceObservation]) -> Outcome {
        log::debug!("process: number of faces = {}", faces.len());

        let mut signals = Vec::new();
        let mut reports = Vec::with_capacity(faces.len());

        if faces.is_empty() {
            signals.push(Signal::NoFacesDetected);
            return Outcome {
                image: background.clone(),
                faces: reports,
                signals,
            };
        }

        let mut output = background.clone();

        for (i, face) in faces.iter().enumerate() {
            let expression = face.classify(&self.thresholds);

            let Some(overlay) = self.catalog.get(expression) else {
                log::debug!("face {}: no overlay for {}", i, expression);
                signals.push(Signal::NoOverlayForCategory { face: i, expression });
                reports.push(FaceReport {
                    face: *face,
                    expression,
                    applied: false,
                });
                continue;
            };

            let applied = match composite::composite_face(&output, overlay, face, self.scale_factor)
            {
                Ok(next) => {
                    output = next;
                    true
                }
                Err(error) => {
                    log::warn!("face {}: skipping {} overlay: {}", i, expression, error);
                    signals.push(Signal::CompositeFailed { face: i, error });
                    false
                }
            };

            reports.push(FaceReport {
                face: *face,
                expression,
                applied,
            });
        }

        Outcome {
            image: output,
            faces: reports,
            signals,
        }
    }

    /// Run `detector` on `img`, then [`Pipeline::process`] its faces.
    pub fn detect_and_process<D>(&self, detector: &mut D, img: &DynamicImage) -> Result<Outcome>
    where
        D: FaceDetector + ?Sized,
    {
        let faces = detector.detect(img).context("detecting faces")?;
        Ok(self.process(img, &faces))
    }
}
