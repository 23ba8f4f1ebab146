pub mod catalog;
pub mod composite;
pub mod error;
pub mod expression;
pub mod face;
pub mod pipeline;

// Re-export commonly used types
pub use catalog::OverlayCatalog;
pub use composite::{composite, Placement, DEFAULT_SCALE_FACTOR};
pub use error::CompositeError;
pub use expression::{classify, Expression, Thresholds};
pub use face::{FaceDetector, FaceObservation};
pub use pipeline::{FaceReport, Outcome, Pipeline, Signal};
