pub mod assets;
pub mod config;
pub mod faces;

// Re-export vision types for convenience
pub use emojify_vision::{
    catalog, composite, expression, face, pipeline, Expression, FaceObservation, OverlayCatalog,
    Outcome, Pipeline, Signal,
};
