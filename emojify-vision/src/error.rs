use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompositeError {
    #[error("overlay image is degenerate ({width}x{height})")]
    DegenerateOverlay { width: u32, height: u32 },

    #[error("invalid face geometry: {0}")]
    InvalidGeometry(String),
}
