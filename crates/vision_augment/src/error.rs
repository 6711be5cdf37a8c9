use thiserror::Error;

/// Errors raised while configuring or applying an augmentation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AugmentError {
    /// A shear range was malformed: low > high, a negative scalar, or a non-finite bound or span.
    #[error("invalid {axis} shear range: {reason}")]
    InvalidRange { axis: &'static str, reason: String },
    /// The warp primitive returned a tensor whose shape differs from its input.
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
    /// One transform is required per image in the batch.
    #[error("expected {images} transforms (one per image), got {transforms}")]
    TransformCount { images: usize, transforms: usize },
    #[error("unknown interpolation mode `{0}` (expected `nearest` or `bilinear`)")]
    UnknownInterpolation(String),
    #[error("unknown fill mode `{0}` (expected `constant`, `reflect`, `wrap` or `nearest`)")]
    UnknownFillMode(String),
    /// Value range must satisfy low < high with finite bounds.
    #[error("invalid value range ({low}, {high})")]
    InvalidValueRange { low: f32, high: f32 },
    #[error("blend factor must be in [0.0, 1.0] (got {0})")]
    InvalidBlendFactor(f32),
    #[error("invalid image: {0}")]
    InvalidImage(String),
}
