//! src/warp/mod.rs
//!
//! The image-warping capability used by geometric augmentations.
//!
//! Augmentations only build [`AffineTransform`]s and hand them to a [`Warp`]
//! implementation together with the resampling settings. Swapping the
//! implementation (for a GPU kernel, say) never touches sampling logic.
//!
//! ```text
//! transforms/vision/geometric.rs      warp/
//! ┌──────────────────────────┐        ┌─────────────────────────┐
//! │ RandomShear              │  N×8   │ Warp (trait)            │
//! │  sample → AffineTransform├───────>│  └─ ProjectiveWarp (CPU)│
//! └──────────────────────────┘        │      ├─ border.rs       │
//!                                     │      └─ projective.rs   │
//!                                     └─────────────────────────┘
//! ```
//!
//! # Coordinate convention
//! Images are `(N, H, W, C)` arrays. A transform maps an OUTPUT pixel
//! `(x, y)` (column, row) to the INPUT location it is read from:
//!
//! ```text
//! k  = g*x + h*y + 1
//! x' = (a*x + b*y + c) / k
//! y' = (d*x + e*y + f) / k
//! ```

mod border;
mod projective;

pub use border::map_coordinate;
pub use projective::ProjectiveWarp;

use crate::config::AugmentationConfig;
use crate::error::AugmentError;
use ndarray::{Array4, ArrayView4};

/// Eight-parameter projective transform `[a, b, c, d, e, f, g, h]`.
///
/// The implicit last row of the 3×3 matrix is `(g, h, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform([f32; 8]);

impl AffineTransform {
    pub const fn new(params: [f32; 8]) -> Self {
        Self(params)
    }

    pub const fn identity() -> Self {
        Self([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0])
    }

    /// Shear along X: `x' = x + shear * y`.
    pub const fn shear_x(shear: f32) -> Self {
        Self([1.0, shear, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0])
    }

    /// Shear along Y: `y' = shear * x + y`.
    pub const fn shear_y(shear: f32) -> Self {
        Self([1.0, 0.0, 0.0, shear, 1.0, 0.0, 0.0, 0.0])
    }

    pub const fn as_array(&self) -> &[f32; 8] {
        &self.0
    }

    /// Maps a point, returning `None` where the projective denominator vanishes.
    pub fn apply_to(&self, x: f32, y: f32) -> Option<(f32, f32)> {
        let [a, b, c, d, e, f, g, h] = self.0;
        let k = g * x + h * y + 1.0;
        if k == 0.0 {
            return None;
        }
        Some(((a * x + b * y + c) / k, (d * x + e * y + f) / k))
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<[f32; 8]> for AffineTransform {
    fn from(params: [f32; 8]) -> Self {
        Self(params)
    }
}

/// Geometric image-warp primitive.
///
/// Implementations take a batch of `(N, H, W, C)` images and exactly one
/// transform per image, and must return a batch of the same shape.
pub trait Warp: Send + Sync {
    fn warp(
        &self,
        images: ArrayView4<'_, f32>,
        transforms: &[AffineTransform],
        config: &AugmentationConfig,
    ) -> Result<Array4<f32>, AugmentError>;
}

impl<W: Warp + ?Sized> Warp for std::sync::Arc<W> {
    fn warp(
        &self,
        images: ArrayView4<'_, f32>,
        transforms: &[AffineTransform],
        config: &AugmentationConfig,
    ) -> Result<Array4<f32>, AugmentError> {
        (**self).warp(images, transforms, config)
    }
}
