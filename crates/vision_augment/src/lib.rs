//! Random image augmentations for data-preparation pipelines.
//!
//! Images are `(H, W, C)` `f32` arrays (`(N, H, W, C)` for batches).
//! Augmentations draw their per-image parameters from an RNG owned by the
//! caller and hand the geometric work to a pluggable [`warp::Warp`].
//!
//! ```ignore
//! use rand::{rngs::StdRng, SeedableRng};
//! use vision_augment::{Augmentation, FillMode, RandomShear};
//!
//! let shear = RandomShear::builder()
//!     .x((0.1, 0.3))
//!     .fill_mode(FillMode::Constant)
//!     .build()?;
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! let sample = shear.sample_transformation(&mut rng);
//! let sheared = shear.augment_image(image, &sample)?;
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod transforms;
pub mod warp;

pub use batch::{BatchAugmenter, BatchConfig};
pub use config::{AugmentationConfig, FillMode, Interpolation, RandomShearConfig, RangeSpec};
pub use error::AugmentError;
pub use transforms::vision::{RandomShear, ShearRange, ShearSample, Sharpen};
pub use transforms::{Augmentation, Randomized, Transform};
pub use warp::{AffineTransform, ProjectiveWarp, Warp};
