//! src/transforms/vision/mod.rs
//!
//! Vision transforms for image augmentation.
//!
//! # Module Organization
//!
//! ```text
//! transforms/vision/
//! ├── geometric.rs     → Random spatial augmentations (shear)
//! ├── photometric.rs   → Appearance augmentations (sharpen)
//! ├── conversion.rs    → DynamicImage ⇄ (H, W, C) f32 arrays
//! └── io.rs            → Image loading
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use crate::transforms::{Randomized, Transform};
//! use crate::transforms::vision::{LoadImage, RandomShear, Sharpen, ToArray, ToImage};
//!
//! let shear = RandomShear::builder().x(0.3).y(0.3).build()?;
//! let pipeline = LoadImage::new()
//!     .then(ToArray)
//!     .then(Randomized::new(shear, 42))
//!     .then(Sharpen::default())
//!     .then(ToImage);
//! ```

pub mod conversion;
pub mod geometric;
pub mod io;
pub mod photometric;

pub use conversion::{ToArray, ToImage};
pub use geometric::{RandomShear, RandomShearBuilder, ShearRange, ShearSample};
pub use io::LoadImage;
pub use photometric::Sharpen;
