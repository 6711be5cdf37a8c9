//! src/config.rs
//!
//! Configuration shared by the geometric augmentations.
//!
//! `AugmentationConfig` carries the resampling settings handed to the warp
//! primitive. `RandomShearConfig` is the serializable description of a whole
//! `RandomShear` layer and can be loaded from JSON:
//!
//! ```json
//! {
//!     "x": [0.1, 0.3],
//!     "y": 0.2,
//!     "interpolation": "nearest",
//!     "fill_mode": "constant",
//!     "fill_value": 0.0
//! }
//! ```
//!
//! Omitted fields take their defaults: no shear on a missing axis,
//! `bilinear` interpolation, `reflect` fill and a fill value of `0.0`.

use crate::error::AugmentError;
use crate::transforms::vision::RandomShear;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Pixel interpolation used when resampling a warped image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    Nearest,
    #[default]
    Bilinear,
}

impl FromStr for Interpolation {
    type Err = AugmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "bilinear" => Ok(Self::Bilinear),
            _ => Err(AugmentError::UnknownInterpolation(s.to_string())),
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nearest => write!(f, "nearest"),
            Self::Bilinear => write!(f, "bilinear"),
        }
    }
}

/// Policy for output pixels whose source location falls outside the image.
///
/// ```text
/// constant: k k k k | a b c d | k k k k
/// reflect:  d c b a | a b c d | d c b a
/// wrap:     a b c d | a b c d | a b c d
/// nearest:  a a a a | a b c d | d d d d
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    Constant,
    #[default]
    Reflect,
    Wrap,
    Nearest,
}

impl FromStr for FillMode {
    type Err = AugmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "constant" => Ok(Self::Constant),
            "reflect" => Ok(Self::Reflect),
            "wrap" => Ok(Self::Wrap),
            "nearest" => Ok(Self::Nearest),
            _ => Err(AugmentError::UnknownFillMode(s.to_string())),
        }
    }
}

impl fmt::Display for FillMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Constant => "constant",
            Self::Reflect => "reflect",
            Self::Wrap => "wrap",
            Self::Nearest => "nearest",
        };
        f.write_str(name)
    }
}

/// Resampling settings, fixed at construction and read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentationConfig {
    pub interpolation: Interpolation,
    pub fill_mode: FillMode,
    /// Only read when `fill_mode` is [`FillMode::Constant`].
    pub fill_value: f32,
}

impl Default for AugmentationConfig {
    fn default() -> Self {
        Self {
            interpolation: Interpolation::Bilinear,
            fill_mode: FillMode::Reflect,
            fill_value: 0.0,
        }
    }
}

/// User-facing shear range: a single magnitude `v` (read as `(0, v)`) or an
/// explicit `(low, high)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeSpec {
    Scalar(f32),
    Pair(f32, f32),
}

impl From<f32> for RangeSpec {
    fn from(v: f32) -> Self {
        Self::Scalar(v)
    }
}

impl From<(f32, f32)> for RangeSpec {
    fn from((low, high): (f32, f32)) -> Self {
        Self::Pair(low, high)
    }
}

impl FromStr for RangeSpec {
    type Err = anyhow::Error;

    /// Parses `"0.3"` or `"0.1,0.3"`.
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        match parts.as_slice() {
            [v] => Ok(Self::Scalar(
                v.parse().with_context(|| format!("Invalid shear value `{}`", v))?,
            )),
            [low, high] => Ok(Self::Pair(
                low.parse()
                    .with_context(|| format!("Invalid lower shear bound `{}`", low))?,
                high.parse()
                    .with_context(|| format!("Invalid upper shear bound `{}`", high))?,
            )),
            _ => anyhow::bail!("Expected `v` or `low,high` for a shear range (got `{}`)", s),
        }
    }
}

/// Serializable description of a [`RandomShear`] layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RandomShearConfig {
    #[serde(default)]
    pub x: Option<RangeSpec>,
    #[serde(default)]
    pub y: Option<RangeSpec>,
    #[serde(flatten)]
    pub augmentation: AugmentationConfig,
}

impl RandomShearConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse RandomShear config")
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("In config file {}", path.display()))
    }

    /// Validates the ranges and builds the layer with the CPU warp.
    pub fn build(&self) -> Result<RandomShear, AugmentError> {
        RandomShear::new(self.x, self.y, self.augmentation)
    }
}
