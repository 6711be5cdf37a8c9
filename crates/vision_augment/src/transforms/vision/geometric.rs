use crate::config::{AugmentationConfig, FillMode, Interpolation, RangeSpec};
use crate::error::AugmentError;
use crate::transforms::Augmentation;
use crate::warp::{AffineTransform, ProjectiveWarp, Warp};
use anyhow::{Context, Result};
use log::debug;
use ndarray::{Array3, Axis};
use rand::Rng;

// ============================================================================
// ShearRange
// ============================================================================

/// Closed interval `[low, high]` of shear magnitudes for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShearRange {
    low: f32,
    high: f32,
}

impl ShearRange {
    /// Normalizes a user-facing range for the named axis.
    ///
    /// A scalar `v` becomes `(0, v)`; negative scalars are rejected rather
    /// than reinterpreted as `(v, 0)`.
    pub fn from_spec(axis: &'static str, spec: RangeSpec) -> Result<Self, AugmentError> {
        match spec {
            RangeSpec::Scalar(v) => {
                if !v.is_finite() || v < 0.0 {
                    return Err(AugmentError::InvalidRange {
                        axis,
                        reason: format!("scalar magnitude must be finite and >= 0 (got {v})"),
                    });
                }
                Self::validated(axis, 0.0, v)
            }
            RangeSpec::Pair(low, high) => Self::validated(axis, low, high),
        }
    }

    fn validated(axis: &'static str, low: f32, high: f32) -> Result<Self, AugmentError> {
        if !low.is_finite() || !high.is_finite() {
            return Err(AugmentError::InvalidRange {
                axis,
                reason: format!("bounds must be finite (got ({low}, {high}))"),
            });
        }
        if low > high {
            return Err(AugmentError::InvalidRange {
                axis,
                reason: format!("low must not exceed high (got ({low}, {high}))"),
            });
        }
        // Uniform sampling scales by `high - low`, which must itself be finite.
        if !(high - low).is_finite() {
            return Err(AugmentError::InvalidRange {
                axis,
                reason: format!("span of ({low}, {high}) overflows f32"),
            });
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> f32 {
        self.low
    }

    pub fn high(&self) -> f32 {
        self.high
    }

    /// Fair coin for the sign, then a uniform magnitude in `[low, high]`.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        let sign = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
        sign * rng.random_range(self.low..=self.high)
    }
}

// ============================================================================
// ShearSample
// ============================================================================

/// Shear factors drawn for one image. `None` leaves that axis untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShearSample {
    pub shear_x: Option<f32>,
    pub shear_y: Option<f32>,
}

impl ShearSample {
    /// The warps this sample performs, in application order (X before Y).
    pub fn transforms(&self) -> impl Iterator<Item = AffineTransform> {
        let x = self.shear_x.map(AffineTransform::shear_x);
        let y = self.shear_y.map(AffineTransform::shear_y);
        x.into_iter().chain(y)
    }
}

// ============================================================================
// RandomShear
// ============================================================================

/// Randomly shears images along X and/or Y.
///
/// For each image and each configured axis a sign is drawn by coin flip and
/// a magnitude uniformly from the axis range. The image is then warped with
/// the X-shear followed by the Y-shear; the two do not commute, so the order
/// is fixed.
///
/// # Example
/// ```ignore
/// let shear = RandomShear::builder()
///     .x(0.3)               // read as (0.0, 0.3)
///     .y((0.1, 0.2))
///     .fill_mode(FillMode::Constant)
///     .build()?;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let sample = shear.sample_transformation(&mut rng);
/// let sheared = shear.augment_image(image, &sample)?;
/// ```
#[derive(Debug, Clone)]
pub struct RandomShear<W = ProjectiveWarp> {
    x: Option<ShearRange>,
    y: Option<ShearRange>,
    config: AugmentationConfig,
    warp: W,
}

impl RandomShear<ProjectiveWarp> {
    /// Validates the ranges eagerly and warps with [`ProjectiveWarp`].
    pub fn new(
        x: Option<RangeSpec>,
        y: Option<RangeSpec>,
        config: AugmentationConfig,
    ) -> Result<Self, AugmentError> {
        Self::with_warp(x, y, config, ProjectiveWarp)
    }

    pub fn builder() -> RandomShearBuilder {
        RandomShearBuilder::default()
    }
}

impl<W: Warp> RandomShear<W> {
    pub fn with_warp(
        x: Option<RangeSpec>,
        y: Option<RangeSpec>,
        config: AugmentationConfig,
        warp: W,
    ) -> Result<Self, AugmentError> {
        Ok(Self {
            x: x.map(|spec| ShearRange::from_spec("x", spec)).transpose()?,
            y: y.map(|spec| ShearRange::from_spec("y", spec)).transpose()?,
            config,
            warp,
        })
    }

    pub fn x_range(&self) -> Option<ShearRange> {
        self.x
    }

    pub fn y_range(&self) -> Option<ShearRange> {
        self.y
    }

    pub fn config(&self) -> &AugmentationConfig {
        &self.config
    }

    /// Runs one single-image warp and checks the primitive kept the shape.
    fn warp_one(&self, image: Array3<f32>, transform: AffineTransform) -> Result<Array3<f32>> {
        let batch = image.insert_axis(Axis(0));
        let warped = self
            .warp
            .warp(batch.view(), &[transform], &self.config)
            .with_context(|| format!("Warp failed for transform {:?}", transform.as_array()))?;

        if warped.shape() != batch.shape() {
            return Err(AugmentError::ShapeMismatch {
                expected: batch.shape().to_vec(),
                actual: warped.shape().to_vec(),
            }
            .into());
        }
        Ok(warped.index_axis_move(Axis(0), 0))
    }
}

impl<W: Warp> Augmentation for RandomShear<W> {
    type Transformation = ShearSample;

    fn sample_transformation<R: Rng + ?Sized>(&self, rng: &mut R) -> ShearSample {
        let sample = ShearSample {
            shear_x: self.x.map(|range| range.sample(rng)),
            shear_y: self.y.map(|range| range.sample(rng)),
        };
        debug!(
            "sampled shear x={:?} y={:?}",
            sample.shear_x, sample.shear_y
        );
        sample
    }

    fn augment_image(&self, image: Array3<f32>, sample: &ShearSample) -> Result<Array3<f32>> {
        sample
            .transforms()
            .try_fold(image, |image, transform| self.warp_one(image, transform))
    }
}

// ============================================================================
// RandomShearBuilder
// ============================================================================

/// Builder for [`RandomShear`] with method chaining.
///
/// Ranges are validated in [`build`](Self::build).
#[derive(Debug, Default, Clone)]
pub struct RandomShearBuilder {
    x: Option<RangeSpec>,
    y: Option<RangeSpec>,
    config: AugmentationConfig,
}

impl RandomShearBuilder {
    /// X-axis range: a scalar `v` (read as `(0, v)`) or a `(low, high)` pair.
    pub fn x(mut self, range: impl Into<RangeSpec>) -> Self {
        self.x = Some(range.into());
        self
    }

    /// Y-axis range: a scalar `v` (read as `(0, v)`) or a `(low, high)` pair.
    pub fn y(mut self, range: impl Into<RangeSpec>) -> Self {
        self.y = Some(range.into());
        self
    }

    pub fn interpolation(mut self, interpolation: Interpolation) -> Self {
        self.config.interpolation = interpolation;
        self
    }

    pub fn fill_mode(mut self, fill_mode: FillMode) -> Self {
        self.config.fill_mode = fill_mode;
        self
    }

    pub fn fill_value(mut self, fill_value: f32) -> Self {
        self.config.fill_value = fill_value;
        self
    }

    pub fn build(self) -> Result<RandomShear, AugmentError> {
        RandomShear::new(self.x, self.y, self.config)
    }

    pub fn build_with_warp<W: Warp>(self, warp: W) -> Result<RandomShear<W>, AugmentError> {
        RandomShear::with_warp(self.x, self.y, self.config, warp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_scalar_range_normalizes_to_zero_based() -> Result<()> {
        let shear = RandomShear::builder().x(0.3).build()?;
        assert_eq!(shear.x_range(), Some(ShearRange::from_spec("x", RangeSpec::Pair(0.0, 0.3))?));
        assert_eq!(shear.y_range(), None);
        Ok(())
    }

    #[test]
    fn test_invalid_ranges_are_rejected() {
        let inverted = RandomShear::builder().x((0.5, 0.1)).build();
        assert!(matches!(
            inverted,
            Err(AugmentError::InvalidRange { axis: "x", .. })
        ));

        let negative = RandomShear::builder().y(-0.2).build();
        assert!(matches!(
            negative,
            Err(AugmentError::InvalidRange { axis: "y", .. })
        ));

        let nan = RandomShear::builder().x((0.0, f32::NAN)).build();
        assert!(matches!(nan, Err(AugmentError::InvalidRange { .. })));
    }

    #[test]
    fn test_overflowing_span_is_rejected() -> Result<()> {
        let wide = RandomShear::builder().x((-3.0e38, 3.0e38)).build();
        assert!(matches!(
            wide,
            Err(AugmentError::InvalidRange { axis: "x", .. })
        ));

        // The widest span that still fits samples without panicking.
        let shear = RandomShear::builder().y((0.0, f32::MAX)).build()?;
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..16 {
            let sample = shear.sample_transformation(&mut rng);
            assert!(sample.shear_y.is_some_and(f32::is_finite));
        }
        Ok(())
    }

    #[test]
    fn test_degenerate_range_samples_its_single_value() -> Result<()> {
        let shear = RandomShear::builder().x((0.25, 0.25)).build()?;
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..32 {
            let sample = shear.sample_transformation(&mut rng);
            assert_eq!(sample.shear_x.map(f32::abs), Some(0.25));
            assert_eq!(sample.shear_y, None);
        }
        Ok(())
    }

    #[test]
    fn test_both_signs_are_drawn() -> Result<()> {
        let shear = RandomShear::builder().x((0.1, 0.2)).y((0.1, 0.2)).build()?;
        let mut rng = StdRng::seed_from_u64(11);
        let samples: Vec<ShearSample> = (0..200)
            .map(|_| shear.sample_transformation(&mut rng))
            .collect();

        let axes: [fn(&ShearSample) -> Option<f32>; 2] = [|s| s.shear_x, |s| s.shear_y];
        for axis in axes {
            let values: Vec<f32> = samples.iter().filter_map(axis).collect();
            assert_eq!(values.len(), 200);
            assert!(values.iter().any(|&v| v < 0.0));
            assert!(values.iter().any(|&v| v > 0.0));
            assert!(values.iter().all(|v| (0.1..=0.2).contains(&v.abs())));
        }
        Ok(())
    }

    #[test]
    fn test_sample_transforms_are_ordered_x_then_y() {
        let sample = ShearSample {
            shear_x: Some(0.1),
            shear_y: Some(0.2),
        };
        let transforms: Vec<AffineTransform> = sample.transforms().collect();
        assert_eq!(
            transforms,
            vec![AffineTransform::shear_x(0.1), AffineTransform::shear_y(0.2)]
        );
        assert_eq!(ShearSample::default().transforms().count(), 0);
    }

    #[test]
    fn test_nearest_shear_moves_rows() -> Result<()> {
        // Column index as pixel value; shear_x = 1 shifts row `y` by `y` columns.
        let image = Array3::from_shape_fn((3, 4, 1), |(_, x, _)| x as f32);
        let shear = RandomShear::builder()
            .interpolation(Interpolation::Nearest)
            .fill_mode(FillMode::Constant)
            .fill_value(-1.0)
            .build()?;
        let sample = ShearSample {
            shear_x: Some(1.0),
            shear_y: None,
        };
        let out = shear.augment_image(image, &sample)?;

        let row = |y: usize| out.index_axis(Axis(0), y).iter().copied().collect::<Vec<_>>();
        assert_eq!(row(0), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(row(1), vec![1.0, 2.0, 3.0, -1.0]);
        assert_eq!(row(2), vec![2.0, 3.0, -1.0, -1.0]);
        Ok(())
    }
}
