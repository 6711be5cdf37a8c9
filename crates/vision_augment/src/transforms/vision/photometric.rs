use crate::error::AugmentError;
use crate::transforms::Transform;
use anyhow::{ensure, Result};
use ndarray::{s, Array3, Zip};

/// 3×3 smoothing kernel used to build the "degenerate" image, normalized by 13.
const SMOOTH_KERNEL: [[f32; 3]; 3] = [[1.0, 1.0, 1.0], [1.0, 5.0, 1.0], [1.0, 1.0, 1.0]];
const SMOOTH_KERNEL_SUM: f32 = 13.0;

// ============================================================================
// Sharpen
// ============================================================================

/// Sharpens `(H, W, C)` images by blending towards a smoothed copy.
///
/// # Arguments:
/// - `value_range`: the `(low, high)` range of incoming pixel values,
///   typically `(0, 1)` or `(0, 255)`.
/// - `blend_factor`: in `[0, 1]`. `0.0` is a no-op, `1.0` uses the filtered
///   result entirely.
///
/// # Operation:
/// ```text
/// img       = rescale(input, value_range → [0, 255])
/// filtered  = clip(conv3x3(img, kernel / 13), 0, 255)   (interior pixels only)
/// out       = clip(img + blend_factor * (filtered - img), 0, 255)
/// output    = rescale(out, [0, 255] → value_range)
/// ```
/// The outermost rows and columns keep their original values.
///
/// # Example
/// ```ignore
/// let sharpen = Sharpen::new((0.0, 1.0), 0.5)?;
/// let out = sharpen.apply(image)?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Sharpen {
    value_range: (f32, f32),
    blend_factor: f32,
}

impl Default for Sharpen {
    fn default() -> Self {
        Self {
            value_range: (0.0, 255.0),
            blend_factor: 1.0,
        }
    }
}

impl Sharpen {
    pub fn new(value_range: (f32, f32), blend_factor: f32) -> Result<Self, AugmentError> {
        let (low, high) = value_range;
        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(AugmentError::InvalidValueRange { low, high });
        }
        if !(0.0..=1.0).contains(&blend_factor) {
            return Err(AugmentError::InvalidBlendFactor(blend_factor));
        }
        Ok(Self {
            value_range,
            blend_factor,
        })
    }

    pub fn value_range(&self) -> (f32, f32) {
        self.value_range
    }

    pub fn blend_factor(&self) -> f32 {
        self.blend_factor
    }

    /// Depthwise 3×3 "valid" convolution written into the interior of a copy.
    fn smooth(image: &Array3<f32>) -> Array3<f32> {
        let (height, width, _) = image.dim();
        let mut out = image.clone();
        if height < 3 || width < 3 {
            return out;
        }

        let mut interior = out.slice_mut(s![1..height - 1, 1..width - 1, ..]);
        interior.fill(0.0);
        for (ky, row) in SMOOTH_KERNEL.iter().enumerate() {
            for (kx, &weight) in row.iter().enumerate() {
                let window = image.slice(s![ky..height - 2 + ky, kx..width - 2 + kx, ..]);
                interior.scaled_add(weight / SMOOTH_KERNEL_SUM, &window);
            }
        }
        interior.mapv_inplace(|v| v.clamp(0.0, 255.0));
        out
    }
}

impl Transform<Array3<f32>, Array3<f32>> for Sharpen {
    fn apply(&self, image: Array3<f32>) -> Result<Array3<f32>> {
        ensure!(
            !image.is_empty(),
            AugmentError::InvalidImage(format!("empty image of shape {:?}", image.shape()))
        );
        if self.blend_factor == 0.0 {
            return Ok(image);
        }

        let original = transform_value_range(image, self.value_range, (0.0, 255.0));
        let degenerate = Self::smooth(&original);
        let blended = blend(&original, &degenerate, self.blend_factor);
        Ok(transform_value_range(blended, (0.0, 255.0), self.value_range))
    }
}

/// Linearly rescales pixel values from one range to another.
pub fn transform_value_range(
    image: Array3<f32>,
    original: (f32, f32),
    target: (f32, f32),
) -> Array3<f32> {
    if original == target {
        return image;
    }
    let scale = (target.1 - target.0) / (original.1 - original.0);
    image.mapv_into(|v| (v - original.0) * scale + target.0)
}

/// `from + factor * (to - from)`, clipped to `[0, 255]`.
pub fn blend(from: &Array3<f32>, to: &Array3<f32>, factor: f32) -> Array3<f32> {
    Zip::from(from)
        .and(to)
        .map_collect(|&a, &b| (a + factor * (b - a)).clamp(0.0, 255.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Dark image with a single bright pixel at (2, 2).
    fn spike(value: f32) -> Array3<f32> {
        let mut img = Array3::zeros((5, 5, 3));
        img.slice_mut(s![2, 2, ..]).fill(value);
        img
    }

    #[test]
    fn test_sharpen_preserves_shape() -> Result<()> {
        let img = Array3::from_elem((50, 50, 3), 2.0);
        let out = Sharpen::default().apply(img)?;
        assert_eq!(out.shape(), &[50, 50, 3]);
        Ok(())
    }

    #[test]
    fn test_constant_image_is_unchanged() -> Result<()> {
        let img = Array3::from_elem((6, 7, 3), 100.0);
        let out = Sharpen::default().apply(img.clone())?;
        for (a, b) in out.iter().zip(img.iter()) {
            assert!((a - b).abs() < 1e-3);
        }
        Ok(())
    }

    #[test]
    fn test_zero_blend_is_noop() -> Result<()> {
        let img = spike(255.0);
        let out = Sharpen::new((0.0, 255.0), 0.0)?.apply(img.clone())?;
        assert_eq!(out, img);
        Ok(())
    }

    #[test]
    fn test_full_blend_uses_filtered_image() -> Result<()> {
        let out = Sharpen::default().apply(spike(130.0))?;
        // Centre keeps 5/13 of itself, direct neighbours receive 1/13.
        assert!((out[[2, 2, 0]] - 50.0).abs() < 1e-3);
        assert!((out[[1, 2, 1]] - 10.0).abs() < 1e-3);
        // Borders are never filtered.
        assert_eq!(out[[0, 0, 2]], 0.0);
        Ok(())
    }

    #[test]
    fn test_value_range_round_trips() -> Result<()> {
        let unit = spike(130.0 / 255.0);
        let out = Sharpen::new((0.0, 1.0), 1.0)?.apply(unit)?;
        assert!((out[[2, 2, 0]] - 50.0 / 255.0).abs() < 1e-5);
        Ok(())
    }

    #[test]
    fn test_small_images_pass_through() -> Result<()> {
        let img = Array3::from_shape_fn((2, 2, 1), |(y, x, _)| (y * 2 + x) as f32);
        assert_eq!(Sharpen::default().apply(img.clone())?, img);
        Ok(())
    }

    #[test]
    fn test_invalid_parameters() {
        assert_eq!(
            Sharpen::new((1.0, 1.0), 0.5).unwrap_err(),
            AugmentError::InvalidValueRange {
                low: 1.0,
                high: 1.0
            }
        );
        assert_eq!(
            Sharpen::new((0.0, 1.0), 1.5).unwrap_err(),
            AugmentError::InvalidBlendFactor(1.5)
        );
    }
}
