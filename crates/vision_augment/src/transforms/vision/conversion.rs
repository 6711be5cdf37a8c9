use crate::error::AugmentError;
use crate::transforms::Transform;
use anyhow::{ensure, Context, Result};
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use ndarray::Array3;

// ============================================================================
// ToArray
// ============================================================================

/// Converts an image to an `(H, W, C)` f32 array with values in `[0, 255]`.
///
/// Channel Handling
/// | Input Format  | Output Shape |
/// |---------------|--------------|
/// | Grayscale (L) | `[H, W, 1]`  |
/// | RGB           | `[H, W, 3]`  |
/// | RGBA          | `[H, W, 4]`  |
/// | Other         | `[H, W, 3]`  |
#[derive(Debug, Clone, Copy)]
pub struct ToArray;

impl Transform<DynamicImage, Array3<f32>> for ToArray {
    fn apply(&self, img: DynamicImage) -> Result<Array3<f32>> {
        let (width, height) = (img.width() as usize, img.height() as usize);
        ensure!(
            width > 0 && height > 0,
            "Image dimensions must be positive (got {}x{})",
            width,
            height
        );

        let (channels, raw) = match img {
            DynamicImage::ImageLuma8(img) => (1, img.into_raw()),
            DynamicImage::ImageRgb8(img) => (3, img.into_raw()),
            DynamicImage::ImageRgba8(img) => (4, img.into_raw()),
            other => (3, other.to_rgb8().into_raw()),
        };

        let data = raw.into_iter().map(f32::from).collect();
        Array3::from_shape_vec((height, width, channels), data)
            .context("Pixel buffer does not match image dimensions")
    }
}

// ============================================================================
// ToImage
// ============================================================================

/// Converts an `(H, W, C)` array in `[0, 255]` back to an 8-bit image,
/// rounding and clamping each value. Supports 1, 3 and 4 channels.
#[derive(Debug, Clone, Copy)]
pub struct ToImage;

impl Transform<Array3<f32>, DynamicImage> for ToImage {
    fn apply(&self, array: Array3<f32>) -> Result<DynamicImage> {
        let (height, width, channels) = array.dim();
        let width = u32::try_from(width).context("Image width exceeds u32")?;
        let height = u32::try_from(height).context("Image height exceeds u32")?;

        let raw: Vec<u8> = array
            .as_standard_layout()
            .iter()
            .map(|&v| v.round().clamp(0.0, 255.0) as u8)
            .collect();

        let image = match channels {
            1 => GrayImage::from_raw(width, height, raw).map(DynamicImage::ImageLuma8),
            3 => RgbImage::from_raw(width, height, raw).map(DynamicImage::ImageRgb8),
            4 => RgbaImage::from_raw(width, height, raw).map(DynamicImage::ImageRgba8),
            _ => {
                return Err(AugmentError::InvalidImage(format!(
                    "cannot encode {channels} channels as an 8-bit image"
                ))
                .into())
            }
        };
        image.context("Pixel buffer does not match image dimensions")
    }
}
