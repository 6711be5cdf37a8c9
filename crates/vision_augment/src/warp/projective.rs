use super::border::map_coordinate;
use super::{AffineTransform, Warp};
use crate::config::{AugmentationConfig, FillMode, Interpolation};
use crate::error::AugmentError;
use ndarray::{s, Array4, ArrayView3, ArrayView4, ArrayViewMut3, Axis};

/// CPU reference implementation of [`Warp`].
///
/// Every output pixel is mapped back through its image's transform, folded
/// into the image by the fill mode, then interpolated. Channels share the
/// same source location.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectiveWarp;

impl Warp for ProjectiveWarp {
    fn warp(
        &self,
        images: ArrayView4<'_, f32>,
        transforms: &[AffineTransform],
        config: &AugmentationConfig,
    ) -> Result<Array4<f32>, AugmentError> {
        let batch = images.len_of(Axis(0));
        if transforms.len() != batch {
            return Err(AugmentError::TransformCount {
                images: batch,
                transforms: transforms.len(),
            });
        }

        let mut output = Array4::<f32>::zeros(images.raw_dim());
        for ((out, src), transform) in output
            .outer_iter_mut()
            .zip(images.outer_iter())
            .zip(transforms)
        {
            warp_single(src, out, transform, config);
        }
        Ok(output)
    }
}

fn warp_single(
    src: ArrayView3<'_, f32>,
    mut out: ArrayViewMut3<'_, f32>,
    transform: &AffineTransform,
    config: &AugmentationConfig,
) {
    let (height, width, channels) = out.dim();
    for y in 0..height {
        for x in 0..width {
            let Some((in_x, in_y)) = transform.apply_to(x as f32, y as f32) else {
                out.slice_mut(s![y, x, ..]).fill(config.fill_value);
                continue;
            };
            if config.fill_mode == FillMode::Constant
                && !(within_reach(in_x, width) && within_reach(in_y, height))
            {
                out.slice_mut(s![y, x, ..]).fill(config.fill_value);
                continue;
            }
            let sx = map_coordinate(in_x, width, config.fill_mode);
            let sy = map_coordinate(in_y, height, config.fill_mode);
            for c in 0..channels {
                out[[y, x, c]] = match config.interpolation {
                    Interpolation::Nearest => sample_nearest(&src, sx, sy, c, config.fill_value),
                    Interpolation::Bilinear => sample_bilinear(&src, sx, sy, c, config.fill_value),
                };
            }
        }
    }
}

/// Whether a source coordinate has any pixel within one step of it.
///
/// Past that, every interpolation tap is fill. Far-off coordinates lose
/// their fractional part in f32, which would zero the bilinear weights.
fn within_reach(coord: f32, len: usize) -> bool {
    coord > -1.0 && coord < len as f32
}

fn sample_nearest(src: &ArrayView3<'_, f32>, x: f32, y: f32, c: usize, fill: f32) -> f32 {
    read_with_fill(src, x.round() as isize, y.round() as isize, c, fill)
}

fn sample_bilinear(src: &ArrayView3<'_, f32>, x: f32, y: f32, c: usize, fill: f32) -> f32 {
    let x0 = x.floor();
    let y0 = y.floor();
    let x1 = x0 + 1.0;
    let y1 = y0 + 1.0;

    let (xi0, yi0) = (x0 as isize, y0 as isize);
    let (xi1, yi1) = (xi0 + 1, yi0 + 1);

    let top = (x1 - x) * read_with_fill(src, xi0, yi0, c, fill)
        + (x - x0) * read_with_fill(src, xi1, yi0, c, fill);
    let bottom = (x1 - x) * read_with_fill(src, xi0, yi1, c, fill)
        + (x - x0) * read_with_fill(src, xi1, yi1, c, fill);
    (y1 - y) * top + (y - y0) * bottom
}

/// Reads a pixel, substituting `fill` outside the image.
///
/// Non-constant fill modes have already folded coordinates into range, so
/// only bilinear's `+1` neighbour can land here out of bounds, and always
/// with zero weight.
fn read_with_fill(src: &ArrayView3<'_, f32>, x: isize, y: isize, c: usize, fill: f32) -> f32 {
    let (height, width, _) = src.dim();
    if x < 0 || y < 0 || x >= width as isize || y >= height as isize {
        return fill;
    }
    src[[y as usize, x as usize, c]]
}
