#![allow(dead_code)]

use ndarray::{Array3, Array4, ArrayView4};
use std::sync::atomic::{AtomicUsize, Ordering};
use vision_augment::{AffineTransform, AugmentError, AugmentationConfig, Warp};

/// `(H, W, C)` image whose pixel value encodes its position: `100*y + 10*x + c + 1`.
pub fn marker_image(height: usize, width: usize, channels: usize) -> Array3<f32> {
    Array3::from_shape_fn((height, width, channels), |(y, x, c)| {
        (100 * y + 10 * x + c + 1) as f32
    })
}

/// Warp that returns its input untouched and counts calls.
#[derive(Debug, Default)]
pub struct CountingWarp {
    pub calls: AtomicUsize,
}

impl CountingWarp {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Warp for CountingWarp {
    fn warp(
        &self,
        images: ArrayView4<'_, f32>,
        _transforms: &[AffineTransform],
        _config: &AugmentationConfig,
    ) -> Result<Array4<f32>, AugmentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(images.to_owned())
    }
}

/// Warp that breaks its contract by dropping the last row.
#[derive(Debug, Default)]
pub struct CroppingWarp;

impl Warp for CroppingWarp {
    fn warp(
        &self,
        images: ArrayView4<'_, f32>,
        _transforms: &[AffineTransform],
        _config: &AugmentationConfig,
    ) -> Result<Array4<f32>, AugmentError> {
        let height = images.shape()[1];
        Ok(images
            .slice(ndarray::s![.., ..height.saturating_sub(1), .., ..])
            .to_owned())
    }
}
