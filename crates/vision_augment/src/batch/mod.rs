//! src/batch/mod.rs
//!
//! Reproducible augmentation of whole batches.
//!
//! `BatchAugmenter` runs an [`Augmentation`] over every image of a batch,
//! optionally on a pool of worker threads. Image `i` of epoch `e` always
//! draws from an RNG seeded with `seed + (e << 32) + i`, so for a fixed seed
//! the output is identical for any `num_workers`, and it always comes back
//! in input order.
//!
//! ```ignore
//! let config = BatchConfig::builder().num_workers(4).seed(42).build();
//! let augmenter = BatchAugmenter::new(shear, config);
//! let augmented = augmenter.augment_batch(images, epoch)?;
//! ```
//!
//! # Notes
//! - `num_workers = 0` processes the batch on the calling thread.
//! - Without a seed, a fresh base seed is drawn for every call.

mod pool;
pub mod seed;

use crate::transforms::Augmentation;
use anyhow::{anyhow, Context, Result};
use log::debug;
use ndarray::{Array3, Array4, Axis};
use rand::Rng;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use pool::WorkerPool;
use seed::{current_worker_id, rng_for};

/// Configuration for [`BatchAugmenter`].
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Number of worker threads (0 = calling thread only)
    pub num_workers: usize,
    /// Base seed for per-image RNGs
    pub seed: Option<u64>,
    /// Queued images per worker
    pub buffer_size: usize,
    /// Maximum wait for a single augmented image. Default: 30s
    pub timeout: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            num_workers: 0,
            seed: None,
            buffer_size: 2,
            timeout: Duration::from_secs(30),
        }
    }
}

impl BatchConfig {
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder::default()
    }
}

/// Builder for BatchConfig with method chaining
#[derive(Debug, Default)]
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    pub fn num_workers(mut self, workers: usize) -> Self {
        self.config.num_workers = workers;
        self
    }

    /// Fixes the base seed, making every epoch reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn buffer_size(mut self, size: usize) -> Self {
        self.config.buffer_size = size;
        self
    }

    /// - Too low: may fail batches during legitimately slow warps.
    /// - Too high: delays detection of stuck workers.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn build(self) -> BatchConfig {
        self.config
    }
}

/// Applies an [`Augmentation`] to each image of a batch with independent,
/// reproducible randomness.
#[derive(Debug)]
pub struct BatchAugmenter<A> {
    augmentation: Arc<A>,
    config: BatchConfig,
}

impl<A> BatchAugmenter<A>
where
    A: Augmentation + 'static,
{
    pub fn new(augmentation: A, config: BatchConfig) -> Self {
        Self {
            augmentation: Arc::new(augmentation),
            config,
        }
    }

    pub fn augmentation(&self) -> &A {
        &self.augmentation
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Augments every image; output order matches input order.
    pub fn augment_batch(&self, images: Vec<Array3<f32>>, epoch: usize) -> Result<Vec<Array3<f32>>> {
        let base_seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        debug!(
            "augmenting batch of {} images (epoch {}, workers {})",
            images.len(),
            epoch,
            self.config.num_workers
        );

        if self.config.num_workers == 0 || images.len() <= 1 {
            return images
                .into_iter()
                .enumerate()
                .map(|(index, image)| {
                    augment_one(&*self.augmentation, base_seed, epoch, index, image)
                        .with_context(|| format!("Failed to augment image {}", index))
                })
                .collect();
        }

        self.augment_parallel(images, base_seed, epoch)
    }

    /// Augments an `(N, H, W, C)` batch in place of a list of images.
    pub fn augment_stacked(&self, batch: Array4<f32>, epoch: usize) -> Result<Array4<f32>> {
        let images: Vec<Array3<f32>> = batch.outer_iter().map(|img| img.to_owned()).collect();
        if images.is_empty() {
            return Ok(batch);
        }
        let augmented = self.augment_batch(images, epoch)?;
        let views: Vec<_> = augmented.iter().map(|img| img.view()).collect();
        ndarray::stack(Axis(0), &views).context("Augmented images no longer share a shape")
    }

    fn augment_parallel(
        &self,
        images: Vec<Array3<f32>>,
        base_seed: u64,
        epoch: usize,
    ) -> Result<Vec<Array3<f32>>> {
        let total = images.len();
        let augmentation = Arc::clone(&self.augmentation);
        let pool = WorkerPool::new(
            self.config.num_workers.min(total),
            self.config.buffer_size,
            total,
            move |(index, image): (usize, Array3<f32>)| {
                debug!("worker {} augmenting image {}", current_worker_id(), index);
                // A panic would otherwise surface only as a recv timeout.
                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                    augment_one(&*augmentation, base_seed, epoch, index, image)
                }))
                .unwrap_or_else(|payload| {
                    Err(anyhow!(
                        "Augmentation panicked on worker {}: {}",
                        current_worker_id(),
                        panic_message(payload.as_ref())
                    ))
                });
                (index, result)
            },
        )?;

        for (index, image) in images.into_iter().enumerate() {
            pool.submit(index, (index, image))?;
        }

        let mut results: Vec<Option<Array3<f32>>> = vec![None; total];
        for _ in 0..total {
            let (index, result) = pool.recv(self.config.timeout)?;
            let image = result.with_context(|| format!("Failed to augment image {}", index))?;
            results[index] = Some(image);
        }

        results
            .into_iter()
            .enumerate()
            .map(|(index, image)| image.ok_or_else(|| anyhow!("Missing result for image {}", index)))
            .collect()
    }
}

fn augment_one<A: Augmentation + ?Sized>(
    augmentation: &A,
    base_seed: u64,
    epoch: usize,
    index: usize,
    image: Array3<f32>,
) -> Result<Array3<f32>> {
    let mut rng = rng_for(base_seed, epoch, index);
    let transformation = augmentation.sample_transformation(&mut rng);
    augmentation.augment_image(image, &transformation)
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
