//! Per-image seeding and thread-local worker identification.
//!
//! Every image gets its own RNG derived from the batch seed, the epoch and
//! the image's position, so results do not depend on which worker (or how
//! many workers) processed it.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::Cell;

thread_local! {
    /// Worker ID of the current thread (0 outside a worker pool).
    pub static WORKER_ID: Cell<usize> = const { Cell::new(0) };
}

/// Seed formula: `base_seed + (epoch << 32) + index`.
pub fn derive_seed(base_seed: u64, epoch: usize, index: usize) -> u64 {
    base_seed
        .wrapping_add((epoch as u64) << 32)
        .wrapping_add(index as u64)
}

/// RNG for image `index` of `epoch`.
pub fn rng_for(base_seed: u64, epoch: usize, index: usize) -> StdRng {
    StdRng::seed_from_u64(derive_seed(base_seed, epoch, index))
}

pub fn current_worker_id() -> usize {
    WORKER_ID.with(Cell::get)
}
