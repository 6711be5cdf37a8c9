pub mod core;
pub mod random;
pub mod vision;

pub use self::core::{Chain, Transform};
pub use self::random::{Augmentation, Randomized};
