use anyhow::{Context, Result};
use std::marker::PhantomData;

/// A deterministic, composable processing step from `I` to `O`.
///
/// Steps chain with `.then(...)` into a single inlined pipeline:
///
/// ```ignore
/// let pipeline = ToArray
///     .then(Randomized::new(RandomShear::builder().x(0.2).build()?, 42))
///     .then(Sharpen::default())
///     .then(ToImage);
/// ```
///
/// `then()` requires the output type of `self` to match the input type of
/// `next`, and both to be `Send`.
pub trait Transform<I, O>: Send + Sync {
    fn apply(&self, input: I) -> Result<O>;

    #[inline]
    fn then<T, M>(self, next: T) -> Chain<Self, T, O>
    where
        Self: Sized,
        T: Transform<O, M>,
        O: Send,
        M: Send,
    {
        Chain::new(self, next)
    }
}

/// Two transforms run back to back (`A` then `B`).
/// `PhantomData<M>` pins the intermediate type.
#[derive(Debug)]
pub struct Chain<A, B, M> {
    first: A,
    second: B,
    _marker: PhantomData<fn() -> M>,
}

impl<A, B, M> Chain<A, B, M> {
    /// Prefer [`Transform::then`]; `Chain::new` is for pipelines assembled
    /// from configuration at runtime.
    pub fn new(first: A, second: B) -> Self {
        Self {
            first,
            second,
            _marker: PhantomData,
        }
    }
}

impl<I, M, O, A, B> Transform<I, O> for Chain<A, B, M>
where
    A: Transform<I, M>,
    B: Transform<M, O>,
    M: Send,
{
    fn apply(&self, input: I) -> Result<O> {
        self.first
            .apply(input)
            .and_then(|mid| self.second.apply(mid))
            .with_context(|| {
                format!(
                    "Transform chain failed: {} → {}",
                    short_type_name::<A>(),
                    short_type_name::<B>(),
                )
            })
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
