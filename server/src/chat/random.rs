//! Random selection among candidate replies.
//!
//! The resolver never calls `rand` directly; it asks a `RandomSource` for an
//! index. Production uses `ThreadRandom`, tests inject `FixedIndex` to make
//! the chosen reply predictable.
use rand::Rng;

/// Source of uniformly distributed indices.
pub trait RandomSource: Send + Sync {
    /// Returns an index in `0..len`. Callers never pass `len == 0`.
    fn index(&self, len: usize) -> usize;
}

/// Uniform choice backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Always picks the same position, clamped to the last element.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedIndex(pub usize);

#[cfg(test)]
impl RandomSource for FixedIndex {
    fn index(&self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}

/// Picks one element of a non-empty slice; `None` for an empty slice.
pub fn choose<'a, T>(random: &dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let idx = random.index(items.len()).min(items.len() - 1);
    items.get(idx)
}
