//! Draw sampler for community raffles.
//!
//! Selects a uniformly random, ordered subset of a pool without replacement.
//! The random source is injected as any [`rand::Rng`], so callers decide
//! between `rand::thread_rng()` in production and a seeded or scripted
//! generator in tests.
//!
//! The first element of a draw is the headline winner; the presentation
//! layer spins the wheel towards it.

use rand::Rng;

/// Errors returned by [`draw`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DrawError {
    /// The pool contained no entries to draw from.
    #[error("cannot draw from an empty pool")]
    EmptyPool,
}

/// Clamp a requested winner count into `[1, pool_len]`.
///
/// Out-of-range requests never fail: anything below one becomes one and
/// anything above the pool size becomes the pool size. An empty pool yields
/// zero.
#[must_use]
pub fn clamp_count(requested: i64, pool_len: usize) -> usize {
    if pool_len == 0 {
        return 0;
    }
    let requested = usize::try_from(requested.max(1)).unwrap_or(usize::MAX);
    requested.min(pool_len)
}

/// Draw `count` entries from `pool` without replacement.
///
/// Each step picks a uniform index over the entries still remaining, removes
/// that entry and appends it to the result. Every ordered subset of the
/// clamped size is equally likely given a uniform `rng`.
///
/// # Errors
///
/// Returns [`DrawError::EmptyPool`] if `pool` is empty.
pub fn draw<T, R>(pool: &[T], count: i64, rng: &mut R) -> Result<Vec<T>, DrawError>
where
    T: Clone,
    R: Rng + ?Sized,
{
    if pool.is_empty() {
        return Err(DrawError::EmptyPool);
    }

    let target = clamp_count(count, pool.len());
    let mut remaining = pool.to_vec();
    let mut winners = Vec::with_capacity(target);

    while winners.len() < target && !remaining.is_empty() {
        let idx = rng.gen_range(0..remaining.len());
        winners.push(remaining.remove(idx));
    }

    Ok(winners)
}
