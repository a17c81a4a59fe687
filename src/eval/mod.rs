//! Position evaluation.
//!
//! Scores hypothetical waves against the current board. The danger
//! evaluator estimates how exposed our side is to the opponent's next
//! wave; the offensive search in `search` reuses the candidate fan-out
//! defined here.

pub mod danger;

pub use danger::{compute_danger, DangerReport};

use rayon::prelude::*;

/// Evaluates `f` over every candidate, in parallel when `threads > 1`.
///
/// Results come back in candidate order regardless of thread count, so
/// any reduction over them matches the sequential run exactly.
pub(crate) fn map_candidates<T, R, F>(candidates: &[T], threads: usize, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    if threads <= 1 || candidates.len() < 2 {
        return candidates.iter().map(&f).collect();
    }
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(|| candidates.par_iter().map(&f).collect()),
        Err(err) => {
            tracing::warn!(%err, threads, "failed to build worker pool; evaluating sequentially");
            candidates.iter().map(&f).collect()
        }
    }
}
