//! Bounded, order-preserving async task pool.
//!
//! [`run_bounded`] maps an async unit of work over a collection with at most
//! `limit` units in flight. It uses a sliding window: the first `limit` items
//! are started together and every completion immediately claims the next
//! undispatched item.
//!
//! ```text
//! items:    [0] [1] [2] [3] [4]          limit = 2
//!
//! slot A:   ──0──────────┐  ──3────┐
//! slot B:   ──1────┐ ──2─┘─────────┘──4──
//! results:  [r0, r1, r2, r3, r4]      (always input order)
//! ```
//!
//! Everything runs inside the calling task; the units of work interleave at
//! their `.await` points. There is no retry, timeout or cancellation: the
//! first failing unit aborts the pool, dropping the units still in flight.

use std::future::Future;

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::trace;

/// Progress of a pool run, reported after each completed unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolProgress {
    /// Units finished so far
    pub completed: usize,
    /// Units in the run
    pub total: usize,
}

impl PoolProgress {
    /// Completed fraction in `[0, 1]`; an empty run counts as complete.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// Runs `task` over `items` with at most `limit` units in flight.
///
/// A `limit` of 0 starts every item at once. `task` receives each item with
/// its index. The returned vector is index-aligned with `items` whatever the
/// completion order. `on_progress` is called once per completed unit with a
/// monotonically increasing count.
///
/// # Errors
///
/// Returns the first error produced by a unit of work; remaining units are
/// dropped and no partial results are returned.
pub async fn run_bounded<T, R, E, F, Fut, P>(
    items: Vec<T>,
    limit: usize,
    mut task: F,
    mut on_progress: P,
) -> Result<Vec<R>, E>
where
    F: FnMut(T, usize) -> Fut,
    Fut: Future<Output = Result<R, E>>,
    P: FnMut(PoolProgress),
{
    let total = items.len();
    let limit = if limit == 0 { total } else { limit.min(total) };

    let mut results: Vec<Option<R>> = std::iter::repeat_with(|| None).take(total).collect();
    let mut queue = items.into_iter().enumerate();
    let mut pending = FuturesUnordered::new();

    for (index, item) in queue.by_ref().take(limit) {
        pending.push(indexed(index, task(item, index)));
    }
    trace!(total, limit, "Initial batch dispatched");

    let mut completed = 0usize;
    while let Some((index, result)) = pending.next().await {
        results[index] = Some(result?);
        completed += 1;
        on_progress(PoolProgress { completed, total });

        if let Some((next, item)) = queue.next() {
            pending.push(indexed(next, task(item, next)));
        }
    }

    Ok(results.into_iter().flatten().collect())
}

async fn indexed<Fut: Future>(index: usize, fut: Fut) -> (usize, Fut::Output) {
    (index, fut.await)
}
