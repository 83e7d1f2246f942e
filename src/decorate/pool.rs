//! Bounded concurrency pool

use futures::stream::{self, StreamExt, TryStreamExt};
use std::future::Future;

/// Run `operation` once per input with at most `concurrency` in flight.
///
/// Results come back in completion order. A `concurrency` of zero is
/// treated as one.
pub async fn run_bounded<I, T, F, Fut>(inputs: I, concurrency: usize, operation: F) -> Vec<T>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = T>,
{
    stream::iter(inputs)
        .map(operation)
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await
}

/// Like [`run_bounded`], but returns the first error as soon as it
/// completes. Operations still in flight are dropped and no new ones start.
pub async fn try_run_bounded<I, T, E, F, Fut>(
    inputs: I,
    concurrency: usize,
    operation: F,
) -> Result<Vec<T>, E>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    stream::iter(inputs)
        .map(operation)
        .buffer_unordered(concurrency.max(1))
        .try_collect()
        .await
}
