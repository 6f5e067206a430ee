//! Batch Tools

mod tests;

use futures_util::stream::{self, StreamExt};

/// Batch execute async operations with bounded concurrency.
///
/// Results come back in the order of `items`, whatever order the futures
/// finish in. A concurrency of 0 is treated as 1.
pub async fn batch_ordered<T, F, Fut, R>(items: Vec<T>, concurrency: usize, operation: F) -> Vec<R>
where
    F: Fn(T) -> Fut,
    Fut: std::future::Future<Output = R>,
{
    stream::iter(items)
        .map(operation)
        .buffered(concurrency.max(1))
        .collect()
        .await
}
