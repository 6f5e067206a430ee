#[cfg(test)]
mod tests {
    use crate::tools::batch::batch_ordered;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[tokio::test]
    async fn test_batch_basic() {
        let items = vec![1, 2, 3, 4, 5];
        let results = batch_ordered(items, 2, |n| async move { n * 2 }).await;
        assert_eq!(results, vec![2, 4, 6, 8, 10]);
    }

    #[tokio::test]
    async fn test_batch_keeps_input_order_when_later_items_finish_first() {
        let items = vec![30u64, 5, 20, 1];

        let results = batch_ordered(items, 4, |n| async move {
            tokio::time::sleep(tokio::time::Duration::from_millis(n)).await;
            n
        })
        .await;

        assert_eq!(results, vec![30, 5, 20, 1]);
    }

    #[tokio::test]
    async fn test_batch_empty() {
        let items: Vec<i32> = vec![];
        let results = batch_ordered(items, 5, |n| async move { n }).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_batch_zero_concurrency_still_runs() {
        let results = batch_ordered(vec![1, 2], 0, |n| async move { n }).await;
        assert_eq!(results, vec![1, 2]);
    }

    async fn max_in_flight(concurrency: usize) -> usize {
        let max_concurrent = Arc::new(Mutex::new(0));
        let current = Arc::new(Mutex::new(0));

        let items = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

        let results = batch_ordered(items, concurrency, |_n| {
            let max_concurrent = Arc::clone(&max_concurrent);
            let current = Arc::clone(&current);

            async move {
                {
                    let mut curr = current.lock().await;
                    *curr += 1;
                    let mut max = max_concurrent.lock().await;
                    *max = (*max).max(*curr);
                }

                tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

                {
                    let mut curr = current.lock().await;
                    *curr -= 1;
                }

                42
            }
        })
        .await;

        assert_eq!(results.len(), 10);
        let max = *max_concurrent.lock().await;
        max
    }

    #[tokio::test]
    async fn test_batch_concurrency_limit() {
        let max = max_in_flight(3).await;
        assert!(max <= 3, "Max concurrent was {}, expected <= 3", max);
    }

    #[tokio::test]
    async fn test_batch_concurrency_one_is_sequential() {
        assert_eq!(max_in_flight(1).await, 1);
    }
}
