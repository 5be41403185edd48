use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// 以最大并发数 `max_concurrent` 执行一组future，返回结果顺序与输入一致
pub async fn do_parallel_with_limit<F, T>(futures: Vec<F>, max_concurrent: usize) -> Vec<T>
where
    F: Future<Output = T>,
{
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));

    let gated = futures.into_iter().map(|fut| {
        let semaphore = semaphore.clone();
        async move {
            // semaphore 不会被关闭，acquire 只会在关闭时失败
            let _permit = semaphore.acquire().await.ok();
            fut.await
        }
    });

    join_all(gated).await
}
