use std::sync::Arc;
use std::time::Duration;

use super::ContentRetriever;
use crate::config::FetchConfig;
use crate::types::{ScrapedContent, SearchResult};
use crate::utils::threads::do_parallel_with_limit;

/// 分批并发检索：每批 `batch_width` 个并发，批次之间固定间隔
#[derive(Clone)]
pub struct BatchedFetcher {
    retriever: Arc<ContentRetriever>,
    batch_width: usize,
    batch_delay: Duration,
}

impl BatchedFetcher {
    pub fn new(retriever: Arc<ContentRetriever>, batch_width: usize, batch_delay: Duration) -> Self {
        Self {
            retriever,
            batch_width: batch_width.max(1),
            batch_delay,
        }
    }

    pub fn from_config(retriever: Arc<ContentRetriever>, config: &FetchConfig) -> Self {
        Self::new(
            retriever,
            config.batch_width,
            Duration::from_millis(config.batch_delay_ms),
        )
    }

    /// 输出与输入等长且顺序一致
    pub async fn fetch_all(&self, results: &[SearchResult]) -> Vec<ScrapedContent> {
        let mut scraped = Vec::with_capacity(results.len());
        let batch_count = results.len().div_ceil(self.batch_width);

        for (index, batch) in results.chunks(self.batch_width).enumerate() {
            tracing::debug!(
                "📥 检索第 {}/{} 批，共 {} 个来源",
                index + 1,
                batch_count,
                batch.len()
            );

            let futures: Vec<_> = batch
                .iter()
                .map(|result| self.retriever.retrieve(result))
                .collect();
            scraped.extend(do_parallel_with_limit(futures, self.batch_width).await);

            if index + 1 < batch_count && !self.batch_delay.is_zero() {
                tokio::time::sleep(self.batch_delay).await;
            }
        }

        scraped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::test_support::{EchoTier, FailingTier};
    use crate::types::ContentOrigin;
    use std::time::Instant;

    fn results(n: usize) -> Vec<SearchResult> {
        (0..n)
            .map(|i| {
                SearchResult::new(
                    format!("Source {}", i),
                    format!("https://news.example/{}", i),
                    format!("snippet {}", i),
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_output_matches_input_order_across_batches() {
        let retriever = Arc::new(ContentRetriever::new(vec![Arc::new(EchoTier)]));
        let fetcher = BatchedFetcher::new(retriever, 3, Duration::ZERO);

        let input = results(7);
        let scraped = fetcher.fetch_all(&input).await;

        assert_eq!(scraped.len(), input.len());
        for (result, content) in input.iter().zip(&scraped) {
            assert_eq!(result.url, content.url);
        }
    }

    #[tokio::test]
    async fn test_all_failures_still_yield_one_item_per_input() {
        let retriever = Arc::new(ContentRetriever::new(vec![
            Arc::new(FailingTier::new("extraction")),
            Arc::new(FailingTier::new("direct")),
        ]));
        let fetcher = BatchedFetcher::new(retriever, 3, Duration::ZERO);

        for n in [0, 1, 3, 5, 10] {
            let scraped = fetcher.fetch_all(&results(n)).await;
            assert_eq!(scraped.len(), n);
            assert!(scraped.iter().all(|c| c.success));
            assert!(scraped.iter().all(|c| c.origin == ContentOrigin::Fallback));
        }
    }

    #[tokio::test]
    async fn test_delay_only_between_batches() {
        let retriever = Arc::new(ContentRetriever::new(vec![Arc::new(EchoTier)]));
        let fetcher = BatchedFetcher::new(retriever, 2, Duration::from_millis(50));

        // 5 个来源分 3 批，只有两次间隔
        let started = Instant::now();
        fetcher.fetch_all(&results(5)).await;
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(100));

        let started = Instant::now();
        fetcher.fetch_all(&results(2)).await;
        assert!(started.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn test_zero_width_is_clamped() {
        let retriever = Arc::new(ContentRetriever::new(vec![]));
        let fetcher = BatchedFetcher::new(retriever, 0, Duration::ZERO);
        assert_eq!(fetcher.batch_width, 1);
    }
}
