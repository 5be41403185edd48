//! 正文检索 - 结构化抽取 → 直接抓取 → 合成兜底，对外永不失败

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{ExtractionConfig, FetchConfig};
use crate::error::FetchError;
use crate::types::{ScrapedContent, SearchResult};

pub mod batch;
pub mod direct;
pub mod extraction;
pub mod fallback;

pub use batch::BatchedFetcher;
pub use direct::DirectFetch;
pub use extraction::ExtractionService;
pub use fallback::FallbackComposer;

/// 单个检索层级
#[async_trait]
pub trait RetrievalStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, result: &SearchResult) -> Result<ScrapedContent, FetchError>;
}

/// 按层级顺序尝试检索，全部失败时返回合成正文
pub struct ContentRetriever {
    tiers: Vec<Arc<dyn RetrievalStrategy>>,
    fallback: FallbackComposer,
}

impl ContentRetriever {
    pub fn new(tiers: Vec<Arc<dyn RetrievalStrategy>>) -> Self {
        Self {
            tiers,
            fallback: FallbackComposer::new(),
        }
    }

    /// 层级在构造时根据凭据与配置一次性确定
    pub fn from_config(extraction: &ExtractionConfig, fetch: &FetchConfig) -> Result<Self> {
        let mut tiers: Vec<Arc<dyn RetrievalStrategy>> = Vec::new();
        if let Some(api_key) = extraction.credential() {
            tiers.push(Arc::new(ExtractionService::new(extraction, api_key, fetch)?));
        }
        if fetch.direct_fetch_enabled {
            tiers.push(Arc::new(DirectFetch::new(fetch)?));
        }

        let names: Vec<&str> = tiers.iter().map(|t| t.name()).collect();
        tracing::info!("📄 正文检索层级: {:?} → fallback", names);
        Ok(Self::new(tiers))
    }

    pub fn tier_names(&self) -> Vec<&'static str> {
        self.tiers.iter().map(|t| t.name()).collect()
    }

    pub async fn retrieve(&self, result: &SearchResult) -> ScrapedContent {
        let mut failures = Vec::new();

        for tier in &self.tiers {
            match tier.fetch(result).await {
                Ok(mut content) => {
                    content.success = true;
                    if !failures.is_empty() {
                        content.error = Some(failures.join("; "));
                    }
                    return content;
                }
                Err(e) => {
                    tracing::debug!("{} 检索 {} 失败: {}", tier.name(), result.url, e);
                    failures.push(format!("{}: {}", tier.name(), e));
                }
            }
        }

        let mut content = self.fallback.compose(result);
        if !failures.is_empty() {
            tracing::warn!("⚠️ {} 检索失败，使用合成正文", result.url);
            content.error = Some(failures.join("; "));
        }
        content
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{EchoTier, FailingTier};
    use super::*;
    use crate::types::ContentOrigin;
    use std::sync::atomic::Ordering;

    fn sample() -> SearchResult {
        SearchResult::new(
            "Acme Corp breach",
            "https://news.example/acme",
            "Acme Corp disclosed a breach.",
        )
    }

    #[tokio::test]
    async fn test_first_successful_tier_wins() {
        let failing = Arc::new(FailingTier::new("extraction"));
        let retriever = ContentRetriever::new(vec![failing.clone(), Arc::new(EchoTier)]);

        let content = retriever.retrieve(&sample()).await;
        assert!(content.success);
        assert_eq!(content.origin, ContentOrigin::Direct);
        assert_eq!(content.content, "page body of https://news.example/acme");
        assert!(content.error.unwrap().starts_with("extraction:"));
        assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_all_tiers_failing_yields_fallback() {
        let retriever = ContentRetriever::new(vec![
            Arc::new(FailingTier::new("extraction")),
            Arc::new(FailingTier::new("direct")),
        ]);

        let content = retriever.retrieve(&sample()).await;
        assert!(content.success);
        assert_eq!(content.origin, ContentOrigin::Fallback);
        assert!(content.content.contains("Acme Corp disclosed a breach."));
        let error = content.error.unwrap();
        assert!(error.contains("extraction:"));
        assert!(error.contains("direct:"));
    }

    #[tokio::test]
    async fn test_no_tiers_goes_straight_to_fallback() {
        let retriever = ContentRetriever::new(vec![]);
        let content = retriever.retrieve(&sample()).await;
        assert!(content.success);
        assert_eq!(content.origin, ContentOrigin::Fallback);
        assert!(content.error.is_none());
    }

    #[test]
    fn test_from_config_selects_tiers() {
        let fetch = FetchConfig::default();
        let retriever = ContentRetriever::from_config(&ExtractionConfig::default(), &fetch).unwrap();
        assert_eq!(retriever.tier_names(), vec!["direct"]);

        let extraction = ExtractionConfig {
            api_key: Some("fc-key".to_string()),
            ..Default::default()
        };
        let offline = FetchConfig {
            direct_fetch_enabled: false,
            ..Default::default()
        };
        let retriever = ContentRetriever::from_config(&extraction, &offline).unwrap();
        assert_eq!(retriever.tier_names(), vec!["extraction"]);
    }
}
