//! 网页搜索 - 根据配置在构造时选定搜索策略

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::config::SearchConfig;
use crate::types::SearchResult;

pub mod synthetic;
pub mod web;

pub use synthetic::{ContentCategory, SyntheticSearch};
pub use web::WebSearch;

/// 搜索策略，任何实现都不允许向外抛出错误
#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// 返回按相关度排序的候选来源
    async fn search(&self, query: &str) -> Vec<SearchResult>;
}

/// 配置了搜索API KEY时使用真实搜索（失败时内部兜底），否则直接使用合成结果
pub fn build_search_provider(config: &SearchConfig) -> Result<Arc<dyn SearchProvider>> {
    match config.credential() {
        Some(api_key) => {
            tracing::info!("🔎 已启用网页搜索: {}", config.endpoint);
            Ok(Arc::new(WebSearch::new(config, api_key)?))
        }
        None => {
            tracing::info!("🔎 未配置搜索API KEY，使用合成搜索结果");
            Ok(Arc::new(SyntheticSearch::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_credential_uses_synthetic() {
        let provider = build_search_provider(&SearchConfig::default()).unwrap();
        assert_eq!(provider.name(), "synthetic");
    }

    #[test]
    fn test_build_with_credential_uses_web() {
        let config = SearchConfig {
            api_key: Some("key".to_string()),
            ..Default::default()
        };
        let provider = build_search_provider(&config).unwrap();
        assert_eq!(provider.name(), "web");
    }
}
