use anyhow::Result;
use std::sync::Arc;

use crate::config::Config;
use crate::research::damage::DamageModel;
use crate::retrieval::{BatchedFetcher, ContentRetriever};
use crate::search::{SearchProvider, build_search_provider};

/// 调研阶段共享的依赖
#[derive(Clone)]
pub struct ResearchContext {
    /// 搜索策略
    pub search: Arc<dyn SearchProvider>,
    /// 分批检索器
    pub fetcher: BatchedFetcher,
    /// 损失估算模型
    pub damage_model: DamageModel,
}

impl ResearchContext {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        fetcher: BatchedFetcher,
        damage_model: DamageModel,
    ) -> Self {
        Self {
            search,
            fetcher,
            damage_model,
        }
    }

    /// 根据配置创建调研上下文
    pub fn from_config(config: &Config) -> Result<Self> {
        let search = build_search_provider(&config.search)?;
        let retriever = Arc::new(ContentRetriever::from_config(
            &config.extraction,
            &config.fetch,
        )?);
        let fetcher = BatchedFetcher::from_config(retriever, &config.fetch);
        let damage_model = DamageModel::new(config.damage.clone());

        Ok(Self::new(search, fetcher, damage_model))
    }
}
