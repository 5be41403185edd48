use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use super::{SearchProvider, SyntheticSearch};
use crate::config::SearchConfig;
use crate::error::FetchError;
use crate::types::SearchResult;

/// 网页搜索API响应
#[derive(Debug, Deserialize, Default)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    link: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    favicon: Option<String>,
}

impl From<OrganicResult> for SearchResult {
    fn from(item: OrganicResult) -> Self {
        Self {
            title: item.title,
            url: item.link,
            snippet: item.snippet,
            published_date: item.date,
            icon: item.favicon,
        }
    }
}

/// 真实网页搜索，调用失败时退回合成结果
pub struct WebSearch {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    results_per_query: usize,
    fallback: SyntheticSearch,
}

impl WebSearch {
    pub fn new(config: &SearchConfig, api_key: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key: api_key.to_string(),
            results_per_query: config.results_per_query,
            fallback: SyntheticSearch::new(),
        })
    }

    async fn query_api(&self, query: &str) -> Result<Vec<SearchResult>, FetchError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .json(&serde_json::json!({
                "q": query,
                "num": self.results_per_query,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Api {
                status: response.status().as_u16(),
            });
        }

        let payload: SearchResponse = response.json().await?;
        let results: Vec<SearchResult> = payload
            .organic
            .into_iter()
            .filter(|item| !item.link.trim().is_empty())
            .map(SearchResult::from)
            .collect();

        if results.is_empty() {
            return Err(FetchError::Unusable("no organic results".to_string()));
        }
        Ok(results)
    }
}

#[async_trait]
impl SearchProvider for WebSearch {
    fn name(&self) -> &'static str {
        "web"
    }

    async fn search(&self, query: &str) -> Vec<SearchResult> {
        match self.query_api(query).await {
            Ok(results) => {
                tracing::debug!("搜索 [{}] 返回 {} 条结果", query, results.len());
                results
            }
            Err(e) => {
                tracing::warn!("⚠️ 搜索 [{}] 失败，使用合成结果: {}", query, e);
                self.fallback.generate(query)
            }
        }
    }
}
