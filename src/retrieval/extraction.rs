use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::RetrievalStrategy;
use crate::config::{ExtractionConfig, FetchConfig};
use crate::error::FetchError;
use crate::types::{ContentOrigin, ScrapedContent, SearchResult};
use crate::utils::text::truncate_chars;

#[derive(Debug, Deserialize)]
struct ExtractionResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<ExtractionData>,
}

#[derive(Debug, Deserialize)]
struct ExtractionData {
    #[serde(default)]
    markdown: Option<String>,
    #[serde(default)]
    metadata: Option<ExtractionMetadata>,
}

#[derive(Debug, Deserialize)]
struct ExtractionMetadata {
    #[serde(default)]
    title: Option<String>,
}

/// 结构化正文抽取服务
pub struct ExtractionService {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    max_body_chars: usize,
}

impl ExtractionService {
    pub fn new(config: &ExtractionConfig, api_key: &str, fetch: &FetchConfig) -> Result<Self> {
        // 抽取服务超时为直接抓取的三倍
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(fetch.timeout_seconds * 3))
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key: api_key.to_string(),
            max_body_chars: fetch.max_body_chars,
        })
    }

    fn build_content(
        &self,
        result: &SearchResult,
        response: ExtractionResponse,
    ) -> Result<ScrapedContent, FetchError> {
        let data = match response.data {
            Some(data) if response.success => data,
            _ => return Err(FetchError::Unusable("extraction unsuccessful".to_string())),
        };

        let markdown = data.markdown.unwrap_or_default();
        if markdown.trim().is_empty() {
            return Err(FetchError::Unusable("empty markdown".to_string()));
        }

        let title = data
            .metadata
            .and_then(|m| m.title)
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| result.title.clone());

        Ok(ScrapedContent {
            url: result.url.clone(),
            title,
            content: truncate_chars(markdown.trim(), self.max_body_chars),
            success: true,
            error: None,
            origin: ContentOrigin::Extraction,
        })
    }
}

#[async_trait]
impl RetrievalStrategy for ExtractionService {
    fn name(&self) -> &'static str {
        "extraction"
    }

    async fn fetch(&self, result: &SearchResult) -> Result<ScrapedContent, FetchError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "url": result.url,
                "formats": ["markdown"],
                "onlyMainContent": true,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Api {
                status: response.status().as_u16(),
            });
        }

        let payload: ExtractionResponse = response.json().await?;
        self.build_content(result, payload)
    }
}
