//! LLM客户端 - 提供统一的LLM服务接口

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

use crate::config::LLMConfig;
use crate::llm::ReportModel;

mod providers;

pub use providers::{ProviderAgent, ProviderClient};

/// LLM客户端 - 提供统一的LLM服务接口
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    client: ProviderClient,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: LLMConfig) -> Result<Self> {
        let client = ProviderClient::new(&config)?;
        Ok(Self { client, config })
    }

    /// 通用重试逻辑，用于处理异步操作的重试机制
    async fn retry_with_backoff<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, anyhow::Error>>,
    {
        let max_retries = self.config.retry_attempts;
        let retry_delay_ms = self.config.retry_delay_ms;
        let mut retries = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    retries += 1;
                    tracing::warn!(
                        "❌ 调用模型服务出错，重试中 (第 {} / {}次尝试): {}",
                        retries,
                        max_retries,
                        err
                    );
                    if retries >= max_retries {
                        return Err(err);
                    }
                    tokio::time::sleep(Duration::from_millis(retry_delay_ms)).await;
                }
            }
        }
    }

    /// 单轮对话，每次尝试都受超时限制
    pub async fn prompt(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let agent = self.client.create_agent(system_prompt, &self.config);
        let timeout = Duration::from_secs(self.config.timeout_seconds);

        self.retry_with_backoff(|| async {
            tokio::time::timeout(timeout, agent.prompt(user_prompt))
                .await
                .map_err(|_| anyhow!("模型调用超时 ({}s)", timeout.as_secs()))?
        })
        .await
    }
}

#[async_trait]
impl ReportModel for LLMClient {
    fn model_name(&self) -> String {
        format!("{}/{}", self.config.provider, self.config.model)
    }

    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.prompt(system_prompt, user_prompt).await
    }
}
