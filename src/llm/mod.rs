//! 报告撰写模型

use anyhow::Result;
use async_trait::async_trait;

pub mod client;

pub use client::LLMClient;

/// 报告撰写模型，在构造时选定
#[async_trait]
pub trait ReportModel: Send + Sync {
    /// 记录到任务上的模型标识
    fn model_name(&self) -> String;

    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}
