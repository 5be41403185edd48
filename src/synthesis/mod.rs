//! 报告合成 - 将全部阶段的调研结果交给模型撰写一份Markdown报告

use std::sync::Arc;

use crate::error::ReportError;
use crate::llm::ReportModel;
use crate::types::{BreachRecord, PhaseBundle};

pub mod prompt;

pub use prompt::{REQUIRED_SECTIONS, ReportPromptBuilder};

pub struct ReportSynthesizer {
    model: Arc<dyn ReportModel>,
    prompt_builder: ReportPromptBuilder,
}

impl ReportSynthesizer {
    pub fn new(model: Arc<dyn ReportModel>, excerpt_chars: usize) -> Self {
        Self {
            model,
            prompt_builder: ReportPromptBuilder::new(excerpt_chars),
        }
    }

    pub fn model_name(&self) -> String {
        self.model.model_name()
    }

    /// 一次模型调用；空输出视为失败
    pub async fn synthesize(
        &self,
        breach: &BreachRecord,
        bundles: &[PhaseBundle],
    ) -> Result<String, ReportError> {
        let (system_prompt, user_prompt) = self.prompt_builder.build_prompts(breach, bundles);
        tracing::debug!("📝 报告提示词长度: {} 字符", user_prompt.chars().count());

        let markdown = self
            .model
            .generate(&system_prompt, &user_prompt)
            .await
            .map_err(|e| ReportError::SynthesisFailure(e.to_string()))?;

        let markdown = markdown.trim();
        if markdown.is_empty() {
            return Err(ReportError::SynthesisFailure(
                "model returned empty content".to_string(),
            ));
        }

        Ok(markdown.to_string())
    }
}
