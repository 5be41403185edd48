//! LLM Provider支持模块

use anyhow::Result;
use rig::{agent::Agent, client::CompletionClient, completion::Prompt};

use crate::config::{LLMConfig, LLMProvider};

/// 统一的Provider客户端枚举
#[derive(Clone)]
pub enum ProviderClient {
    OpenAI(rig::providers::openai::Client),
    Moonshot(rig::providers::moonshot::Client),
    DeepSeek(rig::providers::deepseek::Client),
    Mistral(rig::providers::mistral::Client),
    OpenRouter(rig::providers::openrouter::Client),
    Anthropic(rig::providers::anthropic::Client),
    Ollama(rig::providers::ollama::Client),
}

/// 以 `agent(model)` 构建报告撰写agent，`capped` 时附带max_tokens
macro_rules! report_agent {
    ($client:expr, $system_prompt:expr, $config:expr) => {
        $client
            .agent(&$config.model)
            .preamble($system_prompt)
            .temperature($config.temperature)
            .build()
    };
    ($client:expr, $system_prompt:expr, $config:expr, capped) => {
        $client
            .agent(&$config.model)
            .preamble($system_prompt)
            .max_tokens($config.max_tokens.into())
            .temperature($config.temperature)
            .build()
    };
}

impl ProviderClient {
    /// 根据配置创建相应的provider客户端
    pub fn new(config: &LLMConfig) -> Result<Self> {
        use rig::providers::{anthropic, deepseek, mistral, moonshot, ollama, openai, openrouter};

        let key = config.api_key.as_str();
        let base_url = config.api_base_url.as_str();
        Ok(match config.provider {
            LLMProvider::OpenAI => {
                Self::OpenAI(openai::Client::builder(key).base_url(base_url).build())
            }
            LLMProvider::Moonshot => {
                Self::Moonshot(moonshot::Client::builder(key).base_url(base_url).build())
            }
            LLMProvider::DeepSeek => {
                Self::DeepSeek(deepseek::Client::builder(key).base_url(base_url).build())
            }
            LLMProvider::Mistral => Self::Mistral(mistral::Client::builder(key).build()),
            LLMProvider::OpenRouter => Self::OpenRouter(openrouter::Client::builder(key).build()),
            LLMProvider::Anthropic => Self::Anthropic(anthropic::ClientBuilder::new(key).build()?),
            LLMProvider::Ollama => Self::Ollama(ollama::Client::builder().build()),
        })
    }

    /// 创建报告撰写Agent，系统提示词作为preamble
    pub fn create_agent(&self, system_prompt: &str, config: &LLMConfig) -> ProviderAgent {
        match self {
            // OpenAI 走 chat completions 接口
            Self::OpenAI(client) => ProviderAgent::OpenAI(
                client
                    .completion_model(&config.model)
                    .completions_api()
                    .into_agent_builder()
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .temperature(config.temperature)
                    .build(),
            ),
            Self::Moonshot(client) => {
                ProviderAgent::Moonshot(report_agent!(client, system_prompt, config))
            }
            Self::DeepSeek(client) => {
                ProviderAgent::DeepSeek(report_agent!(client, system_prompt, config))
            }
            Self::Mistral(client) => {
                ProviderAgent::Mistral(report_agent!(client, system_prompt, config))
            }
            Self::OpenRouter(client) => {
                ProviderAgent::OpenRouter(report_agent!(client, system_prompt, config))
            }
            Self::Anthropic(client) => {
                ProviderAgent::Anthropic(report_agent!(client, system_prompt, config, capped))
            }
            Self::Ollama(client) => {
                ProviderAgent::Ollama(report_agent!(client, system_prompt, config, capped))
            }
        }
    }
}

/// 统一的Agent枚举
pub enum ProviderAgent {
    OpenAI(Agent<rig::providers::openai::CompletionModel>),
    Mistral(Agent<rig::providers::mistral::CompletionModel>),
    OpenRouter(Agent<rig::providers::openrouter::CompletionModel>),
    Anthropic(Agent<rig::providers::anthropic::completion::CompletionModel>),
    Moonshot(Agent<rig::providers::moonshot::CompletionModel>),
    DeepSeek(Agent<rig::providers::deepseek::CompletionModel>),
    Ollama(Agent<rig::providers::ollama::CompletionModel<reqwest::Client>>),
}

impl ProviderAgent {
    /// 执行prompt
    pub async fn prompt(&self, prompt: &str) -> Result<String> {
        let reply = match self {
            Self::OpenAI(agent) => agent.prompt(prompt).await?,
            Self::Moonshot(agent) => agent.prompt(prompt).await?,
            Self::DeepSeek(agent) => agent.prompt(prompt).await?,
            Self::Mistral(agent) => agent.prompt(prompt).await?,
            Self::OpenRouter(agent) => agent.prompt(prompt).await?,
            Self::Anthropic(agent) => agent.prompt(prompt).await?,
            Self::Ollama(agent) => agent.prompt(prompt).await?,
        };
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_agent_matches_configured_provider() {
        for provider in [
            LLMProvider::OpenAI,
            LLMProvider::Moonshot,
            LLMProvider::DeepSeek,
            LLMProvider::Mistral,
            LLMProvider::OpenRouter,
            LLMProvider::Anthropic,
            LLMProvider::Ollama,
        ] {
            let config = LLMConfig {
                provider: provider.clone(),
                api_key: "test-key".to_string(),
                ..Default::default()
            };
            let agent = ProviderClient::new(&config)
                .unwrap()
                .create_agent("You write breach reports.", &config);

            let matched = matches!(
                (&provider, &agent),
                (LLMProvider::OpenAI, ProviderAgent::OpenAI(_))
                    | (LLMProvider::Moonshot, ProviderAgent::Moonshot(_))
                    | (LLMProvider::DeepSeek, ProviderAgent::DeepSeek(_))
                    | (LLMProvider::Mistral, ProviderAgent::Mistral(_))
                    | (LLMProvider::OpenRouter, ProviderAgent::OpenRouter(_))
                    | (LLMProvider::Anthropic, ProviderAgent::Anthropic(_))
                    | (LLMProvider::Ollama, ProviderAgent::Ollama(_))
            );
            assert!(matched, "agent does not match provider {}", provider);
        }
    }
}
