use crate::config::{Config, LLMProvider};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// 只在命令行入口读取的凭证环境变量
pub const ENV_LLM_API_KEY: &str = "BREACH_INTEL_LLM_API_KEY";
pub const ENV_SEARCH_API_KEY: &str = "BREACH_INTEL_SEARCH_API_KEY";
pub const ENV_EXTRACTION_API_KEY: &str = "BREACH_INTEL_EXTRACTION_API_KEY";

const DEFAULT_CONFIG_FILE: &str = "breach-intel.toml";

/// breach-intel - 数据泄露事件商业情报报告生成引擎
#[derive(Parser, Debug)]
#[command(name = "breach-intel")]
#[command(
    about = "Researches a single data breach across the open web and synthesizes a business-intelligence report with a generative model."
)]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// 配置文件路径
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// 任务与使用量数据目录
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// 泄露记录文件（JSON数组）
    #[arg(long, global = true)]
    pub breaches: Option<PathBuf>,

    /// 是否启用详细日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// LLM Provider (openai, moonshot, deepseek, mistral, openrouter, anthropic, ollama)
    #[arg(long, global = true)]
    pub llm_provider: Option<String>,

    /// LLM API KEY
    #[arg(long, global = true)]
    pub llm_api_key: Option<String>,

    /// LLM API基地址
    #[arg(long, global = true)]
    pub llm_api_base_url: Option<String>,

    /// 撰写报告使用的模型
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// 最大tokens数
    #[arg(long, global = true)]
    pub max_tokens: Option<u32>,

    /// 温度参数
    #[arg(long, global = true)]
    pub temperature: Option<f64>,

    /// 搜索服务API KEY，未配置时使用合成搜索结果
    #[arg(long, global = true)]
    pub search_api_key: Option<String>,

    /// 正文抽取服务API KEY
    #[arg(long, global = true)]
    pub extraction_api_key: Option<String>,

    /// 禁用直接抓取网页
    #[arg(long, global = true)]
    pub no_direct_fetch: bool,

    /// 每个请求方每日报告上限
    #[arg(long, global = true)]
    pub max_reports_per_day: Option<u32>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// 为指定泄露事件生成报告（已完成的报告直接复用）
    Generate {
        #[arg(long)]
        breach_id: i64,

        /// 请求方标识，用于每日配额
        #[arg(long)]
        requester: Option<String>,

        /// 将Markdown报告写入文件
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// 查询报告任务状态
    Status {
        #[arg(long)]
        report_id: String,
    },
}

impl Args {
    /// 将CLI参数转换为配置：配置文件 → 环境变量凭证 → 命令行参数
    pub fn to_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(config_path) => Config::from_file(config_path)
                .with_context(|| format!("无法读取配置文件 {:?}", config_path))?,
            None => {
                let default_config_path = std::env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join(DEFAULT_CONFIG_FILE);

                if default_config_path.exists() {
                    Config::from_file(&default_config_path).with_context(|| {
                        format!("无法读取默认配置文件 {:?}", default_config_path)
                    })?
                } else {
                    Config::default()
                }
            }
        };

        apply_env_credentials(&mut config, |key| std::env::var(key).ok());
        self.apply_overrides(&mut config);
        Ok(config)
    }

    /// 覆盖配置文件中的设置
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(data_dir) = &self.data_dir {
            config.store.data_dir = data_dir.clone();
        }
        if let Some(breaches) = &self.breaches {
            config.store.breaches_path = breaches.clone();
        }

        if let Some(provider_str) = &self.llm_provider {
            match provider_str.parse::<LLMProvider>() {
                Ok(provider) => config.llm.provider = provider,
                Err(_) => tracing::warn!(
                    "⚠️ 警告: 未知的provider: {}，使用默认provider",
                    provider_str
                ),
            }
        }
        if let Some(llm_api_key) = &self.llm_api_key {
            config.llm.api_key = llm_api_key.clone();
        }
        if let Some(llm_api_base_url) = &self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url.clone();
        }
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }

        if let Some(search_api_key) = &self.search_api_key {
            config.search.api_key = Some(search_api_key.clone());
        }
        if let Some(extraction_api_key) = &self.extraction_api_key {
            config.extraction.api_key = Some(extraction_api_key.clone());
        }
        if self.no_direct_fetch {
            config.fetch.direct_fetch_enabled = false;
        }
        if let Some(max_reports_per_day) = self.max_reports_per_day {
            config.quota.max_reports_per_day = max_reports_per_day;
        }

        config.verbose = config.verbose || self.verbose;
    }
}

/// 读取凭证环境变量，空值忽略
pub fn apply_env_credentials<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(api_key) = read(ENV_LLM_API_KEY) {
        config.llm.api_key = api_key;
    }
    if let Some(api_key) = read(ENV_SEARCH_API_KEY) {
        config.search.api_key = Some(api_key);
    }
    if let Some(api_key) = read(ENV_EXTRACTION_API_KEY) {
        config.extraction.api_key = Some(api_key);
    }
}

// Include tests
#[cfg(test)]
mod tests;
