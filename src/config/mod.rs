use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "moonshot")]
    Moonshot,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "mistral")]
    Mistral,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "ollama")]
    Ollama,
}

impl LLMProvider {
    /// 本地部署的provider不需要API KEY
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, LLMProvider::Ollama)
    }
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Moonshot => write!(f, "moonshot"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::Mistral => write!(f, "mistral"),
            LLMProvider::OpenRouter => write!(f, "openrouter"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "moonshot" => Ok(LLMProvider::Moonshot),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "mistral" => Ok(LLMProvider::Mistral),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    /// LLM模型配置
    pub llm: LLMConfig,

    /// 网页搜索配置
    pub search: SearchConfig,

    /// 结构化抽取服务配置
    pub extraction: ExtractionConfig,

    /// 批量抓取配置
    pub fetch: FetchConfig,

    /// 每日配额
    pub quota: QuotaConfig,

    /// 损失估算常量
    pub damage: DamageModelConfig,

    /// 报告配置
    pub report: ReportConfig,

    /// 存储配置
    pub store: StoreConfig,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY，合成报告必需，缺失时任务直接失败
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 用于报告合成的模型
    pub model: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 重试次数
    pub retry_attempts: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,

    /// 超时时间（秒）
    pub timeout_seconds: u64,
}

/// 网页搜索配置，未配置API KEY时使用合成搜索结果
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    /// 每次查询请求的结果数
    pub results_per_query: usize,
}

/// 结构化抽取服务配置，未配置API KEY时直接抓取网页
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ExtractionConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
}

/// 批量抓取配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct FetchConfig {
    /// 每批并发数
    pub batch_width: usize,
    /// 批次间隔（毫秒）
    pub batch_delay_ms: u64,
    /// 单次直接抓取超时（秒）
    pub timeout_seconds: u64,
    /// 正文最大字符数
    pub max_body_chars: usize,
    /// 正文少于该字符数视为抓取失败
    pub min_body_chars: usize,
    /// 是否允许直接抓取网页
    pub direct_fetch_enabled: bool,
    pub user_agent: String,
}

/// 请求方每日配额
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct QuotaConfig {
    pub max_reports_per_day: u32,
}

/// 损失估算常量，均为行业平均值
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct DamageModelConfig {
    /// 每条记录的直接成本
    pub cost_per_record: f64,
    /// 单客户平均收入，用于估算营收规模
    pub revenue_per_customer: f64,
    /// 监管罚款占营收的比例
    pub regulatory_fine_rate: f64,
    /// 品牌损失相对直接成本的倍数
    pub brand_damage_multiplier: f64,
}

/// 报告配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ReportConfig {
    pub report_type: String,
    /// 单份报告的固定成本估算（美元）
    pub cost_per_report: f64,
    /// 每个来源正文写入prompt的最大字符数
    pub excerpt_chars: usize,
}

/// 存储配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct StoreConfig {
    /// 任务与使用计数的存储目录
    pub data_dir: PathBuf,
    /// 上游泄露记录文件
    pub breaches_path: PathBuf,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

impl LLMConfig {
    pub fn has_credential(&self) -> bool {
        !self.provider.requires_api_key() || !self.api_key.trim().is_empty()
    }
}

impl SearchConfig {
    /// 仅在配置了非空API KEY时返回
    pub fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

impl ExtractionConfig {
    pub fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: String::new(),
            api_base_url: String::from("https://api.openai.com/v1"),
            model: String::from("gpt-4o"),
            max_tokens: 16384,
            temperature: 0.3,
            retry_attempts: 3,
            retry_delay_ms: 5000,
            timeout_seconds: 300,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: String::from("https://google.serper.dev/search"),
            results_per_query: 10,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: String::from("https://api.firecrawl.dev/v1/scrape"),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            batch_width: 3,
            batch_delay_ms: 1000,
            timeout_seconds: 10,
            max_body_chars: 8000,
            min_body_chars: 200,
            direct_fetch_enabled: true,
            user_agent: String::from(
                "Mozilla/5.0 (compatible; breach-intel/0.3; +https://github.com/breach-intel)",
            ),
        }
    }
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            max_reports_per_day: 10,
        }
    }
}

impl Default for DamageModelConfig {
    fn default() -> Self {
        Self {
            cost_per_record: 165.0,
            revenue_per_customer: 150.0,
            regulatory_fine_rate: 0.04,
            brand_damage_multiplier: 0.25,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            report_type: String::from("business_intelligence"),
            cost_per_report: 0.15,
            excerpt_chars: 1500,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".breach-intel"),
            breaches_path: PathBuf::from("breaches.json"),
        }
    }
}
