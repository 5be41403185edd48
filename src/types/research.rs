use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// 搜索结果
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl SearchResult {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
            published_date: None,
            icon: None,
        }
    }
}

/// 正文来源层级
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContentOrigin {
    /// 结构化抽取服务
    Extraction,
    /// 直接抓取网页
    Direct,
    /// 本地合成的兜底正文
    Fallback,
}

/// 单个来源的可读正文
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ScrapedContent {
    pub url: String,
    pub title: String,
    pub content: String,
    /// 在检索边界上恒为 true，失败只体现在 error 诊断信息里
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub origin: ContentOrigin,
}

/// 调研阶段
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    BreachFacts,
    DamageAssessment,
    Demographics,
    MarketingIntel,
}

impl PhaseKind {
    /// 固定的执行与报告顺序
    pub const ORDERED: [PhaseKind; 4] = [
        PhaseKind::BreachFacts,
        PhaseKind::DamageAssessment,
        PhaseKind::Demographics,
        PhaseKind::MarketingIntel,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            PhaseKind::BreachFacts => "Phase 1: Breach Facts",
            PhaseKind::DamageAssessment => "Phase 2: Damage Assessment",
            PhaseKind::Demographics => "Phase 3: Affected Demographics",
            PhaseKind::MarketingIntel => "Phase 4: Marketing & Competitive Intelligence",
        }
    }
}

impl Display for PhaseKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PhaseKind::BreachFacts => write!(f, "breach_facts"),
            PhaseKind::DamageAssessment => write!(f, "damage_assessment"),
            PhaseKind::Demographics => write!(f, "demographics"),
            PhaseKind::MarketingIntel => write!(f, "marketing_intel"),
        }
    }
}

/// 损失估算结果，完全由受影响人数和配置常量决定
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DamageEstimate {
    pub affected_count: u64,
    pub cost_per_record: f64,
    pub direct_cost: f64,
    pub regulatory_cost: f64,
    pub brand_damage_cost: f64,
    pub total: f64,
    pub confidence: String,
}

/// 单个调研阶段的产出
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PhaseBundle {
    pub phase: PhaseKind,
    pub search_results: Vec<SearchResult>,
    pub scraped_content: Vec<ScrapedContent>,
    pub total_sources: usize,
    pub scraped_sources: usize,
    pub fallback_sources: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_estimate: Option<DamageEstimate>,
}

impl PhaseBundle {
    pub fn new(
        phase: PhaseKind,
        search_results: Vec<SearchResult>,
        scraped_content: Vec<ScrapedContent>,
    ) -> Self {
        let fallback_sources = scraped_content
            .iter()
            .filter(|c| c.origin == ContentOrigin::Fallback)
            .count();
        Self {
            phase,
            total_sources: search_results.len(),
            scraped_sources: scraped_content.len(),
            fallback_sources,
            search_results,
            scraped_content,
            damage_estimate: None,
        }
    }

    pub fn with_damage_estimate(mut self, estimate: DamageEstimate) -> Self {
        self.damage_estimate = Some(estimate);
        self
    }
}
