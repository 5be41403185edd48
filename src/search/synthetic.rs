use async_trait::async_trait;
use md5::{Digest, Md5};

use super::SearchProvider;
use crate::types::SearchResult;
use crate::utils::text::{organization_from_query, slugify};

/// 关键词类别，搜索兜底与正文兜底共用同一套判断
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentCategory {
    Demographic,
    Financial,
    Market,
}

impl ContentCategory {
    const ALL: [ContentCategory; 3] = [
        ContentCategory::Demographic,
        ContentCategory::Financial,
        ContentCategory::Market,
    ];

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            ContentCategory::Demographic => &["demographic", "customer base", "age group"],
            ContentCategory::Financial => &[
                "financial",
                "cost",
                "settlement",
                "fine",
                "penalty",
                "stock",
            ],
            ContentCategory::Market => &["market", "competitor", "competitive", "brand"],
        }
    }

    /// 按固定顺序返回文本中命中的类别
    pub fn detect(text: &str) -> Vec<ContentCategory> {
        let lower = text.to_lowercase();
        Self::ALL
            .into_iter()
            .filter(|category| category.keywords().iter().any(|k| lower.contains(k)))
            .collect()
    }
}

/// 合成搜索结果生成器，结果只取决于机构名与查询命中的类别
#[derive(Debug, Default, Clone)]
pub struct SyntheticSearch;

impl SyntheticSearch {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, query: &str) -> Vec<SearchResult> {
        let organization = organization_from_query(query);
        let slug = slugify(&organization);
        let org_hash = short_hash(&organization);
        let query_hash = short_hash(&query.to_lowercase());

        let mut results = vec![
            SearchResult::new(
                format!("{}: {}", organization, topic_of(query, &organization)),
                format!("https://www.databreachtoday.com/news/{}-{}", slug, query_hash),
                format!(
                    "Coverage of {} related to \"{}\", including disclosure timeline and affected parties.",
                    organization,
                    query.trim()
                ),
            ),
            SearchResult::new(
                format!("{} Data Breach: What Happened and Who Is Affected", organization),
                format!("https://databreaches.net/{}-data-breach-{}/", slug, org_hash),
                format!(
                    "{} disclosed a security incident that exposed personal information. Here is what is known about the breach and its scope.",
                    organization
                ),
            ),
            SearchResult::new(
                format!("{} Notifies Customers of Security Incident", organization),
                format!(
                    "https://www.bleepingcomputer.com/news/security/{}-notifies-customers-of-security-incident/",
                    slug
                ),
                format!(
                    "{} has begun notifying affected individuals and regulators after unauthorized access to its systems.",
                    organization
                ),
            ),
        ];

        for category in ContentCategory::detect(query) {
            results.extend(category_results(category, &organization, &slug));
        }

        results
    }
}

#[async_trait]
impl SearchProvider for SyntheticSearch {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    async fn search(&self, query: &str) -> Vec<SearchResult> {
        self.generate(query)
    }
}

fn category_results(
    category: ContentCategory,
    organization: &str,
    slug: &str,
) -> Vec<SearchResult> {
    match category {
        ContentCategory::Demographic => vec![
            SearchResult::new(
                format!("{} Customer Demographics and Audience Profile", organization),
                format!("https://www.statista.com/topics/{}-customers/", slug),
                format!(
                    "Age, income and regional distribution of {} customers, with comparisons to industry peers.",
                    organization
                ),
            ),
            SearchResult::new(
                "Who Is Most Affected by Data Breaches",
                "https://www.pewresearch.org/internet/data-breach-demographics/",
                "Survey data on how different age and income groups experience and respond to data breaches.",
            ),
        ],
        ContentCategory::Financial => vec![
            SearchResult::new(
                format!("{} Faces Financial Fallout After Breach", organization),
                format!("https://www.reuters.com/business/{}-breach-financial-impact/", slug),
                format!(
                    "Analysts weigh remediation costs, regulatory exposure and litigation risk for {}.",
                    organization
                ),
            ),
            SearchResult::new(
                "Cost of a Data Breach Report: Industry Benchmarks",
                "https://www.ibm.com/reports/data-breach",
                "Average per-record breach costs, detection and escalation spend, and lost business by industry.",
            ),
        ],
        ContentCategory::Market => vec![
            SearchResult::new(
                format!("{} Competitors and Market Share", organization),
                format!("https://www.similarweb.com/website/{}.com/competitors/", slug),
                format!(
                    "Top alternatives to {} ranked by audience overlap and market share.",
                    organization
                ),
            ),
            SearchResult::new(
                "How Data Breaches Shift Customer Loyalty",
                "https://hbr.org/data-breach-customer-trust",
                "Research on customer churn, brand trust and competitor gains following public security incidents.",
            ),
        ],
    }
}

/// 查询去掉机构名后的剩余部分作为主题
fn topic_of(query: &str, organization: &str) -> String {
    let topic = query
        .replace(&format!("\"{}\"", organization), "")
        .trim()
        .to_string();
    if topic.is_empty() {
        "Breach Coverage".to_string()
    } else {
        topic
    }
}

fn short_hash(text: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())[..8].to_string()
}
