use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 数据泄露记录，由上游抓取程序写入，本系统只读
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BreachRecord {
    pub id: i64,
    /// 泄露机构名称
    pub organization_name: String,
    /// 受影响人数（部分通知未披露）
    #[serde(default)]
    pub affected_individuals: Option<u64>,
    #[serde(default)]
    pub breach_date: Option<NaiveDate>,
    #[serde(default)]
    pub reported_date: Option<NaiveDate>,
    /// 泄露的数据类型描述
    #[serde(default)]
    pub what_was_leaked: Option<String>,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default)]
    pub source_type: Option<String>,
    /// 通知原文、公告等文档链接
    #[serde(default)]
    pub document_urls: Vec<String>,
}

impl BreachRecord {
    pub fn new(id: i64, organization_name: impl Into<String>) -> Self {
        Self {
            id,
            organization_name: organization_name.into(),
            affected_individuals: None,
            breach_date: None,
            reported_date: None,
            what_was_leaked: None,
            source_name: None,
            source_type: None,
            document_urls: Vec::new(),
        }
    }

    /// 泄露年份，优先使用泄露日期，其次为上报日期
    pub fn breach_year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.breach_date.or(self.reported_date).map(|d| d.year())
    }

    /// 受影响人数，0 视为未知
    pub fn known_affected(&self) -> Option<u64> {
        self.affected_individuals.filter(|count| *count > 0)
    }
}
