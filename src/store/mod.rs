//! 任务与使用量的持久化

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{ResearchJob, UsageCounter};

pub mod breach;
pub mod file;
pub mod memory;

pub use breach::{BreachSource, FileBreachSource, MemoryBreachSource};
pub use file::FileJobStore;
pub use memory::MemoryJobStore;

/// 任务存储；同一 (breach_id, report_type) 下可有多条任务，以最新一条为准
#[async_trait]
pub trait JobStore: Send + Sync {
    /// 该键下最新创建的任务
    async fn find_by_key(&self, breach_id: i64, report_type: &str) -> Result<Option<ResearchJob>>;

    async fn get(&self, report_id: &str) -> Result<Option<ResearchJob>>;

    /// 按任务id写入或覆盖，旧任务不会被删除
    async fn save(&self, job: &ResearchJob) -> Result<()>;

    /// 请求方自 `since` 起为该报告类型创建的任务数
    async fn count_requester_jobs_since(
        &self,
        requester_id: &str,
        report_type: &str,
        since: DateTime<Utc>,
    ) -> Result<u32>;

    /// 使用计数加一
    async fn record_usage(&self, requester_id: &str, at: DateTime<Utc>) -> Result<UsageCounter>;

    async fn usage(&self, requester_id: &str) -> Result<Option<UsageCounter>>;
}

/// 两种存储共用的任务表
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct JobTable {
    jobs: Vec<ResearchJob>,
}

impl JobTable {
    pub(crate) fn find_by_key(&self, breach_id: i64, report_type: &str) -> Option<&ResearchJob> {
        self.jobs
            .iter()
            .filter(|job| job.breach_id == breach_id && job.report_type == report_type)
            .max_by_key(|job| job.created_at)
    }

    pub(crate) fn get(&self, report_id: &str) -> Option<&ResearchJob> {
        self.jobs.iter().find(|job| job.id == report_id)
    }

    pub(crate) fn upsert(&mut self, job: &ResearchJob) {
        match self.jobs.iter_mut().find(|existing| existing.id == job.id) {
            Some(existing) => *existing = job.clone(),
            None => self.jobs.push(job.clone()),
        }
    }

    pub(crate) fn count_requester_jobs_since(
        &self,
        requester_id: &str,
        report_type: &str,
        since: DateTime<Utc>,
    ) -> u32 {
        self.jobs
            .iter()
            .filter(|job| {
                job.requester_id.as_deref() == Some(requester_id)
                    && job.report_type == report_type
                    && job.created_at >= since
            })
            .count() as u32
    }
}

/// 按请求方索引的使用计数
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct UsageTable {
    counters: BTreeMap<String, UsageCounter>,
}

impl UsageTable {
    pub(crate) fn increment(&mut self, requester_id: &str, at: DateTime<Utc>) -> UsageCounter {
        let counter = self
            .counters
            .entry(requester_id.to_string())
            .or_insert_with(|| UsageCounter {
                requester_id: requester_id.to_string(),
                reports_generated: 0,
                last_generated_at: at,
            });
        counter.reports_generated += 1;
        counter.last_generated_at = at;
        counter.clone()
    }

    pub(crate) fn get(&self, requester_id: &str) -> Option<&UsageCounter> {
        self.counters.get(requester_id)
    }
}
