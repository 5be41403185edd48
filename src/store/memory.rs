use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{JobStore, JobTable, UsageTable};
use crate::types::{ResearchJob, UsageCounter};

/// 进程内任务存储
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: RwLock<JobTable>,
    usage: RwLock<UsageTable>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn find_by_key(&self, breach_id: i64, report_type: &str) -> Result<Option<ResearchJob>> {
        Ok(self.jobs.read().await.find_by_key(breach_id, report_type).cloned())
    }

    async fn get(&self, report_id: &str) -> Result<Option<ResearchJob>> {
        Ok(self.jobs.read().await.get(report_id).cloned())
    }

    async fn save(&self, job: &ResearchJob) -> Result<()> {
        self.jobs.write().await.upsert(job);
        Ok(())
    }

    async fn count_requester_jobs_since(
        &self,
        requester_id: &str,
        report_type: &str,
        since: DateTime<Utc>,
    ) -> Result<u32> {
        Ok(self
            .jobs
            .read()
            .await
            .count_requester_jobs_since(requester_id, report_type, since))
    }

    async fn record_usage(&self, requester_id: &str, at: DateTime<Utc>) -> Result<UsageCounter> {
        Ok(self.usage.write().await.increment(requester_id, at))
    }

    async fn usage(&self, requester_id: &str) -> Result<Option<UsageCounter>> {
        Ok(self.usage.read().await.get(requester_id).cloned())
    }
}
