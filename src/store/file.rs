use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use super::{JobStore, JobTable, UsageTable};
use crate::types::{ResearchJob, UsageCounter};

const JOBS_FILE: &str = "jobs.json";
const USAGE_FILE: &str = "usage.json";

/// 基于JSON文件的任务存储：`<data_dir>/jobs.json` 与 `<data_dir>/usage.json`
pub struct FileJobStore {
    data_dir: PathBuf,
    /// 串行化读-改-写
    write_lock: Mutex<()>,
}

impl FileJobStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn jobs_path(&self) -> PathBuf {
        self.data_dir.join(JOBS_FILE)
    }

    fn usage_path(&self) -> PathBuf {
        self.data_dir.join(USAGE_FILE)
    }

    /// 读取JSON文件，文件不存在时返回默认值
    async fn load<T>(path: &Path) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        if !path.exists() {
            return Ok(T::default());
        }
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("读取文件失败: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("反序列化失败: {}", path.display()))
    }

    async fn persist<T>(path: &Path, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(value)?;
        fs::write(path, content)
            .await
            .with_context(|| format!("写入文件失败: {}", path.display()))
    }

    async fn load_jobs(&self) -> Result<JobTable> {
        Self::load(&self.jobs_path()).await
    }
}

#[async_trait]
impl JobStore for FileJobStore {
    async fn find_by_key(&self, breach_id: i64, report_type: &str) -> Result<Option<ResearchJob>> {
        Ok(self.load_jobs().await?.find_by_key(breach_id, report_type).cloned())
    }

    async fn get(&self, report_id: &str) -> Result<Option<ResearchJob>> {
        Ok(self.load_jobs().await?.get(report_id).cloned())
    }

    async fn save(&self, job: &ResearchJob) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut table = self.load_jobs().await?;
        table.upsert(job);
        Self::persist(&self.jobs_path(), &table).await
    }

    async fn count_requester_jobs_since(
        &self,
        requester_id: &str,
        report_type: &str,
        since: DateTime<Utc>,
    ) -> Result<u32> {
        Ok(self
            .load_jobs()
            .await?
            .count_requester_jobs_since(requester_id, report_type, since))
    }

    async fn record_usage(&self, requester_id: &str, at: DateTime<Utc>) -> Result<UsageCounter> {
        let _guard = self.write_lock.lock().await;
        let mut usage: UsageTable = Self::load(&self.usage_path()).await?;
        let counter = usage.increment(requester_id, at);
        Self::persist(&self.usage_path(), &usage).await?;
        Ok(counter)
    }

    async fn usage(&self, requester_id: &str) -> Result<Option<UsageCounter>> {
        let usage: UsageTable = Self::load(&self.usage_path()).await?;
        Ok(usage.get(requester_id).cloned())
    }
}
