use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::fs;

use crate::types::BreachRecord;

/// 上游泄露记录来源，只读
#[async_trait]
pub trait BreachSource: Send + Sync {
    async fn get_breach(&self, breach_id: i64) -> Result<Option<BreachRecord>>;
}

/// 内存中的泄露记录
#[derive(Default)]
pub struct MemoryBreachSource {
    records: HashMap<i64, BreachRecord>,
}

impl MemoryBreachSource {
    pub fn new(records: impl IntoIterator<Item = BreachRecord>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.id, r)).collect(),
        }
    }
}

#[async_trait]
impl BreachSource for MemoryBreachSource {
    async fn get_breach(&self, breach_id: i64) -> Result<Option<BreachRecord>> {
        Ok(self.records.get(&breach_id).cloned())
    }
}

/// JSON数组文件形式的泄露记录，每次查询时读取以反映上游更新
pub struct FileBreachSource {
    path: PathBuf,
}

impl FileBreachSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<Vec<BreachRecord>> {
        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("无法读取泄露记录文件: {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("泄露记录文件格式错误: {}", self.path.display()))
    }
}

#[async_trait]
impl BreachSource for FileBreachSource {
    async fn get_breach(&self, breach_id: i64) -> Result<Option<BreachRecord>> {
        Ok(self.load().await?.into_iter().find(|r| r.id == breach_id))
    }
}
