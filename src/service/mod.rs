//! 报告服务 - 缓存查询、配额检查、阶段调研、报告合成与任务状态管理

use anyhow::Result;
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::ReportError;
use crate::llm::{LLMClient, ReportModel};
use crate::research::{ResearchContext, ResearchOrchestrator};
use crate::store::{BreachSource, JobStore};
use crate::synthesis::ReportSynthesizer;
use crate::types::{
    BreachRecord, JobMetadata, JobMetrics, JobStatus, PhaseSummary, ResearchJob,
};

pub mod monitor;

pub use monitor::{ServiceMonitor, ServiceReport};

/// 报告生成请求的返回值
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReportResponse {
    pub report_id: String,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scraped_count: Option<usize>,
    pub cached: bool,
}

impl ReportResponse {
    fn from_job(job: &ResearchJob, cached: bool) -> Self {
        let metrics = job.metrics.as_ref();
        Self {
            report_id: job.id.clone(),
            status: job.status,
            processing_time_ms: metrics.map(|m| m.processing_time_ms),
            source_count: metrics.map(|m| m.total_sources),
            scraped_count: metrics.map(|m| m.total_scraped),
            cached,
        }
    }
}

type JobKey = (i64, String);

pub struct ReportService {
    config: Config,
    breaches: Arc<dyn BreachSource>,
    store: Arc<dyn JobStore>,
    research: ResearchContext,
    orchestrator: ResearchOrchestrator,
    /// 未配置模型凭证时为空，任务会以 CredentialMissing 失败
    synthesizer: Option<ReportSynthesizer>,
    monitor: ServiceMonitor,
    /// 同一 (breach_id, report_type) 的请求串行执行
    key_locks: Mutex<HashMap<JobKey, Arc<Mutex<()>>>>,
}

impl ReportService {
    pub fn new(
        config: Config,
        breaches: Arc<dyn BreachSource>,
        store: Arc<dyn JobStore>,
        model: Option<Arc<dyn ReportModel>>,
    ) -> Result<Self> {
        let research = ResearchContext::from_config(&config)?;
        let synthesizer = model.map(|m| ReportSynthesizer::new(m, config.report.excerpt_chars));

        Ok(Self {
            config,
            breaches,
            store,
            research,
            orchestrator: ResearchOrchestrator,
            synthesizer,
            monitor: ServiceMonitor::new(),
            key_locks: Mutex::new(HashMap::new()),
        })
    }

    /// 根据配置选择撰写模型
    pub fn from_config(
        config: Config,
        breaches: Arc<dyn BreachSource>,
        store: Arc<dyn JobStore>,
    ) -> Result<Self> {
        let model: Option<Arc<dyn ReportModel>> = if config.llm.has_credential() {
            Some(Arc::new(LLMClient::new(config.llm.clone())?))
        } else {
            tracing::warn!("⚠️ 未配置 {} 的API KEY，报告任务将无法完成", config.llm.provider);
            None
        };
        Self::new(config, breaches, store, model)
    }

    pub fn monitor(&self) -> &ServiceMonitor {
        &self.monitor
    }

    /// 为指定泄露事件生成（或复用）商业情报报告
    pub async fn generate_report(
        &self,
        breach_id: i64,
        requester_id: Option<&str>,
    ) -> Result<ReportResponse, ReportError> {
        if breach_id <= 0 {
            return Err(ReportError::InvalidRequest(format!(
                "breach id must be positive, got {}",
                breach_id
            )));
        }

        let breach = self
            .breaches
            .get_breach(breach_id)
            .await?
            .ok_or(ReportError::NotFound(breach_id))?;

        let report_type = self.config.report.report_type.as_str();
        if let Some(requester_id) = requester_id {
            self.check_quota(requester_id, report_type).await?;
        }

        let key = (breach_id, report_type.to_string());
        let key_lock = self.key_lock(&key).await;
        let result = {
            let _guard = key_lock.lock().await;
            self.generate_locked(&breach, report_type, requester_id).await
        };
        self.release_key_lock(&key, key_lock).await;
        result
    }

    /// 持有键锁时执行：缓存命中直接返回，否则新建任务并运行
    async fn generate_locked(
        &self,
        breach: &BreachRecord,
        report_type: &str,
        requester_id: Option<&str>,
    ) -> Result<ReportResponse, ReportError> {
        let breach_id = breach.id;
        if let Some(existing) = self.store.find_by_key(breach_id, report_type).await?
            && existing.status == JobStatus::Completed
        {
            self.monitor.record_cache_hit(breach_id);
            return Ok(ReportResponse::from_job(&existing, true));
        }
        self.monitor.record_cache_miss(breach_id);

        let started = Instant::now();
        let mut job = ResearchJob::start(
            breach_id,
            report_type,
            &self.model_name(),
            requester_id.map(str::to_string),
        );
        self.store.save(&job).await?;
        tracing::info!("📋 创建报告任务 {} [breach {}]", job.id, breach_id);

        match self.run_job(breach, &mut job, started).await {
            Ok(()) => {
                if let Some(requester_id) = requester_id
                    && let Err(err) = self.store.record_usage(requester_id, Utc::now()).await
                {
                    tracing::error!("请求方 {} 的使用计数更新失败: {}", requester_id, err);
                }
                let response = ReportResponse::from_job(&job, false);
                tracing::info!(
                    "🎉 报告 {} 已完成，耗时 {}ms",
                    job.id,
                    response.processing_time_ms.unwrap_or_default()
                );
                Ok(response)
            }
            Err(err) => {
                let elapsed = started.elapsed().as_millis() as u64;
                self.monitor.record_failed(&err.to_string());
                match job.fail(err.to_string(), elapsed) {
                    Ok(()) => {
                        if let Err(store_err) = self.store.save(&job).await {
                            tracing::error!("任务 {} 的失败状态写入失败: {}", job.id, store_err);
                        }
                    }
                    Err(state_err) => tracing::error!("{}", state_err),
                }
                Err(err)
            }
        }
    }

    /// 查询任务状态，供下游轮询
    pub async fn job_status(&self, report_id: &str) -> Result<Option<ResearchJob>, ReportError> {
        if report_id.trim().is_empty() {
            return Err(ReportError::InvalidRequest("report id is empty".to_string()));
        }
        Ok(self.store.get(report_id.trim()).await?)
    }

    /// 凭证检查 → 调研 → 合成 → 写入完成状态
    async fn run_job(
        &self,
        breach: &BreachRecord,
        job: &mut ResearchJob,
        started: Instant,
    ) -> Result<(), ReportError> {
        let synthesizer = self.synthesizer.as_ref().ok_or_else(|| {
            ReportError::CredentialMissing(format!("llm.api_key for {}", self.config.llm.provider))
        })?;

        let findings = self
            .orchestrator
            .execute_research_pipeline(&self.research, breach)
            .await;

        let markdown = synthesizer.synthesize(breach, &findings.bundles).await?;

        let processing_time_ms = started.elapsed().as_millis() as u64;
        let metrics = JobMetrics {
            processing_time_ms,
            cost_estimate: self.config.report.cost_per_report,
            total_sources: findings.total_sources(),
            total_scraped: findings.total_scraped(),
        };
        let metadata = JobMetadata {
            phases: findings.bundles.iter().map(PhaseSummary::from).collect(),
            damage_estimate: findings
                .bundles
                .iter()
                .find_map(|b| b.damage_estimate.clone()),
            phase_durations_ms: findings.phase_durations_ms,
        };

        // 写入成功后才替换内存中的任务，失败时仍可从处理中转为失败
        let mut completed = job.clone();
        completed.complete(markdown, metrics, metadata)?;
        self.store.save(&completed).await?;
        *job = completed;
        self.monitor
            .record_completed(processing_time_ms, self.config.report.cost_per_report);
        Ok(())
    }

    /// 当日（UTC）任务数达到上限时拒绝，不写入任何任务
    async fn check_quota(&self, requester_id: &str, report_type: &str) -> Result<(), ReportError> {
        let limit = self.config.quota.max_reports_per_day;
        let used = self
            .store
            .count_requester_jobs_since(requester_id, report_type, utc_midnight(Utc::now()))
            .await?;

        if used >= limit {
            self.monitor.record_rate_limited(requester_id);
            return Err(ReportError::RateLimited {
                requester_id: requester_id.to_string(),
                limit,
            });
        }
        tracing::debug!("请求方 {} 今日已用 {}/{}", requester_id, used, limit);
        Ok(())
    }

    fn model_name(&self) -> String {
        match &self.synthesizer {
            Some(synthesizer) => synthesizer.model_name(),
            None => format!("{}/{}", self.config.llm.provider, self.config.llm.model),
        }
    }

    async fn key_lock(&self, key: &JobKey) -> Arc<Mutex<()>> {
        self.key_locks
            .lock()
            .await
            .entry(key.clone())
            .or_default()
            .clone()
    }

    /// 没有其他等待者时移除该键的锁
    async fn release_key_lock(&self, key: &JobKey, key_lock: Arc<Mutex<()>>) {
        let mut locks = self.key_locks.lock().await;
        // 映射表与当前调用各持有一份
        if Arc::strong_count(&key_lock) == 2 {
            locks.remove(key);
        }
    }
}

/// 当天UTC零点
fn utc_midnight(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}
