use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::research::{DamageEstimate, PhaseBundle, PhaseKind};

/// 报告任务状态
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// 状态只能向前推进：pending → processing → {completed, failed}
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        match self {
            JobStatus::Pending => next != JobStatus::Pending,
            JobStatus::Processing => next.is_terminal(),
            JobStatus::Completed | JobStatus::Failed => false,
        }
    }
}

impl Display for JobStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Processing => write!(f, "processing"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// 任务指标
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct JobMetrics {
    pub processing_time_ms: u64,
    /// 按次计费的固定估算值，并非实际计量
    pub cost_estimate: f64,
    pub total_sources: usize,
    pub total_scraped: usize,
}

/// 单阶段摘要
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PhaseSummary {
    pub phase: PhaseKind,
    pub total_sources: usize,
    pub scraped_sources: usize,
    pub fallback_sources: usize,
}

impl From<&PhaseBundle> for PhaseSummary {
    fn from(bundle: &PhaseBundle) -> Self {
        Self {
            phase: bundle.phase,
            total_sources: bundle.total_sources,
            scraped_sources: bundle.scraped_sources,
            fallback_sources: bundle.fallback_sources,
        }
    }
}

/// 任务元数据
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct JobMetadata {
    pub phases: Vec<PhaseSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_estimate: Option<DamageEstimate>,
    /// 各阶段耗时（毫秒）
    #[serde(default)]
    pub phase_durations_ms: BTreeMap<String, u64>,
}

/// 报告生成任务，每个 (breach_id, report_type) 至多一条有效记录
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResearchJob {
    pub id: String,
    pub breach_id: i64,
    pub report_type: String,
    pub status: JobStatus,
    pub model: String,
    #[serde(default)]
    pub requester_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub markdown_content: Option<String>,
    #[serde(default)]
    pub metrics: Option<JobMetrics>,
    #[serde(default)]
    pub metadata: Option<JobMetadata>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl ResearchJob {
    /// 创建处于 processing 状态的新任务
    pub fn start(
        breach_id: i64,
        report_type: &str,
        model: &str,
        requester_id: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            breach_id,
            report_type: report_type.to_string(),
            status: JobStatus::Processing,
            model: model.to_string(),
            requester_id,
            created_at: Utc::now(),
            completed_at: None,
            markdown_content: None,
            metrics: None,
            metadata: None,
            error_message: None,
        }
    }

    pub fn complete(
        &mut self,
        markdown: String,
        metrics: JobMetrics,
        metadata: JobMetadata,
    ) -> anyhow::Result<()> {
        self.transition(JobStatus::Completed)?;
        self.markdown_content = Some(markdown);
        self.metrics = Some(metrics);
        self.metadata = Some(metadata);
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    pub fn fail(&mut self, message: String, processing_time_ms: u64) -> anyhow::Result<()> {
        self.transition(JobStatus::Failed)?;
        self.error_message = Some(message);
        self.metrics = Some(JobMetrics {
            processing_time_ms,
            ..Default::default()
        });
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    fn transition(&mut self, next: JobStatus) -> anyhow::Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(anyhow::anyhow!(
                "任务 {} 无法从 {} 转换为 {}",
                self.id,
                self.status,
                next
            ));
        }
        self.status = next;
        Ok(())
    }
}

/// 请求方的使用计数，仅在报告成功生成后递增
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UsageCounter {
    pub requester_id: String,
    pub reports_generated: u64,
    pub last_generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions_are_monotonic() {
        assert!(JobStatus::Pending.can_transition_to(JobStatus::Processing));
        assert!(JobStatus::Processing.can_transition_to(JobStatus::Completed));
        assert!(JobStatus::Processing.can_transition_to(JobStatus::Failed));
        assert!(!JobStatus::Processing.can_transition_to(JobStatus::Pending));
        assert!(!JobStatus::Completed.can_transition_to(JobStatus::Failed));
        assert!(!JobStatus::Failed.can_transition_to(JobStatus::Processing));
    }

    #[test]
    fn test_completed_job_cannot_fail() {
        let mut job = ResearchJob::start(42, "business_intelligence", "model-x", None);
        job.complete("# Report".to_string(), JobMetrics::default(), JobMetadata::default())
            .unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.completed_at.is_some());

        assert!(job.fail("late error".to_string(), 10).is_err());
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.error_message.is_none());
    }

    #[test]
    fn test_failed_job_records_elapsed_time() {
        let mut job = ResearchJob::start(7, "business_intelligence", "model-x", Some("u1".into()));
        job.fail("boom".to_string(), 1234).unwrap();

        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error_message.as_deref(), Some("boom"));
        assert_eq!(job.metrics.unwrap().processing_time_ms, 1234);
    }
}
