use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// 报告服务运行监控
#[derive(Clone, Default)]
pub struct ServiceMonitor {
    metrics: Arc<ServiceMetrics>,
}

#[derive(Default)]
struct ServiceMetrics {
    /// 已完成报告的缓存命中次数
    cache_hits: AtomicUsize,
    cache_misses: AtomicUsize,
    completed: AtomicUsize,
    failed: AtomicUsize,
    rate_limited: AtomicUsize,
    /// 成功任务的累计处理时间（毫秒）
    total_processing_ms: AtomicU64,
    /// 累计估算成本，单位为千分之一美元
    total_cost_millis: AtomicU64,
}

/// 服务运行报告
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ServiceReport {
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub hit_rate: f64,
    pub completed: usize,
    pub failed: usize,
    pub rate_limited: usize,
    pub average_processing_ms: u64,
    pub estimated_cost: f64,
}

impl ServiceMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cache_hit(&self, breach_id: i64) {
        self.metrics.cache_hits.fetch_add(1, Ordering::Relaxed);
        tracing::info!("   💰 缓存命中 [breach {}] - 直接返回已完成报告", breach_id);
    }

    pub fn record_cache_miss(&self, breach_id: i64) {
        self.metrics.cache_misses.fetch_add(1, Ordering::Relaxed);
        tracing::info!("   ⌛ 缓存未命中 [breach {}] - 需要调研与撰写", breach_id);
    }

    pub fn record_completed(&self, processing_ms: u64, cost_estimate: f64) {
        self.metrics.completed.fetch_add(1, Ordering::Relaxed);
        self.metrics
            .total_processing_ms
            .fetch_add(processing_ms, Ordering::Relaxed);
        self.metrics
            .total_cost_millis
            .fetch_add((cost_estimate * 1000.0).round() as u64, Ordering::Relaxed);
    }

    pub fn record_failed(&self, reason: &str) {
        self.metrics.failed.fetch_add(1, Ordering::Relaxed);
        tracing::error!("   ❌ 报告生成失败: {}", reason);
    }

    pub fn record_rate_limited(&self, requester_id: &str) {
        self.metrics.rate_limited.fetch_add(1, Ordering::Relaxed);
        tracing::warn!("   🚫 请求方 {} 已达到当日报告上限", requester_id);
    }

    pub fn generate_report(&self) -> ServiceReport {
        let cache_hits = self.metrics.cache_hits.load(Ordering::Relaxed);
        let cache_misses = self.metrics.cache_misses.load(Ordering::Relaxed);
        let completed = self.metrics.completed.load(Ordering::Relaxed);
        let lookups = cache_hits + cache_misses;

        let hit_rate = if lookups > 0 {
            cache_hits as f64 / lookups as f64
        } else {
            0.0
        };
        let average_processing_ms = if completed > 0 {
            self.metrics.total_processing_ms.load(Ordering::Relaxed) / completed as u64
        } else {
            0
        };

        ServiceReport {
            cache_hits,
            cache_misses,
            hit_rate,
            completed,
            failed: self.metrics.failed.load(Ordering::Relaxed),
            rate_limited: self.metrics.rate_limited.load(Ordering::Relaxed),
            average_processing_ms,
            estimated_cost: self.metrics.total_cost_millis.load(Ordering::Relaxed) as f64 / 1000.0,
        }
    }

    /// 将运行报告写入日志
    pub fn log_summary(&self) {
        let report = self.generate_report();
        tracing::info!(
            "📊 报告服务统计: 命中 {} / 未命中 {} (命中率 {:.1}%), 完成 {}, 失败 {}, 限流 {}, 平均耗时 {}ms, 估算成本 ${:.2}",
            report.cache_hits,
            report.cache_misses,
            report.hit_rate * 100.0,
            report.completed,
            report.failed,
            report.rate_limited,
            report.average_processing_ms,
            report.estimated_cost
        );
    }
}
