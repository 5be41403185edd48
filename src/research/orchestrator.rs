use std::collections::BTreeMap;

use crate::research::context::ResearchContext;
use crate::research::phase::ResearchPhase;
use crate::research::phases::{
    BreachFactsResearcher, DamageAssessmentResearcher, DemographicsResearcher,
    MarketingIntelResearcher,
};
use crate::types::{BreachRecord, PhaseBundle};
use crate::utils::timing::TimingScope;

/// 四个阶段的调研结果，顺序与报告章节一致
#[derive(Debug, Clone)]
pub struct ResearchFindings {
    pub bundles: Vec<PhaseBundle>,
    /// 各阶段耗时（毫秒）
    pub phase_durations_ms: BTreeMap<String, u64>,
}

impl ResearchFindings {
    pub fn total_sources(&self) -> usize {
        self.bundles.iter().map(|b| b.total_sources).sum()
    }

    pub fn total_scraped(&self) -> usize {
        self.bundles.iter().map(|b| b.scraped_sources).sum()
    }
}

/// 多阶段调研编排器
#[derive(Default)]
pub struct ResearchOrchestrator;

impl ResearchOrchestrator {
    /// 按固定顺序执行所有调研阶段
    pub async fn execute_research_pipeline(
        &self,
        context: &ResearchContext,
        breach: &BreachRecord,
    ) -> ResearchFindings {
        tracing::info!("🚀 开始调研 [{}] {}", breach.id, breach.organization_name);
        let mut timing = TimingScope::new();
        let mut bundles = Vec::with_capacity(4);

        bundles.push(
            self.execute_phase(&BreachFactsResearcher, context, breach, &mut timing)
                .await,
        );
        bundles.push(
            self.execute_phase(&DamageAssessmentResearcher, context, breach, &mut timing)
                .await,
        );
        bundles.push(
            self.execute_phase(&DemographicsResearcher, context, breach, &mut timing)
                .await,
        );
        bundles.push(
            self.execute_phase(&MarketingIntelResearcher, context, breach, &mut timing)
                .await,
        );

        tracing::info!("✓ 调研完成\n{}", timing.generate_timing_report());

        ResearchFindings {
            bundles,
            phase_durations_ms: timing.phase_millis(),
        }
    }

    /// 执行单个阶段
    async fn execute_phase<T>(
        &self,
        phase: &T,
        context: &ResearchContext,
        breach: &BreachRecord,
        timing: &mut TimingScope,
    ) -> PhaseBundle
    where
        T: ResearchPhase,
    {
        let name = phase.kind().to_string();
        tracing::info!("🤖 执行 {} 调研...", name);
        timing.start_phase(&name);

        let bundle = phase.execute(context, breach).await;

        timing.end_phase(&name);
        tracing::info!(
            "✓ {} 完成：{} 个来源，{} 个使用合成正文",
            name,
            bundle.total_sources,
            bundle.fallback_sources
        );
        bundle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::research::damage::DamageModel;
    use crate::retrieval::{BatchedFetcher, ContentRetriever};
    use crate::search::{SearchProvider, SyntheticSearch};
    use crate::types::{PhaseKind, SearchResult};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// 记录查询顺序的合成搜索
    #[derive(Default)]
    struct RecordingSearch {
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SearchProvider for RecordingSearch {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn search(&self, query: &str) -> Vec<SearchResult> {
            self.queries.lock().unwrap().push(query.to_string());
            SyntheticSearch::new().generate(query)
        }
    }

    fn offline_context(search: Arc<dyn SearchProvider>) -> ResearchContext {
        let retriever = Arc::new(ContentRetriever::new(vec![]));
        ResearchContext::new(
            search,
            BatchedFetcher::new(retriever, 3, Duration::ZERO),
            DamageModel::default(),
        )
    }

    fn acme() -> BreachRecord {
        let mut breach = BreachRecord::new(42, "Acme Corp");
        breach.affected_individuals = Some(150_000);
        breach
    }

    #[tokio::test]
    async fn test_phases_run_in_fixed_order() {
        let search = Arc::new(RecordingSearch::default());
        let context = offline_context(search.clone());

        let findings = ResearchOrchestrator
            .execute_research_pipeline(&context, &acme())
            .await;

        let kinds: Vec<PhaseKind> = findings.bundles.iter().map(|b| b.phase).collect();
        assert_eq!(kinds, PhaseKind::ORDERED.to_vec());
        assert_eq!(search.queries.lock().unwrap().len(), 6 + 5 + 6 + 5);
        assert_eq!(findings.phase_durations_ms.len(), 4);
    }

    #[tokio::test]
    async fn test_bundle_invariants_hold_offline() {
        let context = offline_context(Arc::new(SyntheticSearch::new()));
        let findings = ResearchOrchestrator
            .execute_research_pipeline(&context, &acme())
            .await;

        for bundle in &findings.bundles {
            assert!(bundle.total_sources >= 1);
            assert_eq!(bundle.scraped_content.len(), bundle.search_results.len());
            assert_eq!(bundle.scraped_sources, bundle.total_sources);
            assert_eq!(bundle.fallback_sources, bundle.scraped_sources);
            assert!(bundle.scraped_content.iter().all(|c| c.success));

            let mut urls: Vec<&str> = bundle.search_results.iter().map(|r| r.url.as_str()).collect();
            let before = urls.len();
            urls.sort();
            urls.dedup();
            assert_eq!(urls.len(), before);
        }

        let damage = &findings.bundles[1];
        assert_eq!(damage.damage_estimate.as_ref().unwrap().total, 31_837_500.0);
        assert!(findings.bundles[0].damage_estimate.is_none());

        let expected: usize = findings.bundles.iter().map(|b| b.total_sources).sum();
        assert_eq!(findings.total_sources(), expected);
        assert_eq!(findings.total_scraped(), expected);
    }
}
