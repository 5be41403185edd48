use async_trait::async_trait;

use crate::research::context::ResearchContext;
use crate::research::phase::{ResearchPhase, quoted};
use crate::types::{BreachRecord, PhaseBundle, PhaseKind};

/// 损失评估调研，在搜索材料之外附带确定性的损失估算
#[derive(Default)]
pub struct DamageAssessmentResearcher;

#[async_trait]
impl ResearchPhase for DamageAssessmentResearcher {
    fn kind(&self) -> PhaseKind {
        PhaseKind::DamageAssessment
    }

    fn queries(&self, breach: &BreachRecord) -> Vec<String> {
        let org = quoted(breach);
        let scale = match breach.known_affected() {
            Some(count) => format!("{} data breach {} records cost", org, count),
            None => format!("{} data breach cost per record", org),
        };

        vec![
            format!("{} data breach financial impact", org),
            format!("{} breach settlement cost", org),
            format!("{} regulatory fine penalty data breach", org),
            format!("{} stock price after data breach", org),
            scale,
        ]
    }

    fn results_per_query(&self) -> usize {
        3
    }

    fn max_sources(&self) -> usize {
        10
    }

    async fn execute(&self, context: &ResearchContext, breach: &BreachRecord) -> PhaseBundle {
        let sources = self.collect_sources(context, breach).await;
        let scraped = context.fetcher.fetch_all(&sources).await;
        let estimate = context.damage_model.estimate(breach.known_affected());

        tracing::info!(
            "💰 损失估算: {} 条记录，总计 ${:.0}（置信度 {}）",
            estimate.affected_count,
            estimate.total,
            estimate.confidence
        );

        PhaseBundle::new(self.kind(), sources, scraped).with_damage_estimate(estimate)
    }
}
