use crate::research::phase::{ResearchPhase, quoted};
use crate::types::{BreachRecord, PhaseKind};

/// 竞争格局与品牌影响调研
#[derive(Default)]
pub struct MarketingIntelResearcher;

impl ResearchPhase for MarketingIntelResearcher {
    fn kind(&self) -> PhaseKind {
        PhaseKind::MarketingIntel
    }

    fn queries(&self, breach: &BreachRecord) -> Vec<String> {
        let org = quoted(breach);
        vec![
            format!("{} competitors market share", org),
            format!("{} market position industry", org),
            format!("{} customer churn after breach competitors", org),
            format!("{} brand reputation market", org),
            format!("{} competitive landscape alternatives", org),
        ]
    }

    fn results_per_query(&self) -> usize {
        4
    }

    fn max_sources(&self) -> usize {
        12
    }
}
