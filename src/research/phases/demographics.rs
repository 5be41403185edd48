use crate::research::phase::{ResearchPhase, quoted};
use crate::types::{BreachRecord, PhaseKind};

/// 受影响人群画像
#[derive(Default)]
pub struct DemographicsResearcher;

impl ResearchPhase for DemographicsResearcher {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Demographics
    }

    fn queries(&self, breach: &BreachRecord) -> Vec<String> {
        let org = quoted(breach);
        vec![
            format!("{} customer demographics", org),
            format!("{} customer base age income demographic", org),
            format!("{} affected customers demographic profile", org),
            format!("{} user demographics by region", org),
            format!("{} target audience demographic", org),
            format!("{} customers by state", org),
        ]
    }

    fn results_per_query(&self) -> usize {
        2
    }

    fn max_sources(&self) -> usize {
        10
    }
}
