use crate::research::phase::{ResearchPhase, quoted};
use crate::types::{BreachRecord, PhaseKind};

/// 事件事实调研：时间线、影响范围、通知与诉讼
#[derive(Default)]
pub struct BreachFactsResearcher;

impl ResearchPhase for BreachFactsResearcher {
    fn kind(&self) -> PhaseKind {
        PhaseKind::BreachFacts
    }

    fn queries(&self, breach: &BreachRecord) -> Vec<String> {
        let org = quoted(breach);
        let dated = match breach.breach_year() {
            Some(year) => format!("{} data breach {}", org, year),
            None => format!("{} data breach disclosed", org),
        };

        vec![
            format!("{} data breach", org),
            dated,
            format!("{} breach notification letter", org),
            format!("{} cybersecurity incident details", org),
            format!("{} breach attorney general filing", org),
            format!("{} data breach class action lawsuit", org),
        ]
    }

    fn results_per_query(&self) -> usize {
        3
    }

    fn max_sources(&self) -> usize {
        12
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_queries_use_breach_year() {
        let mut breach = BreachRecord::new(42, "Acme Corp");
        breach.breach_date = NaiveDate::from_ymd_opt(2024, 3, 1);

        let queries = BreachFactsResearcher.queries(&breach);
        assert_eq!(queries.len(), 6);
        assert_eq!(queries[0], "\"Acme Corp\" data breach");
        assert_eq!(queries[1], "\"Acme Corp\" data breach 2024");
        assert!(queries.iter().all(|q| q.starts_with("\"Acme Corp\"")));
    }

    #[test]
    fn test_queries_without_dates() {
        let breach = BreachRecord::new(42, "Acme Corp");
        let queries = BreachFactsResearcher.queries(&breach);
        assert_eq!(queries[1], "\"Acme Corp\" data breach disclosed");
    }
}
