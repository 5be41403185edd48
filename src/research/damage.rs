use crate::config::DamageModelConfig;
use crate::types::DamageEstimate;

/// 披露规模达到该数量时认为公开信息充分
const HIGH_CONFIDENCE_RECORDS: u64 = 1_000_000;

/// 基于行业平均值的损失估算，结果只取决于受影响人数与常量
#[derive(Debug, Clone, PartialEq)]
pub struct DamageModel {
    config: DamageModelConfig,
}

impl DamageModel {
    pub fn new(config: DamageModelConfig) -> Self {
        Self { config }
    }

    pub fn estimate(&self, affected: Option<u64>) -> DamageEstimate {
        let affected_count = affected.unwrap_or(0);
        let records = affected_count as f64;

        let direct_cost = records * self.config.cost_per_record;
        let estimated_revenue = records * self.config.revenue_per_customer;
        let regulatory_cost = estimated_revenue * self.config.regulatory_fine_rate;
        let brand_damage_cost = direct_cost * self.config.brand_damage_multiplier;

        let confidence = match affected_count {
            0 => "low",
            n if n < HIGH_CONFIDENCE_RECORDS => "medium",
            _ => "high",
        };

        DamageEstimate {
            affected_count,
            cost_per_record: self.config.cost_per_record,
            direct_cost,
            regulatory_cost,
            brand_damage_cost,
            total: direct_cost + regulatory_cost + brand_damage_cost,
            confidence: confidence.to_string(),
        }
    }
}

impl Default for DamageModel {
    fn default() -> Self {
        Self::new(DamageModelConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_components() {
        let estimate = DamageModel::default().estimate(Some(150_000));

        assert_eq!(estimate.affected_count, 150_000);
        assert_eq!(estimate.direct_cost, 24_750_000.0);
        assert_eq!(estimate.regulatory_cost, 900_000.0);
        assert_eq!(estimate.brand_damage_cost, 6_187_500.0);
        assert_eq!(estimate.total, 31_837_500.0);
        assert_eq!(estimate.confidence, "medium");
    }

    #[test]
    fn test_estimate_is_bit_identical_across_runs() {
        let first = DamageModel::default().estimate(Some(1_234_567));
        let second = DamageModel::new(DamageModelConfig::default()).estimate(Some(1_234_567));

        assert_eq!(first.total.to_bits(), second.total.to_bits());
        assert_eq!(first.direct_cost.to_bits(), second.direct_cost.to_bits());
        assert_eq!(first.regulatory_cost.to_bits(), second.regulatory_cost.to_bits());
        assert_eq!(
            first.brand_damage_cost.to_bits(),
            second.brand_damage_cost.to_bits()
        );
        assert_eq!(first.confidence, "high");
    }

    #[test]
    fn test_unknown_affected_count() {
        let estimate = DamageModel::default().estimate(None);
        assert_eq!(estimate.total, 0.0);
        assert_eq!(estimate.confidence, "low");
    }

    #[test]
    fn test_injected_constants() {
        let model = DamageModel::new(DamageModelConfig {
            cost_per_record: 100.0,
            revenue_per_customer: 1000.0,
            regulatory_fine_rate: 0.1,
            brand_damage_multiplier: 0.5,
        });
        let estimate = model.estimate(Some(10));

        assert_eq!(estimate.direct_cost, 1000.0);
        assert_eq!(estimate.regulatory_cost, 1000.0);
        assert_eq!(estimate.brand_damage_cost, 500.0);
        assert_eq!(estimate.total, 2500.0);
    }
}
