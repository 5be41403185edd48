pub mod breach_facts;
pub mod damage_assessment;
pub mod demographics;
pub mod marketing_intel;

pub use breach_facts::BreachFactsResearcher;
pub use damage_assessment::DamageAssessmentResearcher;
pub use demographics::DemographicsResearcher;
pub use marketing_intel::MarketingIntelResearcher;
