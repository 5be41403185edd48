// 多阶段泄露事件调研
// 1. BreachFacts：事件本身，时间线、影响范围、通知与诉讼
// 2. DamageAssessment：财务与监管影响，附带确定性的损失估算
// 3. Demographics：受影响人群画像
// 4. MarketingIntel：竞争格局与品牌影响
// 各阶段互不依赖，但报告中的顺序固定

pub mod context;
pub mod damage;
pub mod orchestrator;
pub mod phase;
pub mod phases;

pub use context::ResearchContext;
pub use damage::DamageModel;
pub use orchestrator::{ResearchFindings, ResearchOrchestrator};
pub use phase::{ResearchPhase, dedup_and_cap};
