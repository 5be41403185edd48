pub mod breach;
pub mod job;
pub mod research;

pub use breach::BreachRecord;
pub use job::{JobMetadata, JobMetrics, JobStatus, PhaseSummary, ResearchJob, UsageCounter};
pub use research::{
    ContentOrigin, DamageEstimate, PhaseBundle, PhaseKind, ScrapedContent, SearchResult,
};
