pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod research;
pub mod retrieval;
pub mod search;
pub mod service;
pub mod store;
pub mod synthesis;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::ReportError;
pub use service::{ReportResponse, ReportService};
